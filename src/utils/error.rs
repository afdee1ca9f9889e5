use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown product: {name}")]
    UnknownProduct { name: String },

    #[error("'{name}' is not part of the transaction")]
    LineNotFound { name: String },

    #[error("Nothing to subtract from '{name}'")]
    NothingToSubtract { name: String },

    #[error("No item selected")]
    NoSelection,

    #[error("Nothing to generate: the transaction is empty")]
    EmptyTransaction,

    #[error("Nothing to edit: the transaction is empty")]
    NothingToEdit,

    #[error("No edit of the transaction is open")]
    NoOpenEdit,

    #[error("An edit of the transaction is already open")]
    EditInProgress,

    #[error("The transaction changed after this edit was opened")]
    StaleEdit,

    #[error("Unrecognised command: {input}")]
    InvalidIntent { input: String },
}

pub type Result<T> = std::result::Result<T, PosError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Selection,
    InvalidOperation,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PosError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PosError::ConfigValidationError { .. }
            | PosError::InvalidConfigValueError { .. }
            | PosError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PosError::IoError(_) | PosError::SerializationError(_) | PosError::CsvError(_) => {
                ErrorCategory::Storage
            }
            PosError::UnknownProduct { .. }
            | PosError::EmptyTransaction
            | PosError::NothingToEdit
            | PosError::InvalidIntent { .. } => ErrorCategory::Input,
            PosError::NoSelection | PosError::LineNotFound { .. } => ErrorCategory::Selection,
            PosError::NothingToSubtract { .. }
            | PosError::EditInProgress
            | PosError::NoOpenEdit
            | PosError::StaleEdit => ErrorCategory::InvalidOperation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        // the edit is lost, so the cashier has to redo it
        if matches!(self, PosError::StaleEdit) {
            return ErrorSeverity::Medium;
        }

        match self.category() {
            ErrorCategory::Input | ErrorCategory::Selection | ErrorCategory::InvalidOperation => {
                ErrorSeverity::Low
            }
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// Ledger and intent errors leave the ledger untouched and can be shown as a notice.
    pub fn is_recoverable(&self) -> bool {
        self.severity() <= ErrorSeverity::Medium
    }

    /// Short title for a notice, in the spirit of a message box caption.
    pub fn notice_title(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Configuration Error",
            ErrorCategory::Input => "Input Error",
            ErrorCategory::Selection => "Selection Error",
            ErrorCategory::InvalidOperation => "Error",
            ErrorCategory::Storage => "Storage Error",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PosError::EmptyTransaction => "Nothing to generate.".to_string(),
            PosError::NothingToEdit => {
                "There are no items in the transaction to edit.".to_string()
            }
            PosError::NoOpenEdit => {
                "Open \"Edit transaction\" before selecting an item.".to_string()
            }
            PosError::NoSelection => "Please select an item to modify.".to_string(),
            PosError::NothingToSubtract { name } => format!(
                "'{}' is already at 0 and will be removed from the transaction on confirm.",
                name
            ),
            PosError::UnknownProduct { name } => {
                format!("'{}' is not in the product catalog.", name)
            }
            PosError::IoError(e) => format!("Could not read or write a file: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PosError::EmptyTransaction => "Add at least one product before generating a receipt",
            PosError::NothingToEdit => "Add at least one product before editing the transaction",
            PosError::NoOpenEdit => "Run `edit` first, then select a line",
            PosError::NoSelection => "Select a line of the transaction first",
            PosError::NothingToSubtract { .. } => "Confirm the edit to remove the line",
            PosError::LineNotFound { .. } => "Only lines already in the transaction can be edited",
            PosError::UnknownProduct { .. } => "Run the `catalog` command to list product names",
            PosError::EditInProgress => "Confirm or cancel the open edit first",
            PosError::StaleEdit => "Open the edit again and repeat the changes",
            PosError::InvalidIntent { .. } => {
                "Use add, edit, select, +, -, commit, cancel or receipt"
            }
            PosError::ConfigValidationError { .. }
            | PosError::InvalidConfigValueError { .. }
            | PosError::MissingConfigError { .. } => {
                "Check the catalog TOML file, or run `check` to validate it"
            }
            PosError::IoError(_) | PosError::SerializationError(_) | PosError::CsvError(_) => {
                "Check that the receipt output directory exists and is writable"
            }
        }
    }
}
