use crate::core::catalog::Catalog;
use crate::core::ledger::{Ledger, PendingEdits};
use crate::core::receipt::{Receipt, ReceiptHeader};
use crate::domain::model::{CommitSummary, LedgerLine};
use crate::utils::error::{PosError, Result};
use chrono::Local;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A discrete user action emitted by a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add(String),
    BeginEdit,
    Select(String),
    /// Uses the current selection when no product is named.
    Increment(Option<String>),
    Decrement(Option<String>),
    CommitEdits,
    CancelEdits,
    GenerateReceipt,
}

impl FromStr for Intent {
    type Err = PosError;

    /// Parses lines such as `add Asian Glow Toner`, `+`, `- Toner` or `commit`.
    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (trimmed, ""),
        };
        let product = (!rest.is_empty()).then(|| rest.to_string());

        let intent = match (verb.to_ascii_lowercase().as_str(), product) {
            ("add", Some(name)) => Intent::Add(name),
            ("edit", None) => Intent::BeginEdit,
            ("select", Some(name)) => Intent::Select(name),
            ("+" | "increment", name) => Intent::Increment(name),
            ("-" | "decrement", name) => Intent::Decrement(name),
            ("commit" | "confirm", None) => Intent::CommitEdits,
            ("cancel", None) => Intent::CancelEdits,
            ("receipt", None) => Intent::GenerateReceipt,
            _ => {
                return Err(PosError::InvalidIntent {
                    input: trimmed.to_string(),
                })
            }
        };
        Ok(intent)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Add(name) => write!(f, "add {}", name),
            Intent::BeginEdit => write!(f, "edit"),
            Intent::Select(name) => write!(f, "select {}", name),
            Intent::Increment(Some(name)) => write!(f, "+ {}", name),
            Intent::Increment(None) => write!(f, "+"),
            Intent::Decrement(Some(name)) => write!(f, "- {}", name),
            Intent::Decrement(None) => write!(f, "-"),
            Intent::CommitEdits => write!(f, "commit"),
            Intent::CancelEdits => write!(f, "cancel"),
            Intent::GenerateReceipt => write!(f, "receipt"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Added(LedgerLine),
    EditOpened(Vec<LedgerLine>),
    Selected(LedgerLine),
    EditChanged(LedgerLine),
    Committed(CommitSummary),
    EditCancelled,
    ReceiptReady(Box<Receipt>),
}

#[derive(Debug)]
struct EditState {
    pending: PendingEdits,
    selection: Option<String>,
}

/// Owns the catalog, the ledger and any open edit of the current counter session.
#[derive(Debug)]
pub struct Session {
    catalog: Arc<Catalog>,
    header: ReceiptHeader,
    ledger: Ledger,
    edit: Option<EditState>,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, header: ReceiptHeader) -> Self {
        Self {
            catalog,
            header,
            ledger: Ledger::new(),
            edit: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn header(&self) -> &ReceiptHeader {
        &self.header
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Lines of the open edit, including those already at zero.
    pub fn pending_lines(&self) -> Option<Vec<LedgerLine>> {
        self.edit.as_ref().map(|edit| edit.pending.lines())
    }

    pub fn selection(&self) -> Option<&str> {
        self.edit.as_ref().and_then(|edit| edit.selection.as_deref())
    }

    /// Applies one intent. On error the ledger is left unchanged; a stale edit
    /// that fails to commit is discarded.
    pub fn handle(&mut self, intent: Intent) -> Result<Outcome> {
        tracing::debug!(%intent, "Handling intent");

        match intent {
            Intent::Add(name) => self.add(&name).map(Outcome::Added),
            Intent::BeginEdit => self.begin_edit().map(Outcome::EditOpened),
            Intent::Select(name) => self.select(&name).map(Outcome::Selected),
            Intent::Increment(name) => self
                .edit_line(name, PendingEdits::increment)
                .map(Outcome::EditChanged),
            Intent::Decrement(name) => self
                .edit_line(name, PendingEdits::decrement)
                .map(Outcome::EditChanged),
            Intent::CommitEdits => self.commit().map(Outcome::Committed),
            Intent::CancelEdits => {
                self.cancel();
                Ok(Outcome::EditCancelled)
            }
            Intent::GenerateReceipt => self
                .receipt()
                .map(|receipt| Outcome::ReceiptReady(Box::new(receipt))),
        }
    }

    pub fn add(&mut self, name: &str) -> Result<LedgerLine> {
        if self.edit.is_some() {
            return Err(PosError::EditInProgress);
        }
        let product = Arc::clone(self.catalog.resolve(name)?);
        Ok(self.ledger.add(&product))
    }

    pub fn begin_edit(&mut self) -> Result<Vec<LedgerLine>> {
        if self.edit.is_some() {
            return Err(PosError::EditInProgress);
        }
        if self.ledger.is_empty() {
            return Err(PosError::NothingToEdit);
        }

        let pending = self.ledger.begin_edit();
        let lines = pending.lines();
        self.edit = Some(EditState {
            pending,
            selection: None,
        });
        tracing::debug!("Opened transaction edit with {} lines", lines.len());
        Ok(lines)
    }

    pub fn select(&mut self, name: &str) -> Result<LedgerLine> {
        let edit = self.edit_state()?;
        let name = name.trim();
        let line = edit.pending.line(name).ok_or_else(|| PosError::LineNotFound {
            name: name.to_string(),
        })?;
        edit.selection = Some(line.name.clone());
        Ok(line)
    }

    fn edit_line<F>(&mut self, name: Option<String>, apply: F) -> Result<LedgerLine>
    where
        F: FnOnce(&mut PendingEdits, &str) -> Result<LedgerLine>,
    {
        let target = match name {
            Some(name) => name.trim().to_string(),
            None => self
                .edit
                .as_ref()
                .and_then(|edit| edit.selection.clone())
                .ok_or(PosError::NoSelection)?,
        };

        let opened_here = self.edit.is_none();
        if opened_here {
            self.begin_edit()?;
        }

        let edit = self.edit_state()?;
        match apply(&mut edit.pending, &target) {
            Ok(line) => {
                edit.selection = Some(line.name.clone());
                Ok(line)
            }
            Err(e) => {
                if opened_here {
                    self.edit = None;
                }
                Err(e)
            }
        }
    }

    /// Commits the open edit. With no edit open there is nothing to apply.
    pub fn commit(&mut self) -> Result<CommitSummary> {
        let Some(edit) = self.edit.take() else {
            return Ok(CommitSummary::default());
        };
        self.ledger.commit(edit.pending)
    }

    pub fn cancel(&mut self) {
        if self.edit.take().is_some() {
            tracing::debug!("Discarded transaction edit");
        }
    }

    pub fn receipt(&self) -> Result<Receipt> {
        Receipt::from_ledger(&self.ledger, &self.header, Local::now())
    }

    fn edit_state(&mut self) -> Result<&mut EditState> {
        self.edit.as_mut().ok_or(PosError::NoOpenEdit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CatalogEntry;

    fn session() -> Session {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("Toner", 120),
            CatalogEntry::new("Serum", 360),
        ])
        .unwrap();
        Session::new(
            Arc::new(catalog),
            ReceiptHeader {
                store_name: "Test Store".to_string(),
                cashier: "Front Desk".to_string(),
                currency: String::new(),
            },
        )
    }

    #[test]
    fn test_parse_intents() {
        assert_eq!(
            "add Asian Glow Toner".parse::<Intent>().unwrap(),
            Intent::Add("Asian Glow Toner".to_string())
        );
        assert_eq!("+".parse::<Intent>().unwrap(), Intent::Increment(None));
        assert_eq!(
            "- Toner".parse::<Intent>().unwrap(),
            Intent::Decrement(Some("Toner".to_string()))
        );
        assert_eq!("CONFIRM".parse::<Intent>().unwrap(), Intent::CommitEdits);
        assert!("add".parse::<Intent>().is_err());
        assert!("refund Toner".parse::<Intent>().is_err());
    }

    #[test]
    fn test_intent_display_parses_back() {
        let intent = Intent::Decrement(Some("Toner".to_string()));
        assert_eq!(intent.to_string().parse::<Intent>().unwrap(), intent);
    }

    #[test]
    fn test_unknown_product_leaves_ledger_empty() {
        let mut session = session();
        let err = session.handle(Intent::Add("Lotion".to_string())).unwrap_err();

        assert!(matches!(err, PosError::UnknownProduct { .. }));
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_increment_without_selection() {
        let mut session = session();
        session.add("Toner").unwrap();
        session.begin_edit().unwrap();

        let err = session.handle(Intent::Increment(None)).unwrap_err();
        assert!(matches!(err, PosError::NoSelection));
    }

    #[test]
    fn test_selection_drives_plus_and_minus() {
        let mut session = session();
        session.add("Toner").unwrap();
        session.add("Serum").unwrap();
        session.begin_edit().unwrap();
        session.select("Serum").unwrap();

        session.handle(Intent::Increment(None)).unwrap();
        session.handle(Intent::Increment(None)).unwrap();
        session.handle(Intent::Decrement(None)).unwrap();

        assert_eq!(session.selection(), Some("Serum"));
        assert_eq!(session.ledger().line("Serum").unwrap().quantity, 1);

        session.handle(Intent::CommitEdits).unwrap();
        assert!(!session.is_editing());
        assert_eq!(session.ledger().line("Serum").unwrap().quantity, 2);
    }

    #[test]
    fn test_add_is_blocked_while_editing() {
        let mut session = session();
        session.add("Toner").unwrap();
        session.begin_edit().unwrap();

        assert!(matches!(
            session.add("Toner"),
            Err(PosError::EditInProgress)
        ));

        session.handle(Intent::CancelEdits).unwrap();
        assert!(session.add("Toner").is_ok());
    }

    #[test]
    fn test_named_edit_opens_and_failed_edit_does_not_linger() {
        let mut session = session();
        session.add("Toner").unwrap();

        assert!(session.handle(Intent::Increment(Some("Serum".to_string()))).is_err());
        assert!(!session.is_editing());

        session
            .handle(Intent::Decrement(Some("Toner".to_string())))
            .unwrap();
        assert!(session.is_editing());
        assert_eq!(session.pending_lines().unwrap()[0].quantity, 0);
    }

    #[test]
    fn test_cannot_edit_empty_transaction() {
        let mut session = session();
        assert!(matches!(
            session.handle(Intent::BeginEdit),
            Err(PosError::NothingToEdit)
        ));
        assert!(matches!(
            session.handle(Intent::Increment(Some("Toner".to_string()))),
            Err(PosError::NothingToEdit)
        ));
        assert!(!session.is_editing());
    }

    #[test]
    fn test_select_without_open_edit() {
        let mut session = session();
        session.add("Toner").unwrap();

        let err = session.handle(Intent::Select("Toner".to_string())).unwrap_err();
        assert!(matches!(err, PosError::NoOpenEdit));
        assert_eq!(session.selection(), None);
    }
}
