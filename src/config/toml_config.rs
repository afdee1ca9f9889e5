use crate::domain::model::CatalogEntry;
use crate::utils::error::{PosError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Catalog shipped with the binary, used when no `--config` is given.
pub const BUNDLED_CATALOG: &str = include_str!("../../assets/catalog.toml");

pub const RECEIPT_FORMATS: [&str; 4] = ["txt", "csv", "tsv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub store: StoreSection,
    pub profile: Option<ProfileSection>,
    pub receipt: Option<ReceiptSection>,
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub name: String,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSection {
    pub cashier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSection {
    pub output_path: String,
    pub output_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    pub name: String,
    pub label: Option<String>,
    pub unit_price: u32,
}

impl StoreConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_CATALOG)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PosError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STORE_NAME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PosError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("store.name", &self.store.name)?;

        if self.products.is_empty() {
            return Err(PosError::MissingConfigError {
                field: "products".to_string(),
            });
        }

        for product in &self.products {
            validation::validate_non_empty_string("products.name", &product.name)?;
            validation::validate_positive_number("products.unit_price", product.unit_price, 1)?;
        }
        validation::validate_unique_names(
            "products.name",
            self.products.iter().map(|p| p.name.as_str()),
        )?;

        if let Some(receipt) = &self.receipt {
            validation::validate_path("receipt.output_path", &receipt.output_path)?;
            validation::validate_allowed_values(
                "receipt.output_formats",
                &receipt.output_formats,
                &RECEIPT_FORMATS,
            )?;
        }

        Ok(())
    }

    pub fn store_name(&self) -> &str {
        &self.store.name
    }

    pub fn currency(&self) -> &str {
        self.store.currency.as_deref().unwrap_or("")
    }

    pub fn cashier(&self) -> &str {
        self.profile
            .as_ref()
            .map(|p| p.cashier.as_str())
            .unwrap_or("Cashier")
    }

    pub fn output_path(&self) -> &str {
        self.receipt
            .as_ref()
            .map(|r| r.output_path.as_str())
            .unwrap_or("./receipts")
    }

    /// Formats written when a receipt is exported; plain text only unless configured.
    pub fn output_formats(&self) -> Vec<String> {
        self.receipt
            .as_ref()
            .map(|r| r.output_formats.clone())
            .unwrap_or_else(|| vec!["txt".to_string()])
    }

    pub fn catalog_entries(&self) -> Vec<CatalogEntry> {
        self.products
            .iter()
            .map(|p| {
                let entry = CatalogEntry::new(p.name.trim(), p.unit_price);
                match &p.label {
                    Some(label) => entry.with_label(label.trim()),
                    None => entry,
                }
            })
            .collect()
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[store]
name = "Test Store"
currency = "P"

[profile]
cashier = "Front Desk"

[receipt]
output_path = "./test-receipts"
output_formats = ["txt", "json"]

[[products]]
name = "Toner"
label = "Asian Glow Toner"
unit_price = 120

[[products]]
name = "Serum"
unit_price = 360
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = StoreConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.store_name(), "Test Store");
        assert_eq!(config.currency(), "P");
        assert_eq!(config.cashier(), "Front Desk");
        assert_eq!(config.output_formats(), vec!["txt", "json"]);
        assert!(config.validate().is_ok());

        let entries = config.catalog_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Asian Glow Toner");
        assert_eq!(entries[1].label, "Serum");
    }

    #[test]
    fn test_bundled_catalog_is_valid() {
        let config = StoreConfig::bundled().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.products.len(), 5);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("POS_TEST_STORE_NAME", "Env Store");

        let toml_content = r#"
[store]
name = "${POS_TEST_STORE_NAME}"

[[products]]
name = "Toner"
unit_price = 120
"#;

        let config = StoreConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.store_name(), "Env Store");
        assert_eq!(config.output_path(), "./receipts");

        std::env::remove_var("POS_TEST_STORE_NAME");
    }

    #[test]
    fn test_config_validation() {
        let zero_price = r#"
[store]
name = "Test"

[[products]]
name = "Toner"
unit_price = 0
"#;
        let config = StoreConfig::from_toml_str(zero_price).unwrap();
        assert!(config.validate().is_err());

        let duplicate = r#"
[store]
name = "Test"

[[products]]
name = "Toner"
unit_price = 120

[[products]]
name = "Toner"
unit_price = 130
"#;
        let config = StoreConfig::from_toml_str(duplicate).unwrap();
        assert!(config.validate().is_err());

        let empty = r#"
[store]
name = "Test"
"#;
        let config = StoreConfig::from_toml_str(empty).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PosError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_unsupported_receipt_format() {
        let toml_content = r#"
[store]
name = "Test"

[receipt]
output_path = "./out"
output_formats = ["pdf"]

[[products]]
name = "Toner"
unit_price = 120
"#;
        let config = StoreConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = StoreConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.store_name(), "Test Store");
    }
}
