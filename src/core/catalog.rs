use crate::config::toml_config::StoreConfig;
use crate::domain::model::CatalogEntry;
use crate::utils::error::{PosError, Result};
use crate::utils::validation;
use indexmap::IndexMap;
use std::sync::Arc;

/// Products on sale, keyed by name, in the order they were configured.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: IndexMap<String, Arc<CatalogEntry>>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut products = IndexMap::with_capacity(entries.len());

        for entry in entries {
            validation::validate_non_empty_string("products.name", &entry.name)?;
            validation::validate_positive_number("products.unit_price", entry.unit_price, 1)?;

            if products.contains_key(&entry.name) {
                return Err(PosError::InvalidConfigValueError {
                    field: "products.name".to_string(),
                    value: entry.name,
                    reason: "Product names must be unique".to_string(),
                });
            }
            products.insert(entry.name.clone(), Arc::new(entry));
        }

        Ok(Self { products })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let catalog = Self::new(config.catalog_entries())?;
        tracing::debug!("Loaded catalog with {} products", catalog.len());
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<CatalogEntry>> {
        self.products.get(name)
    }

    /// Like [`Catalog::get`] but reports a missing product as an error.
    pub fn resolve(&self, name: &str) -> Result<&Arc<CatalogEntry>> {
        self.get(name.trim()).ok_or_else(|| PosError::UnknownProduct {
            name: name.trim().to_string(),
        })
    }

    pub fn unit_price(&self, name: &str) -> Option<u32> {
        self.get(name).map(|entry| entry.unit_price)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.products.values().map(|entry| entry.as_ref())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keeps_configured_order() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("Serum", 360),
            CatalogEntry::new("Toner", 120),
        ])
        .unwrap();

        let names: Vec<&str> = catalog.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Serum", "Toner"]);
        assert_eq!(catalog.unit_price("Toner"), Some(120));
    }

    #[test]
    fn test_resolve_unknown_product() {
        let catalog = Catalog::new(vec![CatalogEntry::new("Toner", 120)]).unwrap();

        assert!(catalog.resolve(" Toner ").is_ok());
        assert!(matches!(
            catalog.resolve("Lotion"),
            Err(PosError::UnknownProduct { name }) if name == "Lotion"
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_free_products() {
        assert!(Catalog::new(vec![
            CatalogEntry::new("Toner", 120),
            CatalogEntry::new("Toner", 130),
        ])
        .is_err());
        assert!(Catalog::new(vec![CatalogEntry::new("Sample", 0)]).is_err());
    }
}
