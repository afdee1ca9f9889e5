use serde::{Deserialize, Serialize};

/// A purchasable product. Loaded once from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Caption shown on the product menu, e.g. "Asian Glow Toner".
    pub label: String,
    pub unit_price: u32,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, unit_price: u32) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            unit_price,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn price_for(&self, quantity: u32) -> u64 {
        u64::from(self.unit_price) * u64::from(quantity)
    }
}

/// Read-side view of one line of a transaction. `total_price` is computed from
/// quantity and the catalog unit price each time a snapshot is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: u32,
    pub total_price: u64,
}

impl LedgerLine {
    pub fn from_entry(entry: &CatalogEntry, quantity: u32) -> Self {
        Self {
            name: entry.name.clone(),
            quantity,
            unit_price: entry.unit_price,
            total_price: entry.price_for(quantity),
        }
    }
}

/// What a commit did to the ledger, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl CommitSummary {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.removed.is_empty()
    }
}
