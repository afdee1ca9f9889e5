use crate::domain::model::{CatalogEntry, CommitSummary, LedgerLine};
use crate::utils::error::{PosError, Result};
use indexmap::IndexMap;
use std::sync::Arc;

/// One product in a transaction. The unit price is read through the shared
/// catalog entry, so only the quantity is state.
#[derive(Debug, Clone)]
struct Slot {
    product: Arc<CatalogEntry>,
    quantity: u32,
}

impl Slot {
    fn line(&self) -> LedgerLine {
        LedgerLine::from_entry(&self.product, self.quantity)
    }
}

fn snapshot(slots: &IndexMap<String, Slot>) -> Vec<LedgerLine> {
    slots.values().map(Slot::line).collect()
}

fn sum(slots: &IndexMap<String, Slot>) -> u64 {
    slots.values().map(|slot| slot.product.price_for(slot.quantity)).sum()
}

/// The order ledger of the current session.
///
/// Lines are kept in the order products were first added. A committed line
/// never has a quantity of zero.
#[derive(Debug, Default)]
pub struct Ledger {
    slots: IndexMap<String, Slot>,
    revision: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product`, creating the line on first add.
    pub fn add(&mut self, product: &Arc<CatalogEntry>) -> LedgerLine {
        let slot = self
            .slots
            .entry(product.name.clone())
            .or_insert_with(|| Slot {
                product: Arc::clone(product),
                quantity: 0,
            });
        slot.quantity = slot.quantity.saturating_add(1);
        self.revision += 1;

        let line = slot.line();
        tracing::debug!(
            product = %line.name,
            quantity = line.quantity,
            total_price = line.total_price,
            "Added to transaction"
        );
        line
    }

    pub fn line(&self, name: &str) -> Option<LedgerLine> {
        self.slots.get(name).map(Slot::line)
    }

    /// Ordered snapshot for display.
    pub fn lines(&self) -> Vec<LedgerLine> {
        snapshot(&self.slots)
    }

    pub fn total(&self) -> u64 {
        sum(&self.slots)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bumped by every add and commit. Edits opened at an older revision cannot be committed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Opens a batch of quantity edits on a private copy of the current lines.
    pub fn begin_edit(&self) -> PendingEdits {
        PendingEdits {
            slots: self.slots.clone(),
            base_revision: self.revision,
        }
    }

    /// Applies `edits` and drops every line left at quantity zero.
    ///
    /// The next state is built aside and swapped in with a single assignment,
    /// so a rejected commit leaves the ledger exactly as it was.
    pub fn commit(&mut self, edits: PendingEdits) -> Result<CommitSummary> {
        if edits.base_revision != self.revision {
            tracing::warn!(
                edit_revision = edits.base_revision,
                ledger_revision = self.revision,
                "Rejected stale transaction edit"
            );
            return Err(PosError::StaleEdit);
        }

        let mut summary = CommitSummary::default();
        let mut next = IndexMap::with_capacity(edits.slots.len());

        for (name, slot) in edits.slots {
            if slot.quantity == 0 {
                summary.removed.push(name);
                continue;
            }

            let changed = self
                .slots
                .get(&name)
                .map_or(true, |current| current.quantity != slot.quantity);
            if changed {
                summary.updated.push(name.clone());
            }
            next.insert(name, slot);
        }

        self.slots = next;
        self.revision += 1;

        tracing::info!(
            updated = summary.updated.len(),
            removed = summary.removed.len(),
            total = self.total(),
            "Committed transaction edit"
        );
        Ok(summary)
    }
}

/// Quantity edits not yet visible to readers of the ledger.
///
/// Quantities may drop to zero here; such lines are removed on commit.
#[derive(Debug, Clone)]
pub struct PendingEdits {
    slots: IndexMap<String, Slot>,
    base_revision: u64,
}

impl PendingEdits {
    pub fn increment(&mut self, name: &str) -> Result<LedgerLine> {
        let slot = self.slot_mut(name)?;
        slot.quantity = slot.quantity.saturating_add(1);
        Ok(slot.line())
    }

    /// Fails with [`PosError::NothingToSubtract`] once the line is already at zero.
    pub fn decrement(&mut self, name: &str) -> Result<LedgerLine> {
        let slot = self.slot_mut(name)?;
        if slot.quantity == 0 {
            return Err(PosError::NothingToSubtract {
                name: name.to_string(),
            });
        }
        slot.quantity -= 1;
        Ok(slot.line())
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut Slot> {
        self.slots.get_mut(name).ok_or_else(|| PosError::LineNotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn line(&self, name: &str) -> Option<LedgerLine> {
        self.slots.get(name).map(Slot::line)
    }

    pub fn lines(&self) -> Vec<LedgerLine> {
        snapshot(&self.slots)
    }

    pub fn total(&self) -> u64 {
        sum(&self.slots)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn base_revision(&self) -> u64 {
        self.base_revision
    }
}
