pub mod catalog;
pub mod ledger;
pub mod receipt;
pub mod session;

pub use crate::domain::model::{CatalogEntry, CommitSummary, LedgerLine};
pub use crate::domain::ports::Storage;
pub use crate::utils::error::Result;
