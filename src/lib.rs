pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::{cli::LocalStorage, toml_config::StoreConfig};
pub use core::{
    catalog::Catalog,
    ledger::{Ledger, PendingEdits},
    receipt::{Receipt, ReceiptExporter, ReceiptHeader},
    session::{Intent, Outcome, Session},
};
pub use utils::error::{PosError, Result};
