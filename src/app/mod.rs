// Front-ends: each turns user input into session intents and renders the ledger.

pub mod replay;
#[cfg(feature = "cli")]
pub mod shell;
