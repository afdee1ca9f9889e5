pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::{ReceiptSection, StoreConfig};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "storefront-pos")]
#[command(about = "Point-of-sale counter for a single storefront")]
pub struct CliConfig {
    /// Path to a catalog TOML file (defaults to the bundled catalog)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the directory receipts are exported to
    #[arg(long, global = true)]
    pub output_path: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines on stderr")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive counter: product menu, transaction table, edits and receipts
    Shell,
    /// Run a script of intents, one per line, and print the transaction after each step
    Replay {
        /// Path to the script file
        script: String,

        /// Export every generated receipt to the output directory
        #[arg(long)]
        export: bool,
    },
    /// Print the product catalog
    Catalog,
    /// Load and validate the configuration without starting a session
    Check,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }

    /// Loads the configured catalog, or the bundled one, and applies command line overrides.
    pub fn load_store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                StoreConfig::from_file(path)?
            }
            None => {
                tracing::debug!("Using bundled catalog");
                StoreConfig::bundled()?
            }
        };

        if let Some(output_path) = &self.output_path {
            let output_formats = config.output_formats();
            config.receipt = Some(ReceiptSection {
                output_path: output_path.clone(),
                output_formats,
            });
            tracing::info!("🔧 Receipt output path overridden to: {}", output_path);
        }

        Ok(config)
    }
}
