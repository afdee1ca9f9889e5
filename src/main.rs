use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use storefront_pos::app::{replay::replay, shell::Shell};
use storefront_pos::utils::error::ErrorSeverity;
use storefront_pos::utils::{formatting, logger, validation::Validate};
use storefront_pos::{
    Catalog, CliConfig, Command, LocalStorage, PosError, ReceiptExporter, ReceiptHeader, Session,
    StoreConfig,
};

fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting storefront-pos");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config) {
        std::process::exit(report(&e));
    }
}

fn run(config: &CliConfig) -> anyhow::Result<()> {
    let store_config = config.load_store_config()?;
    store_config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let catalog = Arc::new(Catalog::from_config(&store_config)?);

    match config.command() {
        Command::Check => {
            println!(
                "✅ Configuration is valid: {} with {} products",
                store_config.store_name(),
                catalog.len()
            );
        }
        Command::Catalog => {
            println!(
                "{}",
                formatting::format_catalog_table(catalog.entries(), store_config.currency())
            );
        }
        Command::Shell => {
            let session = new_session(catalog, &store_config);
            Shell::new(session, exporter(&store_config)).run()?;
        }
        Command::Replay { script, export } => {
            let file = File::open(&script)
                .with_context(|| format!("Failed to open script '{}'", script))?;
            let mut session = new_session(catalog, &store_config);
            let receipt_exporter = exporter(&store_config);
            let stdout = std::io::stdout();

            let report = replay(
                &mut session,
                BufReader::new(file),
                &mut stdout.lock(),
                export.then_some(&receipt_exporter),
            )?;

            println!(
                "Replayed {} steps: {} notices, {} receipts",
                report.steps,
                report.errors,
                report.receipts.len()
            );
        }
    }

    Ok(())
}

fn new_session(catalog: Arc<Catalog>, store_config: &StoreConfig) -> Session {
    Session::new(catalog, ReceiptHeader::from_config(store_config))
}

fn exporter(store_config: &StoreConfig) -> ReceiptExporter<LocalStorage> {
    ReceiptExporter::new(
        LocalStorage::new(store_config.output_path().to_string()),
        store_config.output_formats(),
    )
}

/// Logs the failure and picks the exit code from its severity.
fn report(error: &anyhow::Error) -> i32 {
    let Some(e) = error.downcast_ref::<PosError>() else {
        tracing::error!("❌ {:#}", error);
        eprintln!("❌ {:#}", error);
        return 1;
    };

    tracing::error!(
        "❌ storefront-pos failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::Low => 2,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
