use crate::config::toml_config::StoreConfig;
use crate::core::ledger::Ledger;
use crate::domain::model::LedgerLine;
use crate::domain::ports::Storage;
use crate::utils::error::{PosError, Result};
use crate::utils::formatting;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Store details printed at the top of every receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptHeader {
    pub store_name: String,
    pub cashier: String,
    pub currency: String,
}

impl ReceiptHeader {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            store_name: config.store_name().to_string(),
            cashier: config.cashier().to_string(),
            currency: config.currency().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub store_name: String,
    pub cashier: String,
    pub currency: String,
    pub issued_at: DateTime<Local>,
    pub lines: Vec<LedgerLine>,
    pub total: u64,
}

impl Receipt {
    /// Snapshots the committed ledger. An empty ledger has nothing to print.
    pub fn from_ledger(
        ledger: &Ledger,
        header: &ReceiptHeader,
        issued_at: DateTime<Local>,
    ) -> Result<Self> {
        if ledger.is_empty() {
            return Err(PosError::EmptyTransaction);
        }

        Ok(Self {
            store_name: header.store_name.clone(),
            cashier: header.cashier.clone(),
            currency: header.currency.clone(),
            issued_at,
            lines: ledger.lines(),
            total: ledger.total(),
        })
    }

    pub fn render_text(&self) -> String {
        formatting::format_receipt(self)
    }

    pub fn file_stem(&self) -> String {
        format!("receipt-{}", self.issued_at.format("%Y%m%d-%H%M%S%3f"))
    }

    fn to_delimited(&self, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        writer.write_record(["Product", "Quantity", "Unit Price", "Price"])?;
        for line in &self.lines {
            writer.write_record([
                line.name.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.total_price.to_string(),
            ])?;
        }
        let total = self.total.to_string();
        writer.write_record(["Total", "", "", total.as_str()])?;

        writer
            .into_inner()
            .map_err(|e| PosError::IoError(e.into_error()))
    }
}

/// Writes receipts in each configured format through a [`Storage`] backend.
pub struct ReceiptExporter<S: Storage> {
    storage: S,
    formats: Vec<String>,
}

impl<S: Storage> ReceiptExporter<S> {
    pub fn new(storage: S, formats: Vec<String>) -> Self {
        Self { storage, formats }
    }

    /// Returns the paths written, one per format.
    pub fn export(&self, receipt: &Receipt) -> Result<Vec<String>> {
        let stem = receipt.file_stem();
        let mut written = Vec::with_capacity(self.formats.len());

        for format in &self.formats {
            let data = match format.as_str() {
                "txt" => receipt.render_text().into_bytes(),
                "csv" => receipt.to_delimited(b',')?,
                "tsv" => receipt.to_delimited(b'\t')?,
                "json" => serde_json::to_vec_pretty(receipt)?,
                other => {
                    return Err(PosError::InvalidConfigValueError {
                        field: "receipt.output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported receipt format".to_string(),
                    })
                }
            };

            let path = self
                .storage
                .write_file(&format!("{}.{}", stem, format), &data)?;
            tracing::info!("🧾 Receipt saved to: {}", path);
            written.push(path);
        }

        Ok(written)
    }
}
