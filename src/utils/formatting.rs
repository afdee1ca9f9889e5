use chrono::{DateTime, Local};
use tabled::{
    settings::{Alignment, Style},
    Table, Tabled,
};

use crate::core::receipt::Receipt;
use crate::domain::model::{CatalogEntry, LedgerLine};

#[derive(Tabled)]
struct LineTableRow {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Quantity")]
    quantity: u32,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct CatalogTableRow {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Unit Price")]
    unit_price: String,
}

pub fn format_money(amount: u64, currency: &str) -> String {
    format!("{}{}", currency, amount)
}

pub fn format_total(total: u64, currency: &str) -> String {
    format!("Total: {}", format_money(total, currency))
}

fn line_rows(lines: &[LedgerLine], currency: &str) -> Vec<LineTableRow> {
    lines
        .iter()
        .map(|line| LineTableRow {
            product: line.name.clone(),
            quantity: line.quantity,
            price: format_money(line.total_price, currency),
        })
        .collect()
}

/// Transaction table as shown next to the product menu.
pub fn format_line_table(lines: &[LedgerLine], currency: &str) -> String {
    let mut table = Table::new(line_rows(lines, currency));
    table.with(Style::rounded()).with(Alignment::left());
    table.to_string()
}

pub fn format_catalog_table<'a>(
    entries: impl IntoIterator<Item = &'a CatalogEntry>,
    currency: &str,
) -> String {
    let rows: Vec<CatalogTableRow> = entries
        .into_iter()
        .map(|entry| CatalogTableRow {
            product: entry.name.clone(),
            label: entry.label.clone(),
            unit_price: format_money(u64::from(entry.unit_price), currency),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded()).with(Alignment::left());
    table.to_string()
}

/// Menu caption for a product, e.g. "P120  Asian Glow Toner".
pub fn format_product_caption(entry: &CatalogEntry, currency: &str) -> String {
    format!(
        "{:<8}{}",
        format_money(u64::from(entry.unit_price), currency),
        entry.label
    )
}

/// One row of the edit dialog list.
pub fn format_edit_line(line: &LedgerLine) -> String {
    format!("{:<24} | QTY: {}", line.name, line.quantity)
}

pub fn format_clock(now: &DateTime<Local>) -> String {
    now.format("%A, %d %B %Y %I:%M:%S %p").to_string()
}

/// Plain text receipt, free of terminal styling so it can be written to a file.
pub fn format_receipt(receipt: &Receipt) -> String {
    let mut output = String::new();

    output.push_str(&receipt.store_name);
    output.push('\n');
    output.push_str(&receipt.issued_at.format("%Y-%m-%d %H:%M:%S").to_string());
    output.push('\n');
    output.push_str(&format!("Cashier: {}\n\n", receipt.cashier));

    let mut table = Table::new(line_rows(&receipt.lines, &receipt.currency));
    table.with(Style::psql()).with(Alignment::left());
    output.push_str(&table.to_string());
    output.push_str("\n\n");

    output.push_str(&format_total(receipt.total, &receipt.currency));
    output.push('\n');
    output
}
