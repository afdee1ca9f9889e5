use anyhow::Result;
use chrono::Local;
use console::{style, Emoji, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

use crate::core::receipt::ReceiptExporter;
use crate::core::session::{Intent, Outcome, Session};
use crate::domain::ports::Storage;
use crate::utils::error::PosError;
use crate::utils::formatting::{
    format_clock, format_edit_line, format_line_table, format_product_caption, format_total,
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static RECEIPT: Emoji<'_, '_> = Emoji("🧾 ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");

enum MainAction {
    Add(String),
    EditTransaction,
    GenerateReceipt,
    Quit,
}

enum EditAction {
    Select(String),
    Subtract,
    Add,
    Confirm,
    Cancel,
}

/// Interactive counter: banner, product menu, transaction table, edit dialog and receipts.
pub struct Shell<S: Storage> {
    session: Session,
    exporter: ReceiptExporter<S>,
    theme: ColorfulTheme,
    term: Term,
}

impl<S: Storage> Shell<S> {
    pub fn new(session: Session, exporter: ReceiptExporter<S>) -> Self {
        Self {
            session,
            exporter,
            theme: ColorfulTheme::default(),
            term: Term::stdout(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            self.term.clear_screen()?;
            self.print_banner();
            self.print_transaction();

            match self.prompt_main()? {
                MainAction::Add(name) => {
                    self.apply(Intent::Add(name))?;
                }
                MainAction::EditTransaction => self.edit_transaction()?,
                MainAction::GenerateReceipt => self.generate_receipt()?,
                MainAction::Quit => {
                    if self.session.ledger().is_empty()
                        || Confirm::with_theme(&self.theme)
                            .with_prompt("Discard the current transaction and quit?")
                            .default(false)
                            .interact()?
                    {
                        break;
                    }
                }
            }
        }

        tracing::info!("Shell closed");
        Ok(())
    }

    fn currency(&self) -> &str {
        &self.session.header().currency
    }

    fn print_banner(&self) {
        let header = self.session.header();
        println!("{}", style(&header.store_name).bold().cyan());
        println!(
            "{}  {}",
            style(&header.cashier).bold(),
            style(format_clock(&Local::now())).dim()
        );
        println!();
    }

    fn print_transaction(&self) {
        let ledger = self.session.ledger();
        println!("{} {}", CART, style("Transaction Details").bold());
        println!("{}", format_line_table(&ledger.lines(), self.currency()));
        println!(
            "{}",
            style(format_total(ledger.total(), self.currency())).bold().green()
        );
        println!();
    }

    fn prompt_main(&self) -> Result<MainAction> {
        let mut actions: Vec<MainAction> = Vec::new();
        let mut items: Vec<String> = Vec::new();

        for entry in self.session.catalog().entries() {
            items.push(format_product_caption(entry, self.currency()));
            actions.push(MainAction::Add(entry.name.clone()));
        }
        items.push("Edit transaction".to_string());
        actions.push(MainAction::EditTransaction);
        items.push("Generate receipt".to_string());
        actions.push(MainAction::GenerateReceipt);
        items.push("Quit".to_string());
        actions.push(MainAction::Quit);

        let choice = Select::with_theme(&self.theme)
            .with_prompt("Available Products")
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(match choice {
            Some(index) => actions.swap_remove(index),
            None => MainAction::Quit,
        })
    }

    /// Runs one intent, showing recoverable errors as a notice.
    fn apply(&mut self, intent: Intent) -> Result<Option<Outcome>> {
        match self.session.handle(intent) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) if e.is_recoverable() => {
                self.notice(&e)?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn notice(&self, error: &PosError) -> Result<()> {
        tracing::warn!("{}", error);
        println!(
            "{} {}: {}",
            CROSS,
            style(error.notice_title()).red().bold(),
            error.user_friendly_message()
        );
        println!("   {}", style(error.recovery_suggestion()).dim());
        self.term.read_key()?;
        Ok(())
    }

    fn edit_transaction(&mut self) -> Result<()> {
        if self.apply(Intent::BeginEdit)?.is_none() {
            return Ok(());
        }

        loop {
            self.term.clear_screen()?;
            println!("{}", style("Edit transaction").bold());

            let intent = match self.prompt_edit()? {
                EditAction::Select(name) => Intent::Select(name),
                EditAction::Subtract => Intent::Decrement(None),
                EditAction::Add => Intent::Increment(None),
                EditAction::Confirm => Intent::CommitEdits,
                EditAction::Cancel => Intent::CancelEdits,
            };
            let closing = matches!(intent, Intent::CommitEdits | Intent::CancelEdits);

            let outcome = self.apply(intent)?;
            if closing && !self.session.is_editing() {
                if let Some(Outcome::Committed(summary)) = outcome {
                    if !summary.is_empty() {
                        println!("{} Transaction updated", CHECKMARK);
                        self.term.read_key()?;
                    }
                }
                return Ok(());
            }
        }
    }

    fn prompt_edit(&self) -> Result<EditAction> {
        let lines = self.session.pending_lines().unwrap_or_default();
        let selection = self.session.selection();

        let mut actions: Vec<EditAction> = Vec::new();
        let mut items: Vec<String> = Vec::new();

        for line in &lines {
            let marker = if selection == Some(line.name.as_str()) { "*" } else { " " };
            items.push(format!("{} {}", marker, format_edit_line(line)));
            actions.push(EditAction::Select(line.name.clone()));
        }
        // Once a line is selected the cursor starts on the quantity buttons.
        let default = if selection.is_some() { lines.len() } else { 0 };

        items.push("-  Subtract one".to_string());
        actions.push(EditAction::Subtract);
        items.push("+  Add one".to_string());
        actions.push(EditAction::Add);
        items.push("✓  Confirm changes".to_string());
        actions.push(EditAction::Confirm);
        items.push("✗  Cancel".to_string());
        actions.push(EditAction::Cancel);

        let prompt = match selection {
            Some(name) => format!("Selected: {}", name),
            None => "Select an item to modify".to_string(),
        };

        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&items)
            .default(default)
            .interact_opt()?;

        Ok(match choice {
            Some(index) => actions.swap_remove(index),
            None => EditAction::Cancel,
        })
    }

    fn generate_receipt(&mut self) -> Result<()> {
        let Some(Outcome::ReceiptReady(receipt)) = self.apply(Intent::GenerateReceipt)? else {
            return Ok(());
        };

        self.term.clear_screen()?;
        println!("{} {}", RECEIPT, style("Receipt").bold());
        println!("{}", receipt.render_text());

        if Confirm::with_theme(&self.theme)
            .with_prompt("Save this receipt?")
            .default(true)
            .interact()?
        {
            match self.exporter.export(&receipt) {
                Ok(paths) => {
                    for path in paths {
                        println!("{} Saved {}", CHECKMARK, style(path).cyan());
                    }
                    self.term.read_key()?;
                }
                Err(e) => self.notice(&e)?,
            }
        }
        Ok(())
    }
}
