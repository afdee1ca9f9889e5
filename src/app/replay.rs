use crate::core::receipt::{Receipt, ReceiptExporter};
use crate::core::session::{Intent, Outcome, Session};
use crate::domain::ports::Storage;
use crate::utils::error::{PosError, Result};
use crate::utils::formatting;
use std::io::{BufRead, Write};

#[derive(Debug, Default)]
pub struct ReplayReport {
    pub steps: usize,
    pub errors: usize,
    pub receipts: Vec<Receipt>,
    pub exported: Vec<String>,
}

/// Feeds a script of intents to `session`, one per line, writing what a
/// cashier would see after each step to `out`.
///
/// Blank lines and lines starting with `#` are skipped. Recoverable errors are
/// written as notices and the replay carries on; anything else aborts it.
pub fn replay<R, W, S>(
    session: &mut Session,
    script: R,
    out: &mut W,
    exporter: Option<&ReceiptExporter<S>>,
) -> Result<ReplayReport>
where
    R: BufRead,
    W: Write,
    S: Storage,
{
    let mut report = ReplayReport::default();
    let currency = session.header().currency.clone();

    for (index, line) in script.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        report.steps += 1;
        writeln!(out, "> {}", line)?;

        let outcome = line
            .parse::<Intent>()
            .and_then(|intent| session.handle(intent));

        match outcome {
            Ok(outcome) => {
                write_outcome(out, session, &outcome, &currency)?;
                if let Outcome::ReceiptReady(receipt) = outcome {
                    if let Some(exporter) = exporter {
                        for path in exporter.export(&receipt)? {
                            writeln!(out, "Saved {}", path)?;
                            report.exported.push(path);
                        }
                    }
                    report.receipts.push(*receipt);
                }
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!(line = index + 1, "{}", e);
                report.errors += 1;
                write_notice(out, &e)?;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        steps = report.steps,
        errors = report.errors,
        receipts = report.receipts.len(),
        "Replay finished"
    );
    Ok(report)
}

pub fn write_notice<W: Write>(out: &mut W, error: &PosError) -> Result<()> {
    writeln!(
        out,
        "[{}] {}",
        error.notice_title(),
        error.user_friendly_message()
    )?;
    Ok(())
}

fn write_outcome<W: Write>(
    out: &mut W,
    session: &Session,
    outcome: &Outcome,
    currency: &str,
) -> Result<()> {
    match outcome {
        Outcome::Added(_) | Outcome::Committed(_) | Outcome::EditCancelled => {
            let ledger = session.ledger();
            writeln!(out, "{}", formatting::format_line_table(&ledger.lines(), currency))?;
            writeln!(out, "{}", formatting::format_total(ledger.total(), currency))?;
        }
        Outcome::EditOpened(_) | Outcome::Selected(_) | Outcome::EditChanged(_) => {
            for line in session.pending_lines().unwrap_or_default() {
                let marker = if session.selection() == Some(line.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                writeln!(out, "{} {}", marker, formatting::format_edit_line(&line))?;
            }
        }
        Outcome::ReceiptReady(receipt) => {
            writeln!(out, "{}", receipt.render_text())?;
        }
    }
    Ok(())
}
