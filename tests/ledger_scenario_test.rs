use pretty_assertions::assert_eq;
use std::sync::Arc;
use storefront_pos::core::CatalogEntry;
use storefront_pos::{Catalog, Intent, Outcome, PosError, ReceiptHeader, Session};

fn session() -> Session {
    let catalog = Catalog::new(vec![
        CatalogEntry::new("Kojic Avocado", 100),
        CatalogEntry::new("Toner", 120),
        CatalogEntry::new("Serum", 360),
    ])
    .unwrap();

    Session::new(
        Arc::new(catalog),
        ReceiptHeader {
            store_name: "Asian Glow Skin Care".to_string(),
            cashier: "Front Desk".to_string(),
            currency: "P".to_string(),
        },
    )
}

fn quantity(session: &Session, name: &str) -> Option<u32> {
    session.ledger().line(name).map(|line| line.quantity)
}

#[test]
fn test_toner_scenario_end_to_end() {
    let mut session = session();

    session.handle(Intent::Add("Toner".to_string())).unwrap();
    let line = session.ledger().line("Toner").unwrap();
    assert_eq!((line.quantity, line.total_price), (1, 120));
    assert_eq!(session.ledger().total(), 120);

    session.handle(Intent::Add("Toner".to_string())).unwrap();
    let line = session.ledger().line("Toner").unwrap();
    assert_eq!((line.quantity, line.total_price), (2, 240));
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.ledger().total(), 240);

    session
        .handle(Intent::Decrement(Some("Toner".to_string())))
        .unwrap();
    session.handle(Intent::CommitEdits).unwrap();
    let line = session.ledger().line("Toner").unwrap();
    assert_eq!((line.quantity, line.total_price), (1, 120));

    session
        .handle(Intent::Decrement(Some("Toner".to_string())))
        .unwrap();
    let outcome = session.handle(Intent::CommitEdits).unwrap();
    match outcome {
        Outcome::Committed(summary) => assert_eq!(summary.removed, vec!["Toner"]),
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert!(session.ledger().is_empty());
    assert_eq!(session.ledger().total(), 0);
    assert!(matches!(
        session.handle(Intent::GenerateReceipt),
        Err(PosError::EmptyTransaction)
    ));
}

#[test]
fn test_commit_applies_removal_and_update_together() {
    let mut session = session();
    for name in ["Toner", "Serum", "Kojic Avocado"] {
        session.add(name).unwrap();
    }
    let before = session.ledger().total();

    session.begin_edit().unwrap();
    session.select("Toner").unwrap();
    session.handle(Intent::Decrement(None)).unwrap();
    session.select("Serum").unwrap();
    session.handle(Intent::Increment(None)).unwrap();
    session.handle(Intent::Increment(None)).unwrap();

    // nothing is visible before the commit
    assert_eq!(quantity(&session, "Toner"), Some(1));
    assert_eq!(quantity(&session, "Serum"), Some(1));
    assert_eq!(session.ledger().total(), before);

    session.handle(Intent::CommitEdits).unwrap();

    assert_eq!(quantity(&session, "Toner"), None);
    assert_eq!(quantity(&session, "Serum"), Some(3));
    assert_eq!(session.ledger().total(), before - 120 + 2 * 360);

    let names: Vec<String> = session
        .ledger()
        .lines()
        .into_iter()
        .map(|line| line.name)
        .collect();
    assert_eq!(names, vec!["Serum", "Kojic Avocado"]);
}

#[test]
fn test_subtracting_below_zero_is_rejected() {
    let mut session = session();
    session.add("Serum").unwrap();

    session.begin_edit().unwrap();
    session.select("Serum").unwrap();
    session.handle(Intent::Decrement(None)).unwrap();

    let err = session.handle(Intent::Decrement(None)).unwrap_err();
    assert!(matches!(err, PosError::NothingToSubtract { .. }));
    assert!(err.is_recoverable());
    assert_eq!(session.pending_lines().unwrap()[0].quantity, 0);
}

#[test]
fn test_cancel_discards_pending_edits() {
    let mut session = session();
    session.add("Toner").unwrap();

    session
        .handle(Intent::Increment(Some("Toner".to_string())))
        .unwrap();
    session.handle(Intent::CancelEdits).unwrap();

    assert!(!session.is_editing());
    assert_eq!(quantity(&session, "Toner"), Some(1));
}

#[test]
fn test_receipt_reflects_committed_ledger() {
    let mut session = session();
    session.add("Toner").unwrap();
    session.add("Kojic Avocado").unwrap();

    let receipt = match session.handle(Intent::GenerateReceipt).unwrap() {
        Outcome::ReceiptReady(receipt) => receipt,
        other => panic!("unexpected outcome: {:?}", other),
    };

    assert_eq!(receipt.total, 220);
    assert_eq!(receipt.lines.len(), 2);
    assert!(receipt.render_text().contains("Total: P220"));
    assert_eq!(session.ledger().len(), 2);
}
