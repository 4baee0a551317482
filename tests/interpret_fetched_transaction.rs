use stacks_pyth_watch::feeds::KnownFeed;
use stacks_pyth_watch::interpret::{interpret_transaction, InterpretedOutcome};
use stacks_pyth_watch::types::TransactionDetails;

/**
Interprets captured indexing-service responses end to end.

The fixtures under tests/data/ are transaction records in the shape the
`/extended/v1/tx/{txid}` endpoint returns for calls against the mainnet
oracle contract:
- a `get-price` read whose result carries the BTC/USD price tuple directly;
- a `verify-and-update-price-feeds` call whose STX/USD price lands in the
  storage contract's print event rather than the return value.
*/

fn fixture(raw: &str) -> TransactionDetails {
    serde_json::from_str(raw).expect("fixture should deserialize")
}

#[test]
fn test_interpret_captured_get_price_transaction() {
    let tx = fixture(include_str!("data/get_price_tx.json"));
    assert!(tx.is_success());

    let outcome = interpret_transaction(&tx);
    let InterpretedOutcome::Price {
        record,
        display_price,
    } = outcome
    else {
        panic!("expected price outcome, got {outcome:?}");
    };
    assert_eq!(record.price, 11215387861762);
    assert_eq!(record.ema_price, 11213387861762);
    assert_eq!(record.conf, 3430861762);
    assert_eq!(record.ema_conf, 3403732000);
    assert_eq!(record.expo, -8);
    assert_eq!(record.publish_time, 1759136578);
    assert_eq!(record.prev_publish_time, 1759136577);
    assert_eq!(display_price, "$112133.88");
    assert_eq!(
        record
            .price_identifier
            .as_deref()
            .and_then(KnownFeed::from_identifier),
        Some(KnownFeed::BtcUsd)
    );
}

#[test]
fn test_interpret_captured_update_transaction() {
    let tx = fixture(include_str!("data/verify_and_update_tx.json"));

    let outcome = interpret_transaction(&tx);
    let InterpretedOutcome::Update {
        record,
        display_price,
        events,
    } = outcome
    else {
        panic!("expected update outcome, got {outcome:?}");
    };
    assert_eq!(record.price, 64150000);
    assert_eq!(record.ema_price, 64092000);
    assert_eq!(record.expo, -8);
    assert_eq!(record.publish_time, 1759137238);
    assert_eq!(display_price, "$0.64");
    // The full event list is retained for display, transfer event included.
    assert_eq!(events.len(), 2);
    assert_eq!(
        record
            .price_identifier
            .as_deref()
            .and_then(KnownFeed::from_identifier),
        Some(KnownFeed::StxUsd)
    );
}

#[test]
fn test_aborted_transaction_reports_status_as_reason() {
    let mut tx = fixture(include_str!("data/get_price_tx.json"));
    tx.tx_status = "abort_by_response".to_string();

    assert_eq!(
        interpret_transaction(&tx),
        InterpretedOutcome::Failure {
            reason: "abort_by_response".to_string()
        }
    );
}
