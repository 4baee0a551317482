//! Interprets a fetched transaction record into a structured outcome.
//!
//! Interpretation is a pure function of (status, function name, result repr,
//! events). A non-success status fails immediately, before any parsing. For
//! recognized functions the result repr (or, for the storage update, the
//! emitted contract log) is parsed into a [`PriceRecord`]; unrecognized
//! functions pass their payload through untouched. Every input, however
//! malformed, yields a well-formed outcome; nothing here panics or returns
//! an error type.

use std::fmt::Display;

use log::debug;

use crate::contract::Operation;
use crate::tuple::{self, FieldMap, TupleError};
use crate::types::{
    PriceRecord, TransactionDetails, TransactionEvent, EVENT_SMART_CONTRACT_LOG, STATUS_SUCCESS,
};

/// Reason reported when a successful transaction's output did not contain
/// the expected fields.
pub const PARSE_FAILURE_REASON: &str = "unable to parse transaction result";

// Markers a storage-update log entry must carry.
const ACTION_UPDATED: &str = "updated";
const TYPE_PRICE_FEED: &str = "price-feed";

/// What happened in one transaction.
#[derive(Clone, Debug, PartialEq)]
pub enum InterpretedOutcome {
    /// A read-style call returned a price tuple directly.
    Price {
        record: PriceRecord,
        display_price: String,
    },
    /// The decode-only call; output is left as opaque structured text.
    DecodedFeeds { raw: String },
    /// A storage update confirmed via its emitted log, with the full event
    /// list retained for display.
    Update {
        record: PriceRecord,
        display_price: String,
        events: Vec<TransactionEvent>,
    },
    /// Function not recognized; raw payload carried unmodified.
    Generic { operation: String, raw: String },
    /// The transaction did not succeed, or its output could not be parsed.
    Failure { reason: String },
}

/// Interprets one transaction result.
pub fn interpret(
    status: &str,
    operation_name: &str,
    result_text: &str,
    events: &[TransactionEvent],
) -> InterpretedOutcome {
    if status != STATUS_SUCCESS {
        return InterpretedOutcome::Failure {
            reason: status.to_string(),
        };
    }
    match Operation::from_function_name(operation_name) {
        Some(Operation::ReadPriceFeed) | Some(Operation::GetPrice) => price_outcome(result_text),
        Some(Operation::DecodePriceFeeds) => InterpretedOutcome::DecodedFeeds {
            raw: result_text.to_string(),
        },
        Some(Operation::VerifyAndUpdatePriceFeeds) => update_outcome(events),
        None => InterpretedOutcome::Generic {
            operation: operation_name.to_string(),
            raw: result_text.to_string(),
        },
    }
}

/// Interprets a transaction record as fetched from the indexing service.
pub fn interpret_transaction(tx: &TransactionDetails) -> InterpretedOutcome {
    let operation_name = tx
        .contract_call
        .as_ref()
        .map(|call| call.function_name.as_str())
        .unwrap_or_default();
    let result_text = tx
        .tx_result
        .as_ref()
        .map(|result| result.repr.as_str())
        .unwrap_or_default();
    interpret(&tx.tx_status, operation_name, result_text, &tx.events)
}

fn price_outcome(result_text: &str) -> InterpretedOutcome {
    match price_from_result(result_text) {
        Ok(record) => {
            let display_price = record.display_price();
            InterpretedOutcome::Price {
                record,
                display_price,
            }
        }
        Err(error) => {
            debug!("price extraction failed: {error}");
            parse_failure()
        }
    }
}

fn update_outcome(events: &[TransactionEvent]) -> InterpretedOutcome {
    match price_from_events(events) {
        Some(record) => {
            let display_price = record.display_price();
            InterpretedOutcome::Update {
                record,
                display_price,
                events: events.to_vec(),
            }
        }
        None => parse_failure(),
    }
}

/// Extracts a price record from result repr text.
fn price_from_result(text: &str) -> Result<PriceRecord, TupleError> {
    let fields = tuple::response_fields(text)?;
    PriceRecord::from_fields(&fields)
}

/// Scans events in order for the first contract log announcing a price-feed
/// update, and extracts the record from its nested `data` tuple.
fn price_from_events(events: &[TransactionEvent]) -> Option<PriceRecord> {
    for event in events {
        if event.event_type != EVENT_SMART_CONTRACT_LOG {
            continue;
        }
        let Some(log) = &event.contract_log else {
            continue;
        };
        let Ok(expression) = tuple::parse(&log.value.repr) else {
            debug!("skipping unparsable contract log in {}", log.contract_id);
            continue;
        };
        let Some(fields) = FieldMap::from_tuple(&expression) else {
            continue;
        };
        if fields.string("action") != Some(ACTION_UPDATED)
            || fields.string("type") != Some(TYPE_PRICE_FEED)
        {
            continue;
        }
        let data = FieldMap::from_tuple(fields.get("data")?)?;
        return PriceRecord::from_fields(&data).ok();
    }
    None
}

fn parse_failure() -> InterpretedOutcome {
    InterpretedOutcome::Failure {
        reason: PARSE_FAILURE_REASON.to_string(),
    }
}

impl Display for InterpretedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpretedOutcome::Price {
                record,
                display_price,
            } => write!(
                f,
                "{display_price} (price {} / ema {} @ expo {}, published {})",
                record.price, record.ema_price, record.expo, record.publish_time
            ),
            InterpretedOutcome::DecodedFeeds { raw } => write!(f, "Decoded price feeds: {raw}"),
            InterpretedOutcome::Update {
                record,
                display_price,
                events,
            } => write!(
                f,
                "Price feed updated to {display_price} (price {} @ expo {}, {} event(s))",
                record.price,
                record.expo,
                events.len()
            ),
            InterpretedOutcome::Generic { operation, raw } => {
                write!(f, "Unrecognized function {operation:?}: {raw}")
            }
            InterpretedOutcome::Failure { reason } => write!(f, "Failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{ContractLog, LogValue};

    const FULL_TUPLE: &str = "(ok (tuple (conf u100) (ema-conf u110) (ema-price 250000000) \
         (price 251000000) (expo -8) (publish-time u1700000000) (prev-publish-time u1699999990)))";

    fn log_event(repr: &str) -> TransactionEvent {
        TransactionEvent {
            event_type: EVENT_SMART_CONTRACT_LOG.to_string(),
            contract_log: Some(ContractLog {
                contract_id: "SP3R4F6C1J3JQWWCVZ3S7FRRYPMYG6ZW6RZK31FXY.pyth-storage-v3"
                    .to_string(),
                topic: "print".to_string(),
                value: LogValue {
                    repr: repr.to_string(),
                },
            }),
        }
    }

    #[test]
    fn test_get_price_returns_price_outcome() {
        let outcome = interpret(STATUS_SUCCESS, "get-price", FULL_TUPLE, &[]);
        let InterpretedOutcome::Price {
            record,
            display_price,
        } = outcome
        else {
            panic!("expected price outcome");
        };
        assert_eq!(record.price, 251000000);
        assert_eq!(record.ema_price, 250000000);
        assert_eq!(record.conf, 100);
        assert_eq!(record.ema_conf, 110);
        assert_eq!(record.expo, -8);
        assert_eq!(record.publish_time, 1700000000);
        assert_eq!(record.prev_publish_time, 1699999990);
        assert_eq!(display_price, "$2.50");
    }

    #[test]
    fn test_read_price_feed_uses_same_extraction() {
        let read = interpret(STATUS_SUCCESS, "read-price-feed", FULL_TUPLE, &[]);
        let get = interpret(STATUS_SUCCESS, "get-price", FULL_TUPLE, &[]);
        assert_eq!(read, get);
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let permuted = "(ok (tuple (publish-time u1700000000) (expo -8) (price 251000000) \
             (prev-publish-time u1699999990) (ema-price 250000000) (ema-conf u110) (conf u100)))";
        assert_eq!(
            interpret(STATUS_SUCCESS, "get-price", FULL_TUPLE, &[]),
            interpret(STATUS_SUCCESS, "get-price", permuted, &[])
        );
    }

    #[test]
    fn test_missing_mandatory_field_fails() {
        let no_expo = "(ok (tuple (price 251000000) (ema-price 250000000)))";
        let no_price = "(ok (tuple (expo -8) (ema-price 250000000) (conf u100)))";
        for text in [no_expo, no_price] {
            assert_eq!(
                interpret(STATUS_SUCCESS, "get-price", text, &[]),
                InterpretedOutcome::Failure {
                    reason: PARSE_FAILURE_REASON.to_string()
                }
            );
        }
    }

    #[test]
    fn test_malformed_wrapper_fails() {
        for text in ["", "(err u1)", "(ok u1)", "(ok (tuple (price", "garbage"] {
            assert_eq!(
                interpret(STATUS_SUCCESS, "get-price", text, &[]),
                InterpretedOutcome::Failure {
                    reason: PARSE_FAILURE_REASON.to_string()
                }
            );
        }
    }

    #[test]
    fn test_non_success_status_skips_extraction() {
        // A repr that would parse fine must not be touched.
        let outcome = interpret("abort_by_response", "get-price", FULL_TUPLE, &[]);
        assert_eq!(
            outcome,
            InterpretedOutcome::Failure {
                reason: "abort_by_response".to_string()
            }
        );
    }

    #[test]
    fn test_decode_is_passed_through_unparsed() {
        let outcome = interpret(STATUS_SUCCESS, "decode-price-feeds", FULL_TUPLE, &[]);
        assert_eq!(
            outcome,
            InterpretedOutcome::DecodedFeeds {
                raw: FULL_TUPLE.to_string()
            }
        );
    }

    #[test]
    fn test_unrecognized_function_is_generic() {
        let outcome = interpret(STATUS_SUCCESS, "transfer", "(ok true)", &[]);
        assert_eq!(
            outcome,
            InterpretedOutcome::Generic {
                operation: "transfer".to_string(),
                raw: "(ok true)".to_string()
            }
        );
    }

    #[test]
    fn test_update_reads_events_not_result() {
        let events = vec![
            TransactionEvent {
                event_type: "stx_transfer_event".to_string(),
                contract_log: None,
            },
            log_event(
                "(tuple (action \"updated\") (data (tuple (price 300000000) (expo -8) \
                 (ema-price 299000000) (publish-time u1700000000))) (type \"price-feed\"))",
            ),
        ];
        let outcome = interpret(
            STATUS_SUCCESS,
            "verify-and-update-price-feeds",
            "(ok u1)",
            &events,
        );
        let InterpretedOutcome::Update {
            record,
            display_price,
            events: retained,
        } = outcome
        else {
            panic!("expected update outcome");
        };
        assert_eq!(record.price, 300000000);
        assert_eq!(display_price, "$2.99");
        assert_eq!(retained, events);
    }

    #[test]
    fn test_update_ignores_unrelated_logs() {
        let events = vec![
            log_event("(tuple (action \"minted\") (type \"token\"))"),
            log_event("not even clarity text ((("),
            log_event(
                "(tuple (action \"updated\") (data (tuple (price u5) (expo 0))) \
                 (type \"price-feed\"))",
            ),
        ];
        let outcome = interpret(STATUS_SUCCESS, "verify-and-update-price-feeds", "", &events);
        let InterpretedOutcome::Update { record, .. } = outcome else {
            panic!("expected update outcome");
        };
        assert_eq!(record.price, 5);
    }

    #[test]
    fn test_update_without_matching_event_fails() {
        let events = vec![log_event("(tuple (action \"minted\") (type \"token\"))")];
        assert_eq!(
            interpret(STATUS_SUCCESS, "verify-and-update-price-feeds", "", &events),
            InterpretedOutcome::Failure {
                reason: PARSE_FAILURE_REASON.to_string()
            }
        );
        assert_eq!(
            interpret(STATUS_SUCCESS, "verify-and-update-price-feeds", "", &[]),
            InterpretedOutcome::Failure {
                reason: PARSE_FAILURE_REASON.to_string()
            }
        );
    }

    #[test]
    fn test_marker_inside_data_only_does_not_match() {
        // Markers must be tuple fields of the log, not substrings elsewhere.
        let events = vec![log_event(
            "(tuple (memo \"action updated type price-feed\") (data (tuple (price u1) (expo 0))))",
        )];
        assert_eq!(
            interpret(STATUS_SUCCESS, "verify-and-update-price-feeds", "", &events),
            InterpretedOutcome::Failure {
                reason: PARSE_FAILURE_REASON.to_string()
            }
        );
    }

    #[test]
    fn test_interpret_transaction_with_missing_call_is_generic() {
        let tx = TransactionDetails {
            tx_id: "0xabc".to_string(),
            tx_status: STATUS_SUCCESS.to_string(),
            tx_result: None,
            contract_call: None,
            events: vec![],
        };
        assert_eq!(
            interpret_transaction(&tx),
            InterpretedOutcome::Generic {
                operation: String::new(),
                raw: String::new()
            }
        );
    }
}
