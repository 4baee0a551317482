use serde::{Deserialize, Serialize};

use crate::tuple::{FieldMap, TupleError};

/// Status reported for a confirmed, successful transaction.
pub const STATUS_SUCCESS: &str = "success";
/// Status reported while a transaction sits in the mempool.
pub const STATUS_PENDING: &str = "pending";
/// Event kind for contract-emitted print events.
pub const EVENT_SMART_CONTRACT_LOG: &str = "smart_contract_log";

/// Transaction record returned by the indexing service for
/// `/extended/v1/tx/{txid}`. Only the fields read by this tool are kept.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TransactionDetails {
    pub tx_id: String,
    pub tx_status: String,
    #[serde(default)]
    pub tx_result: Option<TxResult>,
    #[serde(default)]
    pub contract_call: Option<ContractCall>,
    #[serde(default)]
    pub events: Vec<TransactionEvent>,
}

impl TransactionDetails {
    pub fn is_success(&self) -> bool {
        self.tx_status == STATUS_SUCCESS
    }
    pub fn is_pending(&self) -> bool {
        self.tx_status == STATUS_PENDING
    }
}

/// Raw result of a contract call, as hex-encoded Clarity value and as
/// repr text.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TxResult {
    pub hex: String,
    pub repr: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ContractCall {
    pub contract_id: String,
    pub function_name: String,
    #[serde(default)]
    pub function_args: Option<Vec<FunctionArg>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FunctionArg {
    pub hex: String,
    pub repr: String,
    pub name: String,
    #[serde(rename = "type")]
    pub arg_type: String,
}

/// One entry of a transaction's event list. Only log-kind events carry a
/// contract log payload.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TransactionEvent {
    pub event_type: String,
    #[serde(default)]
    pub contract_log: Option<ContractLog>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ContractLog {
    pub contract_id: String,
    pub topic: String,
    pub value: LogValue,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LogValue {
    pub repr: String,
}

/// Normalized price data extracted from a transaction result.
///
/// Mantissas are scaled by the power-of-ten exponent `expo` (typically
/// negative, e.g. -8). `price` and `expo` must have been present in the
/// source text; the remaining numeric fields default to zero when absent.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PriceRecord {
    pub price: u64,
    pub ema_price: u64,
    pub conf: u64,
    pub ema_conf: u64,
    pub expo: i32,
    pub publish_time: u64,
    pub prev_publish_time: u64,
    pub price_identifier: Option<String>,
}

impl PriceRecord {
    /// Builds a record from extracted tuple fields.
    ///
    /// A record without `price` or `expo` is unparsable; no partial record
    /// is produced in that case.
    pub fn from_fields(fields: &FieldMap) -> Result<PriceRecord, TupleError> {
        let price = fields
            .unsigned("price")
            .ok_or(TupleError::MissingField("price"))?;
        let expo = fields
            .signed("expo")
            .and_then(|value| i32::try_from(value).ok())
            .ok_or(TupleError::MissingField("expo"))?;
        Ok(PriceRecord {
            price,
            ema_price: fields.unsigned("ema-price").unwrap_or_default(),
            conf: fields.unsigned("conf").unwrap_or_default(),
            ema_conf: fields.unsigned("ema-conf").unwrap_or_default(),
            expo,
            publish_time: fields.unsigned("publish-time").unwrap_or_default(),
            prev_publish_time: fields.unsigned("prev-publish-time").unwrap_or_default(),
            price_identifier: fields
                .hex_token("price-identifier")
                .map(|token| token.to_string()),
        })
    }

    /// Dollar display string: the EMA mantissa scaled by `10^|expo|`,
    /// rounded to two decimal places.
    pub fn display_price(&self) -> String {
        let scale = 10f64.powi(self.expo.unsigned_abs() as i32);
        format!("${:.2}", self.ema_price as f64 / scale)
    }
}
