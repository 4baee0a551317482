//! Identifiers for the mainnet Pyth oracle deployment and the closed set of
//! contract functions this tool recognizes.

use std::fmt::Display;

/// Principal that deployed the oracle and its trait implementors.
pub const ORACLE_ADDRESS: &str = "SP3R4F6C1J3JQWWCVZ3S7FRRYPMYG6ZW6RZK31FXY";
pub const ORACLE_CONTRACT: &str = "pyth-oracle-v3";

// Trait implementors on mainnet.
pub const STORAGE_CONTRACT: &str = "pyth-storage-v3";
pub const DECODER_CONTRACT: &str = "pyth-pnau-decoder-v2";
pub const WORMHOLE_CORE_CONTRACT: &str = "wormhole-core-v3";

/// Fully qualified contract id (`address.name`).
pub fn oracle_contract_id() -> String {
    format!("{ORACLE_ADDRESS}.{ORACLE_CONTRACT}")
}

/// Oracle contract functions with a dedicated interpretation.
///
/// A function name outside this set is not an error; callers fall through to
/// a generic pass-through of the raw result.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    /// Read a feed from storage, result carries the price tuple.
    ReadPriceFeed,
    /// Read the current aggregate price, result carries the price tuple.
    GetPrice,
    /// Decode an attestation payload without touching storage.
    DecodePriceFeeds,
    /// Verify an attestation and write it to storage. The price lands in an
    /// emitted contract log rather than the direct return value.
    VerifyAndUpdatePriceFeeds,
}

impl Operation {
    pub fn from_function_name(name: &str) -> Option<Operation> {
        match name {
            "read-price-feed" => Some(Operation::ReadPriceFeed),
            "get-price" => Some(Operation::GetPrice),
            "decode-price-feeds" => Some(Operation::DecodePriceFeeds),
            "verify-and-update-price-feeds" => Some(Operation::VerifyAndUpdatePriceFeeds),
            _ => None,
        }
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            Operation::ReadPriceFeed => "read-price-feed",
            Operation::GetPrice => "get-price",
            Operation::DecodePriceFeeds => "decode-price-feeds",
            Operation::VerifyAndUpdatePriceFeeds => "verify-and-update-price-feeds",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.function_name())
    }
}
