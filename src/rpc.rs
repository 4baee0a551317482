use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Unknown network {0}, expected mainnet or testnet")]
    UnknownNetwork(String),
    #[error("Transaction id is not hex {0}")]
    TxIdNotHex(#[from] hex::FromHexError),
    #[error("Transaction id must be 32 bytes, got {0}")]
    TxIdLength(usize),
    #[error("Url error {0}")]
    UrlError(#[from] url::ParseError),
}

/// Network whose indexing service to query.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Base URL of the network's public API node.
    pub fn base_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.mainnet.hiro.so",
            Network::Testnet => "https://api.testnet.hiro.so",
        }
    }
}

impl FromStr for Network {
    type Err = RpcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(RpcError::UnknownNetwork(other.to_string())),
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

/// Checks a transaction id is 32 bytes of hex and returns it 0x-prefixed.
pub fn normalize_tx_id(tx_id: &str) -> Result<String, RpcError> {
    let stripped = tx_id.trim_start_matches("0x");
    let bytes = hex::decode(stripped)?;
    if bytes.len() != 32 {
        return Err(RpcError::TxIdLength(bytes.len()));
    }
    Ok(format!("0x{stripped}"))
}

/// Builds the transaction endpoint for the given node base URL.
pub fn transaction_url(node: &str, tx_id: &str) -> Result<Url, RpcError> {
    let base = Url::parse(node)?;
    let tx_id = normalize_tx_id(tx_id)?;
    Ok(base.join(&format!("/extended/v1/tx/{tx_id}"))?)
}
