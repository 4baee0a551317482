//! Used for storing fetched transaction records locally, so interpretation
//! can be re-run without a node and fixtures can be captured.
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use log::info;
use reqwest::Client;
use thiserror::Error;

use crate::fetch::{fetch_transaction, FetchError};
use crate::types::TransactionDetails;

static CACHE_DIR: &str = "data/txs";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Fetch error {0}")]
    FetchError(#[from] FetchError),
    #[error("IO error {0}")]
    IoError(#[from] io::Error),
    #[error("serde_json error {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("File {filename} could not be opened {source}")]
    FileOpener {
        source: io::Error,
        filename: PathBuf,
    },
}

/// Fetches a transaction record and stores it as pretty-printed JSON.
pub async fn store_transaction(
    client: &Client,
    node: &str,
    tx_id: &str,
) -> Result<TransactionDetails, CacheError> {
    let tx = fetch_transaction(client, node, tx_id).await?;
    fs::create_dir_all(CACHE_DIR)?;
    let filename = transaction_path(tx_id);
    let mut file = File::create(&filename)?;
    file.write_all(serde_json::to_string_pretty(&tx)?.as_bytes())?;
    info!("stored transaction {} at {}", tx_id, filename.display());
    Ok(tx)
}

/// Loads a previously stored transaction record.
pub fn load_transaction(tx_id: &str) -> Result<TransactionDetails, CacheError> {
    let filename = transaction_path(tx_id);
    let file = File::open(&filename).map_err(|source| CacheError::FileOpener {
        source,
        filename: filename.clone(),
    })?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

fn transaction_path(tx_id: &str) -> PathBuf {
    PathBuf::from(CACHE_DIR).join(format!("{}.json", tx_id.trim_start_matches("0x")))
}
