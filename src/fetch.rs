//! Fetches transaction records from a node, polling until they are indexed.
//!
//! A freshly submitted transaction is not immediately queryable: the node
//! returns 404 until it is indexed, then a mempool record with a `pending`
//! status, then the terminal record. Rather than a single fixed delay, the
//! poll loop fetches at a bounded interval until a terminal status or an
//! overall deadline is reached.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use log::{debug, info};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::time::{sleep, Instant};

use crate::rpc::{transaction_url, RpcError};
use crate::types::TransactionDetails;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Reqwest error {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Rpc error {0}")]
    RpcError(#[from] RpcError),
    #[error("Node returned HTTP status {0}")]
    ResponseStatus(StatusCode),
    #[error("Transaction is not yet indexed")]
    NotIndexed,
    #[error("Transaction {tx_id} not terminal within {timeout_secs}s (last status: {last_status})")]
    Timeout {
        tx_id: String,
        timeout_secs: u64,
        last_status: String,
    },
    #[error("Poll superseded by a newer submission")]
    Superseded,
}

/// One fetch of a transaction record.
///
/// A 404 is reported as [`FetchError::NotIndexed`] so a poll loop can keep
/// waiting; other non-success HTTP statuses are plain errors.
pub async fn fetch_transaction(
    client: &Client,
    node: &str,
    tx_id: &str,
) -> Result<TransactionDetails, FetchError> {
    let url = transaction_url(node, tx_id)?;
    let response = client.get(url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Err(FetchError::NotIndexed);
    }
    if !response.status().is_success() {
        return Err(FetchError::ResponseStatus(response.status()));
    }
    Ok(response.json::<TransactionDetails>().await?)
}

/// Poll pacing: a fixed interval between fetches and an overall deadline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(60),
        }
    }
}

impl PollConfig {
    pub fn new(interval_secs: u64, timeout_secs: u64) -> Self {
        PollConfig {
            interval: Duration::from_secs(interval_secs),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Polls until the transaction reaches a terminal status.
///
/// Not-yet-indexed and mempool-pending responses keep the loop going; any
/// other status is terminal and the record is returned for interpretation.
pub async fn poll_transaction(
    client: &Client,
    node: &str,
    tx_id: &str,
    config: PollConfig,
) -> Result<TransactionDetails, FetchError> {
    poll_until_terminal(client, node, tx_id, config, || false).await
}

async fn poll_until_terminal(
    client: &Client,
    node: &str,
    tx_id: &str,
    config: PollConfig,
    is_stale: impl Fn() -> bool,
) -> Result<TransactionDetails, FetchError> {
    let deadline = Instant::now() + config.timeout;
    let mut last_status = String::from("unknown");
    loop {
        if is_stale() {
            return Err(FetchError::Superseded);
        }
        match fetch_transaction(client, node, tx_id).await {
            Ok(tx) if tx.is_pending() => {
                debug!("transaction {tx_id} still pending");
                last_status = tx.tx_status;
            }
            Ok(tx) => {
                info!("transaction {} reached status {}", tx.tx_id, tx.tx_status);
                return Ok(tx);
            }
            Err(FetchError::NotIndexed) => {
                debug!("transaction {tx_id} not yet indexed");
            }
            Err(error) => return Err(error),
        }
        if Instant::now() + config.interval > deadline {
            return Err(FetchError::Timeout {
                tx_id: tx_id.to_string(),
                timeout_secs: config.timeout.as_secs(),
                last_status,
            });
        }
        sleep(config.interval).await;
    }
}

/// Issues poll loops where a newer submission supersedes any loop still in
/// flight.
///
/// Each [`watch`](TransactionWatcher::watch) call takes a fresh generation
/// token and invalidates the tokens of earlier calls; a superseded loop stops
/// at its next wakeup instead of delivering a stale result.
#[derive(Clone, Debug, Default)]
pub struct TransactionWatcher {
    generation: Arc<AtomicU64>,
}

impl TransactionWatcher {
    pub fn new() -> Self {
        TransactionWatcher::default()
    }

    pub async fn watch(
        &self,
        client: &Client,
        node: &str,
        tx_id: &str,
        config: PollConfig,
    ) -> Result<TransactionDetails, FetchError> {
        let token = self.begin();
        poll_until_terminal(client, node, tx_id, config, || !self.is_current(token)).await
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }
}
