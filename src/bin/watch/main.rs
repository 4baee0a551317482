use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use reqwest::Client;

use stacks_pyth_watch::cache::{load_transaction, store_transaction};
use stacks_pyth_watch::contract::oracle_contract_id;
use stacks_pyth_watch::feeds::KnownFeed;
use stacks_pyth_watch::fetch::{fetch_transaction, PollConfig, TransactionWatcher};
use stacks_pyth_watch::interpret::{interpret_transaction, InterpretedOutcome};
use stacks_pyth_watch::types::TransactionDetails;

use crate::cli::{AppArgs, Command};

mod cli;

/// Fetches Pyth oracle transactions from a node and reports what they did.
///
/// Reading happens against the indexing service only; submitting and signing
/// transactions is the wallet's business and not handled here.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = AppArgs::parse();
    let node = args
        .node
        .clone()
        .unwrap_or_else(|| args.network.base_url().to_string());

    match args.command {
        Command::Tx {
            tx_id,
            from_cache,
            store,
        } => {
            let tx = if from_cache {
                load_transaction(&tx_id)?
            } else if store {
                store_transaction(&Client::new(), &node, &tx_id).await?
            } else {
                fetch_transaction(&Client::new(), &node, &tx_id).await?
            };
            report(&tx);
        }
        Command::Watch {
            tx_id,
            interval_secs,
            timeout_secs,
        } => {
            let config = PollConfig::new(interval_secs, timeout_secs);
            let watcher = TransactionWatcher::new();
            let tx = watcher.watch(&Client::new(), &node, &tx_id, config).await?;
            report(&tx);
        }
        Command::Feeds => {
            for feed in KnownFeed::all() {
                println!("{:<9} {}", feed.symbol(), feed.id());
            }
        }
    }
    Ok(())
}

fn report(tx: &TransactionDetails) {
    info!("transaction {} status {}", tx.tx_id, tx.tx_status);
    if let Some(call) = &tx.contract_call {
        if call.contract_id != oracle_contract_id() {
            warn!(
                "contract {} is not the known oracle deployment",
                call.contract_id
            );
        }
    }
    let outcome = interpret_transaction(tx);
    println!("{outcome}");
    if let InterpretedOutcome::Price { record, .. } | InterpretedOutcome::Update { record, .. } =
        &outcome
    {
        if let Some(feed) = record
            .price_identifier
            .as_deref()
            .and_then(KnownFeed::from_identifier)
        {
            println!("feed: {feed}");
        }
    }
}
