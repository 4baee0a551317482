//! For Command Line Interface for stacks-pyth-watch

use clap::{Parser, Subcommand};
use stacks_pyth_watch::rpc::Network;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppArgs {
    /// Network whose public API node to query
    #[clap(short, long, default_value_t = Network::Mainnet)]
    pub network: Network,
    /// Node base URL override (defaults to the network's public API)
    #[clap(long)]
    pub node: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a transaction once and interpret its result
    Tx {
        /// Transaction id (0x-prefixed hex)
        tx_id: String,
        /// Interpret a previously stored copy instead of fetching
        #[clap(long)]
        from_cache: bool,
        /// Store the fetched record under data/txs/
        #[clap(long)]
        store: bool,
    },
    /// Poll until the transaction reaches a terminal status, then interpret
    Watch {
        /// Transaction id (0x-prefixed hex)
        tx_id: String,
        /// Seconds between polls
        #[clap(long, default_value_t = 3)]
        interval_secs: u64,
        /// Overall deadline in seconds
        #[clap(long, default_value_t = 60)]
        timeout_secs: u64,
    },
    /// List the known price feed identifiers
    Feeds,
}
