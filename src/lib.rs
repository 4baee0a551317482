pub mod cache;
pub mod contract;
pub mod feeds;
pub mod fetch;
pub mod interpret;
pub mod rpc;
pub mod tuple;
pub mod types;
