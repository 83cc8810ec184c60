//! Core services implementing the business logic.
//!
//! - `polling`: The polling fetcher and its handle
//! - `rpc`: JSON-RPC client used as a polling data source

pub mod polling;
pub mod rpc;
