//! Polling service for blockchain explorer data.
//!
//! This library repeatedly fetches values from JSON-RPC endpoints and keeps
//! only the freshest successful result of each. It includes:
//!
//! - A generic polling fetcher with stale-response suppression, a visibility
//!   gate, restart and stop
//! - A JSON-RPC client with retries for transient failures
//! - Configuration management through JSON files
//! - Fee and quantity formatting for polled values
//!
//! # Module Structure
//!
//! - `bootstrap`: Bootstraps the application
//! - `models`: Poller configuration and polling state
//! - `repositories`: Configuration storage and management
//! - `services`: Polling and JSON-RPC access
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
