//! Domain models and data structures.
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (PollState, Poller)

mod config;
mod core;

pub use core::{DisplayFormat, ErrorPolicy, PollState, Poller, RequestId};

pub use config::{ConfigError, ConfigLoader};
