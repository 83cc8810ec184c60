//! Repository implementations for configuration management.
//!
//! Loads poller definitions from the filesystem and exposes them through a
//! service layer:
//!
//! - Loading configurations from JSON files
//! - Reporting load and validation failures with their path
//! - Accessing configurations through a trait-based interface

mod error;
mod poller;

pub use error::RepositoryError;
pub use poller::{PollerRepository, PollerRepositoryTrait, PollerService};
