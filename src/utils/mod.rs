//! Utility modules for common functionality.
//!
//! - constants: Constants for the application
//! - fee: Fee math and display for native token amounts
//! - http: Retryable HTTP client construction
//! - logging: Logging setup and contextual errors
//! - metrics: Prometheus metrics and the metrics server
//! - parsing: Parsing utilities
//! - tests: Test builders

pub mod constants;
pub mod fee;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod parsing;
pub mod tests;

pub use constants::*;
pub use fee::*;
pub use http::*;
pub use parsing::*;
