//! Polling service.
//!
//! Repeats an asynchronous fetch on a fixed delay and exposes only the
//! freshest successful result:
//! - `fetcher`: the builder and the driver task running the cycle
//! - `handle`: read access, restart and stop for a running fetcher
//! - `handler`: failure strategies and the value setter they receive
//! - `visibility`: the gate that pauses fetching while the consumer is hidden

mod error;
mod fetcher;
mod handle;
mod handler;
mod visibility;

pub use error::PollingError;
pub use fetcher::{FetchFn, PollingFetcher};
pub use handle::PollingHandle;
pub use handler::{ErrorHandler, ValueSetter};
pub use visibility::{AlwaysVisible, VisibilityFlag, VisibilityProbe};
