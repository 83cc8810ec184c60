//! Core domain models.
//!
//! - `PollState`: value and request bookkeeping owned by one fetcher
//! - `Poller`: definition of a polled JSON-RPC call

mod poll_state;
mod poller;

pub use poll_state::{PollState, RequestId};
pub use poller::{DisplayFormat, ErrorPolicy, Poller};
