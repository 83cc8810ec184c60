//! Test helper utilities
//!
//! - `builders`: builders for test instances of models
//! - `http`: retryable HTTP clients for tests

pub mod builders {
	pub mod poller;
}


pub use builders::*;
pub use http::*;
