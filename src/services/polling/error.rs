//! Polling error types.
//!
//! Fetch failures are wrapped in [`PollingError::FetchError`] before they reach
//! an error handler; they never escape the polling loop. Control and task
//! errors are returned to whoever drives a [`super::PollingHandle`].

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

#[derive(ThisError, Debug)]
pub enum PollingError {
	/// The fetch operation of one cycle failed
	#[error("Fetch error: {0}")]
	FetchError(ErrorContext),

	/// A control request (restart, trigger update) was rejected
	#[error("Control error: {0}")]
	ControlError(ErrorContext),

	/// The driver task panicked or was cancelled
	#[error("Task error: {0}")]
	TaskError(ErrorContext),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl PollingError {
	pub fn fetch_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::FetchError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn control_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ControlError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn task_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::TaskError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for PollingError {
	fn trace_id(&self) -> String {
		match self {
			Self::FetchError(ctx) | Self::ControlError(ctx) | Self::TaskError(ctx) => {
				ctx.trace_id.clone()
			}
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
