//! Errors raised while reading, parsing or validating poller definitions.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

type ErrorSource = Option<Box<dyn std::error::Error + Send + Sync + 'static>>;

#[derive(ThisError, Debug)]
pub enum ConfigError {
	/// A definition parsed but breaks a rule (bad URL, delay too short, ...)
	#[error("Validation error: {0}")]
	ValidationError(ErrorContext),

	/// A file is not valid JSON or does not match the poller schema
	#[error("Parse error: {0}")]
	ParseError(ErrorContext),

	/// The directory or a file could not be read
	#[error("File error: {0}")]
	FileError(ErrorContext),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

// Config errors are not logged on creation; the repository logs them once
// with the load context attached.
impl ConfigError {
	pub fn validation_error(
		msg: impl Into<String>,
		source: ErrorSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(ErrorContext::new(msg, source, metadata))
	}

	pub fn parse_error(
		msg: impl Into<String>,
		source: ErrorSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(ErrorContext::new(msg, source, metadata))
	}

	pub fn file_error(
		msg: impl Into<String>,
		source: ErrorSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::FileError(ErrorContext::new(msg, source, metadata))
	}
}

impl TraceableError for ConfigError {
	fn trace_id(&self) -> String {
		match self {
			Self::ValidationError(ctx) | Self::ParseError(ctx) | Self::FileError(ctx) => {
				ctx.trace_id.clone()
			}
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}

impl From<std::io::Error> for ConfigError {
	fn from(err: std::io::Error) -> Self {
		Self::file_error(err.to_string(), None, None)
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(err.to_string(), None, None)
	}
}
