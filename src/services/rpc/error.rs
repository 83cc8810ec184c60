//! JSON-RPC client errors.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

#[derive(ThisError, Debug)]
pub enum RpcError {
	/// The request never produced an HTTP response (connect, timeout, ...)
	#[error("Connection error: {0}")]
	ConnectionError(ErrorContext),

	/// The node answered with a non-success HTTP status
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// The body is not a usable JSON-RPC response, or carries an `error` member
	#[error("Response error: {0}")]
	ResponseError(ErrorContext),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl RpcError {
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn request_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn response_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for RpcError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionError(ctx) | Self::RequestError(ctx) | Self::ResponseError(ctx) => {
				ctx.trace_id.clone()
			}
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
