//! JSON-RPC data source.
//!
//! Pollers read chain data through [`RpcClientTrait`]; [`HttpRpcClient`] is the
//! HTTP implementation with retries for transient failures.

mod client;
mod error;

pub use client::{HttpRpcClient, TransientErrorRetryStrategy};
pub use error::RpcError;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// A JSON-RPC 2.0 endpoint
#[async_trait]
pub trait RpcClientTrait: Send + Sync + Clone {
	/// Sends one request and returns the whole response envelope
	async fn send_raw_request(
		&self,
		method: &str,
		params: Option<Value>,
	) -> Result<Value, RpcError>;

	/// Sends one request and returns its `result` member.
	///
	/// An `error` member, or a response with neither member, is returned as
	/// [`RpcError::ResponseError`].
	async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
		let mut response = self.send_raw_request(method, params).await?;
		let metadata = Some(HashMap::from([(
			"method".to_string(),
			method.to_string(),
		)]));

		if let Some(error) = response.get("error").filter(|error| !error.is_null()) {
			let message = error
				.get("message")
				.and_then(Value::as_str)
				.map(str::to_string)
				.unwrap_or_else(|| error.to_string());
			let code = error.get("code").and_then(Value::as_i64);
			let msg = match code {
				Some(code) => format!("RPC error {}: {}", code, message),
				None => format!("RPC error: {}", message),
			};
			return Err(RpcError::response_error(msg, None, metadata));
		}

		match response.get_mut("result") {
			Some(result) => Ok(result.take()),
			None => Err(RpcError::response_error(
				"Response has neither result nor error",
				None,
				metadata,
			)),
		}
	}
}
