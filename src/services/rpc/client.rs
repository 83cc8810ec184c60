//! HTTP JSON-RPC client.

use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{
	default_on_request_failure, default_on_request_success, Retryable, RetryableStrategy,
};
use serde_json::{json, Value};
use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::Duration,
};
use url::Url;

use crate::{
	services::rpc::{RpcClientTrait, RpcError},
	utils::http::{create_retryable_http_client, RetryConfig},
};

/// Retries connection failures and the statuses reqwest-retry classifies as
/// transient (408, 429, 5xx)
pub struct TransientErrorRetryStrategy;

impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(success) => default_on_request_success(success),
			Err(error) => default_on_request_failure(error),
		}
	}
}

/// JSON-RPC client for a single HTTP endpoint.
///
/// Clones share the connection pool and the request id counter.
#[derive(Clone, Debug)]
pub struct HttpRpcClient {
	client: ClientWithMiddleware,
	url: Url,
	next_id: Arc<AtomicU64>,
}

impl HttpRpcClient {
	/// Creates a client for `rpc_url`, retrying transient failures per
	/// `retry_config`
	pub fn new(rpc_url: &str, retry_config: &RetryConfig) -> Result<Self, anyhow::Error> {
		let url = Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL: {}", rpc_url))?;

		let base_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.context("Failed to create base HTTP client")?;

		let client = create_retryable_http_client(
			retry_config,
			base_client,
			Some(TransientErrorRetryStrategy),
		);

		Ok(Self::with_client(client, url))
	}

	/// Wraps an existing middleware client
	pub fn with_client(client: ClientWithMiddleware, url: Url) -> Self {
		Self {
			client,
			url,
			next_id: Arc::new(AtomicU64::new(1)),
		}
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	fn request_body(&self, method: &str, params: Option<Value>) -> Value {
		json!({
			"jsonrpc": "2.0",
			"id": self.next_id.fetch_add(1, Ordering::Relaxed),
			"method": method,
			"params": params.unwrap_or_else(|| json!([])),
		})
	}

	fn metadata(&self, method: &str) -> Option<HashMap<String, String>> {
		Some(HashMap::from([
			("url".to_string(), self.url.to_string()),
			("method".to_string(), method.to_string()),
		]))
	}
}

#[async_trait]
impl RpcClientTrait for HttpRpcClient {
	async fn send_raw_request(
		&self,
		method: &str,
		params: Option<Value>,
	) -> Result<Value, RpcError> {
		let body = self.request_body(method, params);
		tracing::trace!("Sending {} to {}", method, self.url);

		let response = self
			.client
			.post(self.url.clone())
			.json(&body)
			.send()
			.await
			.map_err(|e| {
				RpcError::connection_error(
					format!("Failed to send request: {}", e),
					Some(Box::new(e)),
					self.metadata(method),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			let error_body = response.text().await.unwrap_or_default();
			return Err(RpcError::request_error(
				format!("HTTP status {}: {}", status, error_body),
				None,
				self.metadata(method),
			));
		}

		response.json::<Value>().await.map_err(|e| {
			RpcError::response_error(
				"Failed to parse JSON response",
				Some(Box::new(e)),
				self.metadata(method),
			)
		})
	}
}
