//! Test helper utilities for Poller configuration
//!
//! - `PollerBuilder`: Builder for creating test Poller instances

use serde_json::Value;

use crate::{
	models::{DisplayFormat, ErrorPolicy, Poller},
	utils::RetryConfig,
};

/// Builder for creating test Poller instances
pub struct PollerBuilder {
	name: String,
	rpc_url: String,
	method: String,
	params: Option<Value>,
	delay_ms: u64,
	skip_visibility_gate: Option<bool>,
	paused: bool,
	on_error: ErrorPolicy,
	display: DisplayFormat,
	retry_policy: RetryConfig,
}

impl Default for PollerBuilder {
	fn default() -> Self {
		Self {
			name: "block_number".to_string(),
			rpc_url: "https://rpc.test.network".to_string(),
			method: "hmyv2_blockNumber".to_string(),
			params: None,
			delay_ms: 1000,
			skip_visibility_gate: None,
			paused: false,
			on_error: ErrorPolicy::default(),
			display: DisplayFormat::default(),
			retry_policy: RetryConfig::default(),
		}
	}
}

impl PollerBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn rpc_url(mut self, url: &str) -> Self {
		self.rpc_url = url.to_string();
		self
	}

	pub fn method(mut self, method: &str) -> Self {
		self.method = method.to_string();
		self
	}

	pub fn params(mut self, params: Value) -> Self {
		self.params = Some(params);
		self
	}

	pub fn delay_ms(mut self, delay_ms: u64) -> Self {
		self.delay_ms = delay_ms;
		self
	}

	pub fn skip_visibility_gate(mut self, skip: bool) -> Self {
		self.skip_visibility_gate = Some(skip);
		self
	}

	pub fn paused(mut self, paused: bool) -> Self {
		self.paused = paused;
		self
	}

	pub fn on_error(mut self, policy: ErrorPolicy) -> Self {
		self.on_error = policy;
		self
	}

	pub fn display(mut self, display: DisplayFormat) -> Self {
		self.display = display;
		self
	}

	pub fn retry_policy(mut self, retry_policy: RetryConfig) -> Self {
		self.retry_policy = retry_policy;
		self
	}

	pub fn build(self) -> Poller {
		Poller {
			name: self.name,
			rpc_url: self.rpc_url,
			method: self.method,
			params: self.params,
			delay_ms: self.delay_ms,
			skip_visibility_gate: self.skip_visibility_gate,
			paused: self.paused,
			on_error: self.on_error,
			display: self.display,
			retry_policy: self.retry_policy,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_default_poller() {
		let poller = PollerBuilder::new().build();

		assert_eq!(poller.name, "block_number");
		assert_eq!(poller.method, "hmyv2_blockNumber");
		assert_eq!(poller.delay_ms, 1000);
		assert_eq!(poller.params, None);
		assert!(!poller.paused);
		assert_eq!(poller.on_error, ErrorPolicy::Reset);
		assert_eq!(poller.display, DisplayFormat::Raw);
	}

	#[test]
	fn test_complete_poller() {
		let poller = PollerBuilder::new()
			.name("gas_price")
			.rpc_url("http://localhost:9500")
			.method("hmyv2_gasPrice")
			.params(json!([]))
			.delay_ms(5000)
			.skip_visibility_gate(true)
			.paused(true)
			.on_error(ErrorPolicy::KeepLast)
			.display(DisplayFormat::Fee { gas: 21_000 })
			.build();

		assert_eq!(poller.name, "gas_price");
		assert_eq!(poller.rpc_url, "http://localhost:9500");
		assert_eq!(poller.params, Some(json!([])));
		assert_eq!(poller.skip_visibility_gate, Some(true));
		assert!(poller.paused);
		assert_eq!(poller.on_error, ErrorPolicy::KeepLast);
		assert_eq!(poller.display, DisplayFormat::Fee { gas: 21_000 });
	}
}
