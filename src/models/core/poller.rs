use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::RetryConfig;

/// Definition of one polled JSON-RPC call.
///
/// Each poller repeatedly calls `method` on `rpc_url` and exposes the latest
/// accepted `result`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Poller {
	/// Unique, human readable name; also used as the metrics label
	pub name: String,

	/// JSON-RPC endpoint
	pub rpc_url: String,

	/// JSON-RPC method, e.g. `hmyv2_blockNumber`
	pub method: String,

	/// Positional parameters; must be a JSON array when present
	#[serde(default)]
	pub params: Option<Value>,

	/// Delay between the end of one cycle and the start of the next
	pub delay_ms: u64,

	/// Keep fetching while the service is marked hidden
	#[serde(default)]
	pub skip_visibility_gate: Option<bool>,

	/// Paused pollers are loaded and validated but never started
	#[serde(default)]
	pub paused: bool,

	#[serde(default)]
	pub on_error: ErrorPolicy,

	#[serde(default)]
	pub display: DisplayFormat,

	#[serde(default)]
	pub retry_policy: RetryConfig,
}

/// What a failed fetch does to the exposed value
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorPolicy {
	/// Revert to the "no data" value
	#[default]
	Reset,
	/// Keep showing the last accepted value
	KeepLast,
	/// Show a fixed value
	Fallback { value: Value },
}

/// How accepted values are rendered in the logs
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayFormat {
	/// The JSON value as returned by the node
	#[default]
	Raw,
	/// A hex or decimal quantity rendered as an integer
	Quantity,
	/// A gas price rendered as the fee of a `gas`-unit transaction
	Fee { gas: u64 },
}
