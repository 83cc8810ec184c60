//! Mock implementations of RPC clients.
//!
//! - [`MockRpcClient`] - mockall implementation of the RPC client trait
//! - [`ScriptedRpcClient`] - replays a fixed list of responses
//!
//! Fetchers clone their client once per cycle, and a cloned mockall mock loses
//! its expectations, so wiring tests use the scripted client instead.

use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Arc, Mutex,
};

use explorer_poller::services::rpc::{RpcClientTrait, RpcError};

use async_trait::async_trait;
use mockall::{mock, predicate::*};
use serde_json::{json, Value};

mock! {
	/// Mock implementation of the RPC client trait.
	///
	/// Only the raw request is mocked; `call` keeps its provided implementation.
	pub RpcClient {}

	#[async_trait]
	impl RpcClientTrait for RpcClient {
		async fn send_raw_request(
			&self,
			method: &str,
			params: Option<Value>,
		) -> Result<Value, RpcError>;
	}

	impl Clone for RpcClient {
		fn clone(&self) -> Self {
			Self {}
		}
	}
}

/// One scripted reply: a `result` value or a request failure message
#[derive(Debug, Clone)]
pub enum ScriptedReply {
	Result(Value),
	Failure(String),
}

/// RPC client replaying `replies` in order; the last reply repeats forever.
///
/// Clones share the script, the call counter and the recorded requests.
#[derive(Clone, Default)]
pub struct ScriptedRpcClient {
	replies: Arc<Vec<ScriptedReply>>,
	calls: Arc<AtomicUsize>,
	requests: Arc<Mutex<Vec<(String, Option<Value>)>>>,
}

impl ScriptedRpcClient {
	pub fn new(replies: Vec<ScriptedReply>) -> Self {
		Self {
			replies: Arc::new(replies),
			..Default::default()
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn requests(&self) -> Vec<(String, Option<Value>)> {
		self.requests.lock().unwrap().clone()
	}
}

#[async_trait]
impl RpcClientTrait for ScriptedRpcClient {
	async fn send_raw_request(
		&self,
		method: &str,
		params: Option<Value>,
	) -> Result<Value, RpcError> {
		let call = self.calls.fetch_add(1, Ordering::SeqCst);
		self.requests
			.lock()
			.unwrap()
			.push((method.to_string(), params));

		let reply = self
			.replies
			.get(call)
			.or_else(|| self.replies.last())
			.cloned()
			.unwrap_or(ScriptedReply::Result(Value::Null));

		match reply {
			ScriptedReply::Result(result) => Ok(json!({
				"jsonrpc": "2.0",
				"id": call + 1,
				"result": result,
			})),
			ScriptedReply::Failure(message) => Err(RpcError::connection_error(message, None, None)),
		}
	}
}
