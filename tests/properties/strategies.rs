use explorer_poller::{
	models::{DisplayFormat, ErrorPolicy, Poller},
	utils::{tests::builders::poller::PollerBuilder, MIN_POLL_DELAY_MS},
};
use proptest::{option, prelude::*};
use serde_json::{json, Value};

const MAX_DELAY_MS: u64 = 3_600_000;
const MAX_PARAMS: usize = 4;

/// One step applied to a poll state
#[derive(Debug, Clone)]
pub enum PollOp {
	/// Issue a new request
	Issue,
	/// Deliver a value for the request issued `age` requests ago
	Respond { age: u64, value: u32 },
	/// Recover from a failure of the active request
	Replace { value: u32 },
}

pub fn poll_op_strategy() -> impl Strategy<Value = PollOp> {
	prop_oneof![
		3 => Just(PollOp::Issue),
		4 => (0u64..4, any::<u32>()).prop_map(|(age, value)| PollOp::Respond { age, value }),
		1 => any::<u32>().prop_map(|value| PollOp::Replace { value }),
	]
}

pub fn poll_ops_strategy() -> impl Strategy<Value = Vec<PollOp>> {
	prop::collection::vec(poll_op_strategy(), 0..64)
}

pub fn error_policy_strategy() -> impl Strategy<Value = ErrorPolicy> {
	prop_oneof![
		Just(ErrorPolicy::Reset),
		Just(ErrorPolicy::KeepLast),
		"[a-z0-9 ]{1,12}".prop_map(|s| ErrorPolicy::Fallback { value: json!(s) }),
	]
}

pub fn display_strategy() -> impl Strategy<Value = DisplayFormat> {
	prop_oneof![
		Just(DisplayFormat::Raw),
		Just(DisplayFormat::Quantity),
		(1u64..10_000_000).prop_map(|gas| DisplayFormat::Fee { gas }),
	]
}

pub fn params_strategy() -> impl Strategy<Value = Option<Value>> {
	option::of(
		prop::collection::vec("[a-z0-9]{1,10}", 0..MAX_PARAMS)
			.prop_map(|params| Value::Array(params.into_iter().map(Value::String).collect())),
	)
}

/// Pollers that pass validation
pub fn poller_strategy() -> impl Strategy<Value = Poller> {
	(
		"[a-zA-Z0-9_]{1,16}",
		prop_oneof![Just("http"), Just("https")],
		"[a-z]{1,10}(\\.[a-z]{1,10}){0,2}",
		"[a-z]{2,6}_[a-zA-Z]{2,24}",
		params_strategy(),
		MIN_POLL_DELAY_MS..MAX_DELAY_MS,
		any::<bool>(),
		any::<bool>(),
		error_policy_strategy(),
		display_strategy(),
	)
		.prop_map(
			|(name, scheme, host, method, params, delay_ms, skip_gate, paused, on_error, display)| {
				let mut builder = PollerBuilder::new()
					.name(&name)
					.rpc_url(&format!("{}://{}", scheme, host))
					.method(&method)
					.delay_ms(delay_ms)
					.skip_visibility_gate(skip_gate)
					.paused(paused)
					.on_error(on_error)
					.display(display);
				if let Some(params) = params {
					builder = builder.params(params);
				}
				builder.build()
			},
		)
}
