//! State owned by a single polling fetcher.

use std::fmt;

/// Identifier of one issued fetch.
///
/// Ids are strictly increasing for the lifetime of a fetcher, including
/// across restarts, so a response can always be matched against the most
/// recently issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
	pub fn value(&self) -> u64 {
		self.0
	}

	fn next(self) -> Self {
		Self(self.0 + 1)
	}
}

impl fmt::Display for RequestId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Current value plus the id of the most recently issued request.
///
/// A response is accepted only if it answers the active request; anything
/// older is stale and must not touch the value.
#[derive(Debug, Clone, PartialEq)]
pub struct PollState<T> {
	current_value: T,
	active_request_id: RequestId,
}

impl<T> PollState<T> {
	/// Creates the state holding `initial_value`; no request has been issued yet.
	pub fn new(initial_value: T) -> Self {
		Self {
			current_value: initial_value,
			active_request_id: RequestId::default(),
		}
	}

	pub fn current_value(&self) -> &T {
		&self.current_value
	}

	pub fn active_request_id(&self) -> RequestId {
		self.active_request_id
	}

	/// Allocates the id for a new fetch, superseding every earlier one.
	pub fn issue_request(&mut self) -> RequestId {
		self.active_request_id = self.active_request_id.next();
		self.active_request_id
	}

	/// Whether a response for `request_id` may still be applied.
	pub fn is_current(&self, request_id: RequestId) -> bool {
		request_id == self.active_request_id
	}

	/// Stores `value` if `request_id` is still the active request.
	///
	/// Returns `false` and drops the value for stale responses.
	pub fn accept(&mut self, request_id: RequestId, value: T) -> bool {
		if !self.is_current(request_id) {
			return false;
		}
		self.current_value = value;
		true
	}

	/// Overwrites the value regardless of request ids.
	///
	/// Used for failure recovery, which always answers the active request.
	pub fn replace(&mut self, value: T) -> T {
		std::mem::replace(&mut self.current_value, value)
	}
}
