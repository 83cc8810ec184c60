//! Failure strategy for a fetcher.

use std::sync::Arc;

use crate::{models::PollState, services::polling::PollingError};

/// Strategy invoked when a cycle's fetch fails.
///
/// Receives the wrapped error and a setter bound to the failing fetcher's
/// value slot. Leaving the setter untouched keeps the current value.
pub type ErrorHandler<T> = Arc<dyn Fn(&PollingError, &mut ValueSetter<'_, T>) + Send + Sync>;

/// Write access to one fetcher's current value, lent to an [`ErrorHandler`]
/// for the duration of a single call.
pub struct ValueSetter<'a, T> {
	state: &'a mut PollState<T>,
	initial_value: &'a T,
	modified: bool,
}

impl<'a, T: Clone> ValueSetter<'a, T> {
	pub(crate) fn new(state: &'a mut PollState<T>, initial_value: &'a T) -> Self {
		Self {
			state,
			initial_value,
			modified: false,
		}
	}

	/// The value currently exposed to consumers
	pub fn current(&self) -> &T {
		self.state.current_value()
	}

	/// Replaces the exposed value
	pub fn set(&mut self, value: T) {
		self.state.replace(value);
		self.modified = true;
	}

	/// Reverts the exposed value to the fetcher's initial value
	pub fn reset(&mut self) {
		self.set(self.initial_value.clone());
	}

	/// Whether the handler wrote a value
	pub fn is_modified(&self) -> bool {
		self.modified
	}
}
