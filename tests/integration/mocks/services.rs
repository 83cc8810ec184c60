//! Mock implementations of polling services.
//!
//! - [`MockVisibilityProbe`] - Mock implementation of the visibility probe

use explorer_poller::services::polling::VisibilityProbe;

use mockall::mock;

mock! {
	/// Mock implementation of the visibility probe.
	///
	/// Lets tests assert how often a fetcher consults the visibility gate.
	pub VisibilityProbe {}

	impl VisibilityProbe for VisibilityProbe {
		fn is_hidden(&self) -> bool;
	}
}
