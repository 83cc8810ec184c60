//! Visibility of the hosting context.
//!
//! A fetcher with the visibility gate enabled asks its probe before every
//! cycle and skips the fetch while the context reports itself hidden.

use std::sync::{
	atomic::{AtomicBool, Ordering},
	Arc,
};

/// Answers whether the context consuming polled values is currently hidden
pub trait VisibilityProbe: Send + Sync {
	fn is_hidden(&self) -> bool;
}

impl<P: VisibilityProbe + ?Sized> VisibilityProbe for Arc<P> {
	fn is_hidden(&self) -> bool {
		(**self).is_hidden()
	}
}

/// Probe for contexts that are never hidden
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysVisible;

impl VisibilityProbe for AlwaysVisible {
	fn is_hidden(&self) -> bool {
		false
	}
}

/// Shared, switchable visibility state.
///
/// Clones share the same flag, so one clone can be handed to every fetcher
/// while another is flipped by the host.
#[derive(Debug, Clone, Default)]
pub struct VisibilityFlag {
	hidden: Arc<AtomicBool>,
}

impl VisibilityFlag {
	pub fn new(hidden: bool) -> Self {
		Self {
			hidden: Arc::new(AtomicBool::new(hidden)),
		}
	}

	pub fn set_hidden(&self, hidden: bool) {
		self.hidden.store(hidden, Ordering::SeqCst);
	}

	pub fn hide(&self) {
		self.set_hidden(true);
	}

	pub fn show(&self) {
		self.set_hidden(false);
	}

	/// Flips the flag and returns the new hidden state
	pub fn toggle(&self) -> bool {
		!self.hidden.fetch_xor(true, Ordering::SeqCst)
	}
}

impl VisibilityProbe for VisibilityFlag {
	fn is_hidden(&self) -> bool {
		self.hidden.load(Ordering::SeqCst)
	}
}
