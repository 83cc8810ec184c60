//! Consumer side of a running fetcher.

use std::collections::HashMap;
use tokio::{
	sync::watch,
	task::JoinHandle,
};

use crate::services::polling::PollingError;

/// Handle to a started [`super::PollingFetcher`].
///
/// Reads are synchronous and always see the latest published value. Dropping
/// the handle tears the fetcher down; call [`PollingHandle::stop`] to wait for
/// the driver to finish.
pub struct PollingHandle<T, S = ()> {
	name: String,
	value_rx: watch::Receiver<T>,
	shutdown_tx: watch::Sender<bool>,
	restart_tx: watch::Sender<u64>,
	trigger: S,
	task: Option<JoinHandle<()>>,
}

impl<T, S> PollingHandle<T, S>
where
	T: Clone,
	S: PartialEq,
{
	pub(crate) fn new(
		name: String,
		value_rx: watch::Receiver<T>,
		shutdown_tx: watch::Sender<bool>,
		restart_tx: watch::Sender<u64>,
		trigger: S,
		task: JoinHandle<()>,
	) -> Self {
		Self {
			name,
			value_rx,
			shutdown_tx,
			restart_tx,
			trigger,
			task: Some(task),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The value currently exposed by the fetcher
	pub fn current(&self) -> T {
		self.value_rx.borrow().clone()
	}

	/// A receiver notified after every settled cycle.
	///
	/// The receiver keeps returning the last value after the fetcher stops.
	pub fn subscribe(&self) -> watch::Receiver<T> {
		self.value_rx.clone()
	}

	pub fn trigger(&self) -> &S {
		&self.trigger
	}

	pub fn is_running(&self) -> bool {
		self.task
			.as_ref()
			.map(|task| !task.is_finished())
			.unwrap_or(false)
	}

	/// Stores `signal` and restarts the cycle if it differs from the current
	/// signal. Returns whether a restart was requested.
	pub fn update_trigger(&mut self, signal: S) -> Result<bool, PollingError> {
		if self.trigger == signal {
			return Ok(false);
		}
		self.restart()?;
		self.trigger = signal;
		Ok(true)
	}

	/// Drops the pending delay and starts a new cycle immediately.
	///
	/// A fetch still in flight keeps running, but its result is discarded.
	pub fn restart(&self) -> Result<(), PollingError> {
		if !self.is_running() {
			return Err(PollingError::control_error(
				"Poller is not running",
				None,
				Some(self.metadata()),
			));
		}
		self.restart_tx
			.send_modify(|generation| *generation = generation.wrapping_add(1));
		Ok(())
	}

	/// Stops the fetcher and waits for its driver task to exit.
	///
	/// No cycle runs and the value does not change after this returns. Calling
	/// it again is a no-op.
	pub async fn stop(&mut self) -> Result<(), PollingError> {
		self.shutdown_tx.send_replace(true);

		let Some(task) = self.task.take() else {
			return Ok(());
		};

		task.await.map_err(|e| {
			PollingError::task_error(
				"Poller task did not shut down cleanly",
				Some(Box::new(e)),
				Some(self.metadata()),
			)
		})
	}

	fn metadata(&self) -> HashMap<String, String> {
		HashMap::from([("poller".to_string(), self.name.clone())])
	}
}

impl<T, S> Drop for PollingHandle<T, S> {
	fn drop(&mut self) {
		self.shutdown_tx.send_replace(true);
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}
