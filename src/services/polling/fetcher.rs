//! Polling fetcher and its driver task.
//!
//! A [`PollingFetcher`] is a builder; [`PollingFetcher::start`] moves its
//! configuration into a driver task that owns the [`PollState`] and runs the
//! cycle:
//!
//! 1. skip the cycle if the visibility gate is enabled and the context is hidden
//! 2. otherwise issue a request id and run the fetch on its own task
//! 3. accept a success only if it answers the active request
//! 4. route a failure to the error handler, or reset to the initial value
//! 5. wait `delay` and repeat, unless stopped or restarted
//!
//! Fetches are never aborted. A fetch that is still running when the driver
//! restarts answers a superseded request and is dropped by the id guard; one
//! that finishes after stop has nowhere to deliver its result.

use futures::{future::BoxFuture, FutureExt};
use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};
use tokio::{
	sync::{mpsc, watch},
	time::Instant,
};
use tracing::instrument;

use crate::{
	models::{PollState, RequestId},
	services::polling::{
		handle::PollingHandle,
		handler::{ErrorHandler, ValueSetter},
		visibility::{AlwaysVisible, VisibilityProbe},
		PollingError,
	},
	utils::metrics::{observe_fetch_duration, record_poll_cycle, PollOutcome},
};

/// The repeated operation of a fetcher
pub type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync>;

type FetchResult<T> = (RequestId, anyhow::Result<T>);

/// Builder for a polling loop over one asynchronous data source.
///
/// # Example
///
/// ```no_run
/// # async fn example() {
/// use explorer_poller::services::polling::PollingFetcher;
/// use std::time::Duration;
///
/// let handle = PollingFetcher::new(
/// 	|| async { Ok::<_, anyhow::Error>(42u64) },
/// 	0u64,
/// 	Duration::from_secs(1),
/// )
/// .with_name("answer")
/// .start();
///
/// let latest = handle.current();
/// # }
/// ```
pub struct PollingFetcher<T> {
	name: String,
	fetch_func: FetchFn<T>,
	initial_value: T,
	delay: Duration,
	on_error: Option<ErrorHandler<T>>,
	skip_visibility_gate: bool,
	visibility: Arc<dyn VisibilityProbe>,
}

impl<T> PollingFetcher<T>
where
	T: Clone + Send + Sync + 'static,
{
	/// Creates a fetcher that exposes `initial_value` until the first fetch
	/// succeeds, and waits `delay` after every settled cycle.
	pub fn new<F, Fut>(fetch_func: F, initial_value: T, delay: Duration) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
	{
		Self {
			name: "poller".to_string(),
			fetch_func: Arc::new(move || fetch_func().boxed()),
			initial_value,
			delay,
			on_error: None,
			skip_visibility_gate: false,
			visibility: Arc::new(AlwaysVisible),
		}
	}

	/// Name used in logs, error metadata and metric labels
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	/// Installs a failure strategy in place of the reset to the initial value
	pub fn with_error_handler<H>(mut self, handler: H) -> Self
	where
		H: Fn(&PollingError, &mut ValueSetter<'_, T>) + Send + Sync + 'static,
	{
		self.on_error = Some(Arc::new(handler));
		self
	}

	/// Visibility of the hosting context; defaults to [`AlwaysVisible`]
	pub fn with_visibility<V>(mut self, probe: V) -> Self
	where
		V: VisibilityProbe + 'static,
	{
		self.visibility = Arc::new(probe);
		self
	}

	/// When set, cycles fetch even while the context is hidden
	pub fn skip_visibility_gate(mut self, skip: bool) -> Self {
		self.skip_visibility_gate = skip;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Starts polling with no restart signal.
	///
	/// Must be called from within a tokio runtime. The first fetch is issued
	/// immediately.
	pub fn start(self) -> PollingHandle<T> {
		self.start_with_trigger(())
	}

	/// Starts polling; the handle restarts the cycle whenever
	/// [`PollingHandle::update_trigger`] receives a signal different from
	/// the current one.
	pub fn start_with_trigger<S>(self, signal: S) -> PollingHandle<T, S>
	where
		S: PartialEq + Send + 'static,
	{
		let (value_tx, value_rx) = watch::channel(self.initial_value.clone());
		let (shutdown_tx, shutdown_rx) = watch::channel(false);
		let (restart_tx, restart_rx) = watch::channel(0u64);
		let (results_tx, results_rx) = mpsc::unbounded_channel();

		let name = self.name.clone();
		let driver = PollDriver {
			state: PollState::new(self.initial_value.clone()),
			name: self.name,
			fetch_func: self.fetch_func,
			initial_value: self.initial_value,
			delay: self.delay,
			on_error: self.on_error,
			skip_visibility_gate: self.skip_visibility_gate,
			visibility: self.visibility,
			value_tx,
			shutdown_rx,
			restart_rx,
			results_tx,
			results_rx,
		};

		tracing::info!("Starting poller '{}'", name);
		let task = tokio::spawn(driver.run());

		PollingHandle::new(name, value_rx, shutdown_tx, restart_tx, signal, task)
	}
}

/// How a single cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleEnd {
	/// The active request settled (success or failure)
	Settled,
	/// The visibility gate suppressed the fetch
	Skipped,
	/// A restart superseded the cycle
	Restarted,
	/// Stop was requested or the handle went away
	Stopped,
}

enum Event<T> {
	Stop,
	Restart,
	Tick,
	Result(FetchResult<T>),
}

struct PollDriver<T> {
	name: String,
	fetch_func: FetchFn<T>,
	initial_value: T,
	delay: Duration,
	on_error: Option<ErrorHandler<T>>,
	skip_visibility_gate: bool,
	visibility: Arc<dyn VisibilityProbe>,
	state: PollState<T>,
	value_tx: watch::Sender<T>,
	shutdown_rx: watch::Receiver<bool>,
	restart_rx: watch::Receiver<u64>,
	results_tx: mpsc::UnboundedSender<FetchResult<T>>,
	results_rx: mpsc::UnboundedReceiver<FetchResult<T>>,
}

impl<T> PollDriver<T>
where
	T: Clone + Send + Sync + 'static,
{
	#[instrument(skip_all, fields(poller = %self.name))]
	async fn run(mut self) {
		loop {
			match self.cycle().await {
				CycleEnd::Stopped => break,
				CycleEnd::Restarted => {
					tracing::debug!("Restarting poller '{}'", self.name);
					continue;
				}
				CycleEnd::Settled | CycleEnd::Skipped => {}
			}

			let event: Event<T> = tokio::select! {
				biased;
				_ = self.shutdown_rx.wait_for(|stopped| *stopped) => Event::Stop,
				changed = self.restart_rx.changed() => match changed {
					Ok(()) => Event::Restart,
					Err(_) => Event::Stop,
				},
				_ = tokio::time::sleep(self.delay) => Event::Tick,
			};

			match event {
				Event::Stop => break,
				Event::Restart => tracing::debug!("Restarting poller '{}'", self.name),
				Event::Tick | Event::Result(_) => {}
			}
		}

		tracing::info!("Poller '{}' stopped", self.name);
	}

	async fn cycle(&mut self) -> CycleEnd {
		if !self.skip_visibility_gate && self.visibility.is_hidden() {
			tracing::trace!("Context hidden, skipping fetch");
			record_poll_cycle(&self.name, PollOutcome::Skipped);
			return CycleEnd::Skipped;
		}

		let request_id = self.state.issue_request();
		let issued_at = Instant::now();
		self.spawn_fetch(request_id);

		loop {
			let event = tokio::select! {
				biased;
				_ = self.shutdown_rx.wait_for(|stopped| *stopped) => Event::Stop,
				changed = self.restart_rx.changed() => match changed {
					Ok(()) => Event::Restart,
					Err(_) => Event::Stop,
				},
				Some(result) = self.results_rx.recv() => Event::Result(result),
			};

			match event {
				Event::Stop => return CycleEnd::Stopped,
				Event::Restart => return CycleEnd::Restarted,
				Event::Tick => {}
				Event::Result((id, result)) if self.state.is_current(id) => {
					observe_fetch_duration(&self.name, issued_at.elapsed());
					self.settle(id, result);
					return CycleEnd::Settled;
				}
				Event::Result((id, _)) => {
					tracing::debug!(
						"Discarding stale response {} (active request {})",
						id,
						self.state.active_request_id()
					);
					record_poll_cycle(&self.name, PollOutcome::Stale);
				}
			}
		}
	}

	fn spawn_fetch(&self, request_id: RequestId) {
		let fetch = (self.fetch_func)();
		let results_tx = self.results_tx.clone();
		tokio::spawn(async move {
			let result = fetch.await;
			// The driver is gone after stop; the result has nowhere to go.
			let _ = results_tx.send((request_id, result));
		});
	}

	fn settle(&mut self, request_id: RequestId, result: anyhow::Result<T>) {
		match result {
			Ok(value) => {
				if self.state.accept(request_id, value) {
					record_poll_cycle(&self.name, PollOutcome::Success);
				}
			}
			Err(e) => {
				record_poll_cycle(&self.name, PollOutcome::Failure);
				let error = PollingError::fetch_error(
					"Fetch failed",
					Some(e.into()),
					Some(HashMap::from([
						("poller".to_string(), self.name.clone()),
						("request_id".to_string(), request_id.to_string()),
					])),
				);

				match &self.on_error {
					Some(handler) => {
						let mut setter = ValueSetter::new(&mut self.state, &self.initial_value);
						handler(&error, &mut setter);
					}
					None => {
						self.state.replace(self.initial_value.clone());
					}
				}
			}
		}

		self.value_tx.send_replace(self.state.current_value().clone());
	}
}
