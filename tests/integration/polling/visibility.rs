use std::{
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
	time::Duration,
};

use explorer_poller::services::polling::{PollingFetcher, VisibilityFlag};
use mockall::Sequence;
use tokio::time::sleep;

use crate::integration::mocks::MockVisibilityProbe;

fn counting_fetch(
	calls: Arc<AtomicUsize>,
) -> impl Fn() -> std::future::Ready<anyhow::Result<usize>> + Send + Sync + 'static {
	move || std::future::ready(Ok(calls.fetch_add(1, Ordering::SeqCst) + 1))
}

#[tokio::test(start_paused = true)]
async fn test_shared_flag_gates_every_fetcher() {
	let visibility = VisibilityFlag::default();
	let gated_calls = Arc::new(AtomicUsize::new(0));
	let ungated_calls = Arc::new(AtomicUsize::new(0));

	let gated = PollingFetcher::new(
		counting_fetch(gated_calls.clone()),
		0,
		Duration::from_secs(1),
	)
	.with_visibility(visibility.clone())
	.start();
	let ungated = PollingFetcher::new(
		counting_fetch(ungated_calls.clone()),
		0,
		Duration::from_secs(1),
	)
	.with_visibility(visibility.clone())
	.skip_visibility_gate(true)
	.start();

	sleep(Duration::from_millis(500)).await;
	assert!(visibility.toggle());

	sleep(Duration::from_secs(2)).await;
	assert_eq!(gated_calls.load(Ordering::SeqCst), 1);
	assert_eq!(ungated_calls.load(Ordering::SeqCst), 3);
	assert_eq!(gated.current(), 1);
	assert_eq!(ungated.current(), 3);

	assert!(!visibility.toggle());
	sleep(Duration::from_secs(1)).await;
	assert_eq!(gated_calls.load(Ordering::SeqCst), 2);
	assert_eq!(gated.current(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_skipped_cycle_waits_full_delay() {
	let calls = Arc::new(AtomicUsize::new(0));
	let mut seq = Sequence::new();
	let mut probe = MockVisibilityProbe::new();
	probe
		.expect_is_hidden()
		.times(1)
		.in_sequence(&mut seq)
		.return_const(true);
	probe
		.expect_is_hidden()
		.times(1)
		.in_sequence(&mut seq)
		.return_const(false);

	let mut handle = PollingFetcher::new(counting_fetch(calls.clone()), 0, Duration::from_secs(5))
		.with_visibility(probe)
		.start();

	sleep(Duration::from_millis(4900)).await;
	assert_eq!(calls.load(Ordering::SeqCst), 0);

	sleep(Duration::from_millis(200)).await;
	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(handle.current(), 1);

	handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_restart_while_hidden_skips_again() {
	let calls = Arc::new(AtomicUsize::new(0));
	let visibility = VisibilityFlag::new(true);

	let handle = PollingFetcher::new(counting_fetch(calls.clone()), 0, Duration::from_secs(60))
		.with_visibility(visibility.clone())
		.start();

	sleep(Duration::from_millis(10)).await;
	handle.restart().unwrap();
	sleep(Duration::from_millis(10)).await;
	assert_eq!(calls.load(Ordering::SeqCst), 0);

	visibility.show();
	handle.restart().unwrap();
	sleep(Duration::from_millis(10)).await;
	assert_eq!(calls.load(Ordering::SeqCst), 1);
}
