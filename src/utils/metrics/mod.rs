//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines poller and host metrics, and the helpers the pollers record with.

pub mod server;

use lazy_static::lazy_static;
use prometheus::{
	Encoder, Gauge, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::{collections::HashMap, time::Duration};
use sysinfo::{Disks, System};

use crate::models::Poller;

lazy_static! {
	/// Global Prometheus registry.
	///
	/// This registry holds all metrics defined in this module and is used
	/// to gather metrics for exposure via the metrics endpoint.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Completed poll cycles by poller and outcome.
	///
	/// Outcomes are `success`, `failure`, `stale` (a response for a superseded
	/// request) and `skipped` (visibility gate closed).
	pub static ref POLL_CYCLES_TOTAL: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("poll_cycles_total", "Completed poll cycles by outcome"),
			&["poller", "outcome"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Time from issuing a fetch to accepting its result.
	pub static ref POLL_FETCH_DURATION: HistogramVec = {
		let histogram = HistogramVec::new(
			HistogramOpts::new("poll_fetch_duration_seconds", "Duration of accepted fetches"),
			&["poller"]
		).unwrap();
		REGISTRY.register(Box::new(histogram.clone())).unwrap();
		histogram
	};

	/// Configured pollers, paused ones included.
	pub static ref POLLERS_TOTAL: Gauge = {
		let gauge = Gauge::new("pollers_total", "Total number of configured pollers").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Pollers that are not paused.
	pub static ref POLLERS_ACTIVE: Gauge = {
		let gauge = Gauge::new("pollers_active", "Number of active pollers").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for CPU usage percentage across all cores.
	pub static ref CPU_USAGE: Gauge = {
		let gauge = Gauge::new("cpu_usage_percentage", "Current CPU usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for memory usage percentage.
	pub static ref MEMORY_USAGE_PERCENT: Gauge = {
		let gauge = Gauge::new("memory_usage_percentage", "Memory usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for memory usage in bytes.
	pub static ref MEMORY_USAGE: Gauge = {
		let gauge = Gauge::new("memory_usage_bytes", "Memory usage in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for total memory in bytes.
	pub static ref TOTAL_MEMORY: Gauge = {
		let gauge = Gauge::new("total_memory_bytes", "Total memory in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for used disk space in bytes, summed over mounted filesystems.
	pub static ref DISK_USAGE: Gauge = {
		let gauge = Gauge::new("disk_usage_bytes", "Used disk space in bytes").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for disk usage percentage.
	pub static ref DISK_USAGE_PERCENT: Gauge = {
		let gauge = Gauge::new("disk_usage_percentage", "Disk usage percentage").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Outcome label of a poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
	Success,
	Failure,
	Stale,
	Skipped,
}

impl PollOutcome {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Failure => "failure",
			Self::Stale => "stale",
			Self::Skipped => "skipped",
		}
	}
}

pub fn record_poll_cycle(poller: &str, outcome: PollOutcome) {
	POLL_CYCLES_TOTAL
		.with_label_values(&[poller, outcome.as_str()])
		.inc();
}

pub fn observe_fetch_duration(poller: &str, duration: Duration) {
	POLL_FETCH_DURATION
		.with_label_values(&[poller])
		.observe(duration.as_secs_f64());
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Updates the host CPU, memory and disk gauges.
pub fn update_system_metrics() {
	let mut sys = System::new_all();
	sys.refresh_all();

	CPU_USAGE.set(sys.global_cpu_usage() as f64);

	let total_memory = sys.total_memory();
	let memory_usage = sys.used_memory();
	TOTAL_MEMORY.set(total_memory as f64);
	MEMORY_USAGE.set(memory_usage as f64);
	MEMORY_USAGE_PERCENT.set(percentage(memory_usage, total_memory));

	let disks = Disks::new_with_refreshed_list();
	let (total_disk_space, total_disk_available) = disks
		.list()
		.iter()
		.fold((0u64, 0u64), |(total, available), disk| {
			(
				total.saturating_add(disk.total_space()),
				available.saturating_add(disk.available_space()),
			)
		});
	let used_disk_space = total_disk_space.saturating_sub(total_disk_available);
	DISK_USAGE.set(used_disk_space as f64);
	DISK_USAGE_PERCENT.set(percentage(used_disk_space, total_disk_space));
}

/// Updates the poller count gauges from the loaded configuration.
pub fn update_poller_metrics(pollers: &HashMap<String, Poller>) {
	POLLERS_TOTAL.set(pollers.len() as f64);
	POLLERS_ACTIVE.set(pollers.values().filter(|p| !p.paused).count() as f64);
}

fn percentage(part: u64, total: u64) -> f64 {
	if total > 0 {
		(part as f64 / total as f64) * 100.0
	} else {
		0.0
	}
}
