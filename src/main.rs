//! Explorer poller service entry point.
//!
//! Loads poller definitions, keeps one polling fetcher running per active
//! poller and logs every value change.
//!
//! # Flow
//! 1. Loads configurations from the poller config directory
//! 2. Starts a fetcher per active poller, all sharing one visibility flag
//! 3. Logs accepted values in each poller's display format
//! 4. Reacts to control signals:
//!    - `SIGUSR1` toggles visibility; hidden pollers skip their fetches
//!    - `SIGHUP` restarts every poller with an immediate fetch
//! 5. Stops every poller on Ctrl+C

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{initialize_services, spawn_value_logger, start_pollers, Result},
	repositories::{PollerRepository, PollerService},
	services::polling::{PollingHandle, VisibilityFlag},
	utils::{
		constants::DEFAULT_METRICS_ADDRESS,
		logging::setup_logging,
		metrics::{server::create_metrics_server, update_poller_metrics},
		parse_string_to_bytes_size,
	},
};

use clap::Parser;
use dotenvy::dotenv_override;
use serde_json::Value;
use std::env::{set_var, var};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

#[derive(Parser)]
#[command(
	name = "explorer-poller",
	about = "Polls blockchain JSON-RPC endpoints on a fixed delay and keeps the latest value of each.",
	version
)]
struct Cli {
	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Address to start the metrics server on (default: 127.0.0.1:8081)
	#[arg(long, value_name = "HOST:PORT")]
	metrics_address: Option<String>,

	/// Enable metrics server
	#[arg(long)]
	metrics: bool,

	/// Directory holding the poller definitions (default: config/pollers)
	#[arg(long, value_name = "DIR")]
	config_dir: Option<PathBuf>,

	/// Validate configuration files without starting the service
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// .env values override the inherited environment; CLI flags override both
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}

		if self.metrics {
			set_var("METRICS_ENABLED", "true");
		}

		if let Some(address) = &self.metrics_address {
			if let Some(port) = address.split(':').nth(1) {
				set_var("METRICS_PORT", port);
			}
		}
	}
}

/// Host-side events that change how pollers run
enum ControlSignal {
	ToggleVisibility,
	Refresh,
}

#[cfg(unix)]
struct ControlSignals {
	toggle: tokio::signal::unix::Signal,
	refresh: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ControlSignals {
	fn new() -> std::io::Result<Self> {
		use tokio::signal::unix::{signal, SignalKind};

		Ok(Self {
			toggle: signal(SignalKind::user_defined1())?,
			refresh: signal(SignalKind::hangup())?,
		})
	}

	async fn recv(&mut self) -> ControlSignal {
		tokio::select! {
			Some(()) = self.toggle.recv() => ControlSignal::ToggleVisibility,
			Some(()) = self.refresh.recv() => ControlSignal::Refresh,
			else => std::future::pending().await,
		}
	}
}

#[cfg(not(unix))]
struct ControlSignals;

#[cfg(not(unix))]
impl ControlSignals {
	fn new() -> std::io::Result<Self> {
		Ok(Self)
	}

	async fn recv(&mut self) -> ControlSignal {
		std::future::pending().await
	}
}

/// Main entry point for the poller service.
///
/// # Errors
/// Returns an error if configuration loading fails or a poller cannot be started.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	if cli.check {
		validate_configuration(cli.config_dir.as_deref()).await;
		return Ok(());
	}

	let poller_service = PollerService::<PollerRepository>::new(cli.config_dir.as_deref())
		.await
		.map_err(|e| anyhow::anyhow!("Failed to load pollers: {}", e))?;
	let (active_pollers, poller_service) =
		initialize_services::<PollerRepository>(Some(poller_service))
			.await
			.map_err(|e| anyhow::anyhow!("Failed to initialize services: {}", e))?;

	update_poller_metrics(&poller_service.lock().await.get_all());

	let metrics_enabled =
		cli.metrics || var("METRICS_ENABLED").map(|v| v == "true").unwrap_or(false);

	let metrics_address = if var("IN_DOCKER").unwrap_or_default() == "true" {
		var("METRICS_PORT")
			.map(|port| format!("0.0.0.0:{}", port))
			.unwrap_or_else(|_| "0.0.0.0:8081".to_string())
	} else {
		cli.metrics_address
			.clone()
			.unwrap_or_else(|| DEFAULT_METRICS_ADDRESS.to_string())
	};

	let metrics_server = if metrics_enabled {
		info!("Metrics server enabled, starting on {}", metrics_address);
		match create_metrics_server(metrics_address, poller_service.clone()) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create metrics server: {}", e);
				None
			}
		}
	} else {
		info!("Metrics server disabled. Use --metrics flag or METRICS_ENABLED=true to enable");
		None
	};

	if active_pollers.is_empty() {
		info!("No active pollers found. Exiting...");
		return Ok(());
	}

	let visibility = VisibilityFlag::default();
	let mut handles = start_pollers(&active_pollers, &visibility, 0)?;
	let loggers: Vec<_> = handles
		.iter()
		.zip(&active_pollers)
		.map(|(handle, poller)| spawn_value_logger(handle.subscribe(), poller.clone()))
		.collect();

	info!(
		"Service started with {} poller(s). Press Ctrl+C to shutdown",
		handles.len()
	);

	let mut control_signals = ControlSignals::new()?;
	let mut generation = 0u64;

	let ctrl_c = tokio::signal::ctrl_c();
	tokio::pin!(ctrl_c);
	let metrics_future = async move {
		match metrics_server {
			Some(server) => server.await,
			None => std::future::pending().await,
		}
	};
	tokio::pin!(metrics_future);

	loop {
		tokio::select! {
			result = &mut ctrl_c => {
				if let Err(e) = result {
					error!("Error waiting for Ctrl+C: {}", e);
				}
				info!("Shutdown signal received, stopping pollers...");
				break;
			}
			result = &mut metrics_future => {
				if let Err(e) = result {
					error!("Metrics server error: {}", e);
				}
				info!("Metrics server stopped, stopping pollers...");
				break;
			}
			signal = control_signals.recv() => match signal {
				ControlSignal::ToggleVisibility => {
					let hidden = visibility.toggle();
					info!(
						"Visibility changed to {}",
						if hidden { "hidden" } else { "visible" }
					);
				}
				ControlSignal::Refresh => {
					generation += 1;
					refresh_pollers(&mut handles, generation);
				}
			},
		}
	}

	for handle in handles.iter_mut() {
		if let Err(e) = handle.stop().await {
			error!("Error stopping poller '{}': {}", handle.name(), e);
		}
	}
	futures::future::join_all(loggers).await;

	info!("Shutdown complete");
	Ok(())
}

/// Restarts every running poller with an immediate fetch
#[instrument(skip(handles))]
fn refresh_pollers(handles: &mut [PollingHandle<Value, u64>], generation: u64) {
	info!("Refreshing all pollers");
	for handle in handles.iter_mut() {
		if let Err(e) = handle.update_trigger(generation) {
			error!("Failed to refresh poller '{}': {}", handle.name(), e);
		}
	}
}

/// Validates configuration files and their structure
async fn validate_configuration(config_dir: Option<&Path>) {
	info!("Validating configuration files...");

	let poller_service = match PollerService::<PollerRepository>::new(config_dir).await {
		Ok(service) => service,
		Err(e) => {
			error!("{}", e);
			return;
		}
	};

	match initialize_services::<PollerRepository>(Some(poller_service)).await {
		Ok((active_pollers, poller_service)) => {
			let total = poller_service.lock().await.get_all().len();
			info!("✓ Loaded {} poller(s)", total);

			if active_pollers.is_empty() {
				error!("No active pollers found. Add a poller definition or unpause one.");
				return;
			}
			info!("✓ Found {} active poller(s)", active_pollers.len());

			info!("Configuration validation completed successfully!");
		}
		Err(e) => {
			error!("{}", e);
		}
	}
}
