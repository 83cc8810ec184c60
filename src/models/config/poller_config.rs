//! Poller configuration loading and validation.
//!
//! Implements [`ConfigLoader`] for [`Poller`], so poller definitions can be
//! read from a directory of JSON files.

use async_trait::async_trait;
use std::{collections::HashMap, path::Path, time::Duration};

use crate::{
	models::{config::error::ConfigError, ConfigLoader, DisplayFormat, ErrorPolicy, Poller},
	utils::{normalize_string, DEFAULT_POLLER_CONFIG_DIR, MIN_POLL_DELAY_MS},
};

impl Poller {
	/// Delay between cycles
	pub fn delay(&self) -> Duration {
		Duration::from_millis(self.delay_ms)
	}

	/// Whether the poller keeps fetching while the service is hidden
	pub fn skips_visibility_gate(&self) -> bool {
		self.skip_visibility_gate.unwrap_or(false)
	}

	fn metadata(&self) -> Option<HashMap<String, String>> {
		Some(HashMap::from([("poller".to_string(), self.name.clone())]))
	}
}

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

#[async_trait]
impl ConfigLoader for Poller {
	/// Load all poller configurations from a directory
	///
	/// Every `*.json` file holds one poller and is keyed by its file stem.
	/// Other files are ignored.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let poller_dir = path.unwrap_or(Path::new(DEFAULT_POLLER_CONFIG_DIR));
		let mut pairs: Vec<(String, Poller)> = Vec::new();

		if !poller_dir.exists() {
			return Err(ConfigError::file_error(
				"pollers directory not found",
				None,
				path_metadata(poller_dir),
			));
		}

		let entries = std::fs::read_dir(poller_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read pollers directory: {}", e),
				Some(Box::new(e)),
				path_metadata(poller_dir),
			)
		})?;

		for entry in entries {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					path_metadata(poller_dir),
				)
			})?;
			let path = entry.path();

			if !Self::is_json_file(&path) {
				continue;
			}

			let key = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			let poller = Self::load_from_path(&path).await?;

			let existing: Vec<&Poller> = pairs.iter().map(|(_, poller)| poller).collect();
			Self::validate_uniqueness(&existing, &poller, &path.display().to_string())?;

			pairs.push((key, poller));
		}

		Ok(T::from_iter(pairs))
	}

	/// Load and validate a single poller file
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open poller config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;
		let poller: Poller = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse poller config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		poller.validate()?;

		Ok(poller)
	}

	/// Validate the poller configuration
	///
	/// Ensures that:
	/// - name and method are present
	/// - the RPC URL is an absolute http(s) URL
	/// - the delay is not shorter than [`MIN_POLL_DELAY_MS`]
	/// - params, when present, are positional
	/// - fee display uses a non-zero gas amount
	fn validate(&self) -> Result<(), ConfigError> {
		if self.name.trim().is_empty() {
			return Err(ConfigError::validation_error(
				"Poller name is required",
				None,
				None,
			));
		}

		if self.method.trim().is_empty() {
			return Err(ConfigError::validation_error(
				"RPC method is required",
				None,
				self.metadata(),
			));
		}

		let url = url::Url::parse(&self.rpc_url).map_err(|e| {
			ConfigError::validation_error(
				format!("Invalid RPC URL: {}", e),
				Some(Box::new(e)),
				self.metadata(),
			)
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::validation_error(
				"RPC URL must start with http:// or https://",
				None,
				self.metadata(),
			));
		}

		if self.delay_ms < MIN_POLL_DELAY_MS {
			return Err(ConfigError::validation_error(
				format!("delay_ms must be at least {}ms", MIN_POLL_DELAY_MS),
				None,
				self.metadata(),
			));
		}

		if let Some(params) = &self.params {
			if !params.is_array() {
				return Err(ConfigError::validation_error(
					"params must be a JSON array",
					None,
					self.metadata(),
				));
			}
		}

		if let DisplayFormat::Fee { gas: 0 } = self.display {
			return Err(ConfigError::validation_error(
				"Fee display requires gas greater than 0",
				None,
				self.metadata(),
			));
		}

		if self.paused {
			tracing::info!("Poller '{}' is paused and will not be started", self.name);
		}

		if matches!(self.on_error, ErrorPolicy::Fallback { ref value } if value.is_null()) {
			tracing::warn!(
				"Poller '{}' falls back to null on error, same as the reset policy",
				self.name
			);
		}

		self.validate_protocol();

		Ok(())
	}

	fn validate_protocol(&self) {
		if self.rpc_url.starts_with("http://") {
			tracing::warn!(
				"Poller '{}' uses an insecure RPC URL: {}",
				self.name,
				self.rpc_url
			);
		}
	}

	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		let name = normalize_string(&current_instance.name);
		if instances
			.iter()
			.any(|existing| normalize_string(&existing.name) == name)
		{
			return Err(ConfigError::validation_error(
				format!("Duplicate poller name found: '{}'", current_instance.name),
				None,
				Some(HashMap::from([
					("poller_name".to_string(), current_instance.name.clone()),
					("path".to_string(), file_path.to_string()),
				])),
			));
		}
		Ok(())
	}
}
