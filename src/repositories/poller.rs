//! Poller configuration repository implementation.
//!
//! Stores the poller definitions loaded from a directory of JSON files, keyed
//! by file stem.

#![allow(clippy::result_large_err)]

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;

use crate::{
	models::{ConfigLoader, Poller},
	repositories::error::RepositoryError,
};

/// Repository for storing and retrieving poller configurations
#[derive(Clone)]
pub struct PollerRepository {
	/// Map of file stems to their poller configurations
	pub pollers: HashMap<String, Poller>,
}

impl PollerRepository {
	/// Loads every poller in `path`, or in the default config directory
	pub async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		let pollers = Self::load_all(path).await?;
		Ok(PollerRepository { pollers })
	}
}

/// Interface for poller repository implementations
#[async_trait]
pub trait PollerRepositoryTrait: Clone {
	/// Create a new repository instance
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
	where
		Self: Sized;

	/// Load all poller configurations from the given path
	///
	/// If no path is provided, uses the default config directory.
	async fn load_all(path: Option<&Path>) -> Result<HashMap<String, Poller>, RepositoryError>;

	/// Get a specific poller by its key
	fn get(&self, poller_id: &str) -> Option<Poller>;

	/// Get all pollers
	///
	/// Returns a copy of the poller map to prevent external mutation.
	fn get_all(&self) -> HashMap<String, Poller>;
}

#[async_trait]
impl PollerRepositoryTrait for PollerRepository {
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		PollerRepository::new(path).await
	}

	async fn load_all(path: Option<&Path>) -> Result<HashMap<String, Poller>, RepositoryError> {
		Poller::load_all(path).await.map_err(|e| {
			RepositoryError::load_error(
				"Failed to load pollers",
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.map_or_else(|| "default".to_string(), |p| p.display().to_string()),
				)])),
			)
		})
	}

	fn get(&self, poller_id: &str) -> Option<Poller> {
		self.pollers.get(poller_id).cloned()
	}

	fn get_all(&self) -> HashMap<String, Poller> {
		self.pollers.clone()
	}
}

/// Service layer for poller repository operations
#[derive(Clone)]
pub struct PollerService<T: PollerRepositoryTrait> {
	repository: T,
}

impl<T: PollerRepositoryTrait> PollerService<T> {
	/// Create a new poller service with the default repository implementation
	pub async fn new(
		path: Option<&Path>,
	) -> Result<PollerService<PollerRepository>, RepositoryError> {
		let repository = PollerRepository::new(path).await?;
		Ok(PollerService { repository })
	}

	/// Create a new poller service with a custom repository implementation
	pub fn new_with_repository(repository: T) -> Result<Self, RepositoryError> {
		Ok(PollerService { repository })
	}

	/// Get a specific poller by its key
	pub fn get(&self, poller_id: &str) -> Option<Poller> {
		self.repository.get(poller_id)
	}

	/// Get all pollers
	pub fn get_all(&self) -> HashMap<String, Poller> {
		self.repository.get_all()
	}

	/// Pollers that are not paused
	pub fn get_active(&self) -> HashMap<String, Poller> {
		self.repository
			.get_all()
			.into_iter()
			.filter(|(_, poller)| !poller.paused)
			.collect()
	}
}
