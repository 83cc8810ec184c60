//! Mock implementations of repository traits.
//!
//! - [`MockPollerRepository`] - Mock implementation of the poller repository
//!
//! These mocks allow testing repository-dependent functionality without actual
//! file system operations.

use explorer_poller::{
	models::Poller,
	repositories::{PollerRepositoryTrait, RepositoryError},
};

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use mockall::{mock, predicate::*};

mock! {
	/// Mock implementation of the poller repository.
	pub PollerRepository {}

	#[async_trait]
	impl PollerRepositoryTrait for PollerRepository {
		#[mockall::concretize]
		async fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
		where
			Self: Sized;
		#[mockall::concretize]
		async fn load_all(path: Option<&Path>) -> Result<HashMap<String, Poller>, RepositoryError>;
		fn get(&self, poller_id: &str) -> Option<Poller>;
		fn get_all(&self) -> HashMap<String, Poller>;
	}

	impl Clone for PollerRepository {
		fn clone(&self) -> Self {
			Self {}
		}
	}
}
