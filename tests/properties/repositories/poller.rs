use crate::properties::strategies::poller_strategy;

use explorer_poller::{
	models::{ConfigLoader, Poller},
	repositories::{PollerRepository, PollerRepositoryTrait},
	utils::MIN_POLL_DELAY_MS,
};
use proptest::{prelude::*, test_runner::Config};
use std::fs;
use tempfile::TempDir;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		cases: 32,
		..Config::default()
	})]

	#[test]
	fn test_generated_pollers_validate(poller in poller_strategy()) {
		prop_assert!(poller.validate().is_ok());
	}

	#[test]
	fn test_short_delays_are_rejected(
		poller in poller_strategy(),
		delay_ms in 0..MIN_POLL_DELAY_MS,
	) {
		let poller = Poller { delay_ms, ..poller };
		prop_assert!(poller.validate().is_err());
	}

	#[test]
	fn test_non_array_params_are_rejected(
		poller in poller_strategy(),
		param in "[a-z0-9]{1,10}",
	) {
		let poller = Poller { params: Some(serde_json::json!({ "value": param })), ..poller };
		prop_assert!(poller.validate().is_err());
	}

	#[test]
	fn test_saved_pollers_reload_unchanged(
		pollers in proptest::collection::hash_map("[a-z0-9_]{1,10}", poller_strategy(), 1..6)
	) {
		// Names must be unique across a directory
		let pollers: std::collections::HashMap<String, Poller> = pollers
			.into_iter()
			.map(|(key, poller)| {
				let name = format!("{}_{}", poller.name, key);
				(key, Poller { name, ..poller })
			})
			.collect();

		let temp_dir = TempDir::new().unwrap();
		for (key, poller) in &pollers {
			let contents = serde_json::to_string_pretty(poller).unwrap();
			fs::write(temp_dir.path().join(format!("{}.json", key)), contents).unwrap();
		}

		let runtime = tokio::runtime::Runtime::new().unwrap();
		let repository = runtime
			.block_on(PollerRepository::new(Some(temp_dir.path())))
			.unwrap();

		prop_assert_eq!(repository.get_all(), pollers);
	}
}
