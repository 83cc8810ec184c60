use std::{fs, path::Path};

use explorer_poller::{
	models::{ConfigLoader, DisplayFormat, ErrorPolicy, Poller},
	repositories::{PollerRepository, PollerRepositoryTrait, PollerService, RepositoryError},
};
use serde_json::Value;
use tempfile::TempDir;

fn write_poller(dir: &Path, file_name: &str, contents: &str) {
	fs::write(dir.join(file_name), contents).unwrap();
}

#[tokio::test]
async fn test_shipped_configs_load() {
	let service = PollerService::<PollerRepository>::new(Some(Path::new("config/pollers")))
		.await
		.expect("shipped poller configs should load");

	let block_number = service.get("block_number").unwrap();
	assert_eq!(block_number.method, "hmyv2_blockNumber");
	assert_eq!(block_number.on_error, ErrorPolicy::KeepLast);
	assert_eq!(block_number.display, DisplayFormat::Quantity);

	let gas_price = service.get("gas_price").unwrap();
	assert_eq!(gas_price.display, DisplayFormat::Fee { gas: 21_000 });
	assert_eq!(gas_price.on_error, ErrorPolicy::Reset);

	let staking = service.get("staking_network_info").unwrap();
	assert!(staking.paused);
	assert!(staking.skips_visibility_gate());
	assert_eq!(staking.on_error, ErrorPolicy::Fallback { value: Value::Null });
	assert_eq!(staking.retry_policy.max_retries, 5);

	let active = service.get_active();
	assert_eq!(active.len(), 2);
	assert!(!active.contains_key("staking_network_info"));
}

#[tokio::test]
async fn test_repository_keys_pollers_by_file_stem() {
	let temp_dir = TempDir::new().unwrap();
	write_poller(
		temp_dir.path(),
		"shard0_height.json",
		r#"{
			"name": "Block Height",
			"rpc_url": "http://localhost:9500",
			"method": "hmyv2_blockNumber",
			"params": [],
			"delay_ms": 500
		}"#,
	);
	write_poller(temp_dir.path(), "notes.txt", "not a poller");

	let repository = PollerRepository::new(Some(temp_dir.path())).await.unwrap();
	let pollers = repository.get_all();

	assert_eq!(pollers.len(), 1);
	let poller = repository.get("shard0_height").unwrap();
	assert_eq!(poller.name, "Block Height");
	assert_eq!(poller.delay_ms, 500);
	assert!(!poller.skips_visibility_gate());
}

#[tokio::test]
async fn test_repository_rejects_invalid_poller() {
	let temp_dir = TempDir::new().unwrap();
	write_poller(
		temp_dir.path(),
		"too_fast.json",
		r#"{
			"name": "too_fast",
			"rpc_url": "https://rpc.test.network",
			"method": "hmyv2_blockNumber",
			"delay_ms": 1
		}"#,
	);

	match PollerRepository::new(Some(temp_dir.path())).await {
		Err(RepositoryError::LoadError(ctx)) => {
			assert_eq!(ctx.message, "Failed to load pollers");
			let source = ctx.source.as_ref().unwrap().to_string();
			assert!(source.contains("delay_ms must be at least"));
		}
		Err(other) => panic!("Expected LoadError, got {:?}", other),
		Ok(_) => panic!("Expected LoadError"),
	}
}

#[tokio::test]
async fn test_repository_rejects_duplicate_names() {
	let temp_dir = TempDir::new().unwrap();
	let poller = r#"{
		"name": "gas_price",
		"rpc_url": "https://rpc.test.network",
		"method": "hmyv2_gasPrice",
		"delay_ms": 1000
	}"#;
	write_poller(temp_dir.path(), "first.json", poller);
	write_poller(
		temp_dir.path(),
		"second.json",
		&poller.replace("\"gas_price\"", "\" Gas_Price \""),
	);

	let result = Poller::load_all::<Vec<(String, Poller)>>(Some(temp_dir.path())).await;
	match result {
		Err(e) => assert!(e.to_string().contains("Duplicate poller name found")),
		Ok(_) => panic!("Expected a duplicate name error"),
	}
}

#[tokio::test]
async fn test_repository_missing_directory() {
	let temp_dir = TempDir::new().unwrap();
	let missing = temp_dir.path().join("missing");

	let result = PollerRepository::new(Some(&missing)).await;
	assert!(matches!(result, Err(RepositoryError::LoadError(_))));
}
