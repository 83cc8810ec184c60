//! Bootstrap module for initializing services and wiring pollers.
//!
//! Turns loaded poller definitions into running fetchers:
//!
//! # Services
//! - `PollerService`: access to the loaded poller configurations
//!
//! # Wiring
//! - `create_fetch_func`: the JSON-RPC call a poller repeats
//! - `build_fetcher`: a configured `PollingFetcher` for one poller
//! - `start_pollers`: starts every active poller against its endpoint
//! - `spawn_value_logger`: logs each accepted value in the poller's display format

use futures::{future::BoxFuture, FutureExt};
use serde_json::Value;
use std::{collections::HashMap, error::Error, sync::Arc};
use tokio::{
	sync::{watch, Mutex},
	task::JoinHandle,
};

use crate::{
	models::{DisplayFormat, ErrorPolicy, Poller},
	repositories::{PollerRepositoryTrait, PollerService},
	services::{
		polling::{PollingFetcher, PollingHandle, VisibilityProbe},
		rpc::{HttpRpcClient, RpcClientTrait},
	},
	utils::{calculate_fee, format_fee, parse_quantity, NATIVE_TOKEN_SYMBOL},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

type ServiceResult<P> = Result<(Vec<Poller>, Arc<Mutex<PollerService<P>>>)>;

/// Rendered for a poller that has no data yet, or lost it on failure
pub const NO_DATA: &str = "-";

/// Initializes the poller configuration service.
///
/// # Returns
/// Returns a tuple containing:
/// - `Vec<Poller>`: active pollers, sorted by name
/// - `Arc<Mutex<PollerService<P>>>`: data access for poller configs
///
/// # Errors
/// Returns an error if the configuration cannot be loaded
pub async fn initialize_services<P>(poller_service: Option<PollerService<P>>) -> ServiceResult<P>
where
	P: PollerRepositoryTrait + Send + Sync + 'static,
{
	let poller_service = match poller_service {
		Some(service) => service,
		None => {
			let repository = P::new(None).await?;
			PollerService::<P>::new_with_repository(repository)?
		}
	};

	let active_pollers = filter_active_pollers(poller_service.get_all());

	Ok((active_pollers, Arc::new(Mutex::new(poller_service))))
}

/// Creates the fetch operation for `poller`: one JSON-RPC call per cycle,
/// yielding the call's `result`.
pub fn create_fetch_func<C>(
	client: C,
	poller: &Poller,
) -> impl Fn() -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync + 'static
where
	C: RpcClientTrait + 'static,
{
	let method = poller.method.clone();
	let params = poller.params.clone();

	move || {
		let client = client.clone();
		let method = method.clone();
		let params = params.clone();
		async move { client.call(&method, params).await.map_err(anyhow::Error::from) }.boxed()
	}
}

/// Builds the fetcher for `poller`.
///
/// The initial value is `null`, which renders as "no data". The poller's
/// `on_error` policy becomes the fetcher's failure strategy:
/// - `reset`: no handler, a failure reverts to `null`
/// - `keep_last`: a handler that leaves the value untouched
/// - `fallback`: a handler that sets the configured value
pub fn build_fetcher<C, V>(poller: &Poller, client: C, visibility: V) -> PollingFetcher<Value>
where
	C: RpcClientTrait + 'static,
	V: VisibilityProbe + 'static,
{
	let fetcher = PollingFetcher::new(
		create_fetch_func(client, poller),
		Value::Null,
		poller.delay(),
	)
	.with_name(poller.name.clone())
	.with_visibility(visibility)
	.skip_visibility_gate(poller.skips_visibility_gate());

	match &poller.on_error {
		ErrorPolicy::Reset => fetcher,
		ErrorPolicy::KeepLast => fetcher.with_error_handler(|_, _| {}),
		ErrorPolicy::Fallback { value } => {
			let value = value.clone();
			fetcher.with_error_handler(move |_, setter| setter.set(value.clone()))
		}
	}
}

/// Starts a fetcher for every poller in `pollers`.
///
/// `generation` is the initial restart signal of every handle; passing a new
/// value to [`PollingHandle::update_trigger`] forces an immediate re-fetch.
///
/// # Errors
/// Returns an error if an RPC client cannot be created; pollers started before
/// the failure are stopped when their handles drop.
pub fn start_pollers<V>(
	pollers: &[Poller],
	visibility: &V,
	generation: u64,
) -> Result<Vec<PollingHandle<Value, u64>>>
where
	V: VisibilityProbe + Clone + 'static,
{
	let mut handles = Vec::with_capacity(pollers.len());
	for poller in pollers {
		let client = HttpRpcClient::new(&poller.rpc_url, &poller.retry_policy)?;
		let handle =
			build_fetcher(poller, client, visibility.clone()).start_with_trigger(generation);
		handles.push(handle);
	}
	Ok(handles)
}

/// Logs every change of the value published on `values`, until the fetcher
/// stops.
pub fn spawn_value_logger(mut values: watch::Receiver<Value>, poller: Poller) -> JoinHandle<()> {
	tokio::spawn(async move {
		let mut last_value: Option<Value> = None;
		while values.changed().await.is_ok() {
			let value = values.borrow_and_update().clone();
			if last_value.as_ref() == Some(&value) {
				continue;
			}
			tracing::info!(
				poller = %poller.name,
				"{}",
				format_poll_value(&value, &poller.display)
			);
			last_value = Some(value);
		}
	})
}

/// Renders a polled value according to `display`.
///
/// Values the format cannot interpret are rendered raw.
pub fn format_poll_value(value: &Value, display: &DisplayFormat) -> String {
	if value.is_null() {
		return NO_DATA.to_string();
	}

	let formatted = match display {
		DisplayFormat::Raw => None,
		DisplayFormat::Quantity => parse_quantity(value).map(|quantity| quantity.to_string()),
		DisplayFormat::Fee { gas } => parse_quantity(value)
			.and_then(|gas_price| calculate_fee(*gas, gas_price))
			.map(|fee| format_fee(fee, NATIVE_TOKEN_SYMBOL, None)),
	};

	formatted.unwrap_or_else(|| match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	})
}

/// Pollers that are not paused, sorted by name
fn filter_active_pollers(pollers: HashMap<String, Poller>) -> Vec<Poller> {
	let mut active: Vec<Poller> = pollers
		.into_values()
		.filter(|poller| !poller.paused)
		.collect();
	active.sort_by(|a, b| a.name.cmp(&b.name));
	active
}
