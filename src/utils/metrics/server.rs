//! Metrics server module
//!
//! Serves the Prometheus registry over HTTP at `GET /metrics`.

use actix_web::middleware::{Compress, DefaultHeaders, NormalizePath};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::{
	repositories::{PollerRepository, PollerService},
	utils::metrics::{gather_metrics, update_poller_metrics, update_system_metrics},
};

pub type PollerServiceArc = Arc<Mutex<PollerService<PollerRepository>>>;

pub type PollerServiceData = web::Data<PollerServiceArc>;

/// Metrics endpoint handler
async fn metrics_handler(poller_service: PollerServiceData) -> impl Responder {
	update_system_metrics();

	{
		let pollers = poller_service.lock().await.get_all();
		update_poller_metrics(&pollers);
	}

	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// Inside a container the server listens on every interface, keeping the port
fn resolve_bind_address(bind_address: &str, in_docker: bool) -> String {
	if !in_docker {
		return bind_address.to_string();
	}
	match bind_address.rsplit_once(':') {
		Some((_, port)) if !port.is_empty() => format!("0.0.0.0:{}", port),
		_ => "0.0.0.0:8081".to_string(),
	}
}

/// Builds the metrics server; the returned future must be awaited to serve
pub fn create_metrics_server(
	bind_address: String,
	poller_service: PollerServiceArc,
) -> std::io::Result<actix_web::dev::Server> {
	let in_docker = std::env::var("IN_DOCKER").unwrap_or_default() == "true";
	let actual_bind_address = resolve_bind_address(&bind_address, in_docker);

	info!(
		"Starting metrics server on {} (actual bind: {})",
		bind_address, actual_bind_address
	);

	Ok(HttpServer::new(move || {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.wrap(DefaultHeaders::new())
			.app_data(web::Data::new(poller_service.clone()))
			.route("/metrics", web::get().to(metrics_handler))
	})
	.workers(2)
	.bind(actual_bind_address)?
	.shutdown_timeout(5)
	.run())
}
