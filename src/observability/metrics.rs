//! Metrics collection and exposition.
//!
//! # Metrics
//! - `linkhook_requests_total` (counter): webhook requests by response status
//! - `linkhook_dispatch_total` (counter): dispatches by outcome
//! - `linkhook_command_duration_seconds` (histogram): time from launch to exit
//!
//! Recording is always on and costs nothing without an installed recorder.
//! The Prometheus endpoint only exists when an address is configured.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Fails if `addr` cannot be bound or a recorder is already installed.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(status: u16) {
    counter!("linkhook_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_dispatch(outcome: &'static str) {
    counter!("linkhook_dispatch_total", "outcome" => outcome).increment(1);
}

pub fn record_command_duration(start: Instant) {
    histogram!("linkhook_command_duration_seconds").record(start.elapsed().as_secs_f64());
}
