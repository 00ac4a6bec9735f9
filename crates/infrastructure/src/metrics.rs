//! Upstream metrics and Prometheus exposition.
//!
//! Recording goes through the `metrics` facade; until a recorder is installed
//! every update is a no-op.

use ferrous_doh_domain::{ConfigError, MetricsConfig};
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

/// Successful requests per upstream. Label: `to`.
pub const REQUESTS_TOTAL: &str = "ferrous_doh_requests_total";

/// Successful responses per response code and upstream. Labels: `rcode`, `to`.
pub const RESPONSES_TOTAL: &str = "ferrous_doh_responses_total";

/// Duration of successful requests per upstream. Label: `to`.
pub const REQUEST_DURATION_SECONDS: &str = "ferrous_doh_request_duration_seconds";

/// Exponential buckets from 0.25ms, doubling 16 times (up to ~8s).
pub fn duration_buckets() -> Vec<f64> {
    (0..16).map(|i| 0.000_25 * 2f64.powi(i)).collect()
}

pub fn describe() {
    describe_counter!(REQUESTS_TOTAL, "Counter of requests made per upstream.");
    describe_counter!(
        RESPONSES_TOTAL,
        "Counter of responses received per upstream and response code."
    );
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Histogram of the time each request took."
    );
}

/// Prometheus builder with the histogram buckets used by this crate.
pub fn prometheus_builder() -> Result<PrometheusBuilder, ConfigError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
            &duration_buckets(),
        )
        .map_err(|e| ConfigError::Validation(format!("Invalid metric buckets: {}", e)))
}

/// Initialize the metrics system based on configuration.
///
/// When metrics are enabled, this starts an HTTP server that exposes
/// a `/metrics` endpoint for Prometheus to scrape. Must be called from within
/// a Tokio runtime.
pub fn init(config: &MetricsConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    prometheus_builder()?
        .with_http_listener(config.listen)
        .install()
        .map_err(|e| ConfigError::Validation(format!("Failed to start metrics exporter: {}", e)))?;

    describe();
    Ok(())
}
