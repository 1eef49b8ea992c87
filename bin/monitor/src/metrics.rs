//! Prometheus metrics for the withdrawal monitor.
//!
//! All metrics are aggregated in the [`Metrics`] struct for easy tracking and management.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Aggregated metrics for the monitor.
///
/// This struct provides a centralized interface for recording all monitor metrics.
/// Metrics are registered with the global metrics registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    /// Register metric descriptions with the global registry.
    fn register_descriptions() {
        // Pass metrics
        describe_counter!(
            "monitor_passes_total",
            "Total number of monitoring passes executed"
        );
        describe_counter!(
            "monitor_passes_failure_total",
            "Total number of monitoring passes that failed"
        );
        describe_histogram!(
            "monitor_pass_duration_seconds",
            "Duration of each monitoring pass in seconds"
        );

        // Validation metrics
        describe_counter!(
            "monitor_withdrawals_validated_total",
            "Number of withdrawals successfully validated against L2 state"
        );
        describe_gauge!(
            "monitor_forgery_detected",
            "0 if state is ok, 1 if an inconsistent withdrawal was detected"
        );

        // Discovery metrics (gauges - current values)
        describe_gauge!(
            "monitor_last_proven_block",
            "L1 block of the most recent proven withdrawal"
        );
        describe_gauge!(
            "monitor_last_proven_timestamp",
            "Unix timestamp of the most recent proven withdrawal"
        );
    }

    /// Record a completed monitoring pass.
    pub fn record_pass(&self, success: bool, duration: Duration) {
        counter!("monitor_passes_total").increment(1);
        histogram!("monitor_pass_duration_seconds").record(duration.as_secs_f64());

        if !success {
            counter!("monitor_passes_failure_total").increment(1);
        }
    }

    /// Record a withdrawal that passed validation.
    pub fn record_validated(&self) {
        counter!("monitor_withdrawals_validated_total").increment(1);
    }

    /// Set the forgery-detected flag.
    pub fn set_forgery_detected(&self, detected: bool) {
        gauge!("monitor_forgery_detected").set(if detected { 1.0 } else { 0.0 });
    }

    /// Set the most recent proven withdrawal's block and timestamp.
    pub fn set_last_proven(&self, block_number: u64, timestamp: u64) {
        gauge!("monitor_last_proven_block").set(block_number as f64);
        gauge!("monitor_last_proven_timestamp").set(timestamp as f64);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
