//! Metrics plumbing for the pipeline, following Prometheus naming
//! conventions. Stages record through the small namespaced helpers below;
//! recording is a no-op unless an exporter has been installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};

/// Environment variable holding the Prometheus scrape listener address.
pub const METRICS_ADDR_ENV: &str = "HOOPSTATS_METRICS_ADDR";

/// Installs the Prometheus exporter when `HOOPSTATS_METRICS_ADDR` is set
/// (e.g. `127.0.0.1:9090`). Without it the metrics facade stays inert.
pub fn try_install_exporter() {
    let Ok(addr) = std::env::var(METRICS_ADDR_ENV) else {
        return;
    };
    let addr: SocketAddr = match addr.parse() {
        Ok(a) => a,
        Err(e) => {
            warn!("Invalid {} value '{}': {}", METRICS_ADDR_ENV, addr, e);
            return;
        }
    };
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => info!("Prometheus exporter listening on {}", addr),
        Err(e) => warn!("Failed to install Prometheus exporter: {}", e),
    }
}

pub mod metrics {
    pub mod ingest {
        pub fn record_page_success(records: usize) {
            ::metrics::counter!("hoopstats_ingest_pages_fetched_total").increment(1);
            ::metrics::counter!("hoopstats_ingest_records_fetched_total")
                .increment(records as u64);
        }

        pub fn record_page_error() {
            ::metrics::counter!("hoopstats_ingest_page_errors_total").increment(1);
        }

        pub fn record_rate_limited() {
            ::metrics::counter!("hoopstats_ingest_rate_limited_total").increment(1);
        }

        pub fn record_season_duration(secs: f64) {
            ::metrics::histogram!("hoopstats_ingest_season_duration_seconds").record(secs);
        }
    }

    pub mod validator {
        use crate::domain::ValidationReason;

        pub fn record_valid() {
            ::metrics::counter!("hoopstats_validator_valid_total").increment(1);
        }

        pub fn record_invalid(reason: ValidationReason) {
            ::metrics::counter!(
                "hoopstats_validator_invalid_total",
                "reason" => reason.as_str()
            )
            .increment(1);
        }
    }

    pub mod runner {
        pub fn record_batch(records: usize, secs: f64) {
            ::metrics::counter!("hoopstats_runner_batches_processed_total").increment(1);
            ::metrics::histogram!("hoopstats_runner_batch_size").record(records as f64);
            ::metrics::histogram!("hoopstats_runner_batch_duration_seconds").record(secs);
        }
    }

    pub mod aggregator {
        pub fn record_run(rows: usize, teams: usize, secs: f64) {
            ::metrics::counter!("hoopstats_aggregator_runs_total").increment(1);
            ::metrics::histogram!("hoopstats_aggregator_rows_scanned").record(rows as f64);
            ::metrics::histogram!("hoopstats_aggregator_teams_ranked").record(teams as f64);
            ::metrics::histogram!("hoopstats_aggregator_duration_seconds").record(secs);
        }
    }
}
