use std::net::SocketAddr;

use crate::engine::SearchOutcome;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: layout computations finished. Labels: outcome.
pub const COMPUTATIONS_TOTAL: &str = "daygrid_computations_total";

/// Histogram: sweep-builder duration in seconds.
pub const SWEEP_DURATION_SECONDS: &str = "daygrid_sweep_duration_seconds";

/// Histogram: backtracking-search duration in seconds.
pub const SOLVE_DURATION_SECONDS: &str = "daygrid_solve_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: computations currently in flight.
pub const COMPUTATIONS_ACTIVE: &str = "daygrid_computations_active";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map a search outcome to a short label for metrics.
pub fn outcome_label(outcome: SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Solved => "solved",
        SearchOutcome::TimedOut => "timed_out",
        SearchOutcome::Exhausted => "exhausted",
        SearchOutcome::Cancelled => "cancelled",
    }
}
