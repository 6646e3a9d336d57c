// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    // 1. Initialize Tracing (Logs)
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "geotrail_node=debug,geotrail_persistence=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer());
    if subscriber.try_init().is_err() {
        tracing::warn!("Tracing subscriber already installed");
    }

    // 2. Initialize Metrics (Prometheus)
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::warn!("Metrics recorder not installed: {}", e),
    }

    metrics::describe_counter!("geotrail_samples_inserted_total", "Samples accepted, labelled by origin");
    metrics::describe_counter!("geotrail_samples_synced_total", "Offline samples merged into timelines");
    metrics::describe_counter!("geotrail_persist_failures_total", "Snapshot saves that failed");
    metrics::describe_histogram!("geotrail_persist_duration_seconds", "Time taken to save one snapshot");
    metrics::describe_gauge!("geotrail_identities_loaded", "Timelines currently held in memory");

    metrics::gauge!("geotrail_node_up", 1.0);
}

/// Render collected metrics in Prometheus text format.
pub fn render_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
