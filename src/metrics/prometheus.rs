//! Prometheus metrics registration and export.
//!
//! This module defines the metrics used by brand-synth and provides functions
//! for initializing, recording and exporting them.

use prometheus::{Encoder, Gauge, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry for all brand-synth metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Total completion requests, labeled by panel and status.
pub static LLM_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Completion latency in seconds, labeled by panel.
pub static LLM_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Number of live sessions.
pub static ACTIVE_SESSIONS: OnceLock<Gauge> = OnceLock::new();

/// Initialize all metrics and register them with the registry.
///
/// Calling this more than once is harmless: later calls build a fresh
/// registry but the statics keep the first one.
///
/// # Errors
///
/// Returns a `prometheus::Error` if metric construction or registration fails.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    let registry = Registry::new();

    let llm_requests_total = IntCounterVec::new(
        Opts::new(
            "brand_synth_llm_requests_total",
            "Total completion requests sent to the LLM",
        ),
        &["panel", "status"],
    )?;

    let llm_latency = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "brand_synth_llm_latency_seconds",
            "Completion request latency in seconds",
        )
        .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
        &["panel"],
    )?;

    let active_sessions = Gauge::new("brand_synth_active_sessions", "Number of live sessions")?;

    registry.register(Box::new(llm_requests_total.clone()))?;
    registry.register(Box::new(llm_latency.clone()))?;
    registry.register(Box::new(active_sessions.clone()))?;

    let _ = REGISTRY.set(registry);
    let _ = LLM_REQUESTS_TOTAL.set(llm_requests_total);
    let _ = LLM_LATENCY.set(llm_latency);
    let _ = ACTIVE_SESSIONS.set(active_sessions);

    tracing::info!("Prometheus metrics initialized");

    Ok(())
}

/// Record one completion call. No-op until [`init_metrics`] has run.
pub fn record_llm_request(panel: &str, success: bool, seconds: f64) {
    let status = if success { "success" } else { "error" };
    if let Some(counter) = LLM_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[panel, status]).inc();
    }
    if let Some(histogram) = LLM_LATENCY.get() {
        histogram.with_label_values(&[panel]).observe(seconds);
    }
}

/// Publish the current number of live sessions.
pub fn set_active_sessions(count: usize) {
    if let Some(gauge) = ACTIVE_SESSIONS.get() {
        gauge.set(count as f64);
    }
}

/// Export all registered metrics in Prometheus text format.
pub fn export_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return "# Metrics not initialized. Call init_metrics() first.\n".to_string();
    };

    let encoder = TextEncoder::new();
    let metric_families = registry.gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return format!("# Error encoding metrics: {}\n", e);
    }

    String::from_utf8(buffer)
        .unwrap_or_else(|e| format!("# Error converting metrics to UTF-8: {}\n", e))
}

/// HTTP handler for the /metrics endpoint.
pub async fn metrics_handler() -> String {
    export_metrics()
}
