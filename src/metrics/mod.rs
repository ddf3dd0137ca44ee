//! Metrics module for Prometheus-based monitoring.
//!
//! Counts and times completion calls per panel and tracks the number of live
//! sessions. Exported on `GET /metrics`.

pub mod prometheus;

pub use self::prometheus::{
    export_metrics, init_metrics, metrics_handler, record_llm_request, set_active_sessions,
};

pub use self::prometheus::{ACTIVE_SESSIONS, LLM_LATENCY, LLM_REQUESTS_TOTAL, REGISTRY};
