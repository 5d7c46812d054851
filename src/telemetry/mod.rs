//! Telemetry
//!
//! Observability for the dealership client.
//!
//! - **Logging**: `tracing` subscriber setup and token redaction
//! - **Metrics**: request, refresh and session counters

pub mod logging;
pub mod metrics;

pub use logging::{
    init_logging, log_request, log_response, redact_token, LogConfig, LogFormat, LogLevel,
};
pub use metrics::{
    create_in_memory_metrics, no_op_metrics, ClientMetrics, InMemoryMetrics, MetricEntry,
    MetricLabels, NoOpMetrics,
};
