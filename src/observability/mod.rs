//! Observability for the summarizer client.
//!
//! Structured logging goes through `tracing`; [`init_tracing`] installs a
//! subscriber for applications that do not bring their own. Workflow
//! counters live in [`WorkflowMetrics`].

mod logging;
mod metrics;

pub use logging::{init_tracing, redact, LogConfig, LogFormat, LogLevel};
pub use metrics::{MetricsSnapshot, WorkflowMetrics};
