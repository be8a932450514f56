//! # HTTP Middleware
//!
//! - `metrics`: request counters, exported through the Prometheus recorder.
//! - `tracing_layer`: per-request tracing spans.

pub mod metrics;
pub mod tracing_layer;
