//! # Error Types
//!
//! Errors raised while validating identifiers, parsing timestamps and
//! loading platform directory fixtures. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The course identifier does not match any accepted course key form.
    #[error("invalid course key: {0:?}")]
    InvalidCourseKey(String),

    /// A username was empty after trimming.
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),

    /// A timestamp string could not be interpreted.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A directory fixture referenced data that does not exist or is inconsistent.
    #[error("invalid directory fixture: {0}")]
    InvalidFixture(String),

    /// YAML deserialization error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
