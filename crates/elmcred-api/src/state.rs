//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The service owns no data of its own. AppState holds:
//! - **Platform directory**: read access to courses, learners,
//!   certificates and course roles.
//! - **ELM defaults**: service-wide language and country settings.
//! - **Metrics handle**: the Prometheus recorder, when one is installed.

use std::sync::Arc;

use elmcred_core::{InMemoryDirectory, PlatformDirectory};
use elmcred_vc::ElmDefaults;
use metrics_exporter_prometheus::PrometheusHandle;

/// Application configuration.
///
/// Custom `Debug` redacts the auth token.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared bearer secret. If `None`, authentication is disabled.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub directory: Arc<dyn PlatformDirectory>,
    pub defaults: Arc<ElmDefaults>,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("defaults", &self.defaults)
            .field("metrics", &self.metrics.as_ref().map(|_| "[installed]"))
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State with default configuration and an empty directory.
    pub fn new() -> Self {
        Self::with_config(
            AppConfig::default(),
            Arc::new(InMemoryDirectory::new()),
            ElmDefaults::default(),
        )
    }

    /// State with the given configuration, directory and defaults.
    pub fn with_config(
        config: AppConfig,
        directory: Arc<dyn PlatformDirectory>,
        defaults: ElmDefaults,
    ) -> Self {
        Self {
            config,
            directory,
            defaults: Arc::new(defaults),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` can render it.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
