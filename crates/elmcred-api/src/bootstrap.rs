//! # Service Bootstrap
//!
//! Loads ELM settings and the platform directory at startup and builds the
//! [`AppState`].
//!
//! ## Bootstrap Sequence
//!
//! 1. **Load ELM settings** from `ELM_SETTINGS` (YAML), if set.
//! 2. **Apply overrides** from `ELM_LANGUAGE_CODE` and `ELM_ORG_COUNTRY_CODE`.
//! 3. **Load the directory** from `ELM_DIRECTORY` (YAML or JSON), if set.
//! 4. **Log the service banner.**
//!
//! With none of these set the service starts with default settings and an
//! empty directory, so every course lookup returns 404.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use elmcred_core::{CoreError, InMemoryDirectory};
use elmcred_vc::{ElmDefaults, VcError};

use crate::state::{AppConfig, AppState};

/// Errors during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A configured file does not exist.
    #[error("{what} not found: {path}")]
    NotFound { what: &'static str, path: String },

    /// The settings file could not be parsed.
    #[error("invalid ELM settings: {0}")]
    Settings(#[from] VcError),

    /// The directory fixture could not be loaded.
    #[error("invalid platform directory: {0}")]
    Directory(#[from] CoreError),
}

/// Startup inputs read from the environment.
#[derive(Debug, Clone, Default)]
pub struct BootstrapEnv {
    pub settings_path: Option<PathBuf>,
    pub language_code: Option<String>,
    pub org_country_code: Option<String>,
    pub directory_path: Option<PathBuf>,
}

impl BootstrapEnv {
    /// Read `ELM_SETTINGS`, `ELM_LANGUAGE_CODE`, `ELM_ORG_COUNTRY_CODE` and
    /// `ELM_DIRECTORY`. Empty values count as unset.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            settings_path: var("ELM_SETTINGS").map(PathBuf::from),
            language_code: var("ELM_LANGUAGE_CODE"),
            org_country_code: var("ELM_ORG_COUNTRY_CODE"),
            directory_path: var("ELM_DIRECTORY").map(PathBuf::from),
        }
    }
}

/// Bootstrap from the process environment.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    bootstrap_with(config, &BootstrapEnv::from_env())
}

/// Bootstrap from explicit inputs.
pub fn bootstrap_with(config: AppConfig, env: &BootstrapEnv) -> Result<AppState, BootstrapError> {
    let defaults = load_defaults(env)?;

    let directory = match &env.directory_path {
        Some(path) => {
            ensure_exists("platform directory", path)?;
            InMemoryDirectory::load(path)?
        }
        None => {
            tracing::warn!("ELM_DIRECTORY not set; starting with an empty platform directory");
            InMemoryDirectory::new()
        }
    };

    log_banner(&config, &defaults, &directory);

    Ok(AppState::with_config(config, Arc::new(directory), defaults))
}

fn load_defaults(env: &BootstrapEnv) -> Result<ElmDefaults, BootstrapError> {
    let mut defaults = match &env.settings_path {
        Some(path) => {
            ensure_exists("ELM settings", path)?;
            ElmDefaults::load(path)?
        }
        None => ElmDefaults::default(),
    };
    if let Some(code) = &env.language_code {
        defaults.language_code = code.clone();
    }
    if let Some(code) = &env.org_country_code {
        defaults.org_country_code = Some(code.clone());
    }
    Ok(defaults)
}

fn ensure_exists(what: &'static str, path: &Path) -> Result<(), BootstrapError> {
    if path.exists() {
        Ok(())
    } else {
        Err(BootstrapError::NotFound {
            what,
            path: path.display().to_string(),
        })
    }
}

fn log_banner(config: &AppConfig, defaults: &ElmDefaults, directory: &InMemoryDirectory) {
    tracing::info!(
        port = config.port,
        auth = config.auth_token.is_some(),
        language_code = %defaults.language_code,
        org_country_code = ?defaults.org_country_code,
        courses = directory.course_count(),
        users = directory.user_count(),
        "ELM credentials service configured"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use elmcred_core::{CourseKey, CourseElmSettings};
    use std::io::Write;

    fn write_temp(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_without_environment() {
        let state = bootstrap_with(AppConfig::default(), &BootstrapEnv::default()).unwrap();
        assert_eq!(*state.defaults, ElmDefaults::default());
        let key = CourseKey::parse("course-v1:edX+DemoX+Demo_Course").unwrap();
        assert!(state.directory.get_course(&key).is_none());
    }

    #[test]
    fn settings_file_then_env_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = write_temp(
            tmp.path(),
            "elm.yaml",
            "language_code: en\nelm_credentials_defaults:\n  org_country_code: PRT\n",
        );
        let env = BootstrapEnv {
            settings_path: Some(settings),
            org_country_code: Some("FRA".into()),
            ..Default::default()
        };
        let state = bootstrap_with(AppConfig::default(), &env).unwrap();
        let no_override = CourseElmSettings::default();
        assert_eq!(state.defaults.primary_language(&no_override), "ENG");
        assert_eq!(state.defaults.org_country_code(&no_override), "FRA");
    }

    #[test]
    fn loads_directory_fixture() {
        let tmp = tempfile::tempdir().unwrap();
        let fixture = write_temp(
            tmp.path(),
            "directory.yaml",
            r#"
courses:
  - key: "course-v1:edX+DemoX+Demo_Course"
    display_name: Demo Course
"#,
        );
        let env = BootstrapEnv {
            directory_path: Some(fixture),
            ..Default::default()
        };
        let state = bootstrap_with(AppConfig::default(), &env).unwrap();
        let key = CourseKey::parse("course-v1:edX+DemoX+Demo_Course").unwrap();
        assert_eq!(state.directory.get_course(&key).unwrap().display_name, "Demo Course");
    }

    #[test]
    fn missing_files_are_reported() {
        let env = BootstrapEnv {
            settings_path: Some(PathBuf::from("/nonexistent/elm.yaml")),
            ..Default::default()
        };
        match bootstrap_with(AppConfig::default(), &env).unwrap_err() {
            BootstrapError::NotFound { what, path } => {
                assert_eq!(what, "ELM settings");
                assert!(path.contains("nonexistent"));
            }
            other => panic!("expected NotFound, got: {other}"),
        }
    }

    #[test]
    fn broken_fixture_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let fixture = write_temp(
            tmp.path(),
            "directory.yaml",
            "enrollments:\n  - course: \"course-v1:edX+DemoX+Demo_Course\"\n    username: ghost\n",
        );
        let env = BootstrapEnv {
            directory_path: Some(fixture),
            ..Default::default()
        };
        assert!(matches!(
            bootstrap_with(AppConfig::default(), &env),
            Err(BootstrapError::Directory(_))
        ));
    }
}
