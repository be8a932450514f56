//! # Service-Wide ELM Defaults
//!
//! Values used when a course does not set its own ELM overrides. Loaded
//! from the settings file referenced by `ELM_SETTINGS`:
//!
//! ```yaml
//! language_code: en
//! elm_credentials_defaults:
//!   org_country_code: PRT
//!   primary_language_mapping:
//!     pt: POR
//! ```
//!
//! The upper-case keys `ORG_COUNTRY_CODE` and `PRIMARY_LANGUAGE_MAPPING`
//! are accepted as aliases.

use std::collections::BTreeMap;
use std::path::Path;

use elmcred_core::CourseElmSettings;
use serde::Deserialize;

use crate::error::VcError;

/// Platform language code assumed when none is configured.
pub const DEFAULT_LANGUAGE_CODE: &str = "es";
/// ELM language used when nothing maps the platform language.
pub const FALLBACK_PRIMARY_LANGUAGE: &str = "SPA";
/// Country used when neither the course nor the service names one.
pub const FALLBACK_COUNTRY_CODE: &str = "ESP";

const BUILTIN_LANGUAGE_MAP: &[(&str, &str)] = &[("en", "ENG"), ("es", "SPA")];

/// Service-wide defaults for credential generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElmDefaults {
    /// The platform's language code (e.g. `"en"`).
    pub language_code: String,
    /// Extra `platform code → ELM code` entries, taking precedence over the
    /// built-in `en → ENG`, `es → SPA` map.
    pub primary_language_mapping: BTreeMap<String, String>,
    pub org_country_code: Option<String>,
}

impl Default for ElmDefaults {
    fn default() -> Self {
        Self {
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            primary_language_mapping: BTreeMap::new(),
            org_country_code: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default, alias = "LANGUAGE_CODE")]
    language_code: Option<String>,
    #[serde(default, alias = "ELM_CREDENTIALS_DEFAULTS")]
    elm_credentials_defaults: DefaultsSection,
}

#[derive(Debug, Default, Deserialize)]
struct DefaultsSection {
    #[serde(default, alias = "ORG_COUNTRY_CODE")]
    org_country_code: Option<String>,
    #[serde(default, alias = "PRIMARY_LANGUAGE_MAPPING")]
    primary_language_mapping: BTreeMap<String, String>,
}

impl ElmDefaults {
    /// Parse a settings document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, VcError> {
        let file: Option<SettingsFile> = serde_yaml::from_str(yaml)?;
        let file = file.unwrap_or_default();
        let mut defaults = Self::default();
        if let Some(code) = non_blank(file.language_code.as_deref()) {
            defaults.language_code = code.to_string();
        }
        defaults.primary_language_mapping = file.elm_credentials_defaults.primary_language_mapping;
        defaults.org_country_code = non_blank(file.elm_credentials_defaults.org_country_code.as_deref())
            .map(str::to_string);
        Ok(defaults)
    }

    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Self, VcError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// ELM language code of the credential's primary language.
    ///
    /// The course override wins; otherwise the platform language is mapped,
    /// falling back to `SPA` when it has no mapping.
    pub fn primary_language(&self, course: &CourseElmSettings) -> String {
        if let Some(lang) = non_blank(course.primary_language.as_deref()) {
            return lang.to_string();
        }
        self.map_language(&self.language_code)
            .unwrap_or(FALLBACK_PRIMARY_LANGUAGE)
            .to_string()
    }

    /// Country code of the awarding organisation.
    pub fn org_country_code(&self, course: &CourseElmSettings) -> String {
        non_blank(course.org_country_code.as_deref())
            .or_else(|| non_blank(self.org_country_code.as_deref()))
            .unwrap_or(FALLBACK_COUNTRY_CODE)
            .to_string()
    }

    fn map_language(&self, code: &str) -> Option<&str> {
        if let Some(mapped) = self.primary_language_mapping.get(code) {
            return Some(mapped.as_str());
        }
        BUILTIN_LANGUAGE_MAP
            .iter()
            .find(|(platform, _)| *platform == code)
            .map(|(_, elm)| *elm)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
