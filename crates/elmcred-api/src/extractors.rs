//! # Query Parameter Validation
//!
//! The credential endpoint takes loosely-typed query parameters. They are
//! collected as strings and validated here so that every bad parameter is
//! reported in one response, keyed by parameter name. Unknown parameters
//! are ignored.

use std::collections::HashMap;

use elmcred_core::Timestamp;

use crate::error::FieldErrors;

/// Validated parameters of the credential builder endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialQuery {
    /// Learner to generate for; `None` means every learner of the course.
    pub username: Option<String>,
    pub expires_at: Option<Timestamp>,
    /// Single credential as a one-entry ZIP (default) or inline JSON.
    pub to_file: bool,
}

impl Default for CredentialQuery {
    fn default() -> Self {
        Self {
            username: None,
            expires_at: None,
            to_file: true,
        }
    }
}

impl CredentialQuery {
    /// Validate raw query parameters. Blank values count as absent.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut query = Self::default();

        query.username = present(params, "username").map(str::to_string);

        if let Some(raw) = present(params, "expires_at") {
            match Timestamp::parse_flexible(raw) {
                Ok(ts) => query.expires_at = Some(ts),
                Err(_) => {
                    errors.insert(
                        "expires_at".into(),
                        "Input should be a valid datetime.".into(),
                    );
                }
            }
        }

        if let Some(raw) = present(params, "to_file") {
            match parse_bool(raw) {
                Some(flag) => query.to_file = flag,
                None => {
                    errors.insert("to_file".into(), "Input should be a valid boolean.".into());
                }
            }
        }

        if errors.is_empty() {
            Ok(query)
        } else {
            Err(errors)
        }
    }
}

fn present<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Lenient boolean: `true/false`, `1/0`, `yes/no`, `on/off`, `t/f`, `y/n`,
/// case-insensitive.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}
