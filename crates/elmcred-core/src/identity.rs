//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers the service accepts from callers.
//! A `CourseKey` can only exist if its string form parsed, so route
//! handlers validate once and pass the typed value everywhere else.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const COURSE_V1_PREFIX: &str = "course-v1:";

/// Validated course identifier.
///
/// Two forms are accepted:
///
/// ```text
/// course-v1:{org}+{course}+{run}
/// {org}/{course}/{run}           : deprecated slash form
/// ```
///
/// Every part must be non-empty and made of ASCII alphanumerics or
/// `_ - ~ . :`. The original string is kept verbatim for display and
/// for filenames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseKey {
    raw: String,
    org: String,
    course: String,
    run: String,
}

impl CourseKey {
    /// Parse and validate a course key string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidCourseKey(s.to_string());

        let parts: Vec<&str> = if let Some(rest) = s.strip_prefix(COURSE_V1_PREFIX) {
            rest.split('+').collect()
        } else if s.contains('/') {
            s.split('/').collect()
        } else {
            return Err(invalid());
        };

        if parts.len() != 3 || !parts.iter().all(|p| is_valid_part(p)) {
            return Err(invalid());
        }

        Ok(Self {
            raw: s.to_string(),
            org: parts[0].to_string(),
            course: parts[1].to_string(),
            run: parts[2].to_string(),
        })
    }

    /// The organisation that owns the course.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// The course code part.
    pub fn course(&self) -> &str {
        &self.course
    }

    /// The run part.
    pub fn run(&self) -> &str {
        &self.run
    }

    /// The key exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn is_valid_part(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '~' | '.' | ':'))
}

impl std::fmt::Display for CourseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for CourseKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CourseKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CourseKey> for String {
    fn from(key: CourseKey) -> Self {
        key.raw
    }
}

/// Platform username, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate a username.
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidUsername(s));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(u: Username) -> Self {
        u.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_course_v1_key() {
        let key = CourseKey::parse("course-v1:edX+DemoX+Demo_Course").unwrap();
        assert_eq!(key.org(), "edX");
        assert_eq!(key.course(), "DemoX");
        assert_eq!(key.run(), "Demo_Course");
        assert_eq!(key.to_string(), "course-v1:edX+DemoX+Demo_Course");
    }

    #[test]
    fn parses_deprecated_slash_key() {
        let key = CourseKey::parse("MITx/6.002x/2012_Fall").unwrap();
        assert_eq!(key.org(), "MITx");
        assert_eq!(key.run(), "2012_Fall");
    }

    #[test]
    fn rejects_missing_prefix_separator() {
        assert!(CourseKey::parse("course-v1+not-valid+Demo_Course").is_err());
    }

    #[test]
    fn rejects_wrong_part_count() {
        assert!(CourseKey::parse("course-v1:edX+DemoX").is_err());
        assert!(CourseKey::parse("course-v1:edX+DemoX+Run+Extra").is_err());
        assert!(CourseKey::parse("edX/DemoX").is_err());
    }

    #[test]
    fn rejects_empty_parts_and_bad_chars() {
        assert!(CourseKey::parse("course-v1:edX++Run").is_err());
        assert!(CourseKey::parse("course-v1:edX+Demo X+Run").is_err());
        assert!(CourseKey::parse("").is_err());
    }

    #[test]
    fn course_key_serde_uses_string_form() {
        let key = CourseKey::parse("course-v1:edX+DemoX+Demo_Course").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"course-v1:edX+DemoX+Demo_Course\"");
        let back: CourseKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<CourseKey>("\"nope\"").is_err());
    }

    #[test]
    fn username_is_trimmed() {
        let u = Username::new("  john_doe ").unwrap();
        assert_eq!(u.as_str(), "john_doe");
    }

    #[test]
    fn username_rejects_blank() {
        assert!(Username::new("   ").is_err());
        assert!(Username::new("").is_err());
    }
}
