//! # Learning Platform Directory
//!
//! The service never owns learner, course or certificate data. It reads
//! them from the learning platform through [`PlatformDirectory`]. The
//! records here are the subset of platform data a credential needs.

use serde::{Deserialize, Serialize};

use crate::identity::{CourseKey, Username};
use crate::temporal::Timestamp;

/// Per-course ELM overrides, set by course authors in the course's
/// advanced settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseElmSettings {
    /// ELM language code (e.g. `"POR"`) used as the credential's primary language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_language: Option<String>,
    /// Country code of the awarding organisation (e.g. `"PRT"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_country_code: Option<String>,
}

/// A course as published on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub key: CourseKey,
    pub display_name: String,
    #[serde(default)]
    pub elm: CourseElmSettings,
}

impl CourseRecord {
    /// The organisation that runs the course.
    pub fn org(&self) -> &str {
        self.key.org()
    }
}

/// A platform account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: Username,
    pub email: String,
    /// Profile name, as the learner entered it.
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// A generated course certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub username: Username,
    pub course_key: CourseKey,
    pub created_date: Timestamp,
    /// Final grade as recorded on the certificate (e.g. `"0.87"`).
    #[serde(default)]
    pub grade: String,
}

/// Course-scoped roles that may generate credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseRole {
    Staff,
    Instructor,
}

impl CourseRole {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Instructor => "instructor",
        }
    }
}

/// Read access to the learning platform.
///
/// Implementations must be cheap to call from request handlers; they are
/// invoked synchronously and must not block on network IO.
pub trait PlatformDirectory: Send + Sync {
    /// Look up a published course.
    fn get_course(&self, key: &CourseKey) -> Option<CourseRecord>;

    /// Find a user by username, falling back to email address.
    fn find_user(&self, username_or_email: &str) -> Option<UserRecord>;

    /// Learners enrolled in a course, excluding staff and superusers,
    /// ordered by username.
    fn enrolled_learners(&self, key: &CourseKey) -> Vec<UserRecord>;

    /// The certificate a user earned in a course, if any.
    fn certificate_for(&self, user: &UserRecord, key: &CourseKey) -> Option<CertificateRecord>;

    /// Whether the user holds the given role on the course.
    fn has_course_role(&self, user: &UserRecord, key: &CourseKey, role: CourseRole) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_directory_object_safe(_: &dyn PlatformDirectory) {}

    #[test]
    fn course_org_comes_from_key() {
        let course = CourseRecord {
            key: CourseKey::parse("course-v1:edX+DemoX+Demo_Course").unwrap(),
            display_name: "Demo Course".into(),
            elm: CourseElmSettings::default(),
        };
        assert_eq!(course.org(), "edX");
    }

    #[test]
    fn course_role_serde_is_snake_case() {
        let json = serde_json::to_string(&CourseRole::Instructor).unwrap();
        assert_eq!(json, "\"instructor\"");
        assert_eq!(CourseRole::Staff.as_str(), "staff");
    }

    #[test]
    fn elm_settings_default_when_missing() {
        let course: CourseRecord = serde_json::from_value(serde_json::json!({
            "key": "course-v1:edX+DemoX+Demo_Course",
            "display_name": "Demo Course"
        }))
        .unwrap();
        assert_eq!(course.elm, CourseElmSettings::default());
    }
}
