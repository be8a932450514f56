//! # Course Access Control
//!
//! Decides whether an authenticated caller may generate credentials for a
//! course. Platform staff and superusers may do so for any course; otherwise the user
//! needs the staff or instructor role on that particular course.

use elmcred_core::{CourseKey, CourseRole, PlatformDirectory};

use crate::auth::CallerIdentity;
use crate::error::AppError;

pub const ACCESS_DENIED: &str = "The user does not have access to generate credentials.";

/// Whether the caller may generate credentials for `course`.
pub fn can_generate(
    directory: &dyn PlatformDirectory,
    caller: &CallerIdentity,
    course: &CourseKey,
) -> bool {
    let username = match caller {
        CallerIdentity::Service => return true,
        CallerIdentity::User(username) => username,
    };
    let Some(user) = directory.find_user(username.as_str()) else {
        return false;
    };
    user.is_staff
        || user.is_superuser
        || directory.has_course_role(&user, course, CourseRole::Staff)
        || directory.has_course_role(&user, course, CourseRole::Instructor)
}

/// Like [`can_generate`], but returns 403 on refusal.
pub fn require_course_access(
    directory: &dyn PlatformDirectory,
    caller: &CallerIdentity,
    course: &CourseKey,
) -> Result<(), AppError> {
    if can_generate(directory, caller, course) {
        Ok(())
    } else {
        tracing::warn!(caller = %caller.describe(), course_id = %course, "credential access denied");
        Err(AppError::Forbidden(ACCESS_DENIED.to_string()))
    }
}
