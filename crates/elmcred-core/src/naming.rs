//! # Naming Rules
//!
//! Name splitting for credential subjects and the filename convention for
//! downloaded credentials. The course id is used verbatim, `:` included:
//!
//! ```text
//! credential-{username}-{course_id}.json
//! credentials-{course_id}.zip
//! ```

/// Split a full name into `(given, family)` at the first space.
///
/// Everything after the first space is the family name, so
/// `"John Doe Roe"` yields `("John", "Doe Roe")`. A name without a space
/// has an empty family name; an empty name yields two empty strings.
pub fn split_full_name(name: &str) -> (String, String) {
    match name.split_once(' ') {
        Some((given, family)) => (given.to_string(), family.to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// Filename of a single credential document.
pub fn credential_filename(username: &str, course_id: &str) -> String {
    format!("credential-{username}-{course_id}.json")
}

/// Filename of the bulk archive for a course.
pub fn archive_filename(course_id: &str) -> String {
    format!("credentials-{course_id}.zip")
}
