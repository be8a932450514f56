//! # In-Memory Platform Directory
//!
//! A [`PlatformDirectory`] held entirely in memory. It backs the test
//! suites and the CLI, and the server uses it when started with a
//! directory fixture (`ELM_DIRECTORY`).
//!
//! All operations are synchronous; the lock is `parking_lot::RwLock` and
//! is never held across `.await` points.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::identity::{CourseKey, Username};
use crate::platform::{CertificateRecord, CourseRecord, CourseRole, PlatformDirectory, UserRecord};

/// Serialized form of a directory, loaded from YAML or JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryFixture {
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub enrollments: Vec<EnrollmentEntry>,
    #[serde(default)]
    pub certificates: Vec<CertificateRecord>,
    #[serde(default)]
    pub roles: Vec<RoleGrant>,
}

/// A learner's enrollment in a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentEntry {
    pub course: CourseKey,
    pub username: Username,
}

/// A course role held by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGrant {
    pub course: CourseKey,
    pub username: Username,
    pub role: CourseRole,
}

#[derive(Debug, Default)]
struct Inner {
    courses: HashMap<CourseKey, CourseRecord>,
    users: BTreeMap<Username, UserRecord>,
    enrollments: HashMap<CourseKey, BTreeSet<Username>>,
    certificates: HashMap<(Username, CourseKey), CertificateRecord>,
    roles: HashSet<(Username, CourseKey, CourseRole)>,
}

/// Thread-safe in-memory platform directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<Inner>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from a fixture, checking every reference.
    pub fn from_fixture(fixture: DirectoryFixture) -> Result<Self, CoreError> {
        let dir = Self::new();
        for course in fixture.courses {
            dir.add_course(course);
        }
        for user in fixture.users {
            dir.add_user(user);
        }
        for e in fixture.enrollments {
            dir.enroll(&e.username, &e.course)?;
        }
        for cert in fixture.certificates {
            dir.add_certificate(cert)?;
        }
        for grant in fixture.roles {
            dir.grant_role(&grant.username, &grant.course, grant.role)?;
        }
        Ok(dir)
    }

    /// Load a YAML (or JSON) fixture file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)?;
        let fixture: DirectoryFixture = serde_yaml::from_str(&text)?;
        Self::from_fixture(fixture)
    }

    /// Insert or replace a course.
    pub fn add_course(&self, course: CourseRecord) {
        self.inner.write().courses.insert(course.key.clone(), course);
    }

    /// Insert or replace a user.
    pub fn add_user(&self, user: UserRecord) {
        self.inner.write().users.insert(user.username.clone(), user);
    }

    /// Enroll an existing user in an existing course.
    pub fn enroll(&self, username: &Username, course: &CourseKey) -> Result<(), CoreError> {
        let mut inner = self.inner.write();
        check_refs(&inner, username, course)?;
        inner
            .enrollments
            .entry(course.clone())
            .or_default()
            .insert(username.clone());
        Ok(())
    }

    /// Record a certificate for an existing user and course.
    pub fn add_certificate(&self, cert: CertificateRecord) -> Result<(), CoreError> {
        let mut inner = self.inner.write();
        check_refs(&inner, &cert.username, &cert.course_key)?;
        inner
            .certificates
            .insert((cert.username.clone(), cert.course_key.clone()), cert);
        Ok(())
    }

    /// Grant a course role to an existing user.
    pub fn grant_role(
        &self,
        username: &Username,
        course: &CourseKey,
        role: CourseRole,
    ) -> Result<(), CoreError> {
        let mut inner = self.inner.write();
        check_refs(&inner, username, course)?;
        inner
            .roles
            .insert((username.clone(), course.clone(), role));
        Ok(())
    }

    /// Number of known courses.
    pub fn course_count(&self) -> usize {
        self.inner.read().courses.len()
    }

    /// Number of known users.
    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }
}

fn check_refs(inner: &Inner, username: &Username, course: &CourseKey) -> Result<(), CoreError> {
    if !inner.users.contains_key(username) {
        return Err(CoreError::InvalidFixture(format!("unknown user {username}")));
    }
    if !inner.courses.contains_key(course) {
        return Err(CoreError::InvalidFixture(format!("unknown course {course}")));
    }
    Ok(())
}

impl PlatformDirectory for InMemoryDirectory {
    fn get_course(&self, key: &CourseKey) -> Option<CourseRecord> {
        self.inner.read().courses.get(key).cloned()
    }

    fn find_user(&self, username_or_email: &str) -> Option<UserRecord> {
        let inner = self.inner.read();
        if let Ok(username) = Username::new(username_or_email) {
            if let Some(user) = inner.users.get(&username) {
                return Some(user.clone());
            }
        }
        inner
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(username_or_email.trim()))
            .cloned()
    }

    fn enrolled_learners(&self, key: &CourseKey) -> Vec<UserRecord> {
        let inner = self.inner.read();
        let Some(enrolled) = inner.enrollments.get(key) else {
            return Vec::new();
        };
        enrolled
            .iter()
            .filter_map(|name| inner.users.get(name))
            .filter(|u| !u.is_staff && !u.is_superuser)
            .cloned()
            .collect()
    }

    fn certificate_for(&self, user: &UserRecord, key: &CourseKey) -> Option<CertificateRecord> {
        self.inner
            .read()
            .certificates
            .get(&(user.username.clone(), key.clone()))
            .cloned()
    }

    fn has_course_role(&self, user: &UserRecord, key: &CourseKey, role: CourseRole) -> bool {
        self.inner
            .read()
            .roles
            .contains(&(user.username.clone(), key.clone(), role))
    }
}
