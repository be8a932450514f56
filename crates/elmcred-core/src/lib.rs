//! # elmcred-core — Foundational Types for the ELM Credentials Service
//!
//! This crate is the leaf of the workspace dependency graph. It defines the
//! identifiers, timestamps and naming rules shared by the credential
//! generator, the packaging layer and the HTTP API, plus the port through
//! which the service reads the learning platform.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtypes for identifiers.** `CourseKey` and `Username`
//!    can only be built through checked constructors. No bare strings for
//!    course identifiers cross a crate boundary.
//!
//! 2. **UTC-only timestamps.** [`Timestamp`] is always UTC with seconds
//!    precision and renders as `YYYY-MM-DDTHH:MM:SS+00:00`.
//!
//! 3. **One naming module.** Every credential and archive filename is
//!    produced by [`naming`], so single and bulk downloads agree.
//!
//! 4. **Platform access through a trait.** [`PlatformDirectory`] is the
//!    only way the service learns about courses, learners, certificates
//!    and course roles.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `elmcred-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod memory;
pub mod naming;
pub mod platform;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use identity::{CourseKey, Username};
pub use memory::{DirectoryFixture, InMemoryDirectory};
pub use naming::{archive_filename, credential_filename, split_full_name};
pub use platform::{
    CertificateRecord, CourseElmSettings, CourseRecord, CourseRole, PlatformDirectory, UserRecord,
};
pub use temporal::Timestamp;
