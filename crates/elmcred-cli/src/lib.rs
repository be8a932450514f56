//! # elmcred-cli — CLI Tool for the ELM Credentials Service
//!
//! Provides the `elmcred` command-line interface for producing credentials
//! without running the HTTP service, from the same directory fixtures and
//! settings files the server loads.
//!
//! ```bash
//! elmcred generate --directory platform.yaml --course course-v1:edX+DemoX+Demo_Course
//! elmcred generate --directory platform.yaml --course course-v1:edX+DemoX+Demo_Course \
//!     --username john_doe --expires-at 2030-01-01
//! ```

pub mod generate;
