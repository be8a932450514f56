//! # API Route Modules
//!
//! - `credentials`: ELMv3 credential generation: one learner as JSON, or
//!   the whole course as a ZIP archive.

pub mod credentials;
