//! # elmcred-vc — ELMv3 Credential Documents
//!
//! Builds learner credentials in the European Learning Model v3 format
//! (Europass Digital Credentials). Provides:
//!
//! - **Document model** ([`ElmCredential`]) with the fixed ELMv3 node ids,
//!   types and concept schemes, serialized as camelCase JSON.
//! - **Builder** ([`CredentialBuilder`]) turning a course, a learner and
//!   their certificate into a document.
//! - **Defaults resolution** ([`ElmDefaults`]) for the primary language and
//!   the awarding organisation's country.
//! - **Packaging** ([`CredentialArchive`]) of many documents into one ZIP.
//!
//! Documents are generated per request and never stored. Every build gets
//! a fresh `urn:credential:{uuid}` id.

pub mod archive;
pub mod builder;
pub mod error;
pub mod model;
pub mod settings;

pub use archive::CredentialArchive;
pub use builder::CredentialBuilder;
pub use error::VcError;
pub use model::{ElmBody, ElmCredential};
pub use settings::ElmDefaults;
