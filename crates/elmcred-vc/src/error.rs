//! Error types for credential generation and packaging.

use thiserror::Error;

/// Errors raised while rendering or packaging credentials.
#[derive(Error, Debug)]
pub enum VcError {
    /// A document could not be serialized.
    #[error("credential serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The settings file could not be parsed.
    #[error("invalid ELM settings: {0}")]
    Settings(#[from] serde_yaml::Error),

    /// Two archive entries share a filename.
    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),

    /// The ZIP writer failed.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error while writing an archive entry or reading settings.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
