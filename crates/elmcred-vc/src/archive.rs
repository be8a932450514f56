//! # Credential Archive
//!
//! Packs rendered credential documents into a single in-memory ZIP for
//! download. Entries are written in insertion order, deflated, one
//! JSON file per learner named by [`elmcred_core::credential_filename`].

use std::collections::HashSet;
use std::io::{Cursor, Write};

use elmcred_core::credential_filename;
use zip::{write::FileOptions, CompressionMethod};

use crate::error::VcError;
use crate::model::ElmCredential;

/// An archive under construction.
#[derive(Debug, Default)]
pub struct CredentialArchive {
    entries: Vec<(String, String)>,
    names: HashSet<String>,
}

impl CredentialArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw entry. Filenames must be unique within the archive.
    pub fn push(&mut self, name: impl Into<String>, json: String) -> Result<(), VcError> {
        let name = name.into();
        if !self.names.insert(name.clone()) {
            return Err(VcError::DuplicateEntry(name));
        }
        self.entries.push((name, json));
        Ok(())
    }

    /// Render a credential and add it under its standard filename.
    pub fn add_credential(
        &mut self,
        username: &str,
        course_id: &str,
        credential: &ElmCredential,
    ) -> Result<(), VcError> {
        let json = credential.to_json_pretty()?;
        self.push(credential_filename(username, course_id), json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Write the ZIP and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>, VcError> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, json) in &self.entries {
            zip.start_file(name, options)?;
            zip.write_all(json.as_bytes())?;
        }

        Ok(zip.finish()?.into_inner())
    }
}
