//! CSV upload payloads and the local file check
//!
//! Rejection happens here, before the dataset service builds a request.

use crate::error::{ClientError, ValidationError};
use mime::Mime;
use std::path::Path;

/// Message shown for any non-CSV file
pub const CSV_ONLY_MESSAGE: &str = "Only CSV files are supported";

/// MIME types accepted when the picker reports one
pub const ACCEPTED_MIME_TYPES: &[&str] = &["text/csv", "application/vnd.ms-excel"];

/// A file selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name as sent in the multipart part (no directory)
    pub name: String,
    /// MIME type when known
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk. The MIME type is left unknown.
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = std::fs::read(path).map_err(|source| ClientError::Storage {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Accept only `.csv` names; a known MIME type must parse and be a CSV type
    pub fn validate_csv(&self) -> Result<(), ValidationError> {
        if !self.name.to_ascii_lowercase().ends_with(".csv") {
            return Err(ValidationError::for_field("file", CSV_ONLY_MESSAGE));
        }
        if let Some(raw) = &self.mime {
            let parsed: Mime = raw
                .parse()
                .map_err(|_| ValidationError::for_field("file", CSV_ONLY_MESSAGE))?;
            if !ACCEPTED_MIME_TYPES
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(parsed.essence_str()))
            {
                return Err(ValidationError::for_field("file", CSV_ONLY_MESSAGE));
            }
        }
        Ok(())
    }
}
