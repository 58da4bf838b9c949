//! Error types for dataset loading, configuration and upload handling.
//!
//! Detection itself has no error kind: the detector is total over any
//! resolved [`Table`](crate::table::Table). Everything that can fail happens
//! before it (loading, validating configuration, accepting an upload).
//!
//! Errors are serializable so a host can hand them to a frontend as
//! `{ "code": ..., "message": ... }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// Failure to turn a file (or uploaded bytes) into a [`Table`](crate::table::Table).
///
/// This is a closed set so callers can branch on the failure kind instead of
/// matching on message text.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source does not exist.
    #[error("File not found at path: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The source exists but holds no data at all.
    #[error("The uploaded file is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    /// The source could not be read or parsed as a delimited table.
    #[error("An error occurred while reading the CSV file {}: {reason}", .path.display())]
    ParseError { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::EmptyFile(_) => "EMPTY_FILE",
            Self::ParseError { .. } => "PARSE_ERROR",
        }
    }

    /// Path of the source that failed to load.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::FileNotFound(path) | Self::EmptyFile(path) => path,
            Self::ParseError { path, .. } => path,
        }
    }
}

/// The main error type of the crate.
#[derive(Error, Debug)]
pub enum BiasBusterError {
    /// Dataset could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// A table failed a structural check (e.g. ragged rows, duplicate headers).
    #[error("Invalid table: {0}")]
    Validation(String),

    /// Upload request carried no file name.
    #[error("No selected file. Please choose a CSV file to upload.")]
    NoFileSelected,

    /// Upload file name has an extension outside the allowed set.
    #[error("File type not allowed: '{filename}' (allowed: {allowed})")]
    UnsupportedExtension { filename: String, allowed: String },

    /// Upload payload exceeds the configured size cap.
    #[error("File is too large: {size} bytes (limit: {limit} bytes)")]
    UploadTooLarge { size: u64, limit: u64 },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<BiasBusterError>,
    },
}

impl BiasBusterError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        BiasBusterError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load(e) => e.error_code(),
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NoFileSelected => "NO_FILE_SELECTED",
            Self::UnsupportedExtension { .. } => "UNSUPPORTED_EXTENSION",
            Self::UploadTooLarge { .. } => "UPLOAD_TOO_LARGE",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was raised while rejecting an upload request,
    /// i.e. before any data was read.
    pub fn is_rejected_upload(&self) -> bool {
        match self {
            Self::NoFileSelected | Self::UnsupportedExtension { .. } | Self::UploadTooLarge { .. } => {
                true
            }
            Self::WithContext { source, .. } => source.is_rejected_upload(),
            _ => false,
        }
    }
}

impl Serialize for BiasBusterError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("BiasBusterError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, BiasBusterError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| BiasBusterError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_codes() {
        assert_eq!(
            LoadError::FileNotFound(PathBuf::from("a.csv")).error_code(),
            "FILE_NOT_FOUND"
        );
        assert_eq!(
            LoadError::EmptyFile(PathBuf::from("a.csv")).error_code(),
            "EMPTY_FILE"
        );
        let parse = LoadError::ParseError {
            path: PathBuf::from("a.csv"),
            reason: "bad quote".to_string(),
        };
        assert_eq!(parse.error_code(), "PARSE_ERROR");
        assert_eq!(parse.path(), &PathBuf::from("a.csv"));
    }

    #[test]
    fn test_load_error_propagates_code() {
        let error: BiasBusterError = LoadError::EmptyFile(PathBuf::from("a.csv")).into();
        assert_eq!(error.error_code(), "EMPTY_FILE");
        assert!(error.to_string().contains("empty"));
    }

    #[test]
    fn test_is_rejected_upload() {
        assert!(BiasBusterError::NoFileSelected.is_rejected_upload());
        assert!(
            BiasBusterError::UploadTooLarge { size: 10, limit: 5 }
                .with_context("upload")
                .is_rejected_upload()
        );
        assert!(!BiasBusterError::Validation("x".to_string()).is_rejected_upload());
    }

    #[test]
    fn test_error_serialization() {
        let error = BiasBusterError::UnsupportedExtension {
            filename: "data.xlsx".to_string(),
            allowed: "csv".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNSUPPORTED_EXTENSION"));
        assert!(json.contains("data.xlsx"));
    }

    #[test]
    fn test_with_context() {
        let error = BiasBusterError::NoFileSelected.with_context("During upload");
        assert!(error.to_string().contains("During upload"));
        assert_eq!(error.error_code(), "NO_FILE_SELECTED");
    }
}
