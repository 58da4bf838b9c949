//! Dataset loading.
//!
//! Turns a CSV file, or the bytes of an uploaded one, into a [`Table`] plus
//! its [`ValidationInfo`]. Column kinds are resolved here, before the table
//! reaches the detector.

mod csv;

pub use csv::read_csv_bytes;

use crate::config::LoaderConfig;
use crate::error::LoadError;
use crate::table::Table;
use crate::types::ValidationInfo;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Loads delimited text into resolved tables.
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    config: LoaderConfig,
}

impl DatasetLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a dataset from disk.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Table, ValidationInfo), LoadError> {
        let path = path.as_ref();
        info!("Loading dataset from: {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
            _ => LoadError::ParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        self.load_bytes(path, bytes)
    }

    /// Load a dataset that is already in memory. `name` is only used for
    /// error messages.
    pub fn load_bytes(
        &self,
        name: impl AsRef<Path>,
        bytes: Vec<u8>,
    ) -> Result<(Table, ValidationInfo), LoadError> {
        let name = name.as_ref();
        debug!("Parsing {} bytes from {}", bytes.len(), name.display());

        let df = read_csv_bytes(name, bytes, &self.config)?;
        let table = Table::new(df);
        let validation_info = ValidationInfo::success(&table);

        info!(
            "Dataset loaded successfully: ({}, {}), {} missing cells",
            validation_info.row_count,
            validation_info.column_count,
            validation_info.total_missing_cells
        );

        Ok((table, validation_info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;
    use crate::types::LoadStatus;

    fn load(content: &str) -> Result<(Table, ValidationInfo), LoadError> {
        DatasetLoader::default().load_bytes("test.csv", content.as_bytes().to_vec())
    }

    #[test]
    fn test_load_resolves_kinds() {
        let (table, info) = load("id,color,price\n1,red,9.5\n2,blue,12.0\n3,red,7.25\n").unwrap();

        assert_eq!(table.column_kind("id"), Some(ColumnKind::Numeric));
        assert_eq!(table.column_kind("color"), Some(ColumnKind::Categorical));
        assert_eq!(table.column_kind("price"), Some(ColumnKind::Numeric));
        assert_eq!(info.row_count, 3);
        assert_eq!(info.column_count, 3);
        assert_eq!(info.total_missing_cells, 0);
        assert_eq!(info.status, LoadStatus::Success);
        assert_eq!(info.message, "Dataset loaded successfully.");
    }

    #[test]
    fn test_load_counts_missing_markers() {
        let (table, info) = load("a,b\n1,x\n,NA\nNaN,y\n4,\n").unwrap();

        assert_eq!(table.column_kind("a"), Some(ColumnKind::Numeric));
        assert_eq!(table.missing_count("a"), Some(2));
        assert_eq!(table.missing_count("b"), Some(2));
        assert_eq!(info.total_missing_cells, 4);
    }

    #[test]
    fn test_mixed_column_is_categorical() {
        let (table, _) = load("code\n1\n2\nthree\n").unwrap();
        assert_eq!(table.column_kind("code"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn test_empty_content_is_empty_file() {
        assert!(matches!(load(""), Err(LoadError::EmptyFile(_))));
        assert!(matches!(load("\n  \n"), Err(LoadError::EmptyFile(_))));
    }

    #[test]
    fn test_extra_fields_is_parse_error() {
        let err = load("a,b\n1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(err, LoadError::ParseError { .. }));
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = DatasetLoader::default()
            .load("definitely/not/here.csv")
            .unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }
}
