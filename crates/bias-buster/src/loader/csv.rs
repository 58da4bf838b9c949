//! CSV parsing on top of polars.

use crate::config::LoaderConfig;
use crate::error::LoadError;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Parse CSV bytes into a DataFrame.
///
/// - `with_has_header(true)` - first row holds column names
/// - `with_infer_schema_length(None)` - every row takes part in type
///   inference, so a column is numeric only if all its cells are
/// - configured null markers become nulls in every column
pub fn read_csv_bytes(
    name: &Path,
    bytes: Vec<u8>,
    config: &LoaderConfig,
) -> Result<DataFrame, LoadError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::EmptyFile(name.to_path_buf()));
    }

    let null_values = (!config.null_values.is_empty()).then(|| {
        NullValues::AllColumns(
            config
                .null_values
                .iter()
                .map(|v| PlSmallStr::from(v.as_str()))
                .collect(),
        )
    });

    let parse_options = CsvParseOptions::default()
        .with_separator(config.separator)
        .with_quote_char(Some(b'"'))
        .with_null_values(null_values);

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| {
            debug!("CSV parsing failed for {}: {}", name.display(), e);
            LoadError::ParseError {
                path: name.to_path_buf(),
                reason: e.to_string(),
            }
        })
}
