//! Resolved tabular value consumed by the detector.
//!
//! A [`Table`] is a polars `DataFrame` whose columns have already been sorted
//! into numeric and categorical kinds. Missing values are polars nulls; NaN
//! cells in float columns are counted as missing too.

use crate::config::DEFAULT_NULL_VALUES;
use crate::error::{BiasBusterError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind of a column as seen by the bias analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point values.
    Numeric,
    /// Anything else: strings, booleans, dates, polars categoricals.
    Categorical,
}

impl ColumnKind {
    /// Resolve the kind of a polars data type.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            Self::Numeric
        } else {
            Self::Categorical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check whether a raw cell is one of the recognised missing-value markers.
#[inline]
pub fn is_missing_marker(cell: &str) -> bool {
    cell.is_empty() || DEFAULT_NULL_VALUES.contains(&cell)
}

/// Number of missing cells in a series: nulls, plus NaN for float columns.
pub fn missing_in(series: &Series) -> usize {
    series.null_count() + nan_count(series)
}

fn nan_count(series: &Series) -> usize {
    if !matches!(series.dtype(), DataType::Float32 | DataType::Float64) {
        return 0;
    }

    match series.cast(&DataType::Float64) {
        Ok(floats) => floats
            .f64()
            .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or(0),
        Err(_) => 0,
    }
}

/// A fully materialized table with resolved column kinds.
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
    kinds: Vec<ColumnKind>,
}

impl Table {
    /// Wrap a DataFrame, resolving each column's kind from its dtype.
    pub fn new(df: DataFrame) -> Self {
        let kinds = df
            .get_columns()
            .iter()
            .map(|col| ColumnKind::from_dtype(col.dtype()))
            .collect();
        Self { df, kinds }
    }

    /// A table with no rows and no columns.
    pub fn empty() -> Self {
        Self::new(DataFrame::empty())
    }

    /// Build a table from raw string cells, using the default missing-value
    /// markers (see [`is_missing_marker`]).
    pub fn from_rows<S: AsRef<str>>(headers: &[S], rows: &[Vec<S>]) -> Result<Self> {
        Self::from_rows_with_null_values(headers, rows, &DEFAULT_NULL_VALUES)
    }

    /// Build a table from raw string cells.
    ///
    /// Empty cells and cells equal to one of `null_values` become nulls. A
    /// column is numeric iff every non-missing cell parses as a number.
    /// Headers must be unique and every row must have one cell per header.
    pub fn from_rows_with_null_values<S, N>(
        headers: &[S],
        rows: &[Vec<S>],
        null_values: &[N],
    ) -> Result<Self>
    where
        S: AsRef<str>,
        N: AsRef<str>,
    {
        let mut seen: HashSet<&str> = HashSet::with_capacity(headers.len());
        for header in headers {
            let name = header.as_ref();
            if !seen.insert(name) {
                return Err(BiasBusterError::Validation(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }

        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(BiasBusterError::Validation(format!(
                "row {} has {} cells, expected {}",
                idx + 1,
                row.len(),
                headers.len()
            )));
        }

        let is_missing =
            |cell: &str| cell.is_empty() || null_values.iter().any(|m| m.as_ref() == cell);

        let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let cells: Vec<Option<&str>> = rows
                .iter()
                .map(|row| {
                    let cell = row[idx].as_ref();
                    (!is_missing(cell)).then_some(cell)
                })
                .collect();

            let numeric = cells
                .iter()
                .flatten()
                .all(|cell| cell.parse::<f64>().is_ok());

            let series = if numeric {
                let values: Vec<Option<f64>> = cells
                    .iter()
                    .map(|cell| cell.and_then(|c| c.parse::<f64>().ok()))
                    .collect();
                Series::new(header.as_ref().into(), values)
            } else {
                Series::new(header.as_ref().into(), cells)
            };
            columns.push(series.into());
        }

        Ok(Self::new(DataFrame::new(columns)?))
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    /// Column names with their kinds, in table order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, ColumnKind)> + '_ {
        self.df
            .get_columns()
            .iter()
            .zip(&self.kinds)
            .map(|(col, kind)| (col.name().as_str(), *kind))
    }

    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns()
            .find(|(col_name, _)| *col_name == name)
            .map(|(_, kind)| kind)
    }

    /// Borrow a column as a series.
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.df
            .column(name)
            .ok()
            .map(|col| col.as_materialized_series())
    }

    /// Missing cells in one column, `None` if the column does not exist.
    pub fn missing_count(&self, name: &str) -> Option<usize> {
        self.series(name).map(missing_in)
    }

    /// Missing cells across the whole table.
    pub fn total_missing_cells(&self) -> usize {
        self.df
            .get_columns()
            .iter()
            .map(|col| missing_in(col.as_materialized_series()))
            .sum()
    }

    pub fn as_dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_inner(self) -> DataFrame {
        self.df
    }
}

impl From<DataFrame> for Table {
    fn from(df: DataFrame) -> Self {
        Self::new(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_from_dtypes() {
        let df = df![
            "age" => [21i64, 35, 47],
            "score" => [0.5f64, 0.7, 0.9],
            "city" => ["Oslo", "Lima", "Pune"],
            "active" => [true, false, true],
        ]
        .unwrap();

        let table = Table::new(df);
        let kinds: Vec<_> = table.columns().collect();

        assert_eq!(
            kinds,
            vec![
                ("age", ColumnKind::Numeric),
                ("score", ColumnKind::Numeric),
                ("city", ColumnKind::Categorical),
                ("active", ColumnKind::Categorical),
            ]
        );
        assert_eq!(table.column_kind("city"), Some(ColumnKind::Categorical));
        assert_eq!(table.column_kind("missing"), None);
    }

    #[test]
    fn test_from_rows_infers_kinds_and_missing() {
        let table = Table::from_rows(
            &["id", "label", "amount"],
            &[
                vec!["1", "a", "10.5"],
                vec!["2", "", "NA"],
                vec!["3", "b", "7"],
                vec!["4", "N/A", "x"],
            ],
        )
        .unwrap();

        assert_eq!(table.height(), 4);
        assert_eq!(table.width(), 3);
        assert_eq!(table.column_kind("id"), Some(ColumnKind::Numeric));
        assert_eq!(table.column_kind("label"), Some(ColumnKind::Categorical));
        // "x" does not parse, so the whole column stays categorical
        assert_eq!(table.column_kind("amount"), Some(ColumnKind::Categorical));
        assert_eq!(table.missing_count("label"), Some(2));
        assert_eq!(table.missing_count("amount"), Some(1));
        assert_eq!(table.total_missing_cells(), 3);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = Table::from_rows(&["a", "b"], &[vec!["1", "2"], vec!["3"]]).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_from_rows_rejects_duplicate_headers() {
        let err = Table::from_rows(&["a", "b", "a"], &[vec!["1", "2", "3"]]).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("duplicate column name 'a'"));
    }

    #[test]
    fn test_from_rows_with_custom_null_values() {
        let table = Table::from_rows_with_null_values(
            &["score", "grade"],
            &[vec!["1.5", "?"], vec!["?", "B"], vec!["NA", "A"]],
            &["?"],
        )
        .unwrap();

        // "NA" is not a marker here, so score holds text
        assert_eq!(table.column_kind("score"), Some(ColumnKind::Categorical));
        assert_eq!(table.missing_count("score"), Some(1));
        assert_eq!(table.missing_count("grade"), Some(1));
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let df = df!["x" => [Some(1.0f64), Some(f64::NAN), None, Some(4.0)]].unwrap();
        let table = Table::new(df);
        assert_eq!(table.missing_count("x"), Some(2));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
        assert_eq!(table.total_missing_cells(), 0);
        assert_eq!(table.columns().count(), 0);
    }

    #[test]
    fn test_missing_markers() {
        assert!(is_missing_marker(""));
        assert!(is_missing_marker("NaN"));
        assert!(is_missing_marker("null"));
        assert!(!is_missing_marker("0"));
        assert!(!is_missing_marker("none"));
    }
}
