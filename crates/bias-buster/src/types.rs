//! Value objects produced by the loader, the detector and the suggestion
//! generator. All of them round-trip through JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Outcome of a dataset load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Success,
    Failure,
}

/// Shape and completeness facts gathered once per load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationInfo {
    pub row_count: usize,
    pub column_count: usize,
    pub total_missing_cells: usize,
    pub status: LoadStatus,
    pub message: String,
}

impl ValidationInfo {
    /// Describe a successfully loaded table.
    pub fn success(table: &Table) -> Self {
        Self {
            row_count: table.height(),
            column_count: table.width(),
            total_missing_cells: table.total_missing_cells(),
            status: LoadStatus::Success,
            message: "Dataset loaded successfully.".to_string(),
        }
    }

    /// Describe a failed load, for hosts that display failures as records.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            row_count: 0,
            column_count: 0,
            total_missing_cells: 0,
            status: LoadStatus::Failure,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == LoadStatus::Success
    }
}

/// A categorical column dominated by one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceFinding {
    pub column: String,
    pub majority_class: String,
    pub majority_ratio: f64,
    pub minority_class: String,
    pub minority_ratio: f64,
}

/// A numeric column whose skewness exceeds the threshold. The sign is kept:
/// positive means a long right tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionFinding {
    pub column: String,
    pub skewness: f64,
}

/// Missing-value summary over the whole table.
///
/// `details` holds only columns with at least one missing cell, in table
/// column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDataFinding {
    pub has_missing_data: bool,
    pub details: IndexMap<String, usize>,
}

impl MissingDataFinding {
    /// Build the aggregate from per-column counts, dropping zero counts.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let details: IndexMap<String, usize> = counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(name, count)| (name.into(), count))
            .collect();

        Self {
            has_missing_data: !details.is_empty(),
            details,
        }
    }

    /// Column names with missing values, in table order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.details.keys().map(String::as_str)
    }
}

/// Everything one detection run found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiasResults {
    pub imbalance_analysis: Vec<ImbalanceFinding>,
    pub distribution_analysis: Vec<DistributionFinding>,
    pub missing_data_analysis: MissingDataFinding,
}

impl BiasResults {
    /// True when no analysis reported anything.
    pub fn is_clean(&self) -> bool {
        self.imbalance_analysis.is_empty()
            && self.distribution_analysis.is_empty()
            && !self.missing_data_analysis.has_missing_data
    }

    /// Number of findings, counting the missing-data aggregate once.
    pub fn finding_count(&self) -> usize {
        self.imbalance_analysis.len()
            + self.distribution_analysis.len()
            + usize::from(self.missing_data_analysis.has_missing_data)
    }
}

/// Remediation advice grouped by kind of action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub resampling: Vec<String>,
    pub feature_engineering: Vec<String>,
    pub data_imputation: Vec<String>,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.resampling.is_empty()
            && self.feature_engineering.is_empty()
            && self.data_imputation.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resampling.len() + self.feature_engineering.len() + self.data_imputation.len()
    }
}
