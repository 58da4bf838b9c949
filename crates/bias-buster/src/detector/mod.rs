//! Bias detection engine.
//!
//! Runs three independent analyses over a resolved [`Table`]:
//! - **Imbalance**: categorical columns dominated by a single value
//! - **Distribution**: numeric columns with large absolute skewness
//! - **Missing data**: per-column missing counts, aggregated once
//!
//! Detection never fails. Degenerate input (no rows, no columns, all-missing
//! columns) yields empty findings. Output order follows the table's column
//! order, so repeated runs over the same table are identical.

mod statistics;

use crate::config::DetectorConfig;
use crate::table::{ColumnKind, Table, missing_in};
use crate::types::{BiasResults, DistributionFinding, ImbalanceFinding, MissingDataFinding};
use statistics::{class_frequencies, finite_values, majority_and_minority, skewness};
use tracing::{debug, info, warn};

/// Computes bias findings for a table.
#[derive(Debug, Clone, Default)]
pub struct BiasDetector {
    config: DetectorConfig,
}

impl BiasDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run all analyses and collect their findings.
    ///
    /// With `parallel` enabled each analysis runs on its own scoped thread;
    /// the output is the same either way.
    pub fn detect(&self, table: &Table) -> BiasResults {
        info!(
            "Detecting biases in table of shape ({}, {})",
            table.height(),
            table.width()
        );

        let results = if self.config.parallel {
            std::thread::scope(|s| {
                let imbalance = s.spawn(|| self.analyze_imbalance(table));
                let distribution = s.spawn(|| self.analyze_distribution(table));
                let missing = s.spawn(|| self.analyze_missing_data(table));

                BiasResults {
                    imbalance_analysis: imbalance
                        .join()
                        .unwrap_or_else(|e| std::panic::resume_unwind(e)),
                    distribution_analysis: distribution
                        .join()
                        .unwrap_or_else(|e| std::panic::resume_unwind(e)),
                    missing_data_analysis: missing
                        .join()
                        .unwrap_or_else(|e| std::panic::resume_unwind(e)),
                }
            })
        } else {
            BiasResults {
                imbalance_analysis: self.analyze_imbalance(table),
                distribution_analysis: self.analyze_distribution(table),
                missing_data_analysis: self.analyze_missing_data(table),
            }
        };

        info!(
            "Detection complete: {} imbalanced, {} skewed, {} with missing values",
            results.imbalance_analysis.len(),
            results.distribution_analysis.len(),
            results.missing_data_analysis.details.len()
        );

        results
    }

    /// Categorical columns whose majority-class ratio strictly exceeds the
    /// imbalance threshold. Numeric columns are never considered.
    pub fn analyze_imbalance(&self, table: &Table) -> Vec<ImbalanceFinding> {
        let mut findings = Vec::new();

        for (name, kind) in table.columns() {
            if kind != ColumnKind::Categorical {
                continue;
            }
            let Some(series) = table.series(name) else {
                continue;
            };

            let counts = match class_frequencies(series) {
                Ok(counts) => counts,
                Err(e) => {
                    warn!("Skipping imbalance check for '{}': {}", name, e);
                    continue;
                }
            };

            if counts.len() < 2 {
                debug!(
                    "'{}' has {} distinct value(s), imbalance undefined",
                    name,
                    counts.len()
                );
                continue;
            }

            let total: usize = counts.values().sum();
            let Some(((majority, majority_count), (minority, minority_count))) =
                majority_and_minority(&counts)
            else {
                continue;
            };

            let majority_ratio = majority_count as f64 / total as f64;
            debug!("'{}' majority '{}' ratio {:.4}", name, majority, majority_ratio);

            if majority_ratio > self.config.imbalance_threshold {
                findings.push(ImbalanceFinding {
                    column: name.to_string(),
                    majority_class: majority.to_string(),
                    majority_ratio,
                    minority_class: minority.to_string(),
                    minority_ratio: minority_count as f64 / total as f64,
                });
            }
        }

        findings
    }

    /// Numeric columns whose absolute skewness strictly exceeds the skewness
    /// threshold. The reported value keeps its sign.
    pub fn analyze_distribution(&self, table: &Table) -> Vec<DistributionFinding> {
        let mut findings = Vec::new();

        for (name, kind) in table.columns() {
            if kind != ColumnKind::Numeric {
                continue;
            }
            let Some(series) = table.series(name) else {
                continue;
            };

            let values = match finite_values(series) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Skipping distribution check for '{}': {}", name, e);
                    continue;
                }
            };

            let Some(skew) = skewness(&values, self.config.skewness_method) else {
                debug!(
                    "'{}' skewness undefined ({} usable values)",
                    name,
                    values.len()
                );
                continue;
            };

            debug!("'{}' skewness {:.4}", name, skew);

            if skew.abs() > self.config.skewness_threshold {
                findings.push(DistributionFinding {
                    column: name.to_string(),
                    skewness: skew,
                });
            }
        }

        findings
    }

    /// Missing-value counts for every column that has any.
    pub fn analyze_missing_data(&self, table: &Table) -> MissingDataFinding {
        MissingDataFinding::from_counts(table.columns().filter_map(|(name, _)| {
            table.series(name).map(|series| (name, missing_in(series)))
        }))
    }
}
