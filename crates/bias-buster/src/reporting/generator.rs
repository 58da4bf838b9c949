use crate::error::{Result, ResultExt};
use crate::types::{BiasResults, Suggestions, ValidationInfo};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Presentation payload for one analysed dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Name of the analysed file
    pub filename: String,
    pub validation_info: ValidationInfo,
    pub bias_results: BiasResults,
    pub suggestions: Suggestions,
}

impl BiasReport {
    pub fn new(
        filename: impl Into<String>,
        validation_info: ValidationInfo,
        bias_results: BiasResults,
        suggestions: Suggestions,
    ) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            filename: filename.into(),
            validation_info,
            bias_results,
            suggestions,
        }
    }

    /// Human-readable summary of the report.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BiasReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(80);
        let sub_rule = "-".repeat(40);
        let info = &self.validation_info;
        let results = &self.bias_results;

        writeln!(f, "{rule}")?;
        writeln!(f, "BIAS REPORT: {}", self.filename)?;
        writeln!(f, "{rule}\n")?;

        writeln!(f, "DATASET OVERVIEW\n{sub_rule}")?;
        writeln!(f, "  Rows: {}", info.row_count)?;
        writeln!(f, "  Columns: {}", info.column_count)?;
        writeln!(f, "  Missing cells: {}", info.total_missing_cells)?;
        writeln!(f, "  Status: {:?} ({})\n", info.status, info.message)?;

        writeln!(f, "CLASS IMBALANCE\n{sub_rule}")?;
        if results.imbalance_analysis.is_empty() {
            writeln!(f, "  No imbalanced categorical columns")?;
        }
        for finding in &results.imbalance_analysis {
            writeln!(
                f,
                "  - {}: '{}' {:.1}% vs '{}' {:.1}%",
                finding.column,
                finding.majority_class,
                finding.majority_ratio * 100.0,
                finding.minority_class,
                finding.minority_ratio * 100.0
            )?;
        }
        writeln!(f)?;

        writeln!(f, "SKEWED DISTRIBUTIONS\n{sub_rule}")?;
        if results.distribution_analysis.is_empty() {
            writeln!(f, "  No highly skewed numeric columns")?;
        }
        for finding in &results.distribution_analysis {
            writeln!(f, "  - {}: skewness {:.2}", finding.column, finding.skewness)?;
        }
        writeln!(f)?;

        writeln!(f, "MISSING DATA\n{sub_rule}")?;
        if !results.missing_data_analysis.has_missing_data {
            writeln!(f, "  No missing values")?;
        }
        for (column, count) in &results.missing_data_analysis.details {
            writeln!(f, "  - {column}: {count} missing")?;
        }
        writeln!(f)?;

        writeln!(f, "SUGGESTIONS\n{sub_rule}")?;
        if self.suggestions.is_empty() {
            writeln!(f, "  No mitigation needed")?;
        }
        for (heading, items) in [
            ("Resampling", &self.suggestions.resampling),
            ("Feature engineering", &self.suggestions.feature_engineering),
            ("Data imputation", &self.suggestions.data_imputation),
        ] {
            if items.is_empty() {
                continue;
            }
            writeln!(f, "  {heading}:")?;
            for item in items {
                writeln!(f, "    * {item}")?;
            }
        }
        writeln!(f, "{rule}")
    }
}

/// Writes reports to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(PathBuf::from("output"))
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write a report as pretty JSON.
    ///
    /// The file is named after `report_base_name`: "train" becomes
    /// "train_report.json".
    pub fn write_report_to_file(
        &self,
        report: &BiasReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).context("Creating report directory")?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path).context("Creating report file")?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
