//! Mitigation advice for detected biases.
//!
//! Each finding category maps to a fixed text template:
//! - imbalance finding → one `resampling` entry per column
//! - distribution finding → one `feature_engineering` entry per column
//! - missing-data aggregate → a single `data_imputation` entry

mod templates;

use crate::types::{BiasResults, Suggestions};
use tracing::debug;

/// Turns [`BiasResults`] into [`Suggestions`]. Pure and total.
pub struct SuggestionGenerator;

impl SuggestionGenerator {
    pub fn generate(results: &BiasResults) -> Suggestions {
        let resampling = results
            .imbalance_analysis
            .iter()
            .map(|finding| templates::resampling(&finding.column))
            .collect();

        let feature_engineering = results
            .distribution_analysis
            .iter()
            .map(|finding| templates::feature_engineering(&finding.column, finding.skewness))
            .collect();

        let missing = &results.missing_data_analysis;
        let data_imputation = if missing.has_missing_data && !missing.details.is_empty() {
            let columns: Vec<&str> = missing.columns().collect();
            vec![templates::data_imputation(&columns)]
        } else {
            Vec::new()
        };

        let suggestions = Suggestions {
            resampling,
            feature_engineering,
            data_imputation,
        };
        debug!("Generated {} suggestion(s)", suggestions.len());

        suggestions
    }
}
