//! Bias Buster
//!
//! Statistical bias detection for tabular datasets, built on Polars.
//!
//! # Overview
//!
//! The library inspects a loaded table and reports:
//!
//! - **Class imbalance**: categorical columns where one value dominates
//! - **Skewed distributions**: numeric columns with large absolute skewness
//! - **Missing data**: which columns have missing cells, and how many
//!
//! Findings are then turned into plain-text mitigation advice (resampling,
//! feature transformations, imputation). Nothing is ever applied to the data.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bias_buster::{BiasBusterConfig, BiasPipeline};
//!
//! let config = BiasBusterConfig::builder()
//!     .imbalance_threshold(0.9)
//!     .skewness_threshold(1.0)
//!     .build()?;
//!
//! let report = BiasPipeline::new(config)?.analyze_path("data.csv")?;
//!
//! for finding in &report.bias_results.imbalance_analysis {
//!     println!("{} is dominated by '{}'", finding.column, finding.majority_class);
//! }
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! # Using the pieces directly
//!
//! ```rust,ignore
//! use bias_buster::{BiasDetector, DatasetLoader, SuggestionGenerator};
//!
//! let (table, validation_info) = DatasetLoader::default().load("data.csv")?;
//! let results = BiasDetector::default().detect(&table);
//! let suggestions = SuggestionGenerator::generate(&results);
//! ```
//!
//! # Uploads
//!
//! [`UploadHandler`] applies the extension and size rules of an
//! [`UploadPolicy`], stages the file, analyses it and deletes it again.

pub mod config;
pub mod detector;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod suggestions;
pub mod table;
pub mod types;
pub mod upload;

// Re-exports for convenient access
pub use config::{
    BiasBusterConfig, BiasBusterConfigBuilder, ConfigValidationError, DetectorConfig,
    LoaderConfig, SkewnessMethod, UploadPolicy,
};
pub use detector::BiasDetector;
pub use error::{BiasBusterError, LoadError, Result as BiasBusterResult, ResultExt};
pub use loader::DatasetLoader;
pub use pipeline::BiasPipeline;
pub use reporting::{BiasReport, ReportGenerator};
pub use suggestions::SuggestionGenerator;
pub use table::{ColumnKind, Table};
pub use types::{
    BiasResults, DistributionFinding, ImbalanceFinding, LoadStatus, MissingDataFinding,
    Suggestions, ValidationInfo,
};
pub use upload::{UploadHandler, secure_filename};
