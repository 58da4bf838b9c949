//! Configuration types for bias detection, dataset loading and uploads.
//!
//! Thresholds and limits are explicit values handed to the detector, loader
//! and upload handler at construction time. Use [`BiasBusterConfig::builder()`]
//! for a validated configuration with a fluent API.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default majority-class ratio above which a categorical column is imbalanced.
pub const DEFAULT_IMBALANCE_THRESHOLD: f64 = 0.90;

/// Default absolute skewness above which a numeric column is flagged.
pub const DEFAULT_SKEWNESS_THRESHOLD: f64 = 1.0;

/// Default upload size cap (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Cell values read as missing, in addition to empty fields.
pub const DEFAULT_NULL_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Estimator used for the skewness coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkewnessMethod {
    /// Population third standardized moment, g1 = m3 / m2^1.5.
    #[default]
    FisherPearson,
    /// Sample-size adjusted coefficient, G1 = g1 * sqrt(n(n-1)) / (n-2).
    AdjustedFisherPearson,
}

/// Settings consumed by [`BiasDetector`](crate::detector::BiasDetector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Majority-class ratio a categorical column must strictly exceed to be
    /// reported as imbalanced (0.0 - 1.0).
    /// Default: 0.90
    pub imbalance_threshold: f64,

    /// Absolute skewness a numeric column must strictly exceed to be reported.
    /// Default: 1.0
    pub skewness_threshold: f64,

    /// Skewness estimator.
    /// Default: FisherPearson
    pub skewness_method: SkewnessMethod,

    /// Run the three analyses on scoped threads.
    /// Default: false
    pub parallel: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            imbalance_threshold: DEFAULT_IMBALANCE_THRESHOLD,
            skewness_threshold: DEFAULT_SKEWNESS_THRESHOLD,
            skewness_method: SkewnessMethod::default(),
            parallel: false,
        }
    }
}

/// Settings consumed by [`DatasetLoader`](crate::loader::DatasetLoader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Cell values treated as missing. Empty fields are always missing.
    pub null_values: Vec<String>,

    /// Field separator.
    /// Default: b','
    pub separator: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
            separator: b',',
        }
    }
}

/// Rules applied to an uploaded file before it is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    /// Lower-case file name suffixes accepted (without the dot).
    /// Default: ["csv"]
    pub allowed_extensions: Vec<String>,

    /// Maximum accepted payload size in bytes.
    /// Default: 16 MiB
    pub max_upload_bytes: u64,

    /// Directory uploaded files are staged in while being processed.
    /// Default: "uploads"
    pub upload_dir: PathBuf,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["csv".to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

/// Top-level configuration.
///
/// # Example
///
/// ```rust,ignore
/// use bias_buster::config::{BiasBusterConfig, SkewnessMethod};
///
/// let config = BiasBusterConfig::builder()
///     .imbalance_threshold(0.8)
///     .skewness_method(SkewnessMethod::AdjustedFisherPearson)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasBusterConfig {
    pub detector: DetectorConfig,
    pub loader: LoaderConfig,
    pub upload: UploadPolicy,
}

impl BiasBusterConfig {
    /// Create a new configuration builder.
    pub fn builder() -> BiasBusterConfigBuilder {
        BiasBusterConfigBuilder::default()
    }

    /// Read a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let imbalance = self.detector.imbalance_threshold;
        if !(0.0..=1.0).contains(&imbalance) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "imbalance_threshold".to_string(),
                value: imbalance,
            });
        }

        let skewness = self.detector.skewness_threshold;
        if !skewness.is_finite() || skewness < 0.0 {
            return Err(ConfigValidationError::InvalidSkewnessThreshold(skewness));
        }

        if self.upload.max_upload_bytes == 0 {
            return Err(ConfigValidationError::InvalidUploadLimit);
        }

        if self.upload.allowed_extensions.is_empty() {
            return Err(ConfigValidationError::NoAllowedExtensions);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid skewness threshold: {0} (must be a finite, non-negative number)")]
    InvalidSkewnessThreshold(f64),

    #[error("Invalid upload limit: max_upload_bytes must be at least 1")]
    InvalidUploadLimit,

    #[error("At least one allowed file extension is required")]
    NoAllowedExtensions,
}

/// Builder for [`BiasBusterConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct BiasBusterConfigBuilder {
    imbalance_threshold: Option<f64>,
    skewness_threshold: Option<f64>,
    skewness_method: Option<SkewnessMethod>,
    parallel: Option<bool>,
    null_values: Option<Vec<String>>,
    separator: Option<u8>,
    allowed_extensions: Option<Vec<String>>,
    max_upload_bytes: Option<u64>,
    upload_dir: Option<PathBuf>,
}

impl BiasBusterConfigBuilder {
    /// Start from an existing configuration; builder setters override it.
    pub fn from_config(config: BiasBusterConfig) -> Self {
        Self {
            imbalance_threshold: Some(config.detector.imbalance_threshold),
            skewness_threshold: Some(config.detector.skewness_threshold),
            skewness_method: Some(config.detector.skewness_method),
            parallel: Some(config.detector.parallel),
            null_values: Some(config.loader.null_values),
            separator: Some(config.loader.separator),
            allowed_extensions: Some(config.upload.allowed_extensions),
            max_upload_bytes: Some(config.upload.max_upload_bytes),
            upload_dir: Some(config.upload.upload_dir),
        }
    }

    /// Set the majority-class ratio above which a column is imbalanced.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.9 = 90%)
    pub fn imbalance_threshold(mut self, threshold: f64) -> Self {
        self.imbalance_threshold = Some(threshold);
        self
    }

    /// Set the absolute skewness above which a column is flagged.
    pub fn skewness_threshold(mut self, threshold: f64) -> Self {
        self.skewness_threshold = Some(threshold);
        self
    }

    pub fn skewness_method(mut self, method: SkewnessMethod) -> Self {
        self.skewness_method = Some(method);
        self
    }

    /// Enable or disable running the analyses on separate threads.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Replace the set of cell values read as missing.
    pub fn null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Replace the set of accepted upload file extensions.
    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = Some(
            extensions
                .into_iter()
                .map(|e| Into::<String>::into(e).trim_start_matches('.').to_lowercase())
                .collect(),
        );
        self
    }

    /// Set the upload size cap in bytes.
    pub fn max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = Some(limit);
        self
    }

    /// Set the directory uploads are staged in.
    pub fn upload_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.upload_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `BiasBusterConfig` or an error if validation fails.
    pub fn build(self) -> Result<BiasBusterConfig, ConfigValidationError> {
        let loader_defaults = LoaderConfig::default();
        let upload_defaults = UploadPolicy::default();

        let config = BiasBusterConfig {
            detector: DetectorConfig {
                imbalance_threshold: self
                    .imbalance_threshold
                    .unwrap_or(DEFAULT_IMBALANCE_THRESHOLD),
                skewness_threshold: self.skewness_threshold.unwrap_or(DEFAULT_SKEWNESS_THRESHOLD),
                skewness_method: self.skewness_method.unwrap_or_default(),
                parallel: self.parallel.unwrap_or(false),
            },
            loader: LoaderConfig {
                null_values: self.null_values.unwrap_or(loader_defaults.null_values),
                separator: self.separator.unwrap_or(loader_defaults.separator),
            },
            upload: UploadPolicy {
                allowed_extensions: self
                    .allowed_extensions
                    .unwrap_or(upload_defaults.allowed_extensions),
                max_upload_bytes: self
                    .max_upload_bytes
                    .unwrap_or(upload_defaults.max_upload_bytes),
                upload_dir: self.upload_dir.unwrap_or(upload_defaults.upload_dir),
            },
        };

        config.validate()?;
        Ok(config)
    }
}
