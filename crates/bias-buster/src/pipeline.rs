//! Load → detect → suggest.
//!
//! [`BiasPipeline`] wires the loader, the detector and the suggestion
//! generator together. A load failure aborts the run before detection and is
//! returned unchanged.

use crate::config::BiasBusterConfig;
use crate::detector::BiasDetector;
use crate::error::{LoadError, Result};
use crate::loader::DatasetLoader;
use crate::reporting::BiasReport;
use crate::suggestions::SuggestionGenerator;
use crate::table::Table;
use crate::types::ValidationInfo;
use std::path::Path;
use tracing::info;

/// The full analysis pipeline for one dataset.
#[derive(Debug, Clone, Default)]
pub struct BiasPipeline {
    config: BiasBusterConfig,
    loader: DatasetLoader,
    detector: BiasDetector,
}

impl BiasPipeline {
    /// Build a pipeline from a configuration, validating it first.
    pub fn new(config: BiasBusterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            loader: DatasetLoader::new(config.loader.clone()),
            detector: BiasDetector::new(config.detector.clone()),
            config,
        })
    }

    pub fn config(&self) -> &BiasBusterConfig {
        &self.config
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    pub fn detector(&self) -> &BiasDetector {
        &self.detector
    }

    /// Analyse a CSV file on disk.
    pub fn analyze_path(&self, path: impl AsRef<Path>) -> std::result::Result<BiasReport, LoadError> {
        let path = path.as_ref();
        let (table, validation_info) = self.loader.load(path)?;
        Ok(self.analyze_table(display_name(path), &table, validation_info))
    }

    /// Analyse CSV bytes already in memory.
    pub fn analyze_bytes(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> std::result::Result<BiasReport, LoadError> {
        let (table, validation_info) = self.loader.load_bytes(filename, bytes)?;
        Ok(self.analyze_table(filename, &table, validation_info))
    }

    /// Analyse a table that is already loaded.
    pub fn analyze_table(
        &self,
        filename: impl Into<String>,
        table: &Table,
        validation_info: ValidationInfo,
    ) -> BiasReport {
        let filename = filename.into();
        info!("Analysing '{}'", filename);

        let bias_results = self.detector.detect(table);
        let suggestions = SuggestionGenerator::generate(&bias_results);

        BiasReport::new(filename, validation_info, bias_results, suggestions)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
