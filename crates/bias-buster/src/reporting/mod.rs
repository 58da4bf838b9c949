//! Report generation module.
//!
//! A [`BiasReport`] bundles everything a presentation layer shows for one
//! dataset: validation facts, bias findings and suggestions. It serves:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - plain-text summaries via [`BiasReport::render_text`]
//!
//! # Example
//!
//! ```rust,ignore
//! use bias_buster::reporting::{BiasReport, ReportGenerator};
//!
//! let report = BiasReport::new("train.csv", validation_info, bias_results, suggestions);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("output"));
//! generator.write_report_to_file(&report, "train")?;
//! ```

mod generator;

pub use generator::{BiasReport, ReportGenerator};
