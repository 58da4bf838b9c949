//! CLI entry point for bias detection.

use anyhow::{Result, anyhow};
use bias_buster::{
    BiasBusterConfig, BiasBusterConfigBuilder, BiasPipeline, BiasReport, ReportGenerator,
    SkewnessMethod,
};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// CLI-compatible skewness estimator enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSkewnessMethod {
    /// Population third standardized moment (g1)
    FisherPearson,
    /// Sample-size adjusted coefficient (G1)
    Adjusted,
}

impl From<CliSkewnessMethod> for SkewnessMethod {
    fn from(cli: CliSkewnessMethod) -> Self {
        match cli {
            CliSkewnessMethod::FisherPearson => SkewnessMethod::FisherPearson,
            CliSkewnessMethod::Adjusted => SkewnessMethod::AdjustedFisherPearson,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Detect class imbalance, skew and missing data in CSV datasets",
    long_about = "Scans a CSV dataset for statistical bias signals and suggests mitigations.\n\n\
                  EXAMPLES:\n  \
                  # Human-readable report\n  \
                  bias-buster -i data.csv\n\n  \
                  # Stricter imbalance threshold, JSON to stdout\n  \
                  bias-buster -i data.csv --imbalance-threshold 0.8 --json\n\n  \
                  # Save a JSON report next to other results\n  \
                  bias-buster -i data.csv -r -o results/"
)]
struct Args {
    /// Path to the CSV file to analyse
    #[arg(short, long)]
    input: PathBuf,

    /// JSON configuration file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Majority-class ratio above which a categorical column is imbalanced (0.0 - 1.0)
    #[arg(long)]
    imbalance_threshold: Option<f64>,

    /// Absolute skewness above which a numeric column is flagged
    #[arg(long)]
    skewness_threshold: Option<f64>,

    /// Skewness estimator
    #[arg(long, value_enum)]
    skewness_method: Option<CliSkewnessMethod>,

    /// Largest accepted input file, in bytes
    #[arg(long)]
    max_upload_bytes: Option<u64>,

    /// Run the analyses on separate threads
    #[arg(long)]
    parallel: bool,

    /// Output directory for --emit-report
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only the final JSON report is printed.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout only
/// carries the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let filename = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let size = std::fs::metadata(&args.input)?.len();
    config.upload.check(filename, size)?;

    let pipeline = BiasPipeline::new(config)?;
    let report = match pipeline.analyze_path(&args.input) {
        Ok(report) => report,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return Err(e.into());
        }
    };

    handle_output(&report, &args)
}

/// Merge the optional config file with command-line overrides.
fn build_config(args: &Args) -> Result<BiasBusterConfig> {
    let base = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            BiasBusterConfig::from_json_file(path)?
        }
        None => BiasBusterConfig::default(),
    };

    let mut builder = BiasBusterConfigBuilder::from_config(base);

    if let Some(threshold) = args.imbalance_threshold {
        builder = builder.imbalance_threshold(threshold);
    }
    if let Some(threshold) = args.skewness_threshold {
        builder = builder.skewness_threshold(threshold);
    }
    if let Some(method) = args.skewness_method {
        builder = builder.skewness_method(method.into());
    }
    if let Some(limit) = args.max_upload_bytes {
        builder = builder.max_upload_bytes(limit);
    }
    if args.parallel {
        builder = builder.parallel(true);
    }

    Ok(builder.build()?)
}

/// Handle report output based on CLI flags.
///
/// - Default: human-readable summary to stdout
/// - `--json`: JSON to stdout only
/// - `--emit-report`: also write the JSON report to a file
fn handle_output(report: &BiasReport, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if args.emit_report {
        let generator = ReportGenerator::new(args.output.clone());
        let report_path = generator.write_report_to_file(report, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    print!("{}", report.render_text());
    if !args.emit_report {
        println!("Use --json for machine-readable output");
        println!("Use --emit-report to save a JSON report");
    }

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
