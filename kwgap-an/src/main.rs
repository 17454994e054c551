//! kwgap-an (Keyword Gap Analyzer) - command-line entry point
//!
//! Reads keyword ranking CSV exports for one domain, runs the analysis
//! pipeline and writes `overall.csv`, `pos4to10.csv`, `pos11to30.csv` and
//! the three summary CSVs.
//!
//! Settings come from the command line, then the TOML config file, then
//! built-in defaults.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use kwgap_common::config::{self, LoggingConfig, RuleSource, TomlConfig};
use kwgap_common::AnalysisConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for kwgap-an
#[derive(Parser, Debug)]
#[command(name = "kwgap-an")]
#[command(about = "Keyword gap analysis over keyword ranking CSV exports")]
#[command(version)]
struct Args {
    /// CSV exports to merge (one domain's organic keywords per file)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Domain whose rank and "(pages)" columns are analyzed
    #[arg(short, long, env = "KWGAP_DOMAIN")]
    domain: Option<String>,

    /// Category rules, e.g. "Blog: example.com/blog/, Product: example.com/product"
    #[arg(short, long)]
    categories: Option<String>,

    /// Categorize by first URL directory instead of category rules
    #[arg(long)]
    first_directory: bool,

    /// Keyword pattern rules, e.g. "Brand: amazon, Non-brand: .*"
    #[arg(short, long)]
    patterns: Option<String>,

    /// Label every keyword "non brand"
    #[arg(long)]
    skip_patterns: bool,

    /// Folder for output CSV files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, env = "KWGAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Write the effective settings to this TOML file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

impl Args {
    /// Overlay command-line values on the file settings
    fn apply_to(&self, mut settings: TomlConfig) -> TomlConfig {
        if let Some(domain) = &self.domain {
            settings.domain = Some(domain.clone());
        }
        if let Some(categories) = &self.categories {
            settings.categories = Some(RuleSource::Inline(categories.clone()));
            settings.use_first_directory = false;
        }
        if self.first_directory {
            settings.use_first_directory = true;
        }
        if let Some(patterns) = &self.patterns {
            settings.patterns = Some(RuleSource::Inline(patterns.clone()));
            settings.skip_patterns = false;
        }
        if self.skip_patterns {
            settings.skip_patterns = true;
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            settings.logging.level = level.clone();
        }
        settings
    }
}

/// Initialize tracing: RUST_LOG overrides the configured level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Config file is read before tracing exists; its own log lines are
    // emitted once the subscriber is installed
    let file_settings = match config::resolve_config_path(args.config.as_deref()) {
        Some(path) => Some((
            config::load_toml_config(&path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            path,
        )),
        None => None,
    };
    let settings = args.apply_to(
        file_settings
            .as_ref()
            .map(|(settings, _)| settings.clone())
            .unwrap_or_default(),
    );

    init_tracing(&settings.logging)?;

    info!(
        "Starting kwgap-an v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("KWGAP_GIT_HASH"),
        env!("KWGAP_BUILD_TIMESTAMP"),
        env!("KWGAP_BUILD_PROFILE")
    );
    match &file_settings {
        Some((_, path)) => info!("Configuration file: {}", path.display()),
        None => info!("No configuration file found, using command line and defaults"),
    }

    // Configuration errors abort before any table is read
    let analysis = AnalysisConfig::from_toml(&settings)?;
    info!("Domain: {}", analysis.domain());

    if let Some(path) = &args.save_config {
        config::write_toml_config(&settings, path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
        info!("Saved configuration to {}", path.display());
    }

    let tables = kwgap_an::csv_io::read_tables(&args.files).context("Failed to read CSV exports")?;
    let report = kwgap_an::run(&analysis, &tables)?;

    let output_dir = settings.output_dir.unwrap_or_else(|| PathBuf::from("."));
    let written = kwgap_an::csv_io::write_report(&report, &output_dir)
        .with_context(|| format!("Failed to write results to {}", output_dir.display()))?;
    info!("✓ Wrote {} files to {}", written.len(), output_dir.display());

    Ok(())
}
