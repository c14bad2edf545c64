//! srtify
//!
//! Converts speech-to-text transcript JSON files found below a directory
//! into SubRip (or WebVTT) subtitles written next to each input.

mod batch;
mod config;
mod config_file;
mod error;
mod report;
mod subtitle;
mod transcript;


use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::batch::BatchConverter;
use crate::config::{ConverterConfig, SubtitleFormat};
use crate::config_file::ConfigFile;
use crate::error::{ConvertError, Result};
use crate::report::Reporter;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "srtify";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory to scan for transcript JSON files
    directory: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subtitle format to write
    #[arg(short, long, value_enum)]
    format: Option<SubtitleFormat>,

    /// Maximum number of words per caption
    #[arg(short, long)]
    words_per_cue: Option<usize>,

    /// Never emit speaker labels
    #[arg(long)]
    no_speaker_labels: bool,

    /// Disable colored console output
    #[arg(long)]
    no_color: bool,

    /// Convert and report without writing files
    #[arg(long)]
    dry_run: bool,

    /// Write a default configuration file to PATH and exit
    #[arg(long, value_name = "PATH")]
    generate_config: Option<PathBuf>,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }
    let reporter = if args.quiet {
        Reporter::quiet()
    } else {
        Reporter::new()
    };

    let (config, config_error) = load_config(&args);
    init_logging(&config.log_level, args.verbose);
    tracing::debug!("{} v{} starting", APP_NAME, VERSION);

    if let Some(e) = config_error {
        tracing::warn!("{}. Using defaults.", e);
    }

    match run(&args, config, reporter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_usage() => {
            reporter.usage_error(&e);
            ExitCode::FAILURE
        }
        Err(e) => {
            reporter.critical(&e);
            ExitCode::FAILURE
        }
    }
}

/// Everything after logging is up; per-file failures never surface here
async fn run(args: &Args, config: ConverterConfig, reporter: Reporter) -> Result<()> {
    if let Some(path) = &args.generate_config {
        config_file::generate_default_config(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = apply_overrides(config, args)?;
    tracing::debug!("Configuration loaded: {:?}", config);

    let root = resolve_root(args.directory.as_deref())?;
    let summary = BatchConverter::new(config, reporter).run(&root).await?;
    tracing::debug!(
        "Batch finished: {} discovered, {} converted, {} skipped, {} failed",
        summary.discovered,
        summary.converted,
        summary.skipped,
        summary.failed
    );
    Ok(())
}

/// Load the config file named on the command line, if any
///
/// A broken file is not fatal: the error is handed back for logging once the
/// subscriber is up and defaults are used instead.
fn load_config(args: &Args) -> (ConverterConfig, Option<ConvertError>) {
    let Some(path) = &args.config else {
        return (ConverterConfig::default(), None);
    };

    match ConfigFile::from_file(path).and_then(ConfigFile::into_converter_config) {
        Ok(config) => (config, None),
        Err(e) => (
            ConverterConfig::default(),
            Some(ConvertError::Config(format!(
                "Failed to load config file {}: {}",
                path.display(),
                e
            ))),
        ),
    }
}

/// Command-line flags take precedence over the config file
fn apply_overrides(mut config: ConverterConfig, args: &Args) -> Result<ConverterConfig> {
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(words) = args.words_per_cue {
        config.caption.words_per_cue = words;
    }
    if args.no_speaker_labels {
        config.caption.speaker_labels = false;
    }
    if args.dry_run {
        config.output.dry_run = true;
    }

    config
        .validate()
        .map_err(|e| ConvertError::Usage(e.to_string()))?;
    Ok(config)
}

/// Check the target directory preconditions
fn resolve_root(arg: Option<&Path>) -> Result<PathBuf> {
    let arg = arg.ok_or_else(|| {
        ConvertError::Usage("Please specify a directory to process.".to_string())
    })?;

    let root = if arg.is_absolute() {
        arg.to_path_buf()
    } else {
        std::env::current_dir()?.join(arg)
    };

    if !root.exists() {
        return Err(ConvertError::Usage(format!(
            "Directory '{}' does not exist.",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(ConvertError::Usage(format!(
            "'{}' is not a directory.",
            root.display()
        )));
    }

    Ok(root)
}

/// Initialize logging with tracing
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("srtify={}", level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
