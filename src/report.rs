//! Console progress output
//!
//! User-facing lines, separate from `tracing` diagnostics. Progress goes to
//! stdout; warnings and errors go to stderr.

use std::path::Path;

use colored::Colorize;

use crate::batch::{BatchSummary, FileOutcome};
use crate::error::ConvertError;

/// Prints batch progress to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// A reporter that only prints warnings and errors
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    /// Header for a directory, relative to the scan root
    pub fn directory(&self, root: &Path, dir: &Path) {
        if self.quiet {
            return;
        }
        println!("{}", format!("📁 {}", display_dir(root, dir)).cyan());
    }

    /// One line per reported file; schema mismatches print nothing
    pub fn file(&self, path: &Path, outcome: &FileOutcome) {
        let name = file_name(path);

        match outcome {
            FileOutcome::Converted { .. } if self.quiet => {}
            FileOutcome::Converted {
                output,
                cues,
                fixes,
                written,
            } => {
                let suffix = if *written { "" } else { ", dry run" };
                println!(
                    "  {} {} → {} ({} cues{})",
                    "→".green(),
                    name,
                    file_name(output),
                    cues,
                    suffix
                );
                for fix in fixes {
                    println!("    {} {}", "patched:".yellow(), fix);
                }
            }
            FileOutcome::Skipped(_) => {}
            FileOutcome::Failed(e) if e.is_warning() => {
                eprintln!(
                    "  {} Skipping {}: {}",
                    "⚠".yellow(),
                    name,
                    warning_detail(e).yellow()
                );
            }
            FileOutcome::Failed(e) => {
                eprintln!("  {} Error processing {}: {}", "✗".red(), name, e);
            }
        }
    }

    /// Nothing to convert below `root`
    pub fn no_files(&self, root: &Path) {
        if self.quiet {
            return;
        }
        println!(
            "{}",
            format!(
                "No files found matching the glob pattern '**/*.json' in directory '{}'.",
                root.display()
            )
            .yellow()
        );
    }

    /// Final summary line
    pub fn summary(&self, summary: &BatchSummary) {
        if self.quiet {
            return;
        }
        if !summary.conversion_happened() {
            println!("{}", "No transcript JSON files converted.".yellow());
        } else if summary.failed == 0 {
            println!(
                "{}",
                format!(
                    "✅ All {} conversions completed successfully",
                    summary.converted
                )
                .green()
            );
        } else {
            println!(
                "{}",
                format!(
                    "{} converted, {} failed",
                    summary.converted, summary.failed
                )
                .yellow()
            );
            for report in &summary.reports {
                if let FileOutcome::Failed(_) = report.outcome {
                    println!("  {}", report.path.display());
                }
            }
        }
    }

    /// Fatal precondition failure
    pub fn usage_error(&self, error: &ConvertError) {
        eprintln!("{}", format!("Error: {}", error).red());
    }

    /// Unexpected error that escaped the batch
    pub fn critical(&self, error: &ConvertError) {
        eprintln!("{}", format!("🚨 Critical error: {}", error).red());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Directory as shown in headers: relative to the root, `.` for the root
pub fn display_dir(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => dir.display().to_string(),
    }
}

fn warning_detail(error: &ConvertError) -> String {
    match error {
        ConvertError::JsonParse { source, .. } => format!("invalid JSON ({})", source),
        other => other.to_string(),
    }
}
