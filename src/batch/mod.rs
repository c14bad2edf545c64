//! Batch conversion
//!
//! Walks a directory tree and converts every transcript it finds:
//! - `scanner`: input discovery and grouping by directory
//! - `writer`: atomic output writes
//!
//! Files are processed strictly one after another. A failing file is
//! recorded and reported; it never stops the batch.

pub mod scanner;
pub mod writer;

use std::path::{Path, PathBuf};

use crate::config::{ConverterConfig, SubtitleFormat};
use crate::error::{ConvertError, Result};
use crate::report::Reporter;
use crate::subtitle;
use crate::transcript::{self, QuirkFix, SchemaMismatch, Transcript, Validation};

pub use scanner::scan_dir;

/// What happened to one input file
#[derive(Debug)]
pub enum FileOutcome {
    /// Subtitle written (or, in dry-run mode, rendered)
    Converted {
        output: PathBuf,
        cues: usize,
        fixes: Vec<QuirkFix>,
        written: bool,
    },
    /// Valid JSON, but not a transcript
    Skipped(SchemaMismatch),
    /// Read, parse, format or write failure
    Failed(ConvertError),
}

/// Outcome for one visited file
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Aggregate result of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub discovered: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    /// Whether any file was converted
    pub fn conversion_happened(&self) -> bool {
        self.converted > 0
    }

    fn record(&mut self, path: PathBuf, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Converted { .. } => self.converted += 1,
            FileOutcome::Skipped(_) => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
        self.reports.push(FileReport { path, outcome });
    }
}

/// Output path for an input file: same directory and stem, subtitle extension
pub fn output_path(input: &Path, format: SubtitleFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// Sequential converter over a directory tree
pub struct BatchConverter {
    config: ConverterConfig,
    reporter: Reporter,
}

impl BatchConverter {
    pub fn new(config: ConverterConfig, reporter: Reporter) -> Self {
        Self { config, reporter }
    }

    /// Convert every transcript below `root`
    ///
    /// Only a failure to walk the root itself is returned as an error.
    pub async fn run(&self, root: &Path) -> Result<BatchSummary> {
        let groups = scan_dir(root)?;
        let mut summary = BatchSummary::default();

        if groups.is_empty() {
            self.reporter.no_files(root);
            return Ok(summary);
        }

        for group in groups {
            let mut directory_printed = false;

            for file in group.files {
                summary.discovered += 1;
                let outcome = self.convert_file(&file).await;

                if !matches!(outcome, FileOutcome::Skipped(_)) && !directory_printed {
                    self.reporter.directory(root, &group.dir);
                    directory_printed = true;
                }
                self.reporter.file(&file, &outcome);
                summary.record(file, outcome);
            }
        }

        self.reporter.summary(&summary);
        Ok(summary)
    }

    /// Convert a single file, folding every failure into the outcome
    pub async fn convert_file(&self, path: &Path) -> FileOutcome {
        match self.try_convert(path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!("Conversion of {:?} failed: {}", path, e);
                FileOutcome::Failed(e)
            }
        }
    }

    async fn try_convert(&self, path: &Path) -> Result<FileOutcome> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ConvertError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        // Tolerate a UTF-8 byte order mark
        let json = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes[..]);
        let mut value: serde_json::Value =
            serde_json::from_slice(json).map_err(|source| ConvertError::JsonParse {
                path: path.to_path_buf(),
                source,
            })?;

        let shape = match transcript::validate(&value) {
            Validation::Valid(shape) => shape,
            Validation::Invalid(mismatch) => {
                tracing::debug!("Not a transcript: {:?} ({})", path, mismatch);
                return Ok(FileOutcome::Skipped(mismatch));
            }
        };

        let fixes = transcript::normalize(&mut value);
        let decoded = Transcript::from_value(value, shape)?;
        let cues = subtitle::build_cues(&decoded, &self.config.caption)?;
        let content = subtitle::render_cues(&cues, &decoded.metadata, &self.config);

        let output = output_path(path, self.config.output.format);
        let written = !self.config.output.dry_run;
        if written {
            writer::write_atomic(&output, content.as_bytes()).await?;
        }

        tracing::debug!(
            "Converted {:?} -> {:?} ({:?} shape, {} cues)",
            path,
            output,
            shape,
            cues.len()
        );

        Ok(FileOutcome::Converted {
            output,
            cues: cues.len(),
            fixes,
            written,
        })
    }
}
