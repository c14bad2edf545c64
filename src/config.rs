//! Converter configuration

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Subtitle output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// SubRip (`.srt`)
    Srt,
    /// WebVTT (`.vtt`)
    Vtt,
}

impl SubtitleFormat {
    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
        }
    }
}

impl Default for SubtitleFormat {
    fn default() -> Self {
        SubtitleFormat::Srt
    }
}

/// Caption grouping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Maximum number of words in one caption
    pub words_per_cue: usize,

    /// Emit a speaker label when the speaker changes
    pub speaker_labels: bool,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            words_per_cue: 8,
            speaker_labels: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Subtitle format to write
    pub format: SubtitleFormat,

    /// Format and report, but never write files
    pub dry_run: bool,
}

/// Converter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Caption configuration
    pub caption: CaptionConfig,

    /// Output configuration
    pub output: OutputConfig,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            caption: CaptionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ConverterConfig {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.caption.words_per_cue == 0 {
            return Err(ConvertError::Config(
                "caption.words_per_cue must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
