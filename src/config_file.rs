//! Configuration file support
//!
//! Loads converter configuration from TOML files. Every section is optional
//! so a config file only needs the keys it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{CaptionConfig, ConverterConfig, OutputConfig, SubtitleFormat};
use crate::error::Result;

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Caption settings
    pub caption: Option<CaptionSettings>,
    /// Output settings
    pub output: Option<OutputSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionSettings {
    /// Maximum number of words in one caption
    pub words_per_cue: Option<usize>,
    /// Emit speaker labels on speaker change
    pub speaker_labels: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Output format (srt, vtt)
    pub format: Option<SubtitleFormat>,
    /// Skip writing files
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = ConverterConfig::default();
        Self {
            caption: Some(CaptionSettings {
                words_per_cue: Some(defaults.caption.words_per_cue),
                speaker_labels: Some(defaults.caption.speaker_labels),
            }),
            output: Some(OutputSettings {
                format: Some(defaults.output.format),
                dry_run: Some(defaults.output.dry_run),
            }),
            logging: Some(LoggingSettings {
                level: defaults.log_level,
            }),
        }
    }

    /// Convert to ConverterConfig, filling unset keys with defaults
    pub fn into_converter_config(self) -> Result<ConverterConfig> {
        let defaults = ConverterConfig::default();
        let caption = self.caption;
        let output = self.output;

        let config = ConverterConfig {
            caption: CaptionConfig {
                words_per_cue: caption
                    .as_ref()
                    .and_then(|c| c.words_per_cue)
                    .unwrap_or(defaults.caption.words_per_cue),
                speaker_labels: caption
                    .as_ref()
                    .and_then(|c| c.speaker_labels)
                    .unwrap_or(defaults.caption.speaker_labels),
            },
            output: OutputConfig {
                format: output
                    .as_ref()
                    .and_then(|o| o.format)
                    .unwrap_or(defaults.output.format),
                dry_run: output
                    .as_ref()
                    .and_then(|o| o.dry_run)
                    .unwrap_or(defaults.output.dry_run),
            },
            log_level: self
                .logging
                .map(|l| l.level)
                .unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
