//! Transcript model
//!
//! Typed view of a speech-to-text result file:
//! - `schema`: shape sniffing over raw JSON before decoding
//! - `quirks`: point fixes for known producer defects
//!
//! Only the fields the converter reads are modelled; the informational ones
//! decode leniently so unusual but valid responses still convert.

pub mod quirks;
pub mod schema;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ConvertError, Result};

pub use quirks::{normalize, QuirkFix};
pub use schema::{validate, SchemaMismatch, TranscriptShape, Validation};

/// Top-level transcript document
#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    pub metadata: Metadata,
    pub results: Results,
}

/// Informational request metadata
///
/// Only `created` is checked by the validator. The rest feeds the WebVTT
/// NOTE block and is dropped when it has an unexpected type.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub created: String,
    #[serde(default, deserialize_with = "lenient")]
    pub request_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub channels: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Results {
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub utterances: Option<Vec<Utterance>>,
}

/// One audio channel's recognition results
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub alternatives: Vec<Alternative>,
}

/// One recognition hypothesis for a channel
#[derive(Debug, Clone, Deserialize)]
pub struct Alternative {
    pub words: Vec<Word>,
}

/// Speaker-segmented span of speech
#[derive(Debug, Clone, Deserialize)]
pub struct Utterance {
    #[serde(default, deserialize_with = "lenient")]
    pub speaker: Option<u32>,
    pub words: Vec<Word>,
}

/// A recognized token with timing in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct Word {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub punctuated_word: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub speaker: Option<u32>,
}

/// Decode an optional field, treating a value of the wrong type as absent
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl Word {
    /// Display text, preferring the punctuated form
    pub fn display_text(&self) -> &str {
        self.punctuated_word.as_deref().unwrap_or(&self.word)
    }
}

impl Transcript {
    /// Decode a validated and normalized JSON value
    ///
    /// Utterances are dropped for the channel shape, since the validator may
    /// have accepted the document despite a malformed utterance list.
    pub fn from_value(mut value: Value, shape: TranscriptShape) -> Result<Self> {
        if shape == TranscriptShape::Channel {
            if let Some(results) = value.get_mut("results").and_then(Value::as_object_mut) {
                results.remove("utterances");
            }
        }
        serde_json::from_value(value)
            .map_err(|e| ConvertError::Format(format!("transcript could not be decoded: {}", e)))
    }

    /// Words of the first alternative of the first channel
    pub fn primary_words(&self) -> &[Word] {
        self.results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .map(|a| a.words.as_slice())
            .unwrap_or(&[])
    }

    /// Utterances, if the response carries a non-empty list
    pub fn utterances(&self) -> Option<&[Utterance]> {
        self.results
            .utterances
            .as_deref()
            .filter(|u| !u.is_empty())
    }
}
