//! Transcript shape detection
//!
//! Structural check over raw JSON. A mismatch is a routing decision (the
//! file is not a transcript), never an error.

use std::fmt;

use serde_json::Value;

/// Accepted transcript layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptShape {
    /// `results.channels[].alternatives[].words[]`
    Channel,
    /// `results.utterances[].words[]`, alongside the channel section
    Utterance,
}

/// Why a JSON document is not a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMismatch {
    pub reason: String,
}

impl fmt::Display for SchemaMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Result of shape detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(TranscriptShape),
    Invalid(SchemaMismatch),
}

#[cfg(test)]
impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn shape(&self) -> Option<TranscriptShape> {
        match self {
            Validation::Valid(shape) => Some(*shape),
            Validation::Invalid(_) => None,
        }
    }
}

fn mismatch(reason: impl Into<String>) -> SchemaMismatch {
    SchemaMismatch {
        reason: reason.into(),
    }
}

/// Classify a parsed JSON value
///
/// The channel section is always required. Utterances upgrade the shape
/// only when present, non-empty and well formed; a malformed utterance list
/// falls back to the channel shape.
pub fn validate(value: &Value) -> Validation {
    if let Err(m) = check_channel_shape(value) {
        return Validation::Invalid(m);
    }

    match value.pointer("/results/utterances") {
        None | Some(Value::Null) => Validation::Valid(TranscriptShape::Channel),
        Some(Value::Array(utterances)) if utterances.is_empty() => {
            Validation::Valid(TranscriptShape::Channel)
        }
        Some(utterances) => match check_utterances(utterances) {
            Ok(()) => Validation::Valid(TranscriptShape::Utterance),
            Err(m) => {
                tracing::debug!("Ignoring malformed utterances: {}", m);
                Validation::Valid(TranscriptShape::Channel)
            }
        },
    }
}

fn check_channel_shape(value: &Value) -> Result<(), SchemaMismatch> {
    if !value.is_object() {
        return Err(mismatch("document is not an object"));
    }

    if !value
        .pointer("/metadata/created")
        .map_or(false, Value::is_string)
    {
        return Err(mismatch("metadata.created is not a string"));
    }

    let channels = value
        .pointer("/results/channels")
        .and_then(Value::as_array)
        .ok_or_else(|| mismatch("results.channels is not an array"))?;

    for (c, channel) in channels.iter().enumerate() {
        let alternatives = channel
            .get("alternatives")
            .and_then(Value::as_array)
            .ok_or_else(|| mismatch(format!("channels[{}].alternatives is not an array", c)))?;

        for (a, alternative) in alternatives.iter().enumerate() {
            let path = format!("channels[{}].alternatives[{}]", c, a);
            // The producer sometimes drops the very first start time
            check_words(alternative, &path, c == 0 && a == 0)?;
        }
    }

    Ok(())
}

fn check_utterances(utterances: &Value) -> Result<(), SchemaMismatch> {
    let utterances = utterances
        .as_array()
        .ok_or_else(|| mismatch("results.utterances is not an array"))?;

    for (u, utterance) in utterances.iter().enumerate() {
        check_words(utterance, &format!("utterances[{}]", u), u == 0)?;
    }

    Ok(())
}

fn check_words(parent: &Value, path: &str, first_start_optional: bool) -> Result<(), SchemaMismatch> {
    let words = parent
        .get("words")
        .and_then(Value::as_array)
        .ok_or_else(|| mismatch(format!("{}.words is not an array", path)))?;

    for (i, word) in words.iter().enumerate() {
        if !word.get("word").map_or(false, Value::is_string) {
            return Err(mismatch(format!("{}.words[{}].word is not a string", path, i)));
        }

        let start_ok = match word.get("start") {
            None => i == 0 && first_start_optional,
            Some(start) => start.is_number(),
        };
        if !start_ok {
            return Err(mismatch(format!("{}.words[{}].start is not a number", path, i)));
        }

        if !word.get("end").map_or(false, Value::is_number) {
            return Err(mismatch(format!("{}.words[{}].end is not a number", path, i)));
        }
    }

    Ok(())
}
