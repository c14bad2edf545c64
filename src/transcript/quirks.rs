//! Known producer defects
//!
//! The transcription service occasionally omits `start` on the very first
//! recognized word. Exactly two positions are patched, both to the start of
//! the recording. An explicit `null` is not treated as missing.

use std::fmt;

use serde_json::{Map, Value};

/// Pointer to the first word of the first utterance
const FIRST_UTTERANCE_WORD: &str = "/results/utterances/0/words/0";

/// Pointer to the first word of the primary alternative
const FIRST_CHANNEL_WORD: &str = "/results/channels/0/alternatives/0/words/0";

/// A patch applied by [`normalize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuirkFix {
    /// `results.utterances[0].words[0].start` was missing
    UtteranceFirstStart,
    /// `results.channels[0].alternatives[0].words[0].start` was missing
    ChannelFirstStart,
}

impl fmt::Display for QuirkFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuirkFix::UtteranceFirstStart => {
                f.write_str("missing start of utterances[0].words[0] set to 0")
            }
            QuirkFix::ChannelFirstStart => {
                f.write_str("missing start of channels[0].alternatives[0].words[0] set to 0")
            }
        }
    }
}

/// Patch known defects in place, returning the fixes applied
pub fn normalize(value: &mut Value) -> Vec<QuirkFix> {
    let mut fixes = Vec::new();

    for (pointer, fix) in [
        (FIRST_UTTERANCE_WORD, QuirkFix::UtteranceFirstStart),
        (FIRST_CHANNEL_WORD, QuirkFix::ChannelFirstStart),
    ] {
        if let Some(word) = value.pointer_mut(pointer).and_then(Value::as_object_mut) {
            if fill_missing_start(word) {
                tracing::info!("Patched transcript: {}", fix);
                fixes.push(fix);
            }
        }
    }

    fixes
}

fn fill_missing_start(word: &mut Map<String, Value>) -> bool {
    if word.contains_key("start") {
        return false;
    }
    word.insert("start".to_string(), Value::from(0.0));
    true
}
