//! Subtitle generation
//!
//! Turns a decoded transcript into caption cues and renders them:
//! - Word grouping into cues (per utterance, or by count and speaker)
//! - SubRip output
//! - WebVTT output with a metadata NOTE block

pub mod srt;
pub mod timestamp;
pub mod webvtt;

use crate::config::{CaptionConfig, ConverterConfig, SubtitleFormat};
use crate::error::{ConvertError, Result};
use crate::transcript::{Metadata, Transcript, Word};

/// A single caption with timing and text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// 1-based position in the output
    pub sequence: usize,
    /// Start time in milliseconds
    pub start_ms: u64,
    /// End time in milliseconds, never before `start_ms`
    pub end_ms: u64,
    /// Speaker id, when the transcript is diarized
    pub speaker: Option<u32>,
    /// Caption text
    pub text: String,
}

/// Render already grouped cues
pub fn render_cues(cues: &[Cue], metadata: &Metadata, config: &ConverterConfig) -> String {
    let speaker_labels = config.caption.speaker_labels;

    let output = match config.output.format {
        SubtitleFormat::Srt => srt::render(cues, speaker_labels),
        SubtitleFormat::Vtt => webvtt::render(cues, metadata, speaker_labels),
    };

    tracing::debug!(
        "Rendered {} cues as {:?} ({} bytes)",
        cues.len(),
        config.output.format,
        output.len()
    );
    output
}

/// Group transcript words into numbered cues
///
/// Utterances take precedence over the channel words when present.
pub fn build_cues(transcript: &Transcript, config: &CaptionConfig) -> Result<Vec<Cue>> {
    if config.words_per_cue == 0 {
        return Err(ConvertError::Format(
            "words_per_cue must be at least 1".to_string(),
        ));
    }

    let runs: Vec<(Option<u32>, &[Word])> = match transcript.utterances() {
        Some(utterances) => utterances
            .iter()
            .flat_map(|u| {
                u.words.chunks(config.words_per_cue).map(move |chunk| {
                    let speaker = u.speaker.or_else(|| chunk.first().and_then(|w| w.speaker));
                    (speaker, chunk)
                })
            })
            .collect(),
        None => group_words(transcript.primary_words(), config.words_per_cue),
    };

    runs.into_iter()
        .enumerate()
        .map(|(i, (speaker, words))| make_cue(i + 1, speaker, words))
        .collect()
}

/// Split a word sequence into runs of at most `max_words`
///
/// When the first word carries a speaker id the sequence is treated as
/// diarized and a speaker change also starts a new run.
fn group_words(words: &[Word], max_words: usize) -> Vec<(Option<u32>, &[Word])> {
    let diarized = words.first().map_or(false, |w| w.speaker.is_some());
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..words.len() {
        let full = i - start == max_words;
        let speaker_changed = diarized && words[i].speaker != words[i - 1].speaker;
        if full || speaker_changed {
            runs.push((words[start].speaker, &words[start..i]));
            start = i;
        }
    }

    if start < words.len() {
        runs.push((words[start].speaker, &words[start..]));
    }

    runs
}

fn make_cue(sequence: usize, speaker: Option<u32>, words: &[Word]) -> Result<Cue> {
    let (first, last) = match (words.first(), words.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(ConvertError::Format(format!(
                "cue {} has no words",
                sequence
            )))
        }
    };

    let start_ms = timestamp::seconds_to_ms(first.start)?;
    let end_ms = timestamp::seconds_to_ms(last.end)?;
    if end_ms < start_ms {
        tracing::debug!(
            "Cue {} ends before it starts ({} < {}), clamping",
            sequence,
            end_ms,
            start_ms
        );
    }

    let text = words
        .iter()
        .map(Word::display_text)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Cue {
        sequence,
        start_ms,
        end_ms: end_ms.max(start_ms),
        speaker,
        text,
    })
}
