//! SRT (SubRip) subtitle format writer.

use super::timestamp::format_srt;
use super::Cue;

/// Render cues as SubRip text
///
/// A `[speaker N]` line precedes the caption whenever the speaker differs
/// from the previous cue's.
pub fn render(cues: &[Cue], speaker_labels: bool) -> String {
    let mut output = String::new();
    let mut current_speaker = None;

    for cue in cues {
        output.push_str(&format!("{}\n", cue.sequence));
        output.push_str(&format!(
            "{} --> {}\n",
            format_srt(cue.start_ms),
            format_srt(cue.end_ms)
        ));

        if speaker_labels {
            if let Some(speaker) = cue.speaker {
                if current_speaker != Some(speaker) {
                    output.push_str(&format!("[speaker {}]\n", speaker));
                }
            }
        }
        current_speaker = cue.speaker;

        output.push_str(&cue.text);
        output.push_str("\n\n");
    }

    output
}
