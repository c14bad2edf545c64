//! WebVTT subtitle format writer.

use super::timestamp::format_vtt;
use super::Cue;
use crate::transcript::Metadata;

/// Render cues as WebVTT
///
/// The header is followed by a NOTE block carrying the transcript metadata.
/// Speakers are expressed as `<v Speaker N>` voice spans.
pub fn render(cues: &[Cue], metadata: &Metadata, speaker_labels: bool) -> String {
    let mut output = String::new();

    output.push_str("WEBVTT\n\n");
    output.push_str(&metadata_note(metadata));

    for cue in cues {
        output.push_str(&format!(
            "{} --> {}\n",
            format_vtt(cue.start_ms),
            format_vtt(cue.end_ms)
        ));

        let text = escape_text(&cue.text);
        match cue.speaker {
            Some(speaker) if speaker_labels => {
                output.push_str(&format!("<v Speaker {}>{}\n\n", speaker, text));
            }
            _ => {
                output.push_str(&text);
                output.push_str("\n\n");
            }
        }
    }

    output
}

fn metadata_note(metadata: &Metadata) -> String {
    let mut note = String::from("NOTE\nTranscription metadata\n");
    if let Some(request_id) = &metadata.request_id {
        note.push_str(&format!("Request Id: {}\n", request_id));
    }
    note.push_str(&format!("Created: {}\n", metadata.created));
    if let Some(duration) = metadata.duration {
        note.push_str(&format!("Duration: {}\n", duration));
    }
    if let Some(channels) = metadata.channels {
        note.push_str(&format!("Channels: {}\n", channels));
    }
    note.push('\n');
    // "-->" is not allowed inside a NOTE block
    note.replace("-->", "- ->")
}

/// Escape characters with special meaning in cue payloads
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
