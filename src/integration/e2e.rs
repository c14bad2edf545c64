//! End-to-end integration tests

use std::path::Path;

use crate::batch::{BatchConverter, BatchSummary, FileOutcome};
use crate::config::{ConverterConfig, SubtitleFormat};
use crate::error::ConvertError;
use crate::integration::fixtures::{list_tree, write_tree, TestTranscript};
use crate::integration::validation::{
    first_timing_line, validate_srt, validate_webvtt, ValidationResult,
};
use crate::report::Reporter;
use crate::transcript::QuirkFix;

/// Run a quiet batch over `root`
pub async fn run_batch(root: &Path, config: ConverterConfig) -> BatchSummary {
    BatchConverter::new(config, Reporter::quiet())
        .run(root)
        .await
        .expect("batch run failed")
}

/// Convert each fixture and validate the produced subtitle file
pub async fn test_fixture_conversion(fixture: &TestTranscript) -> ValidationResult {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = format!("{}.json", fixture.name);
    write_tree(dir.path(), &[(input.as_str(), fixture.to_json_string().as_str())]);

    let summary = run_batch(dir.path(), ConverterConfig::default()).await;
    if summary.converted != 1 {
        return ValidationResult::fail(format!(
            "{}: expected 1 conversion, got {:?}",
            fixture.name, summary.reports
        ));
    }

    match &summary.reports[0].outcome {
        FileOutcome::Converted { cues, .. } if *cues == fixture.expected_cues => {}
        other => {
            return ValidationResult::fail(format!(
                "{}: expected {} cues, got {:?}",
                fixture.name, fixture.expected_cues, other
            ))
        }
    }

    let output = dir.path().join(format!("{}.srt", fixture.name));
    match std::fs::read_to_string(&output) {
        Ok(content) => validate_srt(&content),
        Err(e) => ValidationResult::fail(format!("{}: output not readable: {}", fixture.name, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_all_fixtures_convert() {
        for fixture in [
            TestTranscript::simple(),
            TestTranscript::missing_first_start(),
            TestTranscript::diarized(),
            TestTranscript::utterances(),
            TestTranscript::utterances_missing_first_start(),
            TestTranscript::empty(),
        ] {
            let result = test_fixture_conversion(&fixture).await;
            assert!(
                result.is_valid,
                "{} ({}) failed: {:?}",
                fixture.name,
                fixture.description,
                result.errors
            );
        }
    }

    #[tokio::test]
    async fn test_no_json_files() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(dir.path(), &[("notes.txt", "hello"), ("a/b/readme.md", "# hi")]);
        let before = list_tree(dir.path());

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        assert_eq!(summary.discovered, 0);
        assert!(!summary.conversion_happened());
        assert_eq!(list_tree(dir.path()), before);
    }

    #[tokio::test]
    async fn test_channel_transcript_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = TestTranscript::simple();
        write_tree(dir.path(), &[("talk.json", fixture.to_json_string().as_str())]);

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;
        assert_eq!(summary.converted, 1);

        let srt = std::fs::read_to_string(dir.path().join("talk.srt")).unwrap();
        let result = validate_srt(&srt);
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(srt.starts_with(
            "1\n00:00:00,000 --> 00:00:03,200\n\
             Word0 Word1 Word2 Word3 Word4 Word5 Word6 Word7\n\n2\n"
        ));
        assert!(srt.ends_with("3\n00:00:06,400 --> 00:00:08,000\nWord16 Word17 Word18 Word19\n\n"));
    }

    #[tokio::test]
    async fn test_missing_first_start_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = TestTranscript::missing_first_start();
        write_tree(dir.path(), &[("quirk.json", fixture.to_json_string().as_str())]);

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        match &summary.reports[0].outcome {
            FileOutcome::Converted { fixes, .. } => {
                assert_eq!(fixes, &vec![QuirkFix::ChannelFirstStart]);
            }
            other => panic!("expected conversion, got {:?}", other),
        }
        let srt = std::fs::read_to_string(dir.path().join("quirk.srt")).unwrap();
        assert_eq!(
            first_timing_line(&srt),
            Some("00:00:00,000 --> 00:00:03,200")
        );
    }

    #[tokio::test]
    async fn test_invalid_json_warns_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = TestTranscript::simple();
        write_tree(
            dir.path(),
            &[
                ("a/broken.json", "{ \"metadata\": "),
                ("b/good.json", fixture.to_json_string().as_str()),
            ],
        );

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        assert_eq!(summary.discovered, 2);
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed, 1);

        let broken = summary
            .reports
            .iter()
            .find(|r| r.path.ends_with("a/broken.json"))
            .unwrap();
        match &broken.outcome {
            FileOutcome::Failed(e) => {
                assert!(e.is_warning());
                assert!(matches!(e, ConvertError::JsonParse { .. }));
            }
            other => panic!("expected parse failure, got {:?}", other),
        }
        assert!(!dir.path().join("a/broken.srt").exists());
        assert!(dir.path().join("b/good.srt").exists());
    }

    #[tokio::test]
    async fn test_non_transcript_json_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(
            dir.path(),
            &[("package.json", "{\"foo\": 1}"), ("list.json", "[1, 2, 3]")],
        );

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        assert_eq!(summary.discovered, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 0);
        assert!(summary
            .reports
            .iter()
            .all(|r| matches!(r.outcome, FileOutcome::Skipped(_))));
        assert_eq!(list_tree(dir.path()), vec!["list.json", "package.json"]);
    }

    #[tokio::test]
    async fn test_second_run_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(
            dir.path(),
            &[
                ("x/one.json", TestTranscript::simple().to_json_string().as_str()),
                ("x/y/two.json", TestTranscript::utterances().to_json_string().as_str()),
            ],
        );

        run_batch(dir.path(), ConverterConfig::default()).await;
        let first_one = std::fs::read(dir.path().join("x/one.srt")).unwrap();
        let first_two = std::fs::read(dir.path().join("x/y/two.srt")).unwrap();
        let first_tree = list_tree(dir.path());

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;
        assert_eq!(summary.converted, 2);
        assert_eq!(std::fs::read(dir.path().join("x/one.srt")).unwrap(), first_one);
        assert_eq!(std::fs::read(dir.path().join("x/y/two.srt")).unwrap(), first_two);
        assert_eq!(list_tree(dir.path()), first_tree);
    }

    #[tokio::test]
    async fn test_valid_and_invalid_in_same_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(
            dir.path(),
            &[
                ("a/x.json", TestTranscript::simple().to_json_string().as_str()),
                ("a/y.json", "not json at all"),
            ],
        );

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.reports.len(), 2);
        assert!(summary.reports.iter().any(|r| r.path.ends_with("a/x.json")));
        assert!(summary.reports.iter().any(|r| r.path.ends_with("a/y.json")));
    }

    #[tokio::test]
    async fn test_write_failure_isolated() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(
            dir.path(),
            &[
                ("blocked.json", TestTranscript::simple().to_json_string().as_str()),
                ("open.json", TestTranscript::simple().to_json_string().as_str()),
            ],
        );
        // A directory occupying the output path makes the write fail
        std::fs::create_dir(dir.path().join("blocked.srt")).unwrap();

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed, 1);
        let blocked = summary
            .reports
            .iter()
            .find(|r| r.path.ends_with("blocked.json"))
            .unwrap();
        assert!(matches!(
            blocked.outcome,
            FileOutcome::Failed(ConvertError::Write { .. })
        ));
        assert!(dir.path().join("blocked.srt").is_dir());
        assert_eq!(
            list_tree(dir.path()),
            vec!["blocked.json", "open.json", "open.srt"]
        );
    }

    #[tokio::test]
    async fn test_existing_output_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(
            dir.path(),
            &[
                ("talk.json", TestTranscript::simple().to_json_string().as_str()),
                ("talk.srt", "stale content"),
            ],
        );

        run_batch(dir.path(), ConverterConfig::default()).await;

        let srt = std::fs::read_to_string(dir.path().join("talk.srt")).unwrap();
        assert!(srt.starts_with("1\n"));
        assert!(!srt.contains("stale"));
    }

    #[tokio::test]
    async fn test_format_error_reported() {
        let dir = tempfile::tempdir().unwrap();
        let doc = r#"{
            "metadata": { "created": "2024-05-01T12:00:00.000Z" },
            "results": { "channels": [{ "alternatives": [{ "words": [
                { "word": "late", "start": -3.0, "end": 1.0 }
            ] }] }] }
        }"#;
        write_tree(dir.path(), &[("negative.json", doc)]);

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        assert!(matches!(
            summary.reports[0].outcome,
            FileOutcome::Failed(ConvertError::Format(_))
        ));
        assert!(!dir.path().join("negative.srt").exists());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(dir.path(), &[("talk.json", TestTranscript::simple().to_json_string().as_str())]);

        let mut config = ConverterConfig::default();
        config.output.dry_run = true;
        let summary = run_batch(dir.path(), config).await;

        assert_eq!(summary.converted, 1);
        assert!(matches!(
            summary.reports[0].outcome,
            FileOutcome::Converted { written: false, .. }
        ));
        assert_eq!(list_tree(dir.path()), vec!["talk.json"]);
    }

    #[tokio::test]
    async fn test_webvtt_output() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(dir.path(), &[("talk.json", TestTranscript::diarized().to_json_string().as_str())]);

        let mut config = ConverterConfig::default();
        config.output.format = SubtitleFormat::Vtt;
        run_batch(dir.path(), config).await;

        let vtt = std::fs::read_to_string(dir.path().join("talk.vtt")).unwrap();
        let result = validate_webvtt(&vtt);
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(vtt.contains("Request Id: req-diarized\n"));
        assert!(vtt.contains("<v Speaker 1>Word3 Word4 Word5\n"));
        assert!(!dir.path().join("talk.srt").exists());
    }

    #[tokio::test]
    async fn test_speaker_labels_in_srt() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(dir.path(), &[("talk.json", TestTranscript::utterances().to_json_string().as_str())]);

        run_batch(dir.path(), ConverterConfig::default()).await;

        let srt = std::fs::read_to_string(dir.path().join("talk.srt")).unwrap();
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:01,500\n[speaker 0]\nWord0 Word1 Word2\n\n"));
        assert_eq!(srt.matches("[speaker 0]").count(), 2);
        assert_eq!(srt.matches("[speaker 1]").count(), 2);
    }

    #[tokio::test]
    async fn test_utterance_missing_first_start_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = TestTranscript::utterances_missing_first_start();
        write_tree(dir.path(), &[("quirk.json", fixture.to_json_string().as_str())]);

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        match &summary.reports[0].outcome {
            FileOutcome::Converted { fixes, cues, .. } => {
                assert_eq!(
                    fixes,
                    &vec![QuirkFix::UtteranceFirstStart, QuirkFix::ChannelFirstStart]
                );
                assert_eq!(*cues, 4);
            }
            other => panic!("expected conversion, got {:?}", other),
        }
        let srt = std::fs::read_to_string(dir.path().join("quirk.srt")).unwrap();
        assert_eq!(
            first_timing_line(&srt),
            Some("00:00:00,000 --> 00:00:01,500")
        );
    }

    #[tokio::test]
    async fn test_off_type_informational_fields_still_convert() {
        let dir = tempfile::tempdir().unwrap();
        let duration = r#"{
            "metadata": { "created": "2024-05-01T12:00:00.000Z", "duration": "12.5" },
            "results": { "channels": [{ "alternatives": [{ "words": [
                { "word": "hi", "start": 0.0, "end": 0.5 }
            ] }] }] }
        }"#;
        let channels = r#"{
            "metadata": { "created": "2024-05-01T12:00:00.000Z", "channels": -1, "models": 5 },
            "results": { "channels": [{ "alternatives": [{ "words": [
                { "word": "hi", "start": 0.0, "end": 0.5, "confidence": "high" }
            ] }] }] }
        }"#;
        let transcript = r#"{
            "metadata": { "created": "2024-05-01T12:00:00.000Z" },
            "results": {
                "channels": [{ "alternatives": [{ "transcript": null, "confidence": null, "words": [
                    { "word": "hi", "start": 0.0, "end": 0.5 }
                ] }] }],
                "utterances": [{ "id": 7, "channel": "zero", "start": null, "end": "x", "speaker": 0,
                    "words": [{ "word": "hi", "start": 0.0, "end": 0.5 }] }]
            }
        }"#;
        write_tree(
            dir.path(),
            &[
                ("duration.json", duration),
                ("channels.json", channels),
                ("transcript.json", transcript),
            ],
        );

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        assert_eq!(summary.converted, 3, "{:?}", summary.reports);
        assert_eq!(summary.failed, 0);
        let srt = std::fs::read_to_string(dir.path().join("duration.srt")).unwrap();
        assert_eq!(srt, "1\n00:00:00,000 --> 00:00:00,500\nhi\n\n");
    }

    #[tokio::test]
    async fn test_off_type_duration_left_out_of_webvtt_note() {
        let dir = tempfile::tempdir().unwrap();
        let doc = r#"{
            "metadata": { "created": "2024-05-01T12:00:00.000Z", "request_id": "req-1", "duration": "12.5" },
            "results": { "channels": [{ "alternatives": [{ "words": [
                { "word": "hi", "start": 0.0, "end": 0.5 }
            ] }] }] }
        }"#;
        write_tree(dir.path(), &[("talk.json", doc)]);

        let mut config = ConverterConfig::default();
        config.output.format = SubtitleFormat::Vtt;
        run_batch(dir.path(), config).await;

        let vtt = std::fs::read_to_string(dir.path().join("talk.vtt")).unwrap();
        assert!(vtt.contains("Request Id: req-1\n"));
        assert!(!vtt.contains("Duration:"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_file_is_read_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write_tree(
            dir.path(),
            &[
                ("locked.json", TestTranscript::simple().to_json_string().as_str()),
                ("open.json", TestTranscript::simple().to_json_string().as_str()),
            ],
        );
        let locked = dir.path().join("locked.json");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        if std::fs::read(&locked).is_ok() {
            // Privileged users bypass file permissions
            return;
        }

        let summary = run_batch(dir.path(), ConverterConfig::default()).await;

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed, 1);
        let report = summary
            .reports
            .iter()
            .find(|r| r.path.ends_with("locked.json"))
            .unwrap();
        assert!(matches!(
            report.outcome,
            FileOutcome::Failed(ConvertError::Read { .. })
        ));
        assert!(!dir.path().join("locked.srt").exists());
        assert!(dir.path().join("open.srt").exists());

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o644)).unwrap();
    }
}
