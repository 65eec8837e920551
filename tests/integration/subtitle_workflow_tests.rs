/*!
 * End-to-end tests going from subtitle files on disk to translated output
 */

use std::sync::Arc;
use std::time::Duration;

use encoding_rs::WINDOWS_1255;
use subtrans::file_utils::{FileManager, HttpFetcher, DEFAULT_USER_AGENT};
use subtrans::providers::mock::MockTranslator;
use subtrans::{CueSequence, DetectedEncoding, PipelineOrchestrator, SubtitleFormat, TranslationCache, TranslationService};
use crate::common;

fn file_pipeline(mock: &MockTranslator) -> PipelineOrchestrator {
    let service = TranslationService::new(Arc::new(mock.clone()), 2500, Duration::ZERO);
    let fetcher = HttpFetcher::new(5, DEFAULT_USER_AGENT).unwrap();
    PipelineOrchestrator::new(service, TranslationCache::in_memory(), Arc::new(fetcher))
}

/// Test translating an SRT file from disk and writing the result next to it
#[tokio::test]
async fn test_workflow_withSrtFile_shouldWriteTranslatedFile() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let source = input.to_str().unwrap();
    let mock = MockTranslator::working();

    let content = file_pipeline(&mock).translate_source(source, None, "de").await?;
    let output = temp_dir.path().join(FileManager::output_file_name(source, "de", SubtitleFormat::Srt));
    FileManager::write_to_file(&output, &content)?;

    assert!(output.ends_with("movie.de.srt"));
    let cues = CueSequence::parse(&std::fs::read_to_string(&output)?, SubtitleFormat::Srt);
    assert_eq!(cues.len(), 3);
    assert_eq!(cues.cues[1].text, "[de] It contains multiple entries.");
    assert_eq!(cues.cues[2].timeline, "00:00:10,000 --> 00:00:14,000");
    Ok(())
}

/// Test that a single WebVTT cue produces the exact WebVTT layout
#[tokio::test]
async fn test_workflow_withSingleVttCue_shouldRenderWebVtt() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "clip.vtt",
        "WEBVTT\n\n00:00:00.500 --> 00:00:01.500\nHi\n",
    )?;
    let mock = MockTranslator::with_dictionary([("Hi", "Salut")]);

    let content = file_pipeline(&mock).translate_source(input.to_str().unwrap(), None, "fr").await?;

    assert_eq!(content, "WEBVTT\n\n00:00:00.500 --> 00:00:01.500\nSalut\n\n");
    Ok(())
}

/// Test that the format hint overrides the file name
#[tokio::test]
async fn test_workflow_withFormatHint_shouldOverrideExtension() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "captions.txt", common::SAMPLE_VTT)?;
    let mock = MockTranslator::working();

    let content = file_pipeline(&mock)
        .translate_source(input.to_str().unwrap(), Some("vtt"), "es")
        .await?;

    assert!(content.starts_with("WEBVTT\n\n00:00:01.000 --> 00:00:03.500 align:start\n[es] Welcome back."));
    Ok(())
}

/// Test that a legacy Hebrew file is decoded and written back as UTF-8
#[tokio::test]
async fn test_workflow_withWindows1255Source_shouldProduceUtf8() -> anyhow::Result<()> {
    let source = "1\r\n00:00:01,000 --> 00:00:02,000\r\nשלום\r\n";
    let (bytes, _, _) = WINDOWS_1255.encode(source);
    let mock = MockTranslator::with_dictionary([("שלום", "Hello")]);

    let output = file_pipeline(&mock).translate_subtitle(&bytes, Some("srt"), "he").await?;

    assert_eq!(output.encoding, DetectedEncoding::Legacy(WINDOWS_1255));
    assert_eq!(mock.received_texts(), vec!["שלום"]);
    assert_eq!(output.content, "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n");
    Ok(())
}

/// Test that an empty file is reported instead of producing output
#[tokio::test]
async fn test_workflow_withEmptyFile_shouldFail() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "empty.srt", "")?;

    let result = file_pipeline(&MockTranslator::working())
        .translate_source(input.to_str().unwrap(), None, "he")
        .await;

    assert!(result.is_err());
    Ok(())
}

/// Test that multi-line cue bodies keep their line structure
#[tokio::test]
async fn test_workflow_withMultilineCue_shouldKeepLines() -> anyhow::Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:03,000\nFirst line\nSecond line\n";
    let mock = MockTranslator::with_dictionary([("First line\nSecond line", "Première ligne\nDeuxième ligne")]);

    let output = file_pipeline(&mock).translate_subtitle(content.as_bytes(), None, "fr").await?;

    let cues = CueSequence::parse(&output.content, SubtitleFormat::Srt);
    assert_eq!(cues.cues[0].text, "Première ligne\nDeuxième ligne");
    Ok(())
}
