/*!
 * Tests for cue parsing and writing
 */

use subtrans::subtitle_processor::{self, Cue, CueSequence, SubtitleFormat};
use crate::common;

/// Test parsing a standard SRT document
#[test]
fn test_parse_withSrt_shouldReadEveryCue() {
    let cues = CueSequence::parse(common::SAMPLE_SRT, SubtitleFormat::Srt);

    assert_eq!(cues.len(), 3);
    assert_eq!(cues.cues[0].timeline, "00:00:01,000 --> 00:00:04,000");
    assert_eq!(cues.cues[0].text, "This is a test subtitle.");
    assert_eq!(cues.cues[2].text, "For testing purposes.");
}

/// Test that CRLF line endings and multi-line bodies are handled
#[test]
fn test_parse_withCrlfAndMultilineCue_shouldJoinLinesWithNewline() {
    let content = "1\r\n00:00:01,000 --> 00:00:02,000\r\nFirst line\r\nSecond line\r\n\r\n";
    let cues = CueSequence::parse(content, SubtitleFormat::Srt);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues.cues[0].text, "First line\nSecond line");
}

/// Test that blocks without a timing line are dropped
#[test]
fn test_parse_withMalformedBlock_shouldSkipIt() {
    let content = "1\nnot a timing line\nText\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n";
    let cues = CueSequence::parse(content, SubtitleFormat::Srt);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues.cues[0].text, "Kept");
}

/// Test that input without cues yields an empty sequence
#[test]
fn test_parse_withNoCues_shouldReturnEmptySequence() {
    assert!(CueSequence::parse("", SubtitleFormat::Srt).is_empty());
    assert!(CueSequence::parse("WEBVTT\n\n", SubtitleFormat::WebVtt).is_empty());
}

/// Test parsing WebVTT with a header, identifiers and cue settings
#[test]
fn test_parse_withVtt_shouldSkipHeaderAndIdentifiers() {
    let cues = CueSequence::parse(common::SAMPLE_VTT, SubtitleFormat::WebVtt);

    assert_eq!(cues.len(), 2);
    assert_eq!(cues.cues[0].timeline, "00:00:01.000 --> 00:00:03.500 align:start");
    assert_eq!(cues.cues[0].text, "Welcome back.");
    assert_eq!(cues.cues[1].text, "Let's begin.");
}

/// Test the exact SRT output layout and index regeneration
#[test]
fn test_render_withSrt_shouldRenumberFromOne() {
    let cues = CueSequence::new(vec![
        Cue::new("00:00:01,000 --> 00:00:02,000", "A"),
        Cue::new("00:00:03,000 --> 00:00:04,000", "B\nC"),
    ]);

    assert_eq!(
        subtitle_processor::write(&cues, SubtitleFormat::Srt),
        "1\n00:00:01,000 --> 00:00:02,000\nA\n\n2\n00:00:03,000 --> 00:00:04,000\nB\nC\n\n"
    );
}

/// Test the exact WebVTT output layout for one cue
#[test]
fn test_render_withVttSingleCue_shouldMatchLayout() {
    let cues = CueSequence::new(vec![Cue::new("00:00:00.500 --> 00:00:01.500", "Hi")]);
    assert_eq!(cues.render(SubtitleFormat::WebVtt), "WEBVTT\n\n00:00:00.500 --> 00:00:01.500\nHi\n\n");
}

/// Test that writing then parsing gives back the same cues
#[test]
fn test_parseRender_shouldPreserveCues() {
    for (content, format) in [
        (common::SAMPLE_SRT, SubtitleFormat::Srt),
        (common::SAMPLE_VTT, SubtitleFormat::WebVtt),
    ] {
        let cues = subtitle_processor::parse(content, format);
        let reparsed = subtitle_processor::parse(&cues.render(format), format);
        assert_eq!(reparsed, cues);
    }
}

/// Test that built sequences with unusual cue bodies survive writing and parsing
#[test]
fn test_renderParse_withEdgeCaseCues_shouldRoundTripInBothFormats() {
    let cases: Vec<(&str, Vec<Cue>)> = vec![
        ("empty text", vec![
            Cue::new("00:00:01,000 --> 00:00:02,000", ""),
            Cue::new("00:00:03,000 --> 00:00:04,000", "After"),
        ]),
        ("multi-line text", vec![Cue::new("00:00:01,000 --> 00:00:02,000", "First\nSecond\nThird")]),
        ("number first line", vec![
            Cue::new("00:00:01,000 --> 00:00:02,000", "42\nHello"),
            Cue::new("00:00:02,500 --> 00:00:03,000", "7"),
        ]),
        ("comma timeline", vec![Cue::new("01:02:03,456 --> 01:02:04,000", "Timed")]),
        ("dot timeline with settings", vec![Cue::new("00:00:01.000 --> 00:00:02.000 align:start", "Placed")]),
        ("indented text", vec![Cue::new("00:00:01,000 --> 00:00:02,000", "  indented\nline")]),
        ("arrow in text", vec![Cue::new("00:00:01,000 --> 00:00:02,000", "left --> right")]),
        ("no cues", vec![]),
    ];

    for (name, cues) in cases {
        let sequence = CueSequence::new(cues);
        for format in [SubtitleFormat::Srt, SubtitleFormat::WebVtt] {
            let reparsed = CueSequence::parse(&sequence.render(format), format);
            assert_eq!(reparsed, sequence, "case '{}' in {}", name, format);
        }
    }
}

/// Test that trailing whitespace on cue lines is not kept
#[test]
fn test_parse_withTrailingSpaces_shouldTrimLineEnds() {
    let sequence = CueSequence::new(vec![Cue::new("00:00:01,000 --> 00:00:02,000", "Hi \nthere\t")]);

    for format in [SubtitleFormat::Srt, SubtitleFormat::WebVtt] {
        let reparsed = CueSequence::parse(&sequence.render(format), format);
        assert_eq!(reparsed.cues[0].text, "Hi\nthere");
    }
}

/// Test format detection from hints and content
#[test]
fn test_detect_shouldPreferHintThenSignature() {
    assert_eq!(SubtitleFormat::detect(Some("vtt"), ""), SubtitleFormat::WebVtt);
    assert_eq!(SubtitleFormat::detect(Some("https://x.org/a.vtt?token=1"), ""), SubtitleFormat::WebVtt);
    assert_eq!(SubtitleFormat::detect(Some("/tmp/movie.SRT"), "WEBVTT"), SubtitleFormat::Srt);
    assert_eq!(SubtitleFormat::detect(None, "\u{feff}WEBVTT\n\n"), SubtitleFormat::WebVtt);
    assert_eq!(SubtitleFormat::detect(Some("movie"), "1\n"), SubtitleFormat::Srt);
}

/// Test parsing of format names
#[test]
fn test_formatFromStr_withUnknownName_shouldFail() {
    assert_eq!("webvtt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::WebVtt);
    assert!("ass".parse::<SubtitleFormat>().is_err());
}

/// Test writing a sequence to a nested output path
#[test]
fn test_writeToFile_shouldCreateParentDirectories() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("out.srt");
    let cues = CueSequence::parse(common::SAMPLE_SRT, SubtitleFormat::Srt);

    cues.write_to_file(&path, SubtitleFormat::Srt)?;

    let written = std::fs::read_to_string(&path)?;
    assert_eq!(CueSequence::parse(&written, SubtitleFormat::Srt), cues);
    Ok(())
}
