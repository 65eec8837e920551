use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Context, Result};
use log::{debug, warn};

use crate::errors::SubtitleError;

// @module: Subtitle parsing and rendering

// @const: Blank-line block separator (lines holding only whitespace count as blank)
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").unwrap()
});

// @const: WebVTT timing line, hours optional, cue settings allowed after the end time
static VTT_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+:)?\d{1,2}:\d{2}[.,]\d{1,3}[ \t]+-->[ \t]+(?:\d+:)?\d{1,2}:\d{2}[.,]\d{1,3}(?:[ \t].*)?$").unwrap()
});

/// Separator between start and end time on a timeline
pub const TIMING_SEPARATOR: &str = "-->";

/// WebVTT file signature
pub const WEBVTT_SIGNATURE: &str = "WEBVTT";

/// Plain-text subtitle formats understood by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubtitleFormat {
    /// SubRip
    #[default]
    Srt,
    /// Web Video Text Tracks
    WebVtt,
}

impl SubtitleFormat {
    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::WebVtt => "vtt",
        }
    }

    /// Format from an extension or format name, case-insensitive
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_lowercase().as_str() {
            "srt" | "subrip" => Some(Self::Srt),
            "vtt" | "webvtt" => Some(Self::WebVtt),
            _ => None,
        }
    }

    /// Format named by a hint: a bare format name, an extension, a file path or a URL
    pub fn from_hint(hint: &str) -> Option<Self> {
        if let Some(format) = Self::from_extension(hint) {
            return Some(format);
        }

        // URLs carry query strings and fragments that hide the extension
        let path = match url::Url::parse(hint) {
            Ok(url) => url.path().to_string(),
            Err(_) => hint.to_string(),
        };

        Path::new(&path)
            .extension()
            .and_then(|ext| Self::from_extension(&ext.to_string_lossy()))
    }

    /// Detect the format from an optional hint, then from the content itself
    pub fn detect(hint: Option<&str>, content: &str) -> Self {
        if let Some(format) = hint.and_then(Self::from_hint) {
            return format;
        }

        if content.trim_start_matches('\u{feff}').trim_start().starts_with(WEBVTT_SIGNATURE) {
            Self::WebVtt
        } else {
            Self::Srt
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Srt => write!(f, "SRT"),
            Self::WebVtt => write!(f, "WebVTT"),
        }
    }
}

impl FromStr for SubtitleFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| SubtitleError::UnsupportedFormat(s.to_string()))
    }
}

// @struct: Single timed subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Timing line, kept verbatim including any positioning settings
    pub timeline: String,

    // @field: Displayable lines joined by '\n'
    pub text: String,
}

impl Cue {
    /// Creates a cue from a timeline and body text
    pub fn new(timeline: impl Into<String>, text: impl Into<String>) -> Self {
        Cue {
            timeline: timeline.into(),
            text: text.into(),
        }
    }
}

/// Ordered cues of one subtitle file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueSequence {
    /// Cues in source order
    pub cues: Vec<Cue>,
}

impl CueSequence {
    /// Create a sequence from cues in display order
    pub fn new(cues: Vec<Cue>) -> Self {
        CueSequence { cues }
    }

    /// Number of cues
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the sequence holds no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Iterate over cues in order
    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    /// Total characters of cue text, used for progress and logging
    pub fn text_chars(&self) -> usize {
        self.cues.iter().map(|cue| cue.text.chars().count()).sum()
    }

    /// Parse decoded subtitle text in the given format
    ///
    /// Malformed blocks are dropped; an input without any cue yields an
    /// empty sequence rather than an error. Trailing whitespace on body
    /// lines is not kept.
    pub fn parse(content: &str, format: SubtitleFormat) -> Self {
        let normalized = normalize_line_endings(content);

        let sequence = match format {
            SubtitleFormat::Srt => Self::parse_srt_string(&normalized),
            SubtitleFormat::WebVtt => Self::parse_vtt_string(&normalized),
        };

        if sequence.is_empty() && !normalized.trim().is_empty() {
            warn!("No {} cues found in {} characters of input", format, normalized.len());
        }

        sequence
    }

    /// Parse SRT blocks: optional index, timeline, body
    fn parse_srt_string(content: &str) -> Self {
        let mut cues = Vec::new();

        for (block_num, block) in split_blocks(content).enumerate() {
            let lines: Vec<&str> = block
                .lines()
                .map(str::trim_end)
                .skip_while(|line| line.trim().is_empty())
                .collect();

            let non_empty = lines.iter().filter(|line| !line.trim().is_empty()).count();
            if non_empty < 2 {
                debug!("Dropping SRT block {}: fewer than 2 lines", block_num + 1);
                continue;
            }

            let mut rest = lines.iter();
            let mut timeline = rest.next().map(|line| line.trim()).unwrap_or_default();

            // The index line is optional
            if !timeline.contains(TIMING_SEPARATOR) && timeline.chars().all(|c| c.is_ascii_digit()) {
                timeline = rest.next().map(|line| line.trim()).unwrap_or_default();
            }

            if !timeline.contains(TIMING_SEPARATOR) {
                debug!("Dropping SRT block {}: no timing line", block_num + 1);
                continue;
            }

            let text = rest.copied().collect::<Vec<_>>().join("\n");
            cues.push(Cue::new(timeline, text));
        }

        CueSequence::new(cues)
    }

    /// Parse WebVTT: skip the header block, keep blocks with a timing line
    fn parse_vtt_string(content: &str) -> Self {
        let mut cues = Vec::new();
        let mut body = content.trim_start_matches('\u{feff}').trim_start();

        // Header metadata after the signature forms a block without timing and is skipped below
        if body.starts_with(WEBVTT_SIGNATURE) {
            body = body.split_once('\n').map(|(_, rest)| rest).unwrap_or_default();
        }

        for (block_num, block) in split_blocks(body).enumerate() {
            let lines: Vec<&str> = block.lines().map(str::trim_end).collect();

            // Lines ahead of the timing line are cue identifiers
            let Some(timing_idx) = lines.iter().position(|line| VTT_TIMING_REGEX.is_match(line.trim())) else {
                debug!("Skipping WebVTT block {}: no timing line", block_num + 1);
                continue;
            };

            let timeline = lines[timing_idx].trim();
            let text = lines[timing_idx + 1..].join("\n");
            cues.push(Cue::new(timeline, text));
        }

        CueSequence::new(cues)
    }

    /// Render the sequence in the given format
    ///
    /// SRT indices are regenerated from 1; WebVTT output carries no indices.
    pub fn render(&self, format: SubtitleFormat) -> String {
        let capacity = self.text_chars() + self.cues.len() * 48 + 8;
        let mut output = String::with_capacity(capacity);

        match format {
            SubtitleFormat::Srt => {
                for (i, cue) in self.cues.iter().enumerate() {
                    output.push_str(&(i + 1).to_string());
                    output.push('\n');
                    output.push_str(&cue.timeline);
                    output.push('\n');
                    output.push_str(&cue.text);
                    output.push_str("\n\n");
                }
            }
            SubtitleFormat::WebVtt => {
                output.push_str(WEBVTT_SIGNATURE);
                output.push_str("\n\n");
                for cue in &self.cues {
                    output.push_str(&cue.timeline);
                    output.push('\n');
                    output.push_str(&cue.text);
                    output.push_str("\n\n");
                }
            }
        }

        output
    }

    /// Write the rendered sequence to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, format: SubtitleFormat) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        fs::write(path, self.render(format))
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
    }
}

impl FromIterator<Cue> for CueSequence {
    fn from_iter<I: IntoIterator<Item = Cue>>(iter: I) -> Self {
        CueSequence::new(iter.into_iter().collect())
    }
}

impl IntoIterator for CueSequence {
    type Item = Cue;
    type IntoIter = std::vec::IntoIter<Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.into_iter()
    }
}

impl fmt::Display for CueSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} cues, {} characters", self.cues.len(), self.text_chars())
    }
}

/// Parse decoded text into cues
pub fn parse(content: &str, format: SubtitleFormat) -> CueSequence {
    CueSequence::parse(content, format)
}

/// Render cues into subtitle text
pub fn write(cues: &CueSequence, format: SubtitleFormat) -> String {
    cues.render(format)
}

/// Convert CRLF and lone CR line endings to LF
fn normalize_line_endings(content: &str) -> String {
    if content.contains('\r') {
        content.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        content.to_string()
    }
}

/// Split on runs of blank lines, skipping empty blocks
fn split_blocks(content: &str) -> impl Iterator<Item = &str> {
    BLOCK_SEPARATOR_REGEX
        .split(content)
        .map(|block| block.trim_matches('\n'))
        .filter(|block| !block.trim().is_empty())
}
