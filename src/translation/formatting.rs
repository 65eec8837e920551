/*!
 * Punctuation and spacing repair for translated text.
 *
 * Machine translation tends to return "Hello , world !" style spacing,
 * especially for right-to-left targets. The normalizer applies three
 * deterministic repairs to a fully reassembled cue body:
 *
 * 1. remove spaces and tabs right before `. , : ; ! ?`
 * 2. put exactly one space after such a mark when a word follows directly
 * 3. collapse runs of two or more spaces
 *
 * Newlines are never touched, so multi-line cues keep their layout.
 * Normalizing twice gives the same result as normalizing once.
 */

use regex::Regex;
use once_cell::sync::Lazy;

/// Horizontal whitespace (including no-break space) before a punctuation mark
static SPACE_BEFORE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t\u{00A0}]+([.,:;!?])").unwrap()
});

/// Runs of two or more plain spaces
static REPEATED_SPACES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" {2,}").unwrap()
});

/// Marks whose surrounding spacing is repaired
fn is_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | ':' | ';' | '!' | '?')
}

/// Characters that legitimately hug a preceding punctuation mark
fn is_closing(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '”' | '’' | '»' | ')' | ']' | '}' | '<' | '…' | '\u{200E}' | '\u{200F}'
    )
}

/// Text normalizer applied after a cue's chunks are reassembled
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Apply all spacing repairs
    pub fn normalize(text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let result = SPACE_BEFORE_PUNCTUATION.replace_all(text, "$1");
        let result = Self::space_after_punctuation(&result);
        REPEATED_SPACES.replace_all(&result, " ").into_owned()
    }

    /// Insert a single space after punctuation that runs straight into a word
    ///
    /// Digits on both sides (`3.14`, `10:30`, `1,000`) are left alone.
    fn space_after_punctuation(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut result = String::with_capacity(text.len() + 8);

        for (i, &c) in chars.iter().enumerate() {
            result.push(c);

            if !is_punctuation(c) {
                continue;
            }

            let Some(&next) = chars.get(i + 1) else {
                continue;
            };

            if next.is_whitespace() || is_punctuation(next) || is_closing(next) {
                continue;
            }

            let between_digits = i > 0 && chars[i - 1].is_ascii_digit() && next.is_ascii_digit();
            if !between_digits {
                result.push(' ');
            }
        }

        result
    }
}

/// Normalize spacing around punctuation, see [`TextNormalizer`]
pub fn normalize(text: &str) -> String {
    TextNormalizer::normalize(text)
}
