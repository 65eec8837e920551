/*!
 * Byte decoding for subtitle sources.
 *
 * Subtitle files in the wild rarely declare their encoding. Decoding walks a
 * fallback chain that always ends in text:
 *
 * 1. a byte-order mark, when present, selects UTF-8 or UTF-16
 * 2. strict UTF-8
 * 3. the legacy Windows code page for the language's script
 * 4. a raw byte-to-character mapping that cannot fail
 */

use encoding_rs::{
    Encoding, WINDOWS_1250, WINDOWS_1251, WINDOWS_1252, WINDOWS_1253, WINDOWS_1254,
    WINDOWS_1255, WINDOWS_1256, WINDOWS_1257, WINDOWS_1258, WINDOWS_874,
};
use log::debug;
use std::fmt;

use crate::language_utils;

/// Which step of the fallback chain produced the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    /// Encoding announced by a byte-order mark
    Bom(&'static Encoding),
    /// Plain UTF-8 without BOM
    Utf8,
    /// Legacy single-byte code page picked from the language
    Legacy(&'static Encoding),
    /// Every byte mapped to the code point of the same value
    Raw,
}

impl fmt::Display for DetectedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bom(encoding) => write!(f, "{} (BOM)", encoding.name()),
            Self::Utf8 => write!(f, "UTF-8"),
            Self::Legacy(encoding) => write!(f, "{}", encoding.name()),
            Self::Raw => write!(f, "raw bytes"),
        }
    }
}

/// Decoded subtitle text
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// The decoded text, without any byte-order mark
    pub text: String,
    /// Where the text came from
    pub encoding: DetectedEncoding,
}

/// Pick the legacy Windows code page used for a language's script
///
/// Unknown or Latin-script languages get windows-1252.
pub fn legacy_encoding_for(language: &str) -> &'static Encoding {
    let code = language_utils::normalize_to_part1_or_part2t(language)
        .unwrap_or_else(|_| language.trim().to_lowercase());

    match code.as_str() {
        "he" | "yi" => WINDOWS_1255,
        "ar" | "fa" | "ur" | "ps" | "ku" => WINDOWS_1256,
        "ru" | "uk" | "be" | "bg" | "sr" | "mk" | "kk" | "ky" | "tg" | "mn" => WINDOWS_1251,
        "el" => WINDOWS_1253,
        "tr" | "az" => WINDOWS_1254,
        "lt" | "lv" | "et" => WINDOWS_1257,
        "vi" => WINDOWS_1258,
        "th" => WINDOWS_874,
        "pl" | "cs" | "sk" | "hu" | "sl" | "hr" | "bs" | "ro" | "sq" => WINDOWS_1250,
        _ => WINDOWS_1252,
    }
}

/// Decode subtitle bytes into text, never failing
///
/// `language` selects the legacy code page tried when the bytes are not
/// valid UTF-8 (or decode to nothing but whitespace).
pub fn decode(bytes: &[u8], language: &str) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        debug!("Decoded {} bytes using BOM-announced {}", bytes.len(), encoding.name());
        return DecodedText {
            text: text.into_owned(),
            encoding: DetectedEncoding::Bom(encoding),
        };
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        if !text.trim().is_empty() {
            return DecodedText {
                text: text.to_string(),
                encoding: DetectedEncoding::Utf8,
            };
        }
    }

    let legacy = legacy_encoding_for(language);
    if let Some(text) = legacy.decode_without_bom_handling_and_without_replacement(bytes) {
        if !text.trim().is_empty() {
            debug!("Source is not UTF-8, decoded with {}", legacy.name());
            return DecodedText {
                text: text.into_owned(),
                encoding: DetectedEncoding::Legacy(legacy),
            };
        }
    }

    debug!("Falling back to raw byte mapping for {} bytes", bytes.len());
    DecodedText {
        text: bytes.iter().map(|&b| char::from(b)).collect(),
        encoding: DetectedEncoding::Raw,
    }
}
