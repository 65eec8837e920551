use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Target languages arrive from the command line, the configuration file or
/// a caller, in whatever shape the translation backend accepts: ISO 639-1
/// (`he`), ISO 639-2/T or /B (`heb`, `fre`), legacy aliases (`iw`) and
/// region-tagged codes (`zh-CN`, `pt_BR`). These helpers reduce all of them
/// to one canonical ISO form.

/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Deprecated two-letter codes still emitted by translation backends
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("iw", "he"),
    ("ji", "yi"),
    ("in", "id"),
    ("jw", "jv"),
];

/// Strip a region or script subtag (`zh-CN` -> `zh`) and lowercase
fn base_code(code: &str) -> String {
    let trimmed = code.trim().to_lowercase();
    match trimmed.split(['-', '_']).next() {
        Some(base) => base.to_string(),
        None => trimmed,
    }
}

/// Look up the isolang entry for any supported code shape
fn lookup(code: &str) -> Option<Language> {
    let base = base_code(code);

    let base = LEGACY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == base)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(base);

    match base.len() {
        2 => Language::from_639_1(&base),
        3 => {
            let terminology = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == base)
                .map(|(_, terminology)| *terminology)
                .unwrap_or(base.as_str());
            Language::from_639_3(terminology)
        }
        _ => None,
    }
}

/// Check whether a code names a known language
pub fn is_valid_language_code(code: &str) -> bool {
    lookup(code).is_some()
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    lookup(code)
        .map(|lang| lang.to_639_3().to_string())
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let lang = lookup(code)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    Ok(match lang.to_639_1() {
        Some(part1) => part1.to_string(),
        None => lang.to_639_3().to_string(),
    })
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (lookup(code1), lookup(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = lookup(code)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}
