/*!
 * Tests for byte decoding with encoding fallback
 */

use encoding_rs::{UTF_16LE, WINDOWS_1251, WINDOWS_1255, WINDOWS_1256};
use subtrans::decoding::legacy_encoding_for;
use subtrans::{decode, DetectedEncoding};

/// Test that plain UTF-8 is decoded as-is
#[test]
fn test_decode_withUtf8_shouldKeepText() {
    let decoded = decode("1\n00:00:01,000 --> 00:00:02,000\nCafé\n".as_bytes(), "fr");
    assert_eq!(decoded.encoding, DetectedEncoding::Utf8);
    assert!(decoded.text.contains("Café"));
}

/// Test that a UTF-8 BOM is stripped from the text
#[test]
fn test_decode_withUtf8Bom_shouldStripMark() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"WEBVTT\n\n");

    let decoded = decode(&bytes, "en");

    assert!(matches!(decoded.encoding, DetectedEncoding::Bom(_)));
    assert_eq!(decoded.text, "WEBVTT\n\n");
}

/// Test that UTF-16 sources announced by a BOM are decoded
#[test]
fn test_decode_withUtf16LeBom_shouldDecode() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "Hello".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }

    let decoded = decode(&bytes, "en");

    assert_eq!(decoded.encoding, DetectedEncoding::Bom(UTF_16LE));
    assert_eq!(decoded.text, "Hello");
}

/// Test that Hebrew legacy bytes fall back to windows-1255
#[test]
fn test_decode_withWindows1255Bytes_shouldUseLanguageCodePage() {
    let (bytes, _, _) = WINDOWS_1255.encode("שלום");

    let decoded = decode(&bytes, "he");

    assert_eq!(decoded.encoding, DetectedEncoding::Legacy(WINDOWS_1255));
    assert_eq!(decoded.text, "שלום");
}

/// Test that Cyrillic legacy bytes fall back to windows-1251
#[test]
fn test_decode_withWindows1251Bytes_shouldUseLanguageCodePage() {
    let (bytes, _, _) = WINDOWS_1251.encode("Привет");
    let decoded = decode(&bytes, "ru");
    assert_eq!(decoded.text, "Привет");
}

/// Test the language to code page table
#[test]
fn test_legacyEncodingFor_shouldFollowScript() {
    assert_eq!(legacy_encoding_for("he"), WINDOWS_1255);
    assert_eq!(legacy_encoding_for("iw"), WINDOWS_1255);
    assert_eq!(legacy_encoding_for("ara"), WINDOWS_1256);
    assert_eq!(legacy_encoding_for("xx").name(), "windows-1252");
}

/// Test that decoding never fails, whatever the bytes
#[test]
fn test_decode_withArbitraryBytes_shouldAlwaysProduceText() {
    let bytes: Vec<u8> = (0u8..=255).collect();
    let decoded = decode(&bytes, "en");
    assert!(!decoded.text.is_empty());
}
