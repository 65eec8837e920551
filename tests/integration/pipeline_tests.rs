/*!
 * End-to-end pipeline tests with mock translation backends
 */

use subtrans::errors::TranslationError;
use subtrans::providers::mock::{MockBehavior, MockTranslator};
use subtrans::translation::cache::CacheKey;
use subtrans::{CueSequence, SubtitleFormat, TranslationCache};
use crate::common::{self, StaticFetcher};

const HELLO_SRT: &str = "1
00:00:01,000 --> 00:00:02,000
Hello, world!

2
00:00:03,000 --> 00:00:04,000
Goodbye.
";

const FOUR_CUES_SRT: &str = "1
00:00:01,000 --> 00:00:02,000
A

2
00:00:03,000 --> 00:00:04,000
B

3
00:00:05,000 --> 00:00:06,000
C

4
00:00:07,000 --> 00:00:08,000
D
";

/// Test the Hebrew scenario: translated text is normalized, timing kept verbatim
#[tokio::test]
async fn test_translateSubtitle_toHebrew_shouldNormalizePunctuation() {
    let mock = MockTranslator::with_dictionary([
        ("Hello, world!", "שלום , עולם !"),
        ("Goodbye.", "להתראות ."),
    ]);
    let pipeline = common::mock_orchestrator(&mock, 2500, TranslationCache::in_memory(), StaticFetcher::default());

    let output = pipeline.translate_subtitle(HELLO_SRT.as_bytes(), Some("srt"), "he").await.unwrap();

    assert_eq!(
        output.content,
        "1\n00:00:01,000 --> 00:00:02,000\nשלום, עולם!\n\n2\n00:00:03,000 --> 00:00:04,000\nלהתראות.\n\n"
    );
    assert_eq!(output.format, SubtitleFormat::Srt);
    assert_eq!(output.stats.chunks_translated, 2);
    assert_eq!(mock.received_languages(), vec!["he", "he"]);
}

/// Test that cue order and timing survive intermittent backend failures
#[tokio::test]
async fn test_translateSubtitle_withIntermittentFailures_shouldKeepOrder() {
    common::init_logging();
    let mock = MockTranslator::intermittent(2);
    let pipeline = common::mock_orchestrator(&mock, 2500, TranslationCache::in_memory(), StaticFetcher::default());

    let output = pipeline.translate_subtitle(FOUR_CUES_SRT.as_bytes(), None, "fr").await.unwrap();
    let cues = CueSequence::parse(&output.content, SubtitleFormat::Srt);
    let original = CueSequence::parse(FOUR_CUES_SRT, SubtitleFormat::Srt);

    let texts: Vec<&str> = cues.iter().map(|cue| cue.text.as_str()).collect();
    assert_eq!(texts, vec!["[fr] A", "B", "[fr] C", "D"]);
    for (translated, source) in cues.iter().zip(original.iter()) {
        assert_eq!(translated.timeline, source.timeline);
    }
    assert_eq!(output.stats.chunks_failed, 2);
    assert!(output.is_cacheable());
}

/// Test that a failing backend leaves the whole document in its original language
#[tokio::test]
async fn test_translateSource_withFailingBackend_shouldPassTextThroughUncached() {
    let source = "https://example.com/hello.srt";
    let mock = MockTranslator::failing();
    let cache = TranslationCache::in_memory();
    let pipeline = common::mock_orchestrator(
        &mock,
        2500,
        cache.clone(),
        StaticFetcher::new([(source, HELLO_SRT.as_bytes())]),
    );

    let content = pipeline.translate_source(source, None, "he").await.unwrap();

    assert_eq!(content, CueSequence::parse(HELLO_SRT, SubtitleFormat::Srt).render(SubtitleFormat::Srt));
    assert!(cache.get(&CacheKey::new(source, "he")).await.is_none());
}

/// Test that an unreachable backend fails the request
#[tokio::test]
async fn test_translateSubtitle_withUnreachableBackend_shouldFail() {
    let mock = MockTranslator::unreachable();
    let pipeline = common::mock_orchestrator(&mock, 2500, TranslationCache::in_memory(), StaticFetcher::default());

    let result = pipeline.translate_subtitle(HELLO_SRT.as_bytes(), None, "he").await;

    match result {
        Err(TranslationError::BackendUnreachable { attempts, last_error }) => {
            assert_eq!(attempts, 2);
            assert!(last_error.is_unreachable());
        }
        other => panic!("expected BackendUnreachable, got {:?}", other.map(|o| o.content)),
    }
}

/// Test that a cached translation is served without calling the backend
#[tokio::test]
async fn test_translateSource_secondRequest_shouldBeServedFromCache() {
    let source = "https://example.com/hello.srt";
    let mock = MockTranslator::working();
    let fetcher = StaticFetcher::new([(source, HELLO_SRT.as_bytes())]);
    let pipeline = common::mock_orchestrator(&mock, 2500, TranslationCache::in_memory(), fetcher.clone());

    let first = pipeline.translate_source(source, None, "he").await.unwrap();
    let calls_after_first = mock.call_count();
    let second = pipeline.translate_source(source, None, "he").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(calls_after_first, 2);
    assert_eq!(mock.call_count(), 2);
    assert_eq!(fetcher.fetch_count(), 1);
    assert_eq!(pipeline.cache().stats().hits, 1);
}

/// Test that each target language gets its own translation and cache entry
#[tokio::test]
async fn test_translateSource_withTwoLanguages_shouldTranslateEach() {
    let source = "https://example.com/hello.srt";
    let mock = MockTranslator::working();
    let cache = TranslationCache::in_memory();
    let pipeline = common::mock_orchestrator(
        &mock,
        2500,
        cache.clone(),
        StaticFetcher::new([(source, HELLO_SRT.as_bytes())]),
    );

    let hebrew = pipeline.translate_source(source, None, "he").await.unwrap();
    let arabic = pipeline.translate_source(source, None, "ar").await.unwrap();

    assert!(hebrew.contains("[he] Hello, world!"));
    assert!(arabic.contains("[ar] Goodbye."));
    assert_eq!(cache.len().await.unwrap(), 2);
    assert_eq!(mock.received_languages(), vec!["he", "he", "ar", "ar"]);
}

/// Test that concurrent requests for one key translate only once
#[tokio::test]
async fn test_translateSource_concurrentSameKey_shouldTranslateOnce() {
    let source = "https://example.com/hello.srt";
    let mock = MockTranslator::new(MockBehavior::Slow { delay_ms: 30 });
    let fetcher = StaticFetcher::new([(source, HELLO_SRT.as_bytes())]);
    let pipeline = common::mock_orchestrator(&mock, 2500, TranslationCache::in_memory(), fetcher.clone());

    let (first, second) = tokio::join!(
        pipeline.translate_source(source, None, "he"),
        pipeline.translate_source(source, None, "he"),
    );

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(mock.call_count(), 2);
    assert_eq!(fetcher.fetch_count(), 1);
}

/// Test that long cues are sent in chunks that reassemble to the original
#[tokio::test]
async fn test_translateSubtitle_withLongCue_shouldSendChunksInOrder() {
    let content = "1\n00:00:01,000 --> 00:00:05,000\nHello world, how are you?\n";
    let mock = MockTranslator::with_dictionary(Vec::<(String, String)>::new());
    let pipeline = common::mock_orchestrator(&mock, 10, TranslationCache::in_memory(), StaticFetcher::default());

    let output = pipeline.translate_subtitle(content.as_bytes(), None, "he").await.unwrap();

    assert_eq!(mock.call_count(), 4);
    assert_eq!(mock.received_texts().concat(), "Hello world, how are you?");
    assert!(output.content.contains("Hello world, how are you?"));
}

/// Test that an unknown target language is rejected before any work
#[tokio::test]
async fn test_translateSource_withUnknownLanguage_shouldFailEarly() {
    let mock = MockTranslator::working();
    let fetcher = StaticFetcher::new([("a.srt", HELLO_SRT.as_bytes())]);
    let pipeline = common::mock_orchestrator(&mock, 2500, TranslationCache::in_memory(), fetcher.clone());

    let result = pipeline.translate_source("a.srt", None, "klingon").await;

    assert!(matches!(result, Err(TranslationError::UnsupportedLanguage(_))));
    assert_eq!(fetcher.fetch_count(), 0);
    assert_eq!(mock.call_count(), 0);
}
