/*!
 * Tests for the transcript list: partitioning, language lookup and display
 */

use ytcaptions::errors::TranscriptError;
use ytcaptions::manifest::extract_captions_manifest;
use ytcaptions::transport::mock::MockTransport;
use ytcaptions::TranscriptList;

use crate::common::{self, track, translation_language, VIDEO_ID};

fn list_from(captions: String) -> TranscriptList {
    let manifest = extract_captions_manifest(&common::watch_page(&captions), VIDEO_ID).unwrap();
    let (fetcher, _) = common::fetcher_with(MockTransport::new());
    TranscriptList::build(VIDEO_ID, manifest, fetcher)
}

fn default_list() -> TranscriptList {
    list_from(common::default_captions())
}

#[test]
fn test_build_shouldPartitionByKind() {
    let list = default_list();

    assert_eq!(list.video_id(), VIDEO_ID);
    assert_eq!(list.manually_created().language_codes().collect::<Vec<_>>(), vec!["en", "de"]);
    assert_eq!(list.generated().language_codes().collect::<Vec<_>>(), vec!["en"]);
    assert!(list.generated().get("en").unwrap().is_generated());
    assert!(!list.manually_created().get("de").unwrap().is_generated());
    assert_eq!(list.transcripts().count(), 3);
}

#[test]
fn test_build_duplicateLanguageCode_shouldKeepLastEntry() {
    let mut second = track("en", "English (UK)", None, false);
    second["baseUrl"] = serde_json::json!("https://www.youtube.com/api/timedtext?lang=en-GB");
    let list = list_from(common::captions_json(
        vec![track("en", "English", None, true), second, track("fr", "French", None, false)],
        vec![],
    ));

    assert_eq!(list.manually_created().len(), 2);
    let english = list.manually_created().get("en").unwrap();
    assert_eq!(english.language(), "English (UK)");
    assert_eq!(english.url(), "https://www.youtube.com/api/timedtext?lang=en-GB");
    // Replacement keeps the position of the first entry
    assert_eq!(list.manually_created().language_codes().collect::<Vec<_>>(), vec!["en", "fr"]);
}

#[test]
fn test_build_translationCatalog_shouldOnlyReachTranslatableTracks() {
    let list = default_list();

    let english = list.manually_created().get("en").unwrap();
    let german = list.manually_created().get("de").unwrap();

    assert!(english.is_translatable());
    assert_eq!(english.translation_languages().len(), 2);
    assert!(!german.is_translatable());
    assert!(german.translation_languages().is_empty());
    assert_eq!(list.translation_languages().len(), 2);
}

#[test]
fn test_findTranscript_languagePriority_shouldBeatMapOrder() {
    let list = list_from(common::captions_json(
        vec![
            track("en", "English", None, false),
            track("de", "German (auto-generated)", Some("asr"), false),
        ],
        vec![],
    ));

    let found = list.find_transcript(&["de", "en"]).unwrap();
    assert_eq!(found.language_code(), "de");
    assert!(found.is_generated());
}

#[test]
fn test_findTranscript_sameCodeInBothMaps_shouldPreferManual() {
    let list = default_list();

    let found = list.find_transcript(&["en"]).unwrap();
    assert!(!found.is_generated());
    assert_eq!(found.language(), "English");
}

#[test]
fn test_findTranscript_firstCodeMissing_shouldFallBackToNextCode() {
    let list = default_list();

    let found = list.find_transcript(&["fr", "de"]).unwrap();
    assert_eq!(found.language_code(), "de");
}

#[test]
fn test_findTranscript_noMatch_shouldFailNoTranscriptFound() {
    let list = default_list();

    match list.find_transcript(&["fr", "es"]) {
        Err(TranscriptError::NoTranscriptFound {
            video_id,
            requested_language_codes,
            available,
        }) => {
            assert_eq!(video_id, VIDEO_ID);
            assert_eq!(requested_language_codes, vec!["fr".to_string(), "es".to_string()]);
            assert_eq!(available.len(), 3);
            assert_eq!(available[0].1, "en (\"English\")[TRANSLATABLE]");
        }
        other => panic!("Expected NoTranscriptFound, got {:?}", other),
    }
}

#[test]
fn test_findTranscript_emptyCodes_shouldFailNoTranscriptFound() {
    let list = default_list();
    let codes: [&str; 0] = [];

    assert!(matches!(
        list.find_transcript(&codes),
        Err(TranscriptError::NoTranscriptFound { .. })
    ));
}

#[test]
fn test_findGeneratedTranscript_shouldIgnoreManual() {
    let list = default_list();

    let found = list.find_generated_transcript(&["en"]).unwrap();
    assert!(found.is_generated());

    match list.find_generated_transcript(&["de"]) {
        Err(TranscriptError::NoTranscriptFound { available, .. }) => {
            // Only the searched kind is reported
            assert_eq!(available.len(), 1);
            assert_eq!(available[0].0, "en");
        }
        other => panic!("Expected NoTranscriptFound, got {:?}", other),
    }
}

#[test]
fn test_findManuallyCreatedTranscript_shouldIgnoreGenerated() {
    let list = list_from(common::captions_json(
        vec![track("en", "English (auto-generated)", Some("asr"), false)],
        vec![],
    ));

    assert!(matches!(
        list.find_manually_created_transcript(&["en"]),
        Err(TranscriptError::NoTranscriptFound { .. })
    ));
}

#[test]
fn test_findTranscript_withOwnedStrings_shouldWork() {
    let list = default_list();
    let codes = vec!["de".to_string()];

    assert_eq!(list.find_transcript(&codes).unwrap().language_code(), "de");
}

#[test]
fn test_display_shouldListSections() {
    let list = default_list();

    let expected = format!(
        "For this video ({}) transcripts are available in the following languages:\n\n\
         (MANUALLY CREATED)\n\
         \x20- en (\"English\")[TRANSLATABLE]\n\
         \x20- de (\"German\")\n\n\
         (GENERATED)\n\
         \x20- en (\"English (auto-generated)\")[TRANSLATABLE]\n\n\
         (TRANSLATION LANGUAGES)\n\
         \x20- de (\"German\")\n\
         \x20- fr (\"French\")",
        VIDEO_ID
    );
    assert_eq!(list.to_string(), expected);
}

#[test]
fn test_display_emptySections_shouldSayNone() {
    let list = list_from(common::captions_json(vec![track("en", "English", None, false)], vec![]));

    let rendered = list.to_string();
    assert!(rendered.contains("(GENERATED)\nNone\n\n"));
    assert!(rendered.ends_with("(TRANSLATION LANGUAGES)\nNone"));
}

#[test]
fn test_build_catalogEntries_shouldKeepManifestOrder() {
    let list = list_from(common::captions_json(
        vec![track("en", "English", None, true)],
        vec![
            translation_language("zh-Hans", "Chinese (Simplified)"),
            translation_language("af", "Afrikaans"),
        ],
    ));

    let codes: Vec<_> = list
        .translation_languages()
        .iter()
        .map(|language| language.language_code.as_str())
        .collect();
    assert_eq!(codes, vec!["zh-Hans", "af"]);
}
