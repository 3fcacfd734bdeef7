/*!
 * Caption manifest extraction.
 *
 * The watch page embeds the player response as JSON. Its `"captions":` field holds the
 * list of caption tracks and the translation catalog. This module locates that object
 * inside the raw HTML, validates it into typed structures, and classifies the cases
 * where it is missing.
 */

use log::debug;
use serde::Deserialize;

use crate::errors::TranscriptError;

/// Marker preceding the captions JSON object
pub const CAPTIONS_MARKER: &str = "\"captions\":";
/// Field following the captions object in the player response
pub const VIDEO_DETAILS_BOUNDARY: &str = ",\"videoDetails";
/// Present on pages gated by a captcha challenge
pub const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";
/// Present on every page with a player response
pub const PLAYABILITY_MARKER: &str = "\"playabilityStatus\":";

/// A language a translatable transcript can be translated into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationLanguage {
    /// Display name, e.g. "German"
    pub language: String,
    /// Language code, e.g. "de"
    pub language_code: String,
}

/// One caption track entry of the manifest
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub base_url: String,
    /// Display name of the track language
    pub name: String,
    pub language_code: String,
    /// `Some("asr")` for automatically generated tracks
    pub kind: Option<String>,
    pub is_translatable: bool,
}

impl CaptionTrack {
    /// Whether the track was produced by speech recognition
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Validated captions manifest of one video
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionsManifest {
    pub caption_tracks: Vec<CaptionTrack>,
    pub translation_languages: Vec<TranslationLanguage>,
}

// Raw JSON shapes. These never leave this module.

#[derive(Deserialize)]
struct RawCaptions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    renderer: Option<RawRenderer>,
}

#[derive(Deserialize)]
struct RawRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<RawCaptionTrack>>,
    #[serde(rename = "translationLanguages", default)]
    translation_languages: Vec<RawTranslationLanguage>,
}

#[derive(Deserialize)]
struct RawCaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(default)]
    name: RawText,
    #[serde(rename = "languageCode")]
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(rename = "isTranslatable", default)]
    is_translatable: bool,
}

#[derive(Deserialize)]
struct RawTranslationLanguage {
    #[serde(rename = "languageCode")]
    language_code: String,
    #[serde(rename = "languageName", default)]
    language_name: RawText,
}

/// Text rendered either as `simpleText` or as a list of `runs`
#[derive(Deserialize, Default)]
struct RawText {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<RawRun>,
}

#[derive(Deserialize)]
struct RawRun {
    #[serde(default)]
    text: String,
}

impl RawText {
    fn into_text(self) -> String {
        match self.simple_text {
            Some(text) => text,
            None => self.runs.into_iter().map(|run| run.text).collect(),
        }
    }
}

/// Extract the captions manifest from a watch page.
///
/// When the captions marker is missing, the page is classified in this order:
/// URL passed as id, captcha page, unavailable video, disabled captions.
pub fn extract_captions_manifest(html: &str, video_id: &str) -> Result<CaptionsManifest, TranscriptError> {
    let Some(captions_json) = locate_captions_json(html) else {
        return Err(classify_missing_captions(html, video_id));
    };
    debug!("Found captions JSON for {} ({} bytes)", video_id, captions_json.len());

    let captions: Option<RawCaptions> =
        serde_json::from_str(captions_json).map_err(|e| TranscriptError::CouldNotRetrieveTranscript {
            video_id: video_id.to_string(),
            reason: Some(format!("Failed to parse the captions JSON: {}", e)),
        })?;

    let renderer = captions
        .and_then(|c| c.renderer)
        .ok_or_else(|| TranscriptError::TranscriptsDisabled {
            video_id: video_id.to_string(),
        })?;

    let raw_tracks = match renderer.caption_tracks {
        Some(tracks) if !tracks.is_empty() => tracks,
        _ => {
            return Err(TranscriptError::NoTranscriptAvailable {
                video_id: video_id.to_string(),
            })
        }
    };

    let caption_tracks = raw_tracks
        .into_iter()
        .map(|track| CaptionTrack {
            base_url: track.base_url,
            name: track.name.into_text(),
            language_code: track.language_code,
            kind: track.kind,
            is_translatable: track.is_translatable,
        })
        .collect();

    let translation_languages = renderer
        .translation_languages
        .into_iter()
        .map(|language| TranslationLanguage {
            language: language.language_name.into_text(),
            language_code: language.language_code,
        })
        .collect();

    Ok(CaptionsManifest {
        caption_tracks,
        translation_languages,
    })
}

fn classify_missing_captions(html: &str, video_id: &str) -> TranscriptError {
    let video_id = video_id.to_string();
    if video_id.starts_with("http://") || video_id.starts_with("https://") {
        TranscriptError::InvalidVideoId { video_id }
    } else if html.contains(RECAPTCHA_MARKER) {
        TranscriptError::TooManyRequests { video_id }
    } else if !html.contains(PLAYABILITY_MARKER) {
        TranscriptError::VideoUnavailable { video_id }
    } else {
        TranscriptError::TranscriptsDisabled { video_id }
    }
}

/// Slice of `html` holding the JSON value after the captions marker.
///
/// The object end is found by brace matching. If the braces never balance, the
/// text up to the `,"videoDetails` boundary is used instead.
fn locate_captions_json(html: &str) -> Option<&str> {
    let start = html.find(CAPTIONS_MARKER)? + CAPTIONS_MARKER.len();
    let rest = &html[start..];

    match matching_brace_end(rest) {
        Some(end) => Some(&rest[..end]),
        None => Some(rest.split(VIDEO_DETAILS_BOUNDARY).next().unwrap_or(rest)),
    }
}

/// Byte offset just past the brace closing the object that opens `text`
fn matching_brace_end(text: &str) -> Option<usize> {
    let offset = text.len() - text.trim_start().len();
    if !text[offset..].starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text[offset..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + index + 1);
                }
            }
            _ => {}
        }
    }

    None
}
