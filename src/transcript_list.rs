/*!
 * The set of transcripts available for one video.
 *
 * Transcripts are split into manually created and generated tracks, each keyed by
 * language code. Lookups take an ordered list of language codes and return the first
 * match, trying every searched kind for a code before moving on to the next code.
 */

use log::debug;
use std::fmt;
use std::sync::Arc;

use crate::errors::TranscriptError;
use crate::manifest::{CaptionsManifest, TranslationLanguage};
use crate::transcript::Transcript;
use crate::transport::Fetcher;

/// Transcripts keyed by language code, in first-insertion order
#[derive(Debug, Clone, Default)]
pub struct TranscriptMap {
    entries: Vec<Transcript>,
}

impl TranscriptMap {
    /// Insert a transcript, replacing any transcript with the same language code
    fn insert(&mut self, transcript: Transcript) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.language_code() == transcript.language_code())
        {
            Some(existing) => *existing = transcript,
            None => self.entries.push(transcript),
        }
    }

    pub fn get(&self, language_code: &str) -> Option<&Transcript> {
        self.entries
            .iter()
            .find(|transcript| transcript.language_code() == language_code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transcript> {
        self.entries.iter()
    }

    pub fn language_codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Transcript::language_code)
    }
}

/// All transcripts available for a video
#[derive(Debug, Clone)]
pub struct TranscriptList {
    video_id: String,
    manually_created: TranscriptMap,
    generated: TranscriptMap,
    translation_languages: Arc<[TranslationLanguage]>,
}

impl TranscriptList {
    /// Build the transcript list from a validated manifest.
    ///
    /// Tracks of kind `asr` go to the generated map, everything else to the manually
    /// created map. A later track with the same language code replaces the earlier one.
    /// Only tracks marked translatable get the translation catalog.
    pub fn build(video_id: impl Into<String>, manifest: CaptionsManifest, fetcher: Fetcher) -> Self {
        let video_id = video_id.into();
        let translation_languages: Arc<[TranslationLanguage]> = Arc::from(manifest.translation_languages);
        let not_translatable: Arc<[TranslationLanguage]> = Arc::from(Vec::new());

        let mut manually_created = TranscriptMap::default();
        let mut generated = TranscriptMap::default();

        for track in manifest.caption_tracks {
            let is_generated = track.is_generated();
            let catalog = if track.is_translatable {
                Arc::clone(&translation_languages)
            } else {
                Arc::clone(&not_translatable)
            };
            let transcript = Transcript::new(
                fetcher.clone(),
                video_id.clone(),
                track.base_url,
                track.name,
                track.language_code,
                is_generated,
                catalog,
            );

            if is_generated {
                generated.insert(transcript);
            } else {
                manually_created.insert(transcript);
            }
        }

        debug!(
            "Built transcript list for {}: {} manual, {} generated, {} translation languages",
            video_id,
            manually_created.len(),
            generated.len(),
            translation_languages.len()
        );

        Self {
            video_id,
            manually_created,
            generated,
            translation_languages,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn manually_created(&self) -> &TranscriptMap {
        &self.manually_created
    }

    pub fn generated(&self) -> &TranscriptMap {
        &self.generated
    }

    /// Languages any translatable transcript of this video can be translated into
    pub fn translation_languages(&self) -> &[TranslationLanguage] {
        &self.translation_languages
    }

    /// All transcripts, manually created first
    pub fn transcripts(&self) -> impl Iterator<Item = &Transcript> {
        self.manually_created.iter().chain(self.generated.iter())
    }

    /// Find a transcript for the first language code that has one.
    ///
    /// Manually created transcripts are preferred over generated ones for the same
    /// code, but a code earlier in `language_codes` always wins over a later one.
    pub fn find_transcript<S: AsRef<str>>(&self, language_codes: &[S]) -> Result<&Transcript, TranscriptError> {
        self.find_in(language_codes, &[&self.manually_created, &self.generated])
    }

    /// Find a generated transcript for the first language code that has one
    pub fn find_generated_transcript<S: AsRef<str>>(
        &self,
        language_codes: &[S],
    ) -> Result<&Transcript, TranscriptError> {
        self.find_in(language_codes, &[&self.generated])
    }

    /// Find a manually created transcript for the first language code that has one
    pub fn find_manually_created_transcript<S: AsRef<str>>(
        &self,
        language_codes: &[S],
    ) -> Result<&Transcript, TranscriptError> {
        self.find_in(language_codes, &[&self.manually_created])
    }

    fn find_in<'a, S: AsRef<str>>(
        &'a self,
        language_codes: &[S],
        search_order: &[&'a TranscriptMap],
    ) -> Result<&'a Transcript, TranscriptError> {
        for language_code in language_codes {
            for transcripts in search_order {
                if let Some(transcript) = transcripts.get(language_code.as_ref()) {
                    return Ok(transcript);
                }
            }
        }

        Err(TranscriptError::NoTranscriptFound {
            video_id: self.video_id.clone(),
            requested_language_codes: language_codes.iter().map(|c| c.as_ref().to_string()).collect(),
            available: search_order
                .iter()
                .flat_map(|transcripts| transcripts.iter())
                .map(|transcript| (transcript.language_code().to_string(), transcript.to_string()))
                .collect(),
        })
    }
}

fn language_description(lines: Vec<String>) -> String {
    if lines.is_empty() {
        return "None".to_string();
    }
    lines
        .iter()
        .map(|line| format!(" - {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for TranscriptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let manual = language_description(self.manually_created.iter().map(|t| t.to_string()).collect());
        let generated = language_description(self.generated.iter().map(|t| t.to_string()).collect());
        let translation = language_description(
            self.translation_languages
                .iter()
                .map(|l| format!("{} (\"{}\")", l.language_code, l.language))
                .collect(),
        );

        write!(
            f,
            "For this video ({}) transcripts are available in the following languages:\n\n\
             (MANUALLY CREATED)\n{}\n\n\
             (GENERATED)\n{}\n\n\
             (TRANSLATION LANGUAGES)\n{}",
            self.video_id, manual, generated, translation
        )
    }
}
