use log::debug;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::caption_xml::{parse_segments, TranscriptSegment};
use crate::errors::TranscriptError;
use crate::manifest::TranslationLanguage;
use crate::transport::Fetcher;

/// Query parameter selecting the translation target of a caption track
pub const TRANSLATION_PARAMETER: &str = "tlang";

/// One retrievable caption track of a video
#[derive(Debug, Clone)]
pub struct Transcript {
    fetcher: Fetcher,
    video_id: String,
    url: String,
    language: String,
    language_code: String,
    is_generated: bool,
    translation_languages: Arc<[TranslationLanguage]>,
}

impl Transcript {
    /// Create a transcript for a caption track.
    ///
    /// `translation_languages` is shared between all translatable transcripts of a
    /// list; pass an empty slice for a track that cannot be translated.
    pub fn new(
        fetcher: Fetcher,
        video_id: impl Into<String>,
        url: impl Into<String>,
        language: impl Into<String>,
        language_code: impl Into<String>,
        is_generated: bool,
        translation_languages: Arc<[TranslationLanguage]>,
    ) -> Self {
        Self {
            fetcher,
            video_id: video_id.into(),
            url: url.into(),
            language: language.into(),
            language_code: language_code.into(),
            is_generated,
            translation_languages,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Display name of the language
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn is_generated(&self) -> bool {
        self.is_generated
    }

    pub fn translation_languages(&self) -> &[TranslationLanguage] {
        &self.translation_languages
    }

    pub fn is_translatable(&self) -> bool {
        !self.translation_languages.is_empty()
    }

    /// URL the caption XML is fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the caption track.
    ///
    /// # Arguments
    /// * `preserve_formatting` - Keep inline formatting tags such as `<b>` and `<i>`
    pub async fn fetch(&self, preserve_formatting: bool) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        debug!("Fetching {} transcript for {}", self.language_code, self.video_id);
        let body = self.fetcher.get_text(&self.video_id, &self.url).await?;

        let segments = parse_segments(&body, preserve_formatting).map_err(|e| {
            TranscriptError::CouldNotRetrieveTranscript {
                video_id: self.video_id.clone(),
                reason: Some(e.to_string()),
            }
        })?;
        debug!("Parsed {} segments for {} ({})", segments.len(), self.video_id, self.language_code);

        Ok(segments)
    }

    /// Derive the machine translation of this transcript into `language_code`.
    ///
    /// The translated transcript is always generated and cannot be translated again.
    pub fn translate(&self, language_code: &str) -> Result<Transcript, TranscriptError> {
        if !self.is_translatable() {
            return Err(TranscriptError::NotTranslatable {
                video_id: self.video_id.clone(),
            });
        }

        let target = self
            .translation_languages
            .iter()
            .find(|language| language.language_code == language_code)
            .ok_or_else(|| TranscriptError::TranslationLanguageNotAvailable {
                video_id: self.video_id.clone(),
            })?;

        Ok(Transcript {
            fetcher: self.fetcher.clone(),
            video_id: self.video_id.clone(),
            url: with_translation_target(&self.url, language_code),
            language: target.language.clone(),
            language_code: language_code.to_string(),
            is_generated: true,
            translation_languages: Arc::from(Vec::new()),
        })
    }
}

fn with_translation_target(url: &str, language_code: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed
                .query_pairs_mut()
                .append_pair(TRANSLATION_PARAMETER, language_code);
            parsed.into()
        }
        // Relative or otherwise unparsable urls get the parameter appended verbatim
        Err(_) => {
            let separator = if url.contains('?') { '&' } else { '?' };
            format!("{}{}{}={}", url, separator, TRANSLATION_PARAMETER, language_code)
        }
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (\"{}\")", self.language_code, self.language)?;
        if self.is_translatable() {
            write!(f, "[TRANSLATABLE]")?;
        }
        Ok(())
    }
}
