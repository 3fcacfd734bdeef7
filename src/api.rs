/*!
 * Entry point for retrieving transcripts.
 *
 * `TranscriptApi` drives the whole pipeline for a video: fetch the watch page,
 * pass the consent page if one is served, extract the captions manifest and build
 * the `TranscriptList`. The convenience methods on top fetch the segments of the
 * best matching transcript directly.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::pin::pin;
use std::sync::Arc;

use crate::app_config::Config;
use crate::caption_xml::TranscriptSegment;
use crate::errors::{watch_url, TranscriptError, TransportError};
use crate::manifest::extract_captions_manifest;
use crate::transcript_list::TranscriptList;
use crate::transport::reqwest_client::ReqwestTransport;
use crate::transport::{decode_page_entities, ConsentCookieStore, Fetcher, Transport};

/// Form action of the consent page served instead of the watch page
pub const CONSENT_FORM_ACTION: &str = "action=\"https://consent.youtube.com/s\"";
/// Name of the consent cookie
pub const CONSENT_COOKIE_NAME: &str = "CONSENT";
/// Domain the consent cookie is set for
pub const CONSENT_COOKIE_DOMAIN: &str = ".youtube.com";
/// Language preference sent with every request unless configured otherwise
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US";

static CONSENT_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"name="v" value="(.*?)""#).unwrap()
});

/// Transcripts fetched by `TranscriptApi::get_transcripts`
#[derive(Debug, Clone, Default)]
pub struct BatchTranscripts {
    /// `(video id, segments)` in input order
    pub transcripts: Vec<(String, Vec<TranscriptSegment>)>,
    /// Failures in input order
    pub failed: Vec<TranscriptError>,
}

/// Which kinds of transcripts a selection considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranscriptKind {
    /// Manually created first, generated as fallback for the same code
    #[default]
    Any,
    ManuallyCreated,
    Generated,
}

/// How the transcript of a video is picked and fetched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranscriptSelection {
    /// Language codes in descending priority
    pub languages: Vec<String>,
    pub kind: TranscriptKind,
    /// Translate the picked transcript into this language code
    pub translate_to: Option<String>,
    /// Keep inline formatting tags
    pub preserve_formatting: bool,
}

impl TranscriptSelection {
    pub fn new<S: AsRef<str>>(languages: &[S]) -> Self {
        Self {
            languages: languages.iter().map(|code| code.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: TranscriptKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn translate_to(mut self, language_code: Option<String>) -> Self {
        self.translate_to = language_code;
        self
    }

    pub fn preserve_formatting(mut self, preserve_formatting: bool) -> Self {
        self.preserve_formatting = preserve_formatting;
        self
    }
}

/// Retrieves transcript lists and transcripts for videos
#[derive(Debug, Clone)]
pub struct TranscriptApi {
    fetcher: Fetcher,
    cookies: Arc<dyn ConsentCookieStore>,
    concurrent_requests: usize,
}

impl TranscriptApi {
    /// Create an API on top of the default reqwest transport
    pub fn new() -> Result<Self, TransportError> {
        Self::from_config(&Config::default())
    }

    /// Create an API on top of a reqwest transport built from `config`
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestTransport::from_config(&config.http)?);
        Ok(Self::with_transport(transport.clone(), transport)
            .accept_language(config.http.accept_language.as_str())
            .concurrent_requests(config.concurrent_requests))
    }

    /// Create an API on top of any transport and cookie store
    pub fn with_transport(transport: Arc<dyn Transport>, cookies: Arc<dyn ConsentCookieStore>) -> Self {
        Self {
            fetcher: Fetcher::new(transport, DEFAULT_ACCEPT_LANGUAGE),
            cookies,
            concurrent_requests: 1,
        }
    }

    /// Set the language preference header sent with every request
    pub fn accept_language(mut self, accept_language: &str) -> Self {
        self.fetcher = Fetcher::new(self.fetcher.transport(), accept_language);
        self
    }

    /// Set how many videos `get_transcripts` processes at once
    pub fn concurrent_requests(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    /// Retrieve the list of transcripts available for `video_id`
    pub async fn fetch_transcript_list(&self, video_id: &str) -> Result<TranscriptList, TranscriptError> {
        debug!("Fetching transcript list for {}", video_id);
        let html = self.fetch_watch_page_html(video_id).await?;
        let manifest = extract_captions_manifest(&html, video_id)?;
        let list = TranscriptList::build(video_id, manifest, self.fetcher.clone());
        info!(
            "Found {} transcript(s) for {}",
            list.manually_created().len() + list.generated().len(),
            video_id
        );
        Ok(list)
    }

    /// Fetch the watch page of `video_id`, passing the consent page if needed
    pub async fn fetch_watch_page_html(&self, video_id: &str) -> Result<String, TranscriptError> {
        let html = self.fetch_html(video_id).await?;
        if !html.contains(CONSENT_FORM_ACTION) {
            return Ok(html);
        }

        warn!("Consent page served for {}, setting consent cookie", video_id);
        self.create_consent_cookie(&html, video_id)?;

        let html = self.fetch_html(video_id).await?;
        if html.contains(CONSENT_FORM_ACTION) {
            return Err(TranscriptError::FailedToCreateConsentCookie {
                video_id: video_id.to_string(),
            });
        }
        Ok(html)
    }

    fn create_consent_cookie(&self, html: &str, video_id: &str) -> Result<(), TranscriptError> {
        let token = CONSENT_TOKEN_REGEX
            .captures(html)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| TranscriptError::FailedToCreateConsentCookie {
                video_id: video_id.to_string(),
            })?;

        self.cookies.set_cookie(
            CONSENT_COOKIE_NAME,
            &format!("YES+{}", token.as_str()),
            CONSENT_COOKIE_DOMAIN,
        );
        Ok(())
    }

    async fn fetch_html(&self, video_id: &str) -> Result<String, TranscriptError> {
        let body = self.fetcher.get_text(video_id, &watch_url(video_id)).await?;
        Ok(decode_page_entities(&body))
    }

    /// Fetch the segments of the best transcript for `video_id`.
    ///
    /// # Arguments
    /// * `video_id` - Id of the video (not its URL)
    /// * `languages` - Language codes in descending priority
    /// * `preserve_formatting` - Keep inline formatting tags
    pub async fn get_transcript<S: AsRef<str>>(
        &self,
        video_id: &str,
        languages: &[S],
        preserve_formatting: bool,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let selection = TranscriptSelection::new(languages).preserve_formatting(preserve_formatting);
        self.get_selected_transcript(video_id, &selection).await
    }

    /// Fetch the segments of the transcript `selection` picks for `video_id`
    pub async fn get_selected_transcript(
        &self,
        video_id: &str,
        selection: &TranscriptSelection,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let list = self.fetch_transcript_list(video_id).await?;
        let transcript = match selection.kind {
            TranscriptKind::Any => list.find_transcript(selection.languages.as_slice())?,
            TranscriptKind::ManuallyCreated => list.find_manually_created_transcript(selection.languages.as_slice())?,
            TranscriptKind::Generated => list.find_generated_transcript(selection.languages.as_slice())?,
        };
        debug!("Selected transcript {} for {}", transcript, video_id);

        match &selection.translate_to {
            Some(language_code) => {
                transcript
                    .translate(language_code)?
                    .fetch(selection.preserve_formatting)
                    .await
            }
            None => transcript.fetch(selection.preserve_formatting).await,
        }
    }

    /// Fetch transcripts for several videos.
    ///
    /// Up to `concurrent_requests` videos are processed at once and results keep the
    /// order of `video_ids`. Unless `continue_after_error` is set, the first failure in
    /// input order is returned and no further video is started.
    pub async fn get_transcripts<V: AsRef<str>, L: AsRef<str>>(
        &self,
        video_ids: &[V],
        languages: &[L],
        continue_after_error: bool,
        preserve_formatting: bool,
    ) -> Result<BatchTranscripts, TranscriptError> {
        let selection = TranscriptSelection::new(languages).preserve_formatting(preserve_formatting);
        self.get_selected_transcripts(video_ids, &selection, continue_after_error)
            .await
    }

    /// Same as `get_transcripts`, with the transcript of each video picked by `selection`
    pub async fn get_selected_transcripts<V: AsRef<str>>(
        &self,
        video_ids: &[V],
        selection: &TranscriptSelection,
        continue_after_error: bool,
    ) -> Result<BatchTranscripts, TranscriptError> {
        let mut results = pin!(stream::iter(video_ids.iter().map(|id| id.as_ref()))
            .map(|video_id| async move {
                let result = self.get_selected_transcript(video_id, selection).await;
                (video_id.to_string(), result)
            })
            .buffered(self.concurrent_requests));

        let mut batch = BatchTranscripts::default();
        while let Some((video_id, result)) = results.next().await {
            match result {
                Ok(segments) => batch.transcripts.push((video_id, segments)),
                Err(e) if continue_after_error => {
                    warn!("Skipping {}: {}", video_id, e);
                    batch.failed.push(e);
                }
                // Dropping the stream cancels the videos still in flight
                Err(e) => return Err(e),
            }
        }
        Ok(batch)
    }
}
