/*!
 * Error types for the ytcaptions library.
 *
 * `TranscriptError` is the catalog of domain failures. Every variant carries the
 * id of the video it refers to, and its message always embeds the video's watch URL.
 * `TransportError` and `CaptionXmlError` belong to the collaborators below the core
 * and are folded into a `TranscriptError` before they reach a caller.
 */

use std::fmt;
use thiserror::Error;

/// Watch page URL template for a video id
pub const WATCH_URL: &str = "https://www.youtube.com/watch?v={video_id}";

/// Build the watch page URL for a video id
pub fn watch_url(video_id: &str) -> String {
    WATCH_URL.replace("{video_id}", video_id)
}

/// Errors that can occur while retrieving a transcript
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    /// Generic fallback, optionally with the low-level reason
    CouldNotRetrieveTranscript {
        video_id: String,
        reason: Option<String>,
    },

    /// A request to the platform failed or returned a non-success status
    YouTubeRequestFailed {
        video_id: String,
        http_error: String,
    },

    /// The watch page carries no playability status
    VideoUnavailable { video_id: String },

    /// A URL was passed where a bare video id was expected
    InvalidVideoId { video_id: String },

    /// The platform answered with a captcha challenge
    TooManyRequests { video_id: String },

    /// The video has no captions block at all
    TranscriptsDisabled { video_id: String },

    /// The captions block exists but lists no tracks
    NoTranscriptAvailable { video_id: String },

    /// Translation was requested on a transcript without translation targets
    NotTranslatable { video_id: String },

    /// The requested translation target is not in the catalog
    TranslationLanguageNotAvailable { video_id: String },

    /// A cookie file could not be loaded
    CookiePathInvalid { video_id: String },

    /// The provided cookies are not valid
    CookiesInvalid { video_id: String },

    /// The consent page could not be passed
    FailedToCreateConsentCookie { video_id: String },

    /// None of the requested language codes matched an available transcript
    NoTranscriptFound {
        video_id: String,
        /// Language codes in the order they were requested
        requested_language_codes: Vec<String>,
        /// `(language code, transcript summary)` pairs that were searched
        available: Vec<(String, String)>,
    },
}

const ERROR_MESSAGE: &str = "Could not retrieve a transcript for the video {video_url}!";
const CAUSE_MESSAGE_INTRO: &str = "\nThis is most likely caused by:\n\n";

impl TranscriptError {
    /// Id of the video this error refers to
    pub fn video_id(&self) -> &str {
        match self {
            Self::CouldNotRetrieveTranscript { video_id, .. }
            | Self::YouTubeRequestFailed { video_id, .. }
            | Self::VideoUnavailable { video_id }
            | Self::InvalidVideoId { video_id }
            | Self::TooManyRequests { video_id }
            | Self::TranscriptsDisabled { video_id }
            | Self::NoTranscriptAvailable { video_id }
            | Self::NotTranslatable { video_id }
            | Self::TranslationLanguageNotAvailable { video_id }
            | Self::CookiePathInvalid { video_id }
            | Self::CookiesInvalid { video_id }
            | Self::FailedToCreateConsentCookie { video_id }
            | Self::NoTranscriptFound { video_id, .. } => video_id,
        }
    }

    /// Watch page URL of the video this error refers to
    pub fn watch_url(&self) -> String {
        watch_url(self.video_id())
    }

    /// Human readable explanation of the likely cause, if there is one
    pub fn cause(&self) -> Option<String> {
        match self {
            Self::CouldNotRetrieveTranscript { reason, .. } => reason.clone(),
            Self::YouTubeRequestFailed { http_error, .. } => {
                Some(format!("Request to YouTube failed: {}", http_error))
            }
            Self::VideoUnavailable { .. } => Some("The video is no longer available".to_string()),
            Self::InvalidVideoId { .. } => Some(
                "You provided an invalid video id. Make sure you are using the video id and NOT the url!\n\n\
                 Do NOT run: `api.fetch_transcript_list(\"https://www.youtube.com/watch?v=1234\")`\n\
                 Instead run: `api.fetch_transcript_list(\"1234\")`"
                    .to_string(),
            ),
            Self::TooManyRequests { .. } => Some(
                "YouTube is receiving too many requests from this IP and now requires solving a captcha to continue. \
                 One of the following things can be done to work around this:\n\
                 - Manually solve the captcha in a browser and export the cookie\n\
                 - Use a different IP address\n\
                 - Wait until the ban on your IP has been lifted"
                    .to_string(),
            ),
            Self::TranscriptsDisabled { .. } => Some("Subtitles are disabled for this video".to_string()),
            Self::NoTranscriptAvailable { .. } => {
                Some("No transcripts are available for this video".to_string())
            }
            Self::NotTranslatable { .. } => Some("The requested language is not translatable".to_string()),
            Self::TranslationLanguageNotAvailable { .. } => {
                Some("The requested translation language is not available".to_string())
            }
            Self::CookiePathInvalid { .. } => {
                Some("The provided cookie file was unable to be loaded".to_string())
            }
            Self::CookiesInvalid { .. } => {
                Some("The cookies provided are not valid (may have expired)".to_string())
            }
            Self::FailedToCreateConsentCookie { .. } => {
                Some("Failed to automatically give consent to saving cookies".to_string())
            }
            Self::NoTranscriptFound {
                requested_language_codes,
                available,
                ..
            } => {
                let available_description = if available.is_empty() {
                    "None".to_string()
                } else {
                    available
                        .iter()
                        .map(|(_, summary)| format!(" - {}", summary))
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                Some(format!(
                    "No transcripts were found for any of the requested language codes: {}\n\n{}",
                    requested_language_codes.join(","),
                    available_description
                ))
            }
        }
    }
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ERROR_MESSAGE.replace("{video_url}", &self.watch_url()))?;
        if let Some(cause) = self.cause() {
            write!(f, "{}{}", CAUSE_MESSAGE_INTRO, cause)?;
        }
        Ok(())
    }
}

/// Errors raised by a transport implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The request could not be sent or no response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    BodyRead(String),
}

/// Errors raised while parsing a caption XML body
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptionXmlError {
    /// The body is not well-formed XML
    #[error("Malformed caption XML at position {position}: {message}")]
    Malformed { position: u64, message: String },

    /// A timing attribute is not a decimal number
    #[error("Invalid `{attribute}` attribute value: {value:?}")]
    InvalidTiming { attribute: String, value: String },
}
