/*!
 * # ytcaptions - Video transcripts without an API key
 *
 * A Rust library for retrieving the captions of a video from its public watch page.
 *
 * ## Features
 *
 * - List every transcript of a video, manually created and generated
 * - Pick a transcript by language code priority
 * - Machine translation of translatable transcripts
 * - Optional preservation of inline formatting tags
 * - Output as JSON, plain text, SRT or WebVTT
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `api`: `TranscriptApi`, the entry point driving the whole pipeline
 * - `manifest`: locating and validating the captions JSON inside the watch page
 * - `transcript_list`: the set of transcripts of a video and the language lookup
 * - `transcript`: a single caption track, fetch and translate
 * - `caption_xml`: parsing the caption XML into timed segments
 * - `transport`: HTTP and cookie store collaborators:
 *   - `transport::reqwest_client`: reqwest based transport
 *   - `transport::mock`: scripted transport for tests
 * - `formatters`: rendering segments for output
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod api;
pub mod app_config;
pub mod caption_xml;
pub mod errors;
pub mod formatters;
pub mod manifest;
pub mod transcript;
pub mod transcript_list;
pub mod transport;

// Re-export main types for easier usage
pub use api::{BatchTranscripts, TranscriptApi, TranscriptKind, TranscriptSelection};
pub use app_config::Config;
pub use caption_xml::{parse_segments, TranscriptSegment};
pub use errors::{CaptionXmlError, TranscriptError, TransportError};
pub use manifest::{extract_captions_manifest, CaptionsManifest, TranslationLanguage};
pub use transcript::Transcript;
pub use transcript_list::TranscriptList;
