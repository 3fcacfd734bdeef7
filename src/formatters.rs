/*!
 * Output formatters for fetched transcripts.
 *
 * - `JsonFormatter`: segments as a JSON array (compact or pretty)
 * - `TextFormatter`: one line of text per segment
 * - `SrtFormatter`: SubRip cues
 * - `WebVttFormatter`: WebVTT cues
 */

use anyhow::{Context, Result};

use crate::app_config::OutputFormat;
use crate::caption_xml::TranscriptSegment;

/// Common trait for all transcript formatters
pub trait Formatter: Send + Sync {
    /// Render a single transcript
    fn format_transcript(&self, segments: &[TranscriptSegment]) -> Result<String>;

    /// Render several transcripts into one document
    fn format_transcripts(&self, transcripts: &[Vec<TranscriptSegment>]) -> Result<String> {
        let rendered = transcripts
            .iter()
            .map(|segments| self.format_transcript(segments))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join("\n\n\n"))
    }
}

/// Get the formatter for an output format
pub fn for_format(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter { pretty: false }),
        OutputFormat::Pretty => Box::new(JsonFormatter { pretty: true }),
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Srt => Box::new(SrtFormatter),
        OutputFormat::WebVtt => Box::new(WebVttFormatter),
    }
}

/// JSON array of `{text, start, duration}` objects
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.context("Failed to serialize transcript to JSON")
    }
}

impl Formatter for JsonFormatter {
    fn format_transcript(&self, segments: &[TranscriptSegment]) -> Result<String> {
        self.to_json(segments)
    }

    // A list of transcripts is a single JSON array of arrays
    fn format_transcripts(&self, transcripts: &[Vec<TranscriptSegment>]) -> Result<String> {
        self.to_json(transcripts)
    }
}

/// Plain text, one segment per line
#[derive(Debug, Clone, Default)]
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_transcript(&self, segments: &[TranscriptSegment]) -> Result<String> {
        Ok(segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// SubRip (`.srt`) cues
#[derive(Debug, Clone, Default)]
pub struct SrtFormatter;

impl Formatter for SrtFormatter {
    fn format_transcript(&self, segments: &[TranscriptSegment]) -> Result<String> {
        let cues: Vec<String> = cue_times(segments)
            .into_iter()
            .enumerate()
            .map(|(i, (start, end, text))| {
                format!(
                    "{}\n{} --> {}\n{}",
                    i + 1,
                    format_timestamp(start, ','),
                    format_timestamp(end, ','),
                    text
                )
            })
            .collect();
        Ok(format!("{}\n", cues.join("\n\n")))
    }
}

/// WebVTT (`.vtt`) cues
#[derive(Debug, Clone, Default)]
pub struct WebVttFormatter;

impl Formatter for WebVttFormatter {
    fn format_transcript(&self, segments: &[TranscriptSegment]) -> Result<String> {
        let cues: Vec<String> = cue_times(segments)
            .into_iter()
            .map(|(start, end, text)| {
                format!(
                    "{} --> {}\n{}",
                    format_timestamp(start, '.'),
                    format_timestamp(end, '.'),
                    text
                )
            })
            .collect();
        Ok(format!("WEBVTT\n\n{}\n", cues.join("\n\n")))
    }
}

/// `(start, end, text)` per segment, in seconds.
///
/// The end is `start + duration`, pulled back to the next segment's start when the
/// two would overlap.
fn cue_times(segments: &[TranscriptSegment]) -> Vec<(f64, f64, &str)> {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let mut end = segment.start + segment.duration;
            if let Some(next) = segments.get(i + 1) {
                if next.start < end {
                    end = next.start;
                }
            }
            (segment.start, end, segment.text.as_str())
        })
        .collect()
}

/// Format seconds as `HH:MM:SS<sep>mmm`
pub fn format_timestamp(seconds: f64, millis_separator: char) -> String {
    let ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, secs, millis_separator, millis)
}
