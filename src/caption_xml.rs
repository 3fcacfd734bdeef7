/*!
 * Caption XML parsing.
 *
 * Converts the timed-text XML body of a caption track into an ordered list of
 * segments. Inline markup inside the caption text is either stripped entirely or,
 * when formatting is preserved, filtered down to a fixed set of formatting tags.
 */

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::errors::CaptionXmlError;

/// Inline formatting tags kept when formatting is preserved
pub const FORMATTING_TAGS: [&str; 10] = [
    "strong", // important
    "em",     // emphasized
    "b",      // bold
    "i",      // italic
    "mark",   // marked
    "small",  // smaller
    "del",    // deleted
    "ins",    // inserted
    "sub",    // subscript
    "sup",    // superscript
];

/// One timed unit of transcript text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Caption text
    pub text: String,
    /// Offset from the start of the video, in seconds
    pub start: f64,
    /// Display duration in seconds
    pub duration: f64,
}

/// Open `<text>` element being collected
struct PendingSegment {
    start: f64,
    duration: f64,
    content: String,
    depth: usize,
}

/// Parse a caption XML body into segments, in document order.
///
/// Every `<text>` element becomes one segment unless its text content is empty.
/// Missing `start` or `dur` attributes default to `0.0`.
pub fn parse_segments(
    xml: &str,
    preserve_formatting: bool,
) -> Result<Vec<TranscriptSegment>, CaptionXmlError> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut pending: Option<PendingSegment> = None;

    loop {
        let event = reader.read_event().map_err(|e| CaptionXmlError::Malformed {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) => {
                if let Some(segment) = pending.as_mut() {
                    segment.depth += 1;
                } else if e.name().as_ref() == b"text" {
                    let (start, duration) = read_timing(e, reader.buffer_position() as u64)?;
                    pending = Some(PendingSegment {
                        start,
                        duration,
                        content: String::new(),
                        depth: 0,
                    });
                }
            }
            Event::End(_) => {
                let finished = match pending.as_mut() {
                    Some(segment) if segment.depth > 0 => {
                        segment.depth -= 1;
                        false
                    }
                    Some(_) => true,
                    None => false,
                };
                if finished {
                    if let Some(segment) = pending.take() {
                        if !segment.content.is_empty() {
                            segments.push(TranscriptSegment {
                                text: filter_markup(&segment.content, preserve_formatting),
                                start: segment.start,
                                duration: segment.duration,
                            });
                        }
                    }
                }
            }
            Event::Text(ref e) => {
                if let Some(segment) = pending.as_mut() {
                    match e.unescape() {
                        Ok(text) => segment.content.push_str(&text),
                        // HTML-only entities such as &nbsp; are not XML and are decoded as HTML
                        Err(_) => segment
                            .content
                            .push_str(&html_escape::decode_html_entities(&String::from_utf8_lossy(e))),
                    }
                }
            }
            Event::CData(e) => {
                if let Some(segment) = pending.as_mut() {
                    segment.content.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            // Self-closing <text/> has no content
            _ => {}
        }
    }

    Ok(segments)
}

fn read_timing(element: &BytesStart<'_>, position: u64) -> Result<(f64, f64), CaptionXmlError> {
    let mut start = 0.0;
    let mut duration = 0.0;

    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| CaptionXmlError::Malformed {
            position,
            message: e.to_string(),
        })?;
        let target = match attribute.key.as_ref() {
            b"start" => &mut start,
            b"dur" => &mut duration,
            _ => continue,
        };
        let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attribute.value).into_owned();
        *target = parse_seconds(&name, &raw)?;
    }

    Ok((start, duration))
}

fn parse_seconds(attribute: &str, value: &str) -> Result<f64, CaptionXmlError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed.parse::<f64>().map_err(|_| CaptionXmlError::InvalidTiming {
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}

/// Remove inline markup from caption text.
///
/// Entities left over after XML decoding (double escaping such as `&amp;lt;i&amp;gt;`)
/// are decoded first, so every tag goes through the filter. A tag runs from `<` to the
/// next `>`. Without `preserve_formatting` every tag is removed. With it, tags named in
/// [`FORMATTING_TAGS`] (opening or closing, any case) are kept verbatim.
pub fn filter_markup(text: &str, preserve_formatting: bool) -> String {
    let decoded = html_escape::decode_html_entities(text);
    let mut output = String::with_capacity(decoded.len());
    let mut rest: &str = &decoded;

    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open..open + close + 1];
        output.push_str(&rest[..open]);
        if preserve_formatting && is_formatting_tag(tag) {
            output.push_str(tag);
        }
        rest = &rest[open + close + 1..];
    }
    output.push_str(rest);
    output
}

fn is_formatting_tag(tag: &str) -> bool {
    let inner = tag.trim_start_matches('<');
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    FORMATTING_TAGS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&name))
}
