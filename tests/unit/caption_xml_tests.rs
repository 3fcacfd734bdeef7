/*!
 * Tests for caption XML parsing
 */

use ytcaptions::caption_xml::{filter_markup, parse_segments, TranscriptSegment};
use ytcaptions::errors::CaptionXmlError;

use crate::common;

#[test]
fn test_parseSegments_withSampleBody_shouldKeepDocumentOrder() {
    let segments = parse_segments(&common::caption_xml(), false).unwrap();

    assert_eq!(segments.len(), 3);
    assert_eq!(
        segments[0],
        TranscriptSegment {
            text: "Hey there".to_string(),
            start: 0.0,
            duration: 1.54,
        }
    );
    assert_eq!(segments[1].text, "how are you");
    assert_eq!(segments[1].start, 1.54);
    assert_eq!(segments[1].duration, 4.16);
    assert_eq!(segments[2].start, 5.7);
}

#[test]
fn test_parseSegments_escapedFormattingTag_withPreserve_shouldKeepTag() {
    let xml = r#"<transcript><text start="1.0" dur="2.0">&lt;b&gt;bold&lt;/b&gt; plain</text></transcript>"#;

    let segments = parse_segments(xml, true).unwrap();
    assert_eq!(segments[0].text, "<b>bold</b> plain");
}

#[test]
fn test_parseSegments_escapedFormattingTag_withoutPreserve_shouldStripTag() {
    let xml = r#"<transcript><text start="1.0" dur="2.0">&lt;b&gt;bold&lt;/b&gt; plain</text></transcript>"#;

    let segments = parse_segments(xml, false).unwrap();
    assert_eq!(segments[0].text, "bold plain");
}

#[test]
fn test_parseSegments_nonFormattingTag_withPreserve_shouldStripTag() {
    let xml = r#"<transcript><text start="0" dur="1">&lt;font color="white"&gt;hi&lt;/font&gt; &lt;i&gt;there&lt;/i&gt;</text></transcript>"#;

    let segments = parse_segments(xml, true).unwrap();
    assert_eq!(segments[0].text, "hi <i>there</i>");
}

#[test]
fn test_parseSegments_emptyTextElements_shouldBeSkipped() {
    let xml = r#"<transcript><text start="0" dur="1"></text><text start="1" dur="1"/><text start="2" dur="1">kept</text></transcript>"#;

    let segments = parse_segments(xml, false).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "kept");
    assert_eq!(segments[0].start, 2.0);
}

#[test]
fn test_parseSegments_missingTiming_shouldDefaultToZero() {
    let xml = r#"<transcript><text>no timing</text><text start="3.5">no duration</text></transcript>"#;

    let segments = parse_segments(xml, false).unwrap();
    assert_eq!(segments[0].start, 0.0);
    assert_eq!(segments[0].duration, 0.0);
    assert_eq!(segments[1].start, 3.5);
    assert_eq!(segments[1].duration, 0.0);
}

#[test]
fn test_parseSegments_invalidTiming_shouldFail() {
    let xml = r#"<transcript><text start="soon" dur="1">x</text></transcript>"#;

    let result = parse_segments(xml, false);
    assert_eq!(
        result,
        Err(CaptionXmlError::InvalidTiming {
            attribute: "start".to_string(),
            value: "soon".to_string(),
        })
    );
}

#[test]
fn test_parseSegments_mismatchedTags_shouldFailAsMalformed() {
    let xml = r#"<transcript><text start="0" dur="1">x</wrong></transcript>"#;

    let result = parse_segments(xml, false);
    assert!(matches!(result, Err(CaptionXmlError::Malformed { .. })), "got {:?}", result);
}

#[test]
fn test_parseSegments_noTextElements_shouldReturnEmpty() {
    let segments = parse_segments("<transcript></transcript>", false).unwrap();
    assert!(segments.is_empty());
}

#[test]
fn test_parseSegments_doubleEscapedEntities_shouldDecodeToText() {
    let xml = r#"<transcript><text start="0" dur="1">it&amp;#39;s &amp;quot;fine&amp;quot;</text></transcript>"#;

    let segments = parse_segments(xml, false).unwrap();
    assert_eq!(segments[0].text, "it's \"fine\"");
}

#[test]
fn test_filterMarkup_allFormattingTags_shouldBeKept() {
    let text = "<strong>a</strong><em>b</em><b>c</b><i>d</i><mark>e</mark>\
                <small>f</small><del>g</del><ins>h</ins><sub>i</sub><sup>j</sup>";
    assert_eq!(filter_markup(text, true), text);
    assert_eq!(filter_markup(text, false), "abcdefghij");
}

#[test]
fn test_filterMarkup_tagWithAttributes_shouldKeepWholeTag() {
    assert_eq!(filter_markup("<i class=\"x\">y</i>", true), "<i class=\"x\">y</i>");
}

#[test]
fn test_parseSegments_htmlOnlyEntity_shouldDecodeAndKeepOtherSegments() {
    let xml = r#"<transcript><text start="0" dur="1">a&nbsp;b</text><text start="1" dur="1">fine</text></transcript>"#;

    let segments = parse_segments(xml, false).unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].text, "a\u{a0}b");
    assert_eq!(segments[1].text, "fine");
}

#[test]
fn test_parseSegments_doubleEscapedTag_withoutPreserve_shouldStripTag() {
    let xml = r#"<transcript><text start="0" dur="1">&amp;lt;i&amp;gt;x&amp;lt;/i&amp;gt; y</text></transcript>"#;

    assert_eq!(parse_segments(xml, false).unwrap()[0].text, "x y");
    assert_eq!(parse_segments(xml, true).unwrap()[0].text, "<i>x</i> y");
}

#[test]
fn test_parseSegments_unquotedAttribute_shouldFailAsMalformed() {
    let xml = r#"<transcript><text start="5" dur=2>x</text></transcript>"#;

    let result = parse_segments(xml, false);
    assert!(matches!(result, Err(CaptionXmlError::Malformed { .. })), "got {:?}", result);
}
