/*!
 * Tests for caption format detection and parsing
 */

use linguacue::caption::{detect_format, parse_captions, CaptionFormat, Subtitle};
use linguacue::errors::CaptionError;
use linguacue::time_codec;

use crate::common;

#[test]
fn test_time_codec_parse_withKnownForms_shouldReturnSeconds() {
    assert_eq!(time_codec::parse("01:02:03.500"), 3723.5);
    assert_eq!(time_codec::parse("02:03.250"), 123.25);
    assert_eq!(time_codec::parse("7.5"), 7.5);
}

#[test]
fn test_time_codec_parse_withGarbage_shouldReturnZero() {
    assert_eq!(time_codec::parse("abc"), 0.0);
    assert_eq!(time_codec::parse(""), 0.0);
    assert_eq!(time_codec::parse("-4"), 0.0);
}

#[test]
fn test_time_codec_format_shouldPadFields() {
    assert_eq!(time_codec::format(3723.5), "01:02:03.500");
}

#[test]
fn test_detect_format_shouldRecognizeBothFormats() {
    assert_eq!(detect_format(common::SAMPLE_VTT), Some(CaptionFormat::WebVtt));
    assert_eq!(detect_format(common::SAMPLE_TIMED_TEXT), Some(CaptionFormat::TimedText));
    assert_eq!(detect_format("1\n00:00:01,000 --> 00:00:02,000\nsrt"), None);
}

#[test]
fn test_parse_captions_withWebVtt_shouldJoinLinesAndStripTags() {
    common::init_logging();
    let subtitles = parse_captions(common::SAMPLE_VTT);

    assert_eq!(subtitles.len(), 2);
    assert_eq!(subtitles[0].start(), 1.0);
    assert_eq!(subtitles[0].end(), 4.0);
    assert_eq!(subtitles[0].text(), "el gato corre rápido");
    assert_eq!(subtitles[1].start(), 5.0);
    assert_eq!(subtitles[1].end(), 9.5);
    assert_eq!(subtitles[1].text(), "la casa es muy grande");
}

#[test]
fn test_parse_captions_withTimedText_shouldDecodeEntities() {
    let subtitles = parse_captions(common::SAMPLE_TIMED_TEXT);

    assert_eq!(subtitles.len(), 2);
    assert_eq!(subtitles[0].text(), "Tom & Jerry");
    assert_eq!(subtitles[0].end(), 2.5);
    assert_eq!(subtitles[1].text(), "hola amigos 'míos'");
    assert_eq!(subtitles[1].start(), 3.0);
    assert_eq!(subtitles[1].end(), 4.5);
}

#[test]
fn test_parse_captions_withUnorderedCues_shouldSortByStart() {
    let content = "WEBVTT\n\n00:00:05.000 --> 00:00:06.000\nsegundo\n\n00:00:01.000 --> 00:00:02.000\nprimero\n";
    let subtitles = parse_captions(content);

    let texts: Vec<&str> = subtitles.iter().map(Subtitle::text).collect();
    assert_eq!(texts, vec!["primero", "segundo"]);
}

#[test]
fn test_parse_captions_withReversedCue_shouldDropIt() {
    let content = "WEBVTT\n\n00:00:05.000 --> 00:00:04.000\nal revés\n\n00:00:06.000 --> 00:00:07.000\nbien\n";
    let subtitles = parse_captions(content);

    assert_eq!(subtitles.len(), 1);
    assert_eq!(subtitles[0].text(), "bien");
}

#[test]
fn test_parse_captions_withUnknownPayload_shouldReturnEmpty() {
    assert!(parse_captions("just some text").is_empty());
    assert!(parse_captions("").is_empty());
}

#[test]
fn test_subtitle_new_withInvalidInput_shouldReject() {
    assert!(matches!(Subtitle::new(2.0, 1.0, "x"), Err(CaptionError::InvalidCue { .. })));
    assert!(Subtitle::new(-1.0, 1.0, "x").is_err());
    assert!(Subtitle::new(0.0, 1.0, "   ").is_err());
    assert!(Subtitle::new(1.0, 1.0, "instant").is_ok());
}
