/*!
 * Tests for time-indexed subtitle lookup
 */

use linguacue::caption::Subtitle;
use linguacue::errors::TimelineError;
use linguacue::timeline::SubtitleTimeline;

fn sub(start: f64, end: f64, text: &str) -> Subtitle {
    Subtitle::new(start, end, text).unwrap()
}

#[test]
fn test_current_at_withAbuttingCues_shouldFollowFirstMatch() {
    let timeline = SubtitleTimeline::from_subtitles(vec![sub(0.0, 2.0, "a"), sub(2.0, 4.0, "b")]);

    assert_eq!(timeline.current_at(1.0).map(Subtitle::text), Some("a"));
    assert_eq!(timeline.current_at(2.0).map(Subtitle::text), Some("a"));
    assert_eq!(timeline.current_at(3.0).map(Subtitle::text), Some("b"));
    assert!(timeline.current_at(5.0).is_none());
    assert!(timeline.current_at(-1.0).is_none());
}

#[test]
fn test_current_at_withEmptyTimeline_shouldReturnNone() {
    let timeline = SubtitleTimeline::from_subtitles(Vec::new());
    assert!(timeline.is_empty());
    assert!(timeline.current_at(0.0).is_none());
    assert!(timeline.duration().is_none());
}

#[test]
fn test_current_at_withNestedCue_shouldReturnOuterWhileItCovers() {
    let timeline = SubtitleTimeline::from_subtitles(vec![
        sub(0.0, 10.0, "outer"),
        sub(3.0, 4.0, "inner"),
        sub(11.0, 12.0, "after"),
    ]);

    assert_eq!(timeline.current_at(3.5).map(Subtitle::text), Some("outer"));
    assert!(timeline.current_at(10.5).is_none());
    assert_eq!(timeline.current_at(11.0).map(Subtitle::text), Some("after"));
}

#[test]
fn test_in_range_shouldRequireFullContainment() {
    let timeline = SubtitleTimeline::from_subtitles(vec![
        sub(0.0, 2.0, "a"),
        sub(2.0, 4.0, "b"),
        sub(3.5, 6.0, "c"),
    ]);

    let texts: Vec<&str> = timeline.in_range(0.0, 4.0).into_iter().map(Subtitle::text).collect();
    assert_eq!(texts, vec!["a", "b"]);
    assert!(timeline.in_range(4.5, 5.0).is_empty());
}

#[test]
fn test_attach_translations_shouldServeBilingualLookup() {
    let timeline = SubtitleTimeline::from_subtitles(vec![sub(0.0, 2.0, "hola"), sub(2.5, 4.0, "adiós")]);
    let translated = timeline
        .attach_translations(vec![Some("hello".to_string()), None])
        .unwrap();

    assert_eq!(translated.len(), 2);
    assert_eq!(translated.translated_count(), 1);
    let entry = translated.current_at(1.0).unwrap();
    assert_eq!(entry.subtitle.text(), "hola");
    assert_eq!(entry.translation.as_deref(), Some("hello"));
    assert!(translated.current_at(3.0).unwrap().translation.is_none());
    assert!(translated.current_at(2.2).is_none());
}

#[test]
fn test_attach_translations_withTooMany_shouldNotTruncate() {
    let timeline = SubtitleTimeline::from_subtitles(vec![sub(0.0, 1.0, "uno")]);
    let result = timeline.attach_translations(vec![None, None]);

    assert_eq!(result.unwrap_err(), TimelineError::LengthMismatch { expected: 1, actual: 2 });
}
