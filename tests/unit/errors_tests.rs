/*!
 * Tests for error types
 */

use linguacue::errors::{AppError, CaptionError, ProviderError, QuizError, SessionError, StoreError, TimelineError};

#[test]
fn test_provider_error_display_shouldIncludeStatus() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "slow down".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 429 - slow down");
    assert_eq!(ProviderError::Timeout(10).to_string(), "Request timed out after 10 seconds");
}

#[test]
fn test_timeline_error_display_shouldIncludeCounts() {
    let error = TimelineError::LengthMismatch { expected: 3, actual: 2 };
    assert!(error.to_string().contains("3 subtitles"));
    assert!(error.to_string().contains("2 translations"));
}

#[test]
fn test_app_error_from_shouldWrapEachKind() {
    assert!(matches!(AppError::from(CaptionError::NoCaptions("v".into())), AppError::Caption(_)));
    assert!(matches!(AppError::from(QuizError::NoVocabulary), AppError::Quiz(_)));
    assert!(matches!(AppError::from(ProviderError::EmptyResponse), AppError::Provider(_)));
    assert!(matches!(
        AppError::from(SessionError::Stale {
            captured: "a".into(),
            current: "b".into()
        }),
        AppError::Session(_)
    ));
    assert!(matches!(AppError::from(StoreError::Backend("x".into())), AppError::Store(_)));
}

#[test]
fn test_app_error_fromAnyhow_shouldKeepMessage() {
    let error: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(error.to_string(), "Unknown error: boom");
}

#[test]
fn test_store_error_fromSerde_shouldConvert() {
    let serde_error = serde_json::from_str::<u32>("nope").unwrap_err();
    let error: StoreError = serde_error.into();
    assert!(matches!(error, StoreError::Serialization(_)));
}
