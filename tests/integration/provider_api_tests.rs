/*!
 * Provider and gateway behavior against local stand-ins
 */

use linguacue::providers::google::GoogleTranslate;
use linguacue::providers::mock::MockProvider;
use linguacue::providers::mymemory::MyMemory;
use linguacue::providers::{FallbackProvider, Provider, TranslationRequest};
use linguacue::translation::{TranslationCache, TranslationGateway};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `body` as JSON to every connection; returns the base URL
async fn serve_json(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}/get", addr)
}

#[tokio::test]
async fn test_mymemory_complete_withLocalServer_shouldReturnTranslation() {
    let endpoint = serve_json(r#"{"responseData":{"translatedText":"the cat"},"responseStatus":200}"#).await;
    let provider = MyMemory::new(endpoint, 5).unwrap();

    let response = provider
        .complete(TranslationRequest::new("el gato", "es", "en"))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.text, "the cat");
}

#[tokio::test]
async fn test_mymemory_complete_withQuotaExceeded_shouldReportRateLimit() {
    let endpoint =
        serve_json(r#"{"responseData":{"translatedText":"MYMEMORY WARNING"},"responseStatus":"429","responseDetails":"quota"}"#)
            .await;
    let provider = MyMemory::new(endpoint, 5).unwrap();

    let result = provider.complete(TranslationRequest::new("hola", "es", "en")).await;
    assert!(matches!(result, Err(linguacue::errors::ProviderError::RateLimitExceeded(_))));
}

#[tokio::test]
async fn test_google_complete_withLocalServer_shouldJoinSegments() {
    let endpoint = serve_json(r#"[[["The cat ","el gato ",null],["runs","corre",null]],null,"es"]"#).await;
    let provider = GoogleTranslate::new(endpoint, 5).unwrap();

    let response = provider
        .complete(TranslationRequest::new("el gato corre", "es", "en"))
        .await
        .unwrap();
    assert_eq!(response.text, "The cat runs");
}

#[tokio::test]
async fn test_gateway_withUnreachableProvider_shouldReturnOriginalText() {
    let provider = MyMemory::new("http://127.0.0.1:9/get", 2).unwrap();
    let gateway = TranslationGateway::new(Arc::new(provider), TranslationCache::new(true));

    assert_eq!(gateway.translate("hola", "es", "en").await, "hola");
    assert!(gateway.cache().is_empty());
}

#[tokio::test]
async fn test_fallback_withFailingPrimary_shouldUseSecondary() {
    let primary = MockProvider::failing();
    let secondary = MockProvider::working().with_dictionary([("hola", "hello")]);
    let fallback = FallbackProvider::new(vec![Arc::new(primary.clone()), Arc::new(secondary.clone())]);
    let gateway = TranslationGateway::new(Arc::new(fallback), TranslationCache::new(true));

    assert_eq!(gateway.translate("hola", "es", "en").await, "hello");
    assert_eq!(primary.request_count(), 1);
    assert_eq!(secondary.request_count(), 1);

    // Second lookup is served from the cache
    assert_eq!(gateway.translate("HOLA", "es", "en").await, "hello");
    assert_eq!(secondary.request_count(), 1);
}

#[tokio::test]
async fn test_gateway_withIntermittentProvider_shouldRetryOnNextCall() {
    let provider = MockProvider::intermittent(1);
    let gateway = TranslationGateway::new(Arc::new(provider.clone()), TranslationCache::new(true));

    // Every request fails, so nothing gets cached and each call reaches the provider
    assert_eq!(gateway.translate("hola", "es", "en").await, "hola");
    assert_eq!(gateway.translate("hola", "es", "en").await, "hola");
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_word_definition_withEchoProvider_shouldReturnNone() {
    let gateway = TranslationGateway::new(Arc::new(MockProvider::echo()), TranslationCache::new(true));
    assert!(gateway.word_definition("gato", "es", "en").await.is_none());
}

#[tokio::test]
async fn test_fallback_test_connection_withOneHealthyProvider_shouldSucceed() {
    let fallback = FallbackProvider::new(vec![Arc::new(MockProvider::failing()), Arc::new(MockProvider::working())]);
    assert!(fallback.test_connection().await.is_ok());
}
