use jobwatch_browser::{BrowserActions, BrowserEngine, BrowserLauncher, ChromiumLauncher};
use std::time::Duration;

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_browser_engine_creation() {
    let engine = BrowserEngine::new().await;
    assert!(engine.is_ok(), "Failed to create browser engine");
    engine.unwrap().close().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_navigation() {
    let engine = BrowserEngine::new().await.unwrap();

    let result = engine
        .navigate("https://example.com", Duration::from_secs(60))
        .await;
    assert!(result.is_ok(), "Navigation failed");

    assert_eq!(engine.extract_text("h1").await.unwrap(), "Example Domain");
    assert!(engine.is_visible("h1").await.unwrap());
    assert!(engine.content().await.unwrap().contains("Example Domain"));

    engine.close().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_wait_for_missing_selector_times_out() {
    let launcher = ChromiumLauncher::default();
    let page = launcher.launch().await.unwrap();

    page.navigate("https://example.com", Duration::from_secs(60))
        .await
        .unwrap();
    let waited = page
        .wait_for_selector(".does-not-exist", Duration::from_millis(500))
        .await;
    assert!(waited.is_err());

    page.close().await.unwrap();
    // Closing twice is a no-op
    page.close().await.unwrap();
}
