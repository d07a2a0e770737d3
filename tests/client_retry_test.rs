// tests/client_retry_test.rs

use std::sync::Arc;
use xiaoet_m3u8::{client::RobustClient, config::AppConfig, error::AppError};

#[tokio::test(flavor = "multi_thread")]
async fn test_client_retries_transient_server_errors() {
    // --- 1. Arrange (准备阶段) ---
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    // 第一次请求 -> 503，第二次 -> 200
    let mock_503 = server
        .mock("POST", "/test")
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(1)
        .create_async()
        .await;
    let mock_200 = server
        .mock("POST", "/test")
        .with_status(200)
        .with_body("Success!")
        .expect(1)
        .create_async()
        .await;

    // 使用默认的 AppConfig，它包含了重试设置
    let config = Arc::new(AppConfig::default());
    let client = RobustClient::new(config).expect("Failed to create client");

    // --- 2. Act (执行阶段) ---
    let response = client
        .post_form(&format!("{}/test", server_url), &[("app_id", "app_test")])
        .await
        .expect("Request should eventually succeed");

    // --- 3. Assert (断言阶段) ---
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Success!");
    mock_503.assert_async().await;
    mock_200.assert_async().await;
}

#[tokio::test]
async fn test_client_maps_unauthorized_to_cookie_invalid() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    let mock_401 = server
        .mock("POST", "/nav")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let client = RobustClient::new(Arc::new(AppConfig::default())).unwrap();
    let result = client
        .post_form(&format!("{}/nav", server_url), &[("app_id", "app_test")])
        .await;

    assert!(matches!(result, Err(AppError::CookieInvalid)));
    mock_401.assert_async().await;
}

#[tokio::test]
async fn test_envelope_error_code_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let mut config = AppConfig::default();
    config
        .url_templates
        .insert("NAVIGATION".to_string(), format!("{}/nav", server.url()));

    let _mock = server
        .mock("POST", "/nav")
        .with_status(200)
        .with_body(r#"{"code": 403, "msg": "无权限", "data": null}"#)
        .create_async()
        .await;

    let client = RobustClient::new(Arc::new(config)).unwrap();
    let result: Result<serde_json::Value, _> = client.fetch_form("NAVIGATION", &[]).await;

    match result {
        Err(AppError::Api { code, msg }) => {
            assert_eq!(code, 403);
            assert_eq!(msg, "无权限");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_unparsable_body_names_the_url() {
    let mut server = mockito::Server::new_async().await;
    let mut config = AppConfig::default();
    let url = format!("{}/nav", server.url());
    config.url_templates.insert("NAVIGATION".to_string(), url.clone());

    let _mock = server
        .mock("POST", "/nav")
        .with_status(200)
        .with_body("<html>login</html>")
        .create_async()
        .await;

    let client = RobustClient::new(Arc::new(config)).unwrap();
    let result: Result<serde_json::Value, _> = client.fetch_form("NAVIGATION", &[]).await;

    assert!(matches!(result, Err(AppError::ApiParseFailed { url: ref u, .. }) if *u == url));
}
