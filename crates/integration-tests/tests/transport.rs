//! Timeouts, network failures, and error messages.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::{Value, json};
use spark_canvas_client::core::Page;
use spark_canvas_client::{
    ApiClient, ApiError, ClientConfig, GENERIC_ERROR_MESSAGE, Method, RequestOptions, Session,
};
use spark_canvas_integration_tests::TestApp;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_slow_response_times_out() {
    let app = TestApp::start_with("/", Session::in_memory(), |config| {
        config.with_timeout(Duration::from_millis(100))
    })
    .await;
    app.log_in("abc");

    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&app.server)
        .await;

    let err = app.client.list_images(Page::default()).await.unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(matches!(err, ApiError::Timeout(d) if d == Duration::from_millis(100)));
    assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    // A timeout is not a rejected session
    assert!(app.session.is_authenticated());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Port 9 (discard) is closed on test machines
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let client = ApiClient::builder(config).build().unwrap();

    let err = client.list_collections().await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_non_json_error_uses_generic_message() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&app.server)
        .await;

    let err = app.client.list_collections().await.unwrap_err();

    assert_eq!(err.status().map(|status| status.as_u16()), Some(502));
    assert_eq!(err.user_message(), "An error occurred");
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/tags/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&app.server)
        .await;

    let err = app.client.trending_tags().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_empty_success_body_decodes_as_null() {
    let app = TestApp::start().await;

    Mock::given(method("DELETE"))
        .and(path("/collections/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;

    let value: Value = app.client.delete("/collections/3").await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn test_generic_verbs_and_header_overrides() {
    let app = TestApp::start().await;
    app.log_in("abc");

    Mock::given(method("PATCH"))
        .and(path("/collections/3"))
        .and(header("x-request-source", "cli"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/collections/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&app.server)
        .await;

    let options = RequestOptions::new()
        .try_header("X-Request-Source", "cli")
        .unwrap()
        .try_header("Authorization", "Bearer forged")
        .unwrap();
    let patched: Value = app
        .client
        .request(
            Method::PATCH,
            "/collections/3",
            Some(&json!({"title": "Renamed"})),
            options,
        )
        .await
        .unwrap();
    assert_eq!(patched["id"], 3);

    let put: Value = app
        .client
        .put("/collections/3", &json!({"title": "Again"}))
        .await
        .unwrap();
    assert_eq!(put["id"], 3);
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let app = TestApp::start_with("/", Session::in_memory(), |config| {
        let base = format!("{}api/", config.base_url);
        config.with_base_url(&base).unwrap()
    })
    .await;

    Mock::given(method("GET"))
        .and(path("/api/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    app.client.list_collections().await.unwrap();
}

#[tokio::test]
async fn test_absolute_url_is_rejected() {
    let app = TestApp::start().await;
    app.log_in("abc");

    let err = app
        .client
        .get::<Value>("https://elsewhere.example/steal")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidRequest(_)));
    assert!(app.server.received_requests().await.unwrap().is_empty());
}
