//! Endpoint paths, request bodies, and response decoding.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use spark_canvas_client::core::{CollectionId, ImageUpload, NewCollection, Page, UserId};
use spark_canvas_client::{ListLoader, ListState};
use spark_canvas_integration_tests::{TestApp, image_json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

// =============================================================================
// Images
// =============================================================================

#[tokio::test]
async fn test_empty_feed_yields_empty_state() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    let loader = ListLoader::new();
    let state = loader
        .load(app.client.list_images(Page::default()))
        .await;

    assert_eq!(state, ListState::Empty);
}

#[tokio::test]
async fn test_null_list_is_empty() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/users/3/images"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&app.server)
        .await;

    let images = app.client.user_images(UserId::new(3)).await.unwrap();
    assert!(images.is_empty());
}

#[tokio::test]
async fn test_feed_decodes_images() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([image_json(5, 1), image_json(6, 2)])),
        )
        .mount(&app.server)
        .await;

    let images = app.client.list_images(Page::new(2, 4)).await.unwrap();

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].url, "https://ipfs.io/ipfs/bafy5");
    assert_eq!(images[1].uploaded_by, UserId::new(2));
    assert_eq!(images[0].tags, vec!["sunset", "beach"]);
}

#[tokio::test]
async fn test_feed_failure_yields_failed_state() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Failed to fetch images"})),
        )
        .mount(&app.server)
        .await;

    let loader = ListLoader::new();
    loader.load(app.client.list_images(Page::default())).await;

    assert_eq!(
        loader.state(),
        ListState::Failed("Failed to fetch images".to_string())
    );
}

#[tokio::test]
async fn test_images_by_tag_encodes_tag() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/images/tag/street%20art"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([image_json(1, 1)])))
        .expect(1)
        .mount(&app.server)
        .await;

    let images = app
        .client
        .images_by_tag("street art", Page::default())
        .await
        .unwrap();
    assert_eq!(images.len(), 1);
}

#[tokio::test]
async fn test_heart_image_sends_user() {
    let app = TestApp::start().await;

    Mock::given(method("POST"))
        .and(path("/images/12/heart"))
        .and(body_json(json!({"user_id": 7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hearts": 10})))
        .expect(1)
        .mount(&app.server)
        .await;

    let count = app
        .client
        .heart_image(12.into(), UserId::new(7))
        .await
        .unwrap();
    assert_eq!(count.hearts, 10);
}

#[tokio::test]
async fn test_upload_sends_multipart_fields() {
    let app = TestApp::start_at("/upload").await;
    app.log_in("abc");

    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 99, "url": "https://ipfs.io/ipfs/bafy99"})),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let upload = ImageUpload::new("cat.png", b"\x89PNG fake".to_vec(), UserId::new(7))
        .unwrap()
        .with_content_type("image/png")
        .with_caption("Nap time");
    let created = app.client.upload_image(&upload).await.unwrap();
    assert_eq!(created.id.as_i32(), 99);

    let requests = app.server.received_requests().await.unwrap();
    let request = &requests[0];
    let content_type = request.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert_eq!(request.headers.get("authorization").unwrap(), "Bearer abc");

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(r#"name="file"; filename="cat.png""#));
    assert!(body.contains("Content-Type: image/png"));
    assert!(body.contains(r#"name="caption""#));
    assert!(body.contains("Nap time"));
    assert!(body.contains(r#"name="uploaded_by""#));
    assert!(!body.contains(r#"name="tags""#));
}

#[tokio::test]
async fn test_upload_sends_tags_when_present() {
    let app = TestApp::start().await;

    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .mount(&app.server)
        .await;

    let upload = ImageUpload::new("a.jpg", vec![1, 2, 3], UserId::new(1))
        .unwrap()
        .with_tags(vec!["cats".to_string(), "cozy".to_string()]);
    app.client.upload_image(&upload).await.unwrap();

    let requests = app.server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="tags""#));
    assert!(body.contains("cats,cozy"));
    assert!(!body.contains(r#"name="caption""#));
}

// =============================================================================
// Users and Tags
// =============================================================================

#[tokio::test]
async fn test_get_user_profile() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/users/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 3, "username": "grace", "avatar_url": ""})),
        )
        .mount(&app.server)
        .await;

    let user = app.client.get_user(UserId::new(3)).await.unwrap();
    assert_eq!(user.username, "grace");
    assert!(user.avatar_url.is_none());
}

#[tokio::test]
async fn test_trending_tags() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/tags/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tag": "sunset", "count": 12},
            {"tag": "cats", "count": 5}
        ])))
        .mount(&app.server)
        .await;

    let tags = app.client.trending_tags().await.unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[1].count, 5);
}

// =============================================================================
// Collections
// =============================================================================

#[tokio::test]
async fn test_create_collection_navigates_to_new_id() {
    let app = TestApp::start_at("/collections/new").await;
    app.log_in("abc");

    Mock::given(method("POST"))
        .and(path("/collections"))
        .and(body_json(json!({"title": "My Board", "description": ""})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&app.server)
        .await;

    let new = NewCollection::new("My Board", "").unwrap();
    let created = app.client.create_collection(&new).await.unwrap();

    assert_eq!(created.id, CollectionId::new(42));
    assert_eq!(created.id.screen_path(), "/collections/42");
}

#[tokio::test]
async fn test_list_collections() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Sunsets", "description": "Warm tones"},
            {"id": 2, "title": "Cats", "description": ""}
        ])))
        .mount(&app.server)
        .await;

    let collections = app.client.list_collections().await.unwrap();
    assert_eq!(collections.len(), 2);
    assert_eq!(collections[0].title, "Sunsets");
    assert!(collections[1].description.is_empty());
}

#[tokio::test]
async fn test_get_collection_with_images() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": {"id": 4, "title": "Beach", "description": "", "created_by": 7},
            "images": [image_json(1, 7)]
        })))
        .mount(&app.server)
        .await;

    let detail = app
        .client
        .get_collection(CollectionId::new(4))
        .await
        .unwrap();
    assert_eq!(detail.collection.created_by, Some(UserId::new(7)));
    assert_eq!(detail.images.len(), 1);
}
