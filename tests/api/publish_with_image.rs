use crate::helpers::{
    ADMIN_TOKEN, CommittedContentContains, GITHUB_OWNER, GITHUB_REPO, spawn_app,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;
use wiremock::matchers::{any, method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

// A few recognizable bytes are enough; nothing inspects the pixels.
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

fn png_data_url() -> String {
    format!("data:image/png;base64,{}", BASE64.encode(PNG_BYTES))
}

fn valid_publish_body() -> serde_json::Value {
    json!({
        "token": ADMIN_TOKEN,
        "title": "Launch Week",
        "date": "2024-05-05",
        "summary": "Everything we shipped.",
        "url": "https://letters.example.com/launch-week",
        "image": { "dataUrl": png_data_url() },
    })
}

#[tokio::test]
async fn the_image_and_the_post_are_both_committed() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("PUT"))
        .and(path_regex(format!(
            "^/repos/{GITHUB_OWNER}/{GITHUB_REPO}/contents/public/uploads/newsletter/2024-05-05-launch-week-[0-9]+\\.png$"
        )))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.github_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!(
            "/repos/{GITHUB_OWNER}/{GITHUB_REPO}/contents/src/content/newsletter/2024-05-05-launch-week.md"
        )))
        // The frontmatter must reference the image by its site-root path.
        .and(CommittedContentContains(
            "thumbnail: '/uploads/newsletter/2024-05-05-launch-week-".to_string(),
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.github_server)
        .await;

    // Act
    let response = app.post_publish_with_image(&valid_publish_body()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(
        body["mdPath"],
        "src/content/newsletter/2024-05-05-launch-week.md"
    );
    let img_path = body["imgPath"].as_str().unwrap();
    assert!(img_path.starts_with("public/uploads/newsletter/2024-05-05-launch-week-"));
    assert!(img_path.ends_with(".png"));
}

#[tokio::test]
async fn a_jpeg_image_gets_the_jpg_extension() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("PUT"))
        .and(path_regex("/contents/public/uploads/newsletter/.*\\.jpg$"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.github_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex("/contents/src/content/newsletter/.*\\.md$"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.github_server)
        .await;
    let mut body = valid_publish_body();
    body["image"]["dataUrl"] = json!(format!(
        "data:image/jpeg;base64,{}",
        BASE64.encode(b"fake-jpeg-data")
    ));

    // Act
    let response = app.post_publish_with_image(&body).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["imgPath"].as_str().unwrap().ends_with(".jpg"));
}

#[tokio::test]
async fn a_failed_image_commit_stops_the_post_commit() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("PUT"))
        .and(path_regex("/contents/public/uploads/newsletter/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk on fire"))
        .expect(1)
        .mount(&app.github_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex("/contents/src/content/newsletter/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.github_server)
        .await;

    // Act
    let response = app.post_publish_with_image(&valid_publish_body()).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    // The second mock verifies on drop that the Markdown commit was never
    // issued after the image commit failed
}

#[tokio::test]
async fn an_unsupported_image_type_is_rejected() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.github_server)
        .await;
    let mut body = valid_publish_body();
    body["image"]["dataUrl"] = json!(format!(
        "data:image/gif;base64,{}",
        BASE64.encode(b"fake-gif-data")
    ));

    // Act
    let response = app.post_publish_with_image(&body).await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("image/gif"));
}

#[tokio::test]
async fn a_thumbnail_url_is_not_an_inline_image() {
    // Arrange
    let app = spawn_app().await;
    let mut body = valid_publish_body();
    body["image"]["dataUrl"] = json!("https://cdn.example.com/thumb.png");

    // Act
    let response = app.post_publish_with_image(&body).await;

    // Assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn a_corrupted_payload_is_rejected() {
    let app = spawn_app().await;
    let mut body = valid_publish_body();
    body["image"]["dataUrl"] = json!("data:image/png;base64,@@@@");

    let response = app.post_publish_with_image(&body).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn a_missing_image_is_rejected() {
    let app = spawn_app().await;
    let mut body = valid_publish_body();
    body.as_object_mut().unwrap().remove("image");

    let response = app.post_publish_with_image(&body).await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("image"));
}

#[tokio::test]
async fn a_relative_post_url_is_rejected() {
    let app = spawn_app().await;
    let mut body = valid_publish_body();
    body["url"] = json!("/posts/launch-week");

    let response = app.post_publish_with_image(&body).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn a_non_http_post_url_is_rejected() {
    let app = spawn_app().await;
    let mut body = valid_publish_body();
    body["url"] = json!("ftp://letters.example.com/launch-week");

    let response = app.post_publish_with_image(&body).await;

    assert_eq!(400, response.status().as_u16());
}
