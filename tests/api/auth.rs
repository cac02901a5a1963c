use crate::helpers::{ADMIN_PASSWORD, ADMIN_TOKEN, spawn_app, spawn_app_with, test_settings};
use serde_json::json;
use wiremock::MockServer;

#[tokio::test]
async fn the_configured_password_is_exchanged_for_the_admin_token() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_auth(&json!({ "password": ADMIN_PASSWORD })).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["token"], ADMIN_TOKEN);
}

#[tokio::test]
async fn a_wrong_password_is_rejected() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_auth(&json!({ "password": "open sesame" })).await;

    // Assert
    assert_eq!(401, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn a_missing_password_is_rejected() {
    let app = spawn_app().await;

    let response = app.post_auth(&json!({})).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn a_valid_token_checks_out() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_auth(&json!({ "token": ADMIN_TOKEN })).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn an_unknown_token_is_rejected() {
    let app = spawn_app().await;

    let response = app.post_auth(&json!({ "token": "not-the-token" })).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn an_empty_token_falls_back_to_password_login() {
    let app = spawn_app().await;

    let response = app
        .post_auth(&json!({ "token": "", "password": ADMIN_PASSWORD }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["token"], ADMIN_TOKEN);
}

#[tokio::test]
async fn missing_admin_secrets_are_a_server_error() {
    // Arrange
    let github_server = MockServer::start().await;
    let mut settings = test_settings(&github_server);
    settings.admin_password = None;
    let app = spawn_app_with(settings, github_server).await;

    // Act
    let response = app.post_auth(&json!({ "password": ADMIN_PASSWORD })).await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["error"].as_str().unwrap().contains("ADMIN_PASSWORD"),
        "the error should name the missing configuration, got {body}"
    );
}

#[tokio::test]
async fn a_malformed_body_is_a_bad_request() {
    let app = spawn_app().await;

    let response = app.post_raw("/api/auth", "{not json").await;

    assert_eq!(400, response.status().as_u16());
}
