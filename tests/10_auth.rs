mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_bypasses_all_auth_checks() -> Result<()> {
    let app = common::test_app().await;

    let response = common::send(&app, common::get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn missing_token_is_rejected_with_reason() -> Result<()> {
    let app = common::test_app().await;

    let response = common::send(&app, common::get("/api/object/get")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 401);
    assert!(
        body["message"].as_str().unwrap_or_default().contains("not provided"),
        "unexpected message: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_wrong_format() -> Result<()> {
    let app = common::test_app().await;

    let request = axum::http::Request::builder()
        .uri("/api/object/get")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())?;
    let response = common::send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert!(
        body["message"].as_str().unwrap_or_default().contains("wrong token format"),
        "unexpected message: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn blank_bearer_token_counts_as_not_provided() -> Result<()> {
    let app = common::test_app().await;

    let request = axum::http::Request::builder()
        .uri("/api/object/get")
        .header("Authorization", "Bearer    ")
        .body(axum::body::Body::empty())?;
    let response = common::send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert!(
        body["message"].as_str().unwrap_or_default().contains("not provided"),
        "unexpected message: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn garbage_token_fails_verification_not_shape() -> Result<()> {
    let app = common::test_app().await;

    let response = common::send(&app, common::get_auth("/api/object/get", "garbage")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert!(
        body["message"].as_str().unwrap_or_default().contains("invalid token"),
        "unexpected message: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn login_issues_token_that_grants_access() -> Result<()> {
    let app = common::test_app().await;

    let token = common::login_token(&app).await;
    let response = common::send(&app, common::get_auth("/api/object/get", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn login_echoes_user_with_blanked_password() -> Result<()> {
    let app = common::test_app().await;

    let response = common::send(
        &app,
        common::post_json(
            "/api/auth/login",
            json!({"username": "admin", "password": "secret"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["user"]["username"], "admin");
    assert_eq!(body["data"]["user"]["password"], "");
    Ok(())
}

#[tokio::test]
async fn wrong_credentials_are_rejected() -> Result<()> {
    let app = common::test_app().await;

    let response = common::send(
        &app,
        common::post_json(
            "/api/auth/login",
            json!({"username": "admin", "password": "nope"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "invalid credentials");
    Ok(())
}

#[tokio::test]
async fn missing_credential_fields_are_rejected() -> Result<()> {
    let app = common::test_app().await;

    let response = common::send(
        &app,
        common::post_json("/api/auth/login", json!({"username": "admin"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn malformed_login_body_gets_translator_shape() -> Result<()> {
    let app = common::test_app().await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))?;
    let response = common::send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().is_some());
    Ok(())
}
