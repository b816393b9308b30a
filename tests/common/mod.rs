#![allow(dead_code)]
//! Shared harness for integration tests: the full router wired over a
//! seeded in-memory document store, driven with tower's oneshot.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use estate_api::app::app;
use estate_api::middleware::TokenBucketLimiter;
use estate_api::state::AppState;
use estate_api::store::memory::MemoryDocumentStore;
use estate_api::store::{Document, DocumentStore};

pub fn doc(v: Value) -> Document {
    v.as_object().cloned().expect("seed document must be a JSON object")
}

pub async fn seeded_store() -> Arc<MemoryDocumentStore> {
    let store = Arc::new(MemoryDocumentStore::new());

    store
        .insert(
            "users",
            doc(json!({
                "_id": {"$oid": "64f000000000000000000001"},
                "username": "admin",
                "password": "secret"
            })),
        )
        .await;

    store
        .insert(
            "objects",
            doc(json!({
                "_id": {"$oid": "64f100000000000000000001"},
                "id_owner": 1,
                "name": "Casa del Mar",
                "address": "12 Ocean Drive",
                "price": 350000,
                "image_url": "https://img.example.com/casa-del-mar.jpg"
            })),
        )
        .await;
    store
        .insert(
            "objects",
            doc(json!({
                "_id": {"$oid": "64f100000000000000000002"},
                "id_owner": 1,
                "name": "Loft Central",
                "address": "8 Main St",
                "price": 210000,
                "image_url": "https://img.example.com/loft-central.jpg"
            })),
        )
        .await;
    store
        .insert(
            "objects",
            doc(json!({
                "_id": {"$oid": "64f100000000000000000003"},
                "id_owner": 2,
                "name": "Villa Verde",
                "address": "3 Garden Way",
                "price": 480000,
                "image_url": "https://img.example.com/villa-verde.jpg"
            })),
        )
        .await;

    store
}

pub async fn test_app() -> Router {
    let store: Arc<dyn DocumentStore> = seeded_store().await;
    app(Arc::new(AppState::new(store)))
}

/// App with a deliberately small bucket so tests can exhaust it quickly.
pub async fn test_app_with_limiter(capacity: u32, refill_per_sec: u32) -> Router {
    let store: Arc<dyn DocumentStore> = seeded_store().await;
    let limiter = TokenBucketLimiter::new(capacity, refill_per_sec);
    app(Arc::new(AppState::with_limiter(store, limiter)))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("request")
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).expect("request")
}

pub fn get_auth(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn post_json_auth(path: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub async fn login_token(app: &Router) -> String {
    let response = send(
        app,
        post_json(
            "/api/auth/login",
            json!({"username": "admin", "password": "secret"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"]["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}
