use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::{
    auth_gate_middleware, extract_filter_params, rate_limit_middleware, verify_bearer_middleware,
};
use crate::state::AppState;

/// Build the full router. Request flow, outermost first: exception backstop,
/// rate limiter, body-parameter extractor, auth gate, then route-level
/// credential verification on protected routes.
pub fn app(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route(
            "/api/object/get",
            get(handlers::objects::get_objects).post(handlers::objects::get_objects),
        )
        .route_layer(middleware::from_fn(verify_bearer_middleware));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/auth/login", axum::routing::post(handlers::auth::login))
        .merge(protected)
        .layer(middleware::from_fn(auth_gate_middleware))
        .layer(middleware::from_fn(extract_filter_params))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(log_security_events))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Last line of the exception translator: a panicking handler still produces
/// the structured 500 body.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(error = %detail, "request handler panicked");
    ApiError::internal_server_error("unhandled error").into_response()
}

async fn log_security_events(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;
    if response.status().as_u16() >= 400 {
        tracing::warn!(%path, status = %response.status(), "security event");
    }
    response
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Estate API",
            "version": version,
            "description": "Listing catalogue API backed by a schema-less document store",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "POST /api/auth/login (public - token acquisition)",
                "objects": "GET /api/object/get (protected)",
            }
        }
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "document store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": err.to_string()
                }
            })),
        ),
    }
}
