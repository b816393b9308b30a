use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{uri::Uri, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::config;
use crate::error::ApiError;

/// Best-effort harvest of a `filter` string field from POST/PUT JSON bodies
/// into the query string. The body is buffered and rebuilt on every exit
/// path, so downstream consumers observe exactly one intact read. Malformed
/// JSON and absent fields leave the request untouched.
pub async fn extract_filter_params(request: Request, next: Next) -> Response {
    if request.method() != Method::POST && request.method() != Method::PUT {
        return next.run(request).await;
    }

    let limit = config::config().api.max_request_size_bytes;
    let (mut parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "failed to buffer request body");
            return ApiError::bad_request("failed to read request body").into_response();
        }
    };

    if let Some(filter) = body_filter(&bytes) {
        if let Some(uri) = merge_filter_into_query(&parts.uri, &filter) {
            parts.uri = uri;
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn body_filter(bytes: &Bytes) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    let filter = value.get("filter")?.as_str()?;
    if filter.is_empty() {
        None
    } else {
        Some(filter.to_string())
    }
}

/// Append `filter=<value>` to the query string, keeping any existing
/// parameters (an existing `filter` is never overwritten).
fn merge_filter_into_query(uri: &Uri, filter: &str) -> Option<Uri> {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("filter", filter)
        .finish();

    let merged = match uri.query() {
        Some(query) if !query.is_empty() => format!("{}?{}&{}", uri.path(), query, encoded),
        _ => format!("{}?{}", uri.path(), encoded),
    };

    let path_and_query: axum::http::uri::PathAndQuery = merged.parse().ok()?;
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).ok()
}
