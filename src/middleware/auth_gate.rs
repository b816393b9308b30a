use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Prefix-matched paths that skip credential checks entirely.
const PUBLIC_PATHS: &[&str] = &["/health", "/docs", "/favicon.ico"];

/// Exact-matched routes that serve anonymous clients. Credential defects
/// raised downstream of these still surface as 401, not as faults.
const ANONYMOUS_PATHS: &[&str] = &["/", "/api/auth/login"];

pub const TOKEN_NOT_PROVIDED: &str = "unauthorized: token not provided";
pub const TOKEN_WRONG_FORMAT: &str =
    "unauthorized: wrong token format, use 'Bearer <token>'";

/// Presence-and-shape gate for bearer credentials. Signature, expiry,
/// issuer and audience are verified downstream, after this cheap check.
pub async fn auth_gate_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_lowercase();

    if PUBLIC_PATHS.iter().any(|public| path.starts_with(public)) {
        return next.run(request).await;
    }

    if ANONYMOUS_PATHS.contains(&path.as_str()) {
        return next.run(request).await;
    }

    match check_bearer_shape(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(reason) => ApiError::unauthorized(reason).into_response(),
    }
}

fn check_bearer_shape(headers: &HeaderMap) -> Result<(), &'static str> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if value.trim().is_empty() {
        return Err(TOKEN_NOT_PROVIDED);
    }

    let token = value.strip_prefix("Bearer ").ok_or(TOKEN_WRONG_FORMAT)?;

    if token.trim().is_empty() {
        return Err(TOKEN_NOT_PROVIDED);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn missing_header_is_not_provided() {
        assert_eq!(check_bearer_shape(&headers_with(None)), Err(TOKEN_NOT_PROVIDED));
        assert_eq!(check_bearer_shape(&headers_with(Some("  "))), Err(TOKEN_NOT_PROVIDED));
    }

    #[test]
    fn non_bearer_header_is_wrong_format() {
        assert_eq!(
            check_bearer_shape(&headers_with(Some("Basic abc123"))),
            Err(TOKEN_WRONG_FORMAT)
        );
        assert_eq!(
            check_bearer_shape(&headers_with(Some("bearer abc123"))),
            Err(TOKEN_WRONG_FORMAT)
        );
    }

    #[test]
    fn blank_bearer_token_is_not_provided() {
        assert_eq!(
            check_bearer_shape(&headers_with(Some("Bearer    "))),
            Err(TOKEN_NOT_PROVIDED)
        );
    }

    #[test]
    fn well_formed_bearer_passes() {
        assert!(check_bearer_shape(&headers_with(Some("Bearer abc.def.ghi"))).is_ok());
    }
}
