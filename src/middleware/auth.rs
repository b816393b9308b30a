use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth;
use crate::error::ApiError;
use crate::middleware::auth_gate::TOKEN_NOT_PROVIDED;

/// Authenticated principal extracted from a verified token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub role: String,
}

/// Credential verification for protected routes. The gate has already
/// checked presence and shape; this middleware does the cryptographic work
/// and injects the principal into request extensions.
pub async fn verify_bearer_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized(TOKEN_NOT_PROVIDED).into_response())?;

    let claims = auth::verify_token(&token)
        .map_err(|err| ApiError::from(err).into_response())?;

    request.extensions_mut().insert(AuthUser {
        username: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
