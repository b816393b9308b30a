use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::models::{Credentials, UserRecord};
use crate::query::QuerySpec;
use crate::state::AppState;

/// POST /api/auth/login - validate credentials against the users collection
/// and issue a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(credentials) = body.map_err(|rejection| ApiError::bad_request(rejection.to_string()))?;

    let (Some(username), Some(password)) = (credentials.username, credentials.password) else {
        return Ok(ApiResponse::unauthorized("invalid credentials").into_response());
    };

    let filter = json!({ "username": username, "password": password }).to_string();
    let spec = QuerySpec::new("users").with_filter(filter);
    let result = state.engine.execute::<UserRecord>(&spec, &[]).await;

    if !result.success {
        tracing::error!(message = %result.message, "login query failed");
        return Err(ApiError::internal_server_error(result.message));
    }

    let Some(mut user) = result.data.into_iter().next() else {
        return Ok(ApiResponse::unauthorized("invalid credentials").into_response());
    };

    let token = auth::issue_token(&Claims::new(user.username.as_str(), "Admin"))?;
    user.password.clear();

    Ok(ApiResponse::ok(json!({ "token": token, "user": user }), "login successful")
        .into_response())
}
