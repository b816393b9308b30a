use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension,
};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::models::Listing;
use crate::query::QuerySpec;
use crate::state::AppState;

/// GET|POST /api/object/get - list the objects collection, applying any
/// request-scoped `filter` parameters (explicit or harvested from the body).
pub async fn get_objects(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    tracing::debug!(user = %user.username, "listing objects");

    let mut spec = QuerySpec::new("objects");
    let mut aux_filters = Vec::new();
    for (key, value) in params {
        match key.as_str() {
            "filter" => aux_filters.push(value),
            "sort" => spec.sort = Some(value),
            _ => {}
        }
    }

    let result = state.engine.execute::<Listing>(&spec, &aux_filters).await;

    if !result.success {
        return Err(ApiError::bad_request(result.message));
    }

    Ok(ApiResponse::ok(result.data, "objects retrieved successfully").into_response())
}
