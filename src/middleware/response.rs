use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Wrapper for API responses that adds the uniform `{success, data, message}`
/// envelope.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    success: bool,
    data: Option<T>,
    message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with data.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }
}

impl ApiResponse<Value> {
    /// 401 business rejection, `{success: false, message}` with no data.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            success: false,
            data: None,
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": self.success,
            "message": self.message,
        });

        if let Some(data) = self.data {
            match serde_json::to_value(&data) {
                Ok(value) => {
                    body["data"] = value;
                }
                Err(err) => {
                    tracing::error!("failed to serialize response data: {}", err);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "message": "failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_carries_data_and_message() {
        let response = ApiResponse::ok(json!({"token": "abc"}), "login successful");
        assert!(response.success);
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.data.unwrap()["token"], "abc");
    }

    #[test]
    fn failure_envelopes_have_no_data() {
        let response = ApiResponse::unauthorized("invalid credentials");
        assert!(!response.success);
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.data.is_none());
    }
}
