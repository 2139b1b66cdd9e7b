//! API error handling
//!
//! Three 400 body shapes exist: business rule failures use
//! `{"success": false, "errors": [..]}`, payload and request failures use
//! `{"message": .., "error": "Bad Request", "statusCode": 400}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::error::{RosterError, ValidationErrors};
use roster_services::UserError;
use serde::Serialize;
use serde_json::json;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// A business rule rejected the request
    Rule(Vec<String>),
    /// The body failed its payload contract
    InvalidPayload(ValidationErrors),
    /// Unparseable path, query or body
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Rule(_) | ApiError::InvalidPayload(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct RuleBody<'a> {
    success: bool,
    errors: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpErrorBody<M: Serialize> {
    message: M,
    error: &'static str,
    status_code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let reason = status.canonical_reason().unwrap_or("Error");

        match self {
            ApiError::Rule(errors) => (
                status,
                Json(RuleBody {
                    success: false,
                    errors: &errors,
                }),
            )
                .into_response(),
            ApiError::InvalidPayload(errors) => (
                status,
                Json(HttpErrorBody {
                    message: errors.messages(),
                    error: reason,
                    status_code: status.as_u16(),
                }),
            )
                .into_response(),
            ApiError::BadRequest(message) | ApiError::NotFound(message) => (
                status,
                Json(HttpErrorBody {
                    message,
                    error: reason,
                    status_code: status.as_u16(),
                }),
            )
                .into_response(),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                let body = json!({
                    "message": "Internal server error",
                    "statusCode": status.as_u16(),
                });
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::NotFound { entity, .. } => ApiError::NotFound(format!("{} not found", entity)),
            RosterError::Validation(errors) => ApiError::Rule(errors.messages()),
            e @ (RosterError::Unexpected(_) | RosterError::Config(_)) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        RosterError::from(err).into()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_rule_body() {
        let (status, body) = body_of(UserError::LoginTaken.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "errors": ["Login is already taken by another user"]})
        );
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_of(UserError::NotFound { id: 3 }.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"message": "User not found", "error": "Not Found", "statusCode": 404})
        );
    }

    #[tokio::test]
    async fn test_invalid_payload_body() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name must be a string");
        let (status, body) = body_of(ApiError::InvalidPayload(errors)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!(["Name must be a string"]));
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["statusCode"], 400);
    }

    #[tokio::test]
    async fn test_internal_body_hides_details() {
        let (status, body) = body_of(ApiError::Internal("pool timed out".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
