pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1012,
///   "error": "DUPLICATE_RESOURCE",
///   "message": "Email already exists: jane@example.com"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Structured details, e.g. per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that converts into an HTTP response.
///
/// Domain crates convert their own errors into this type so every endpoint
/// shares one body shape and one status mapping.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// A unique field already holds the value. Reported as 400.
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Logged in full; clients only see the default message
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(e) => match e {
                JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                    StatusCode::BAD_REQUEST
                }
                other => other.status(),
            },
            AppError::QueryRejection(e) => e.status(),
            AppError::ValidationError(_)
            | AppError::InvalidId(_)
            | AppError::BadRequest(_)
            | AppError::Duplicate(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::JsonExtractorRejection(_) => ErrorCode::JsonExtraction,
            AppError::QueryRejection(_) => ErrorCode::InvalidQuery,
            AppError::ValidationError(_) | AppError::BadRequest(_) => ErrorCode::ValidationError,
            AppError::InvalidId(_) => ErrorCode::InvalidId,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Duplicate(_) => ErrorCode::DuplicateResource,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        let (message, details) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::QueryRejection(e) => {
                tracing::warn!(error_code = code.code(), "Query extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = code.code(), "Validation error: {:?}", e);
                (
                    code.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                )
            }
            AppError::InvalidId(msg) | AppError::BadRequest(msg) => {
                tracing::info!(error_code = code.code(), "Bad request: {}", msg);
                (msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = code.code(), "Not found: {}", msg);
                (msg, None)
            }
            AppError::Duplicate(msg) => {
                tracing::info!(error_code = code.code(), "Duplicate: {}", msg);
                (msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "Internal server error: {}", msg);
                (code.default_message().to_string(), None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
                (msg, None)
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Build an error response outside of [`AppError`], e.g. in fallbacks.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Payload {
        name: String,
        age: i32,
    }

    async fn body_of(error: AppError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_duplicate_maps_to_bad_request() {
        let (status, body) = body_of(AppError::Duplicate("Email already exists: a@b.io".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "DUPLICATE_RESOURCE");
        assert_eq!(body.code, 1012);
        assert_eq!(body.message, "Email already exists: a@b.io");
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let (status, body) = body_of(AppError::NotFound("User not found with id: 7".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.message, "User not found with id: 7");
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let (status, body) =
            body_of(AppError::InternalServerError("connection reset by peer".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, ErrorCode::InternalError.default_message());
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_invalid_id_maps_to_bad_request() {
        let (status, body) = body_of(AppError::InvalidId("abc".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "INVALID_ID");
    }

    #[tokio::test]
    async fn test_unreadable_json_body_maps_to_bad_request() {
        use axum::{body::Body, extract::FromRequest, http::Request};

        let cases = [
            r#"{"name":"Ann"}"#,
            r#"{"name":"Ann","age":"thirty"}"#,
            "{ not json",
        ];
        for raw in cases {
            let request = Request::builder()
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(raw))
                .unwrap();
            let rejection = Json::<Payload>::from_request(request, &())
                .await
                .err()
                .expect("body should be rejected");
            let (status, body) = body_of(AppError::from(rejection)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {raw}");
            assert_eq!(body.error, "JSON_EXTRACTION");
            assert_eq!(body.code, 1003);
        }
    }

    #[tokio::test]
    async fn test_missing_content_type_keeps_unsupported_media_type() {
        use axum::{body::Body, extract::FromRequest, http::Request};

        let request = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"name":"Ann","age":3}"#))
            .unwrap();
        let rejection = Json::<Payload>::from_request(request, &())
            .await
            .err()
            .expect("body should be rejected");
        let (status, _) = body_of(AppError::from(rejection)).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_error_response_omits_empty_details() {
        let body = ErrorResponse {
            code: 1004,
            error: "NOT_FOUND".into(),
            message: "missing".into(),
            details: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("details").is_none());
    }
}
