use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    /// Caller-supplied data is malformed or out of range
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User not found with id: {0}")]
    NotFound(i64),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// Opaque failure reported by the store
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => AppError::BadRequest(msg),
            err @ UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            err @ UserError::DuplicateEmail(_) => AppError::Duplicate(err.to_string()),
            UserError::Storage(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (UserError::Validation("Name cannot be empty".into()), StatusCode::BAD_REQUEST),
            (UserError::NotFound(9), StatusCode::NOT_FOUND),
            (UserError::DuplicateEmail("a@b.io".into()), StatusCode::BAD_REQUEST),
            (UserError::Storage("pool closed".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(UserError::NotFound(42).to_string(), "User not found with id: 42");
        assert_eq!(
            UserError::DuplicateEmail("ann@x.com".into()).to_string(),
            "Email already exists: ann@x.com"
        );
    }
}
