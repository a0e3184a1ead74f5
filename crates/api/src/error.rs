//! Error responses in the JSON envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};
use zakat_core::auth::PasswordError;
use zakat_db::RepositoryError;
use zakat_shared::{AppError, FieldViolation, JwtError};

/// Handler error; renders as `{ success: false, error, message, retryable, errors? }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    message: String,
    retryable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldViolation>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = err.error_code(), error = %err, "Request failed");
        } else {
            warn!(code = err.error_code(), error = %err, "Request rejected");
        }

        let body = ErrorBody {
            success: false,
            error: err.error_code(),
            message: err.to_string(),
            retryable: err.is_retryable(),
            errors: err.violations().to_vec(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        if matches!(err, RepositoryError::Database(_)) {
            error!(error = %err, "Storage failure");
        }
        Self(err.into())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingError(_) => Self(AppError::Internal(err.to_string())),
            JwtError::Expired => Self(AppError::Unauthorized("Token has expired".to_string())),
            JwtError::WrongTokenType => {
                Self(AppError::Unauthorized("Wrong token type".to_string()))
            }
            JwtError::DecodingError(_) => {
                Self(AppError::Unauthorized("Invalid or malformed token".to_string()))
            }
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        error!(error = %err, "Password hashing failed");
        Self(AppError::Internal("password processing failed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let err = ApiError(AppError::Validation(vec![FieldViolation::new(
            "items[0].zakat_type",
            "required",
            "items[0].zakat_type is required",
        )]));

        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["retryable"], false);
        assert_eq!(body["errors"][0]["field"], "items[0].zakat_type");
        assert_eq!(body["errors"][0]["rule"], "required");
    }

    #[tokio::test]
    async fn test_timeout_is_retryable_without_field_list() {
        let (status, body) = render(ApiError(AppError::Timeout("slow".to_string()))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "STORAGE_TIMEOUT");
        assert_eq!(body["retryable"], true);
        assert!(body.get("errors").is_none());
    }

    #[rstest]
    #[case(JwtError::Expired, StatusCode::UNAUTHORIZED)]
    #[case(JwtError::WrongTokenType, StatusCode::UNAUTHORIZED)]
    #[case(JwtError::DecodingError("bad".to_string()), StatusCode::UNAUTHORIZED)]
    #[case(JwtError::EncodingError("bad".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_jwt_errors(#[case] err: JwtError, #[case] expected: StatusCode) {
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), expected);
    }

    #[test]
    fn test_repository_conflict() {
        let response = ApiError::from(RepositoryError::Duplicate {
            entity: "donor",
            field: "phone",
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
