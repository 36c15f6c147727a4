//! Error-to-response mapping.
//!
//! One conversion point between [`AppError`] and HTTP: validation failures
//! render the full field map, internal errors are logged with their detail
//! and answered with a generic body so database or storage text never
//! reaches a client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use faktura_core::storage::StorageError;
use faktura_shared::{AppError, ValidationErrors};

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An error on its way out of the API.
#[derive(Debug)]
pub struct ApiError {
    inner: AppError,
    /// Client-facing text for internal errors; the real cause is logged.
    public_message: Option<String>,
}

impl ApiError {
    /// A 500 whose body carries the given message instead of the generic
    /// one. The underlying cause still has to be logged by the caller.
    #[must_use]
    pub fn server(message: &str) -> Self {
        Self {
            inner: AppError::Internal(message.to_string()),
            public_message: Some(message.to_string()),
        }
    }

    /// 404 with an entity-qualified message.
    #[must_use]
    pub fn not_found(kind: &str) -> Self {
        AppError::not_found(kind).into()
    }

    /// 404 for a resource owned by another organization.
    #[must_use]
    pub fn not_in_organization(kind: &str) -> Self {
        AppError::NotFound(format!("{kind} does not belong to the organization")).into()
    }

    /// 401 with the given message.
    #[must_use]
    pub fn unauthorized(message: &str) -> Self {
        AppError::Unauthorized(message.to_string()).into()
    }

    /// 403 with the given message.
    #[must_use]
    pub fn forbidden(message: &str) -> Self {
        AppError::Forbidden(message.to_string()).into()
    }
}

impl From<AppError> for ApiError {
    fn from(inner: AppError) -> Self {
        Self { inner, public_message: None }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors).into()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        let mut errors = ValidationErrors::new();
        match err {
            StorageError::FileTooLarge { .. } => {
                errors.add("photo", "The photo may not be greater than 5120 kilobytes.");
                errors.into()
            }
            StorageError::InvalidMimeType { .. } => {
                errors.add("photo", "The photo must be an image.");
                errors.into()
            }
            other => AppError::Internal(other.to_string()).into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self.inner {
            AppError::Validation(errors) => json!({
                "message": "The given data was invalid.",
                "errors": errors,
            }),
            inner if inner.is_internal() => {
                error!(error = %inner, "Request failed");
                let message = self
                    .public_message
                    .as_deref()
                    .unwrap_or("Server error.");
                json!({ "error": message })
            }
            inner => json!({ "error": inner.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_renders_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("customer_id", "The customer field is required.");
        let response = ApiError::from(errors).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["message"], "The given data was invalid.");
        assert_eq!(body["errors"]["customer_id"][0], "The customer field is required.");
    }

    #[tokio::test]
    async fn test_database_detail_never_reaches_the_body() {
        let response = ApiError::from(DbErr::Custom("connection refused".into())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Server error.");
    }

    #[tokio::test]
    async fn test_server_error_keeps_its_public_message() {
        let response = ApiError::server("Error creating user.").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Error creating user.");
    }

    #[tokio::test]
    async fn test_ownership_miss_is_a_distinct_404() {
        let missing = ApiError::not_found("Customer").into_response();
        let foreign = ApiError::not_in_organization("Customer").into_response();

        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(missing).await["error"], "Customer not found");
        assert_eq!(
            body_json(foreign).await["error"],
            "Customer does not belong to the organization"
        );
    }

    #[tokio::test]
    async fn test_oversize_upload_maps_to_photo_field() {
        let err = StorageError::file_too_large(10, 5);
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert!(body["errors"]["photo"][0].as_str().unwrap().contains("photo"));
    }
}
