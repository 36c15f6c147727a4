//! Application-wide error types.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Not-found is used both for genuinely missing resources and for resources
/// owned by another organization, so cross-tenant probing cannot distinguish
/// the two by status code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("{0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found (or owned by another organization).
    #[error("{0}")]
    NotFound(String),

    /// Request payload failed field-level validation.
    #[error("The given data was invalid.")]
    Validation(ValidationErrors),

    /// Conflict (e.g., duplicate entry).
    #[error("{0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// True for errors whose details must never reach the client.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// Builds a not-found error with an entity-qualified message.
    #[must_use]
    pub fn not_found(kind: &str) -> Self {
        Self::NotFound(format!("{kind} not found"))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(
            AppError::Validation(ValidationErrors::new()).status_code(),
            422
        );
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_internal_flag_hides_details() {
        assert!(AppError::Database("pg down".into()).is_internal());
        assert!(AppError::Internal("boom".into()).is_internal());
        assert!(!AppError::NotFound("Customer not found".into()).is_internal());
    }

    #[test]
    fn test_not_found_message_names_the_kind() {
        let err = AppError::not_found("Invoice");
        assert_eq!(err.to_string(), "Invoice not found");
    }
}
