//! Password reset routes.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use faktura_core::auth::hash_password;
use faktura_db::{PasswordResetRepository, UserRepository};
use faktura_shared::ValidationErrors;
use faktura_shared::validation::required;

/// Creates the password reset router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/password/send-reset-link", post(send_reset_link))
        .route("/password/reset", post(reset))
}

#[derive(Debug, Deserialize)]
struct SendResetLinkPayload {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResetPayload {
    token: Option<String>,
    password: Option<String>,
}

/// POST /password/send-reset-link - issue a reset token and email it.
async fn send_reset_link(
    State(state): State<AppState>,
    Json(payload): Json<SendResetLinkPayload>,
) -> ApiResult<Response> {
    let mut errors = ValidationErrors::new();
    let Some(email) = payload.email.filter(|e| !e.trim().is_empty()) else {
        errors.add("email", required("email"));
        return Err(errors.into());
    };

    let Some(user) = UserRepository::new(state.db()).find_by_email(&email).await? else {
        errors.add("email", "User not found.");
        return Err(errors.into());
    };

    let token = PasswordResetRepository::new(state.db()).create_token(user.id).await?;

    let email_service = state.email_service.clone();
    let to_email = user.email.clone();
    let to_name = user.name.clone();
    tokio::spawn(async move {
        if let Err(err) = email_service
            .send_password_reset_email(&to_email, &to_name, &token)
            .await
        {
            error!(error = %err, email = %to_email, "Failed to send password reset email");
        }
    });

    Ok(Json(json!({ "message": "Password reset link sent." })).into_response())
}

/// POST /password/reset - consume the token and replace the password.
async fn reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetPayload>,
) -> ApiResult<Response> {
    let mut errors = ValidationErrors::new();
    if payload.token.as_deref().is_none_or(str::is_empty) {
        errors.add("token", required("token"));
    }
    if payload.password.as_deref().is_none_or(str::is_empty) {
        errors.add("password", required("password"));
    }
    errors.into_result().map_err(ApiError::from)?;

    let (Some(token), Some(password)) = (payload.token, payload.password) else {
        return Err(ApiError::forbidden("Invalid token."));
    };

    let Some(user_id) = PasswordResetRepository::new(state.db()).consume(&token).await? else {
        return Err(ApiError::forbidden("Invalid token."));
    };

    let password_hash = hash_password(&password).map_err(|err| {
        error!(error = %err, "Failed to hash password during reset");
        ApiError::from(faktura_shared::AppError::Internal(err.to_string()))
    })?;

    UserRepository::new(state.db()).update_password(user_id, password_hash).await?;

    Ok(Json(json!({ "message": "Password has been reset." })).into_response())
}
