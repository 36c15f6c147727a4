//! Email verification routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use faktura_db::UserRepository;

/// Creates the public verification router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/email/verify/{token}", get(verify))
}

/// Creates the verification routes that require a bearer token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/email/verify/resend", get(resend))
}

/// GET /email/verify/{token} - mark the token's holder as verified.
async fn verify(State(state): State<AppState>, Path(token): Path<String>) -> ApiResult<Response> {
    let token = Uuid::parse_str(&token).map_err(|_| ApiError::forbidden("Invalid token."))?;

    let repository = UserRepository::new(state.db());
    let Some(user) = repository.find_by_verification_token(token).await? else {
        return Err(ApiError::forbidden("Invalid token."));
    };

    if user.email_verified_at.is_some() {
        return Err(ApiError::forbidden("User is already verified."));
    }

    repository.mark_verified(user).await?;

    Ok(Json(json!({ "message": "Email verified successfully." })).into_response())
}

/// GET /email/verify/resend - rotate the token and re-send the mail.
async fn resend(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    if auth.is_verified() {
        return Err(ApiError::forbidden("User is already verified."));
    }

    let repository = UserRepository::new(state.db());
    let user = repository.regenerate_verification_token(auth.user).await?;

    if let Some(verification_token) = user.verification_token {
        let email_service = state.email_service.clone();
        let to_email = user.email.clone();
        let to_name = user.name.clone();
        tokio::spawn(async move {
            if let Err(err) = email_service
                .send_verification_email(&to_email, &to_name, &verification_token.to_string())
                .await
            {
                error!(error = %err, email = %to_email, "Failed to send verification email");
            }
        });
    }

    Ok(Json(json!({ "message": "Verification link sent." })).into_response())
}
