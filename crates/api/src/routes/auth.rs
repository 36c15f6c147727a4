//! Registration, login, logout, and the current-user endpoint.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::routes::support::user_json;
use faktura_core::auth::{hash_password, verify_password};
use faktura_db::repositories::NewRegistration;
use faktura_db::{AccessTokenRepository, UserRepository};
use faktura_shared::ValidationErrors;
use faktura_shared::validation::required;

const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Creates the auth routes that require a bearer token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
struct RegisterPayload {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    organization_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    email: Option<String>,
    password: Option<String>,
}

/// POST /register - create a user with their organization, issue a token,
/// and send the verification email after the transaction commits.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> ApiResult<Response> {
    let mut errors = ValidationErrors::new();
    for (field, attribute, value) in [
        ("name", "name", &payload.name),
        ("email", "email", &payload.email),
        ("password", "password", &payload.password),
        ("organization_name", "organization name", &payload.organization_name),
    ] {
        if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
            errors.add(field, required(attribute));
        }
    }

    let user_repo = UserRepository::new(state.db());
    if let Some(email) = payload.email.as_deref()
        && user_repo.find_by_email(email).await?.is_some()
    {
        errors.add("email", "The email has already been taken.");
    }
    errors.into_result().map_err(ApiError::from)?;

    // All four are present once the map is empty.
    let (Some(name), Some(email), Some(password), Some(organization_name)) =
        (payload.name, payload.email, payload.password, payload.organization_name)
    else {
        return Err(ApiError::server("Error creating user."));
    };

    let password_hash = hash_password(&password).map_err(|err| {
        error!(error = %err, "Failed to hash password during registration");
        ApiError::server("Error creating user.")
    })?;

    let registration = NewRegistration {
        name,
        email,
        password_hash,
        user_type: "tenant".to_string(),
        organization_name,
    };

    let (user, _organization) = user_repo.register(registration).await.map_err(|err| {
        error!(error = %err, "Registration transaction failed");
        ApiError::server("Error creating user.")
    })?;

    let token = AccessTokenRepository::new(state.db())
        .issue(user.id)
        .await
        .map_err(|err| {
            error!(error = %err, "Failed to issue token after registration");
            ApiError::server("Error creating user.")
        })?;

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

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": user_json(&user), "token": token })),
    )
        .into_response())
}

/// POST /login - verify credentials and issue a fresh token.
///
/// Missing fields, an unknown email, and a wrong password all answer the
/// same 401 so accounts cannot be enumerated.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> ApiResult<Response> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let user_repo = UserRepository::new(state.db());
    let Some(user) = user_repo.find_by_email(&email).await? else {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let verified = verify_password(&password, &user.password).map_err(|err| {
        error!(error = %err, "Password verification failed");
        ApiError::from(faktura_shared::AppError::Internal(err.to_string()))
    })?;
    if !verified {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = AccessTokenRepository::new(state.db()).issue(user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": user_json(&user), "token": token })),
    )
        .into_response())
}

/// POST /logout - revoke the presenting token; other sessions stay valid.
async fn logout(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    AccessTokenRepository::new(state.db()).revoke(&auth.token).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /me - the authenticated user.
async fn me(auth: AuthUser) -> Response {
    Json(user_json(&auth.user)).into_response()
}
