//! Authentication middleware for protected routes.
//!
//! Bearer tokens are opaque secrets resolved against their stored hash;
//! there is nothing to decode client-side and revoked tokens fail the
//! lookup immediately.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};

use crate::AppState;
use crate::error::ApiError;
use faktura_db::AccessTokenRepository;
use faktura_db::entities::users;

/// The authenticated caller, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user row the presented token resolved to.
    pub user: users::Model,
    /// The raw token as presented, kept so logout can revoke exactly it.
    pub token: String,
}

impl AuthUser {
    /// Internal id of the authenticated user.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.user.id
    }

    /// Whether the user has completed email verification.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.user.email_verified_at.is_some()
    }
}

/// Resolves the bearer token to a user and stores it in request
/// extensions for handlers and downstream middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(bearer)) = bearer else {
        return ApiError::unauthorized("Unauthenticated.").into_response();
    };

    let token = bearer.token().to_string();
    let repository = AccessTokenRepository::new(state.db());

    match repository.authenticate(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(AuthUser { user, token });
            next.run(request).await
        }
        Ok(None) => ApiError::unauthorized("Unauthenticated.").into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Unauthenticated."))
    }
}
