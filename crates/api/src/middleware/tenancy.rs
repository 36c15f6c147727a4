//! Organization tenancy middleware.
//!
//! Applied to everything nested under `/organizations/{org_uuid}`. The
//! organization is resolved once here and handed to handlers through an
//! extension; repositories then receive its internal id explicitly.

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use faktura_db::OrganizationRepository;
use faktura_db::entities::organizations;

/// The organization addressed by the current request, stored in request
/// extensions once membership is proven.
#[derive(Debug, Clone)]
pub struct CurrentOrganization(pub organizations::Model);

impl CurrentOrganization {
    /// Internal id of the organization.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.0.id
    }
}

/// Resolves the `org_uuid` path segment and requires the authenticated
/// user to be a verified member of that organization.
///
/// An unknown or malformed uuid is a 404; a real organization the caller
/// does not belong to is a 403, since its uuid was already disclosed to
/// members.
pub async fn tenancy_middleware(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthUser>().cloned() else {
        return ApiError::unauthorized("Unauthenticated.").into_response();
    };

    let org_uuid = params
        .get("org_uuid")
        .and_then(|raw| Uuid::parse_str(raw).ok());
    let Some(org_uuid) = org_uuid else {
        return ApiError::from(faktura_shared::AppError::NotFound(
            "Organization not found.".to_string(),
        ))
        .into_response();
    };

    let repository = OrganizationRepository::new(state.db());

    let organization = match repository.find_by_uuid(org_uuid).await {
        Ok(Some(organization)) => organization,
        Ok(None) => {
            return ApiError::from(faktura_shared::AppError::NotFound(
                "Organization not found.".to_string(),
            ))
            .into_response();
        }
        Err(err) => return ApiError::from(err).into_response(),
    };

    match repository.is_member(organization.id, user.id()).await {
        Ok(true) => {}
        Ok(false) => {
            return ApiError::forbidden("User is not associated with the specified organization.")
                .into_response();
        }
        Err(err) => return ApiError::from(err).into_response(),
    }

    if !user.is_verified() {
        return ApiError::forbidden("Your email address is not verified.").into_response();
    }

    request.extensions_mut().insert(CurrentOrganization(organization));
    next.run(request).await
}

impl<S> FromRequestParts<S> for CurrentOrganization
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| {
                ApiError::from(faktura_shared::AppError::NotFound(
                    "Organization not found.".to_string(),
                ))
            })
    }
}
