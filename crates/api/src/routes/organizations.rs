//! Organization profile and photo routes (inside the tenancy nest).

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Value, json};

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, CurrentOrganization};
use crate::routes::support::{discard_object, read_photo, store_photo};
use faktura_core::photo::PhotoKind;
use faktura_db::repositories::OrganizationInput;
use faktura_db::{OrganizationRepository, PhotoRepository};
use faktura_db::entities::{organization_photos, organizations};

/// Creates the organization routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(show).put(update))
        .route("/upload-photo", post(upload_photo))
        .route("/delete-photo", delete(delete_photo))
}

fn organization_json(
    organization: &organizations::Model,
    photo: Option<&organization_photos::Model>,
) -> Value {
    json!({
        "id": organization.uuid,
        "name": organization.name,
        "email": organization.email,
        "phone": organization.phone,
        "address": organization.address,
        "photo": photo.map(photo_json),
        "created_at": organization.created_at,
        "updated_at": organization.updated_at,
    })
}

fn photo_json(photo: &organization_photos::Model) -> Value {
    json!({
        "file_name": photo.file_name,
        "original_name": photo.original_name,
        "path": photo.path,
    })
}

/// GET / - the current organization.
async fn show(State(state): State<AppState>, org: CurrentOrganization) -> ApiResult<Response> {
    let photo = PhotoRepository::new(state.db()).organization_photo(org.id()).await?;
    Ok(Json(organization_json(&org.0, photo.as_ref())).into_response())
}

/// PUT / - update profile fields; absent fields stay unchanged.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(input): Json<OrganizationInput>,
) -> ApiResult<Response> {
    let organization = OrganizationRepository::new(state.db())
        .update(org.0, input, auth.id())
        .await?;

    let photo = PhotoRepository::new(state.db())
        .organization_photo(organization.id)
        .await?;

    Ok(Json(organization_json(&organization, photo.as_ref())).into_response())
}

/// POST /upload-photo - replace the organization's photo.
async fn upload_photo(
    State(state): State<AppState>,
    org: CurrentOrganization,
    multipart: Multipart,
) -> ApiResult<Response> {
    let upload = read_photo(multipart).await?;
    let record = store_photo(&state, PhotoKind::Organization, upload).await?;

    let (photo, old_path) = PhotoRepository::new(state.db())
        .upsert_organization_photo(org.id(), record)
        .await?;

    if let Some(old_path) = old_path.filter(|p| *p != photo.path) {
        discard_object(&state, &old_path).await;
    }

    Ok((StatusCode::CREATED, Json(photo_json(&photo))).into_response())
}

/// DELETE /delete-photo - remove the organization's photo.
async fn delete_photo(
    State(state): State<AppState>,
    org: CurrentOrganization,
) -> ApiResult<Response> {
    if let Some(path) = PhotoRepository::new(state.db())
        .delete_organization_photo(org.id())
        .await?
    {
        discard_object(&state, &path).await;
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}
