//! Helpers shared across route modules: uuid resolution, resource
//! ownership, cross-organization reference checks, and photo uploads.

use axum::extract::Multipart;
use bytes::Bytes;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use faktura_core::photo::{PhotoKind, photo_name};
use faktura_db::entities::users;
use faktura_db::repositories::{OwnershipChecker, PhotoRecord, RefEntity};
use faktura_shared::ValidationErrors;
use faktura_shared::validation::{not_in_organization, required};

/// Parses a path uuid; a malformed value reads as an absent resource.
pub fn parse_uuid(raw: &str, kind: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(kind))
}

/// Resolves a looked-up resource against the route's organization.
///
/// Absent resources and resources owned by another organization both
/// answer 404, with distinct message text.
pub fn find_owned<T>(
    resource: Option<T>,
    organization_id: i64,
    kind: &str,
    owner: impl FnOnce(&T) -> i64,
) -> ApiResult<T> {
    let resource = resource.ok_or_else(|| ApiError::not_found(kind))?;
    if owner(&resource) == organization_id {
        Ok(resource)
    } else {
        Err(ApiError::not_in_organization(kind))
    }
}

/// Records a validation error unless the referenced row is live and owned
/// by the organization.
pub async fn check_reference(
    checker: &OwnershipChecker,
    errors: &mut ValidationErrors,
    field: &str,
    entity: RefEntity,
    id: i64,
    organization_id: i64,
) -> ApiResult<()> {
    if !checker.belongs_to_organization(entity, id, organization_id).await? {
        errors.add(field, not_in_organization(entity.label()));
    }
    Ok(())
}

/// Indexed form of [`check_reference`] for array payload fields.
pub async fn check_indexed_reference(
    checker: &OwnershipChecker,
    errors: &mut ValidationErrors,
    prefix: &str,
    index: usize,
    field: &str,
    entity: RefEntity,
    id: i64,
    organization_id: i64,
) -> ApiResult<()> {
    if !checker.belongs_to_organization(entity, id, organization_id).await? {
        errors.add_indexed(prefix, index, field, not_in_organization(entity.label()));
    }
    Ok(())
}

/// An uploaded photo pulled out of a multipart body.
#[derive(Debug)]
pub struct PhotoUpload {
    /// Filename as sent by the client.
    pub original_name: String,
    /// Declared content type.
    pub content_type: String,
    /// File content.
    pub bytes: Bytes,
}

/// Reads the `photo` part from a multipart body.
///
/// # Errors
///
/// Returns a 422 on a missing or unreadable part.
pub async fn read_photo(mut multipart: Multipart) -> ApiResult<PhotoUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| photo_required())?
    {
        if field.name() != Some("photo") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|_| photo_required())?;

        return Ok(PhotoUpload { original_name, content_type, bytes });
    }

    Err(photo_required())
}

fn photo_required() -> ApiError {
    let mut errors = ValidationErrors::new();
    errors.add("photo", required("photo"));
    errors.into()
}

/// Validates and stores an uploaded photo, returning the row fields for
/// the upsert. The caller deletes any replaced object after the row
/// write succeeds.
pub async fn store_photo(
    state: &AppState,
    kind: PhotoKind,
    upload: PhotoUpload,
) -> ApiResult<PhotoRecord> {
    let size = u64::try_from(upload.bytes.len()).unwrap_or(u64::MAX);
    state.storage.validate_upload(&upload.content_type, size)?;

    let name = photo_name(kind, &upload.original_name, &upload.bytes);
    state.storage.put(&name.path, upload.bytes).await?;

    Ok(PhotoRecord {
        file_name: name.file_name,
        original_name: upload.original_name,
        path: name.path,
    })
}

/// Deletes a replaced or removed storage object, logging failures
/// instead of surfacing them: the row is already gone.
pub async fn discard_object(state: &AppState, path: &str) {
    if let Err(err) = state.storage.delete(path).await {
        tracing::error!(error = %err, path, "Failed to delete stored photo");
    }
}

/// The user shape exposed by auth endpoints.
#[must_use]
pub fn user_json(user: &users::Model) -> Value {
    json!({
        "id": user.uuid,
        "name": user.name,
        "email": user.email,
        "user_type": user.user_type,
        "email_verified_at": user.email_verified_at,
        "created_at": user.created_at,
        "updated_at": user.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_uuid_reads_as_missing() {
        let err = parse_uuid("not-a-uuid", "Customer").unwrap_err();
        let response = axum::response::IntoResponse::into_response(err);
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_find_owned_distinguishes_absent_from_foreign() {
        struct Row {
            organization_id: i64,
        }

        assert!(find_owned(None::<Row>, 1, "Customer", |r| r.organization_id).is_err());
        assert!(
            find_owned(Some(Row { organization_id: 2 }), 1, "Customer", |r| r.organization_id)
                .is_err()
        );
        assert!(
            find_owned(Some(Row { organization_id: 1 }), 1, "Customer", |r| r.organization_id)
                .is_ok()
        );
    }
}
