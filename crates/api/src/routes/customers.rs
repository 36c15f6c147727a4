//! Customer CRUD and photo routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, CurrentOrganization};
use crate::routes::support::{discard_object, find_owned, parse_uuid, read_photo, store_photo};
use faktura_core::photo::PhotoKind;
use faktura_db::entities::{customer_photos, customers};
use faktura_db::repositories::CustomerInput;
use faktura_db::{CustomerRepository, PhotoRepository};
use faktura_shared::validation::required;
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Customer";

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list).post(create))
        .route("/customers/{uuid}", get(show).put(update).delete(destroy))
        .route("/customers/{uuid}/upload-photo", post(upload_photo))
        .route("/customers/{uuid}/delete-photo", delete(delete_photo))
}

#[derive(Debug, Deserialize)]
struct CustomerPayload {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl CustomerPayload {
    fn validate(self) -> Result<CustomerInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(name) = self.name.filter(|n| !n.trim().is_empty()) else {
            errors.add("name", required("name"));
            return Err(errors);
        };
        Ok(CustomerInput {
            name,
            email: self.email,
            phone: self.phone,
            address: self.address,
        })
    }
}

fn customer_json(customer: &customers::Model, photo: Option<&customer_photos::Model>) -> Value {
    json!({
        "id": customer.uuid,
        "name": customer.name,
        "email": customer.email,
        "phone": customer.phone,
        "address": customer.address,
        "photo": photo.map(photo_json),
        "created_at": customer.created_at,
        "updated_at": customer.updated_at,
    })
}

fn photo_json(photo: &customer_photos::Model) -> Value {
    json!({
        "file_name": photo.file_name,
        "original_name": photo.original_name,
        "path": photo.path,
    })
}

/// GET /customers - paginated list.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (customers, total) = CustomerRepository::new(state.db()).list(org.id(), &page).await?;
    let data = customers.iter().map(|c| customer_json(c, None)).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /customers - create a customer.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<CustomerPayload>,
) -> ApiResult<Response> {
    let input = payload.validate().map_err(ApiError::from)?;
    let customer = CustomerRepository::new(state.db())
        .create(org.id(), input, auth.id())
        .await?;
    Ok((StatusCode::CREATED, Json(customer_json(&customer, None))).into_response())
}

/// GET /customers/{uuid} - a single customer with their photo.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let customer = CustomerRepository::new(state.db()).find_by_uuid(uuid).await?;
    let customer = find_owned(customer, org.id(), KIND, |c| c.organization_id)?;

    let photo = PhotoRepository::new(state.db()).customer_photo(customer.id).await?;
    Ok(Json(customer_json(&customer, photo.as_ref())).into_response())
}

/// PUT /customers/{uuid} - replace profile fields.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<CustomerPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = CustomerRepository::new(state.db());
    let customer = repository.find_by_uuid(uuid).await?;
    let customer = find_owned(customer, org.id(), KIND, |c| c.organization_id)?;

    let input = payload.validate().map_err(ApiError::from)?;
    let customer = repository.update(customer, input, auth.id()).await?;
    Ok(Json(customer_json(&customer, None)).into_response())
}

/// DELETE /customers/{uuid} - soft delete.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = CustomerRepository::new(state.db());
    let customer = repository.find_by_uuid(uuid).await?;
    let customer = find_owned(customer, org.id(), KIND, |c| c.organization_id)?;

    repository.soft_delete(customer, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// POST /customers/{uuid}/upload-photo - replace the customer's photo.
async fn upload_photo(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let customer = CustomerRepository::new(state.db()).find_by_uuid(uuid).await?;
    let customer = find_owned(customer, org.id(), KIND, |c| c.organization_id)?;

    let upload = read_photo(multipart).await?;
    let record = store_photo(&state, PhotoKind::Customer, upload).await?;

    let (photo, old_path) = PhotoRepository::new(state.db())
        .upsert_customer_photo(customer.id, record)
        .await?;

    if let Some(old_path) = old_path.filter(|p| *p != photo.path) {
        discard_object(&state, &old_path).await;
    }

    Ok((StatusCode::CREATED, Json(photo_json(&photo))).into_response())
}

/// DELETE /customers/{uuid}/delete-photo - remove the customer's photo.
async fn delete_photo(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let customer = CustomerRepository::new(state.db()).find_by_uuid(uuid).await?;
    let customer = find_owned(customer, org.id(), KIND, |c| c.organization_id)?;

    if let Some(path) = PhotoRepository::new(state.db()).delete_customer_photo(customer.id).await? {
        discard_object(&state, &path).await;
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}
