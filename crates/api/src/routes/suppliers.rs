//! Supplier CRUD routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, CurrentOrganization};
use crate::routes::support::{find_owned, parse_uuid};
use faktura_db::SupplierRepository;
use faktura_db::entities::suppliers;
use faktura_db::repositories::SupplierInput;
use faktura_shared::validation::required;
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Supplier";

/// Creates the supplier routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list).post(create))
        .route("/suppliers/{uuid}", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
struct SupplierPayload {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl SupplierPayload {
    fn validate(self) -> Result<SupplierInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(name) = self.name.filter(|n| !n.trim().is_empty()) else {
            errors.add("name", required("name"));
            return Err(errors);
        };
        Ok(SupplierInput {
            name,
            email: self.email,
            phone: self.phone,
            address: self.address,
        })
    }
}

fn supplier_json(supplier: &suppliers::Model) -> Value {
    json!({
        "id": supplier.uuid,
        "name": supplier.name,
        "email": supplier.email,
        "phone": supplier.phone,
        "address": supplier.address,
        "created_at": supplier.created_at,
        "updated_at": supplier.updated_at,
    })
}

/// GET /suppliers - paginated list.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (suppliers, total) = SupplierRepository::new(state.db()).list(org.id(), &page).await?;
    let data = suppliers.iter().map(supplier_json).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /suppliers - create a supplier.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<SupplierPayload>,
) -> ApiResult<Response> {
    let input = payload.validate().map_err(ApiError::from)?;
    let supplier = SupplierRepository::new(state.db())
        .create(org.id(), input, auth.id())
        .await?;
    Ok((StatusCode::CREATED, Json(supplier_json(&supplier))).into_response())
}

/// GET /suppliers/{uuid} - a single supplier.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let supplier = SupplierRepository::new(state.db()).find_by_uuid(uuid).await?;
    let supplier = find_owned(supplier, org.id(), KIND, |s| s.organization_id)?;
    Ok(Json(supplier_json(&supplier)).into_response())
}

/// PUT /suppliers/{uuid} - replace profile fields.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<SupplierPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = SupplierRepository::new(state.db());
    let supplier = repository.find_by_uuid(uuid).await?;
    let supplier = find_owned(supplier, org.id(), KIND, |s| s.organization_id)?;

    let input = payload.validate().map_err(ApiError::from)?;
    let supplier = repository.update(supplier, input, auth.id()).await?;
    Ok(Json(supplier_json(&supplier)).into_response())
}

/// DELETE /suppliers/{uuid} - soft delete.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = SupplierRepository::new(state.db());
    let supplier = repository.find_by_uuid(uuid).await?;
    let supplier = find_owned(supplier, org.id(), KIND, |s| s.organization_id)?;

    repository.soft_delete(supplier, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
