//! Bank CRUD routes.

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
use faktura_db::BankRepository;
use faktura_db::entities::banks;
use faktura_db::repositories::BankInput;
use faktura_shared::validation::required;
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Bank";

/// Creates the bank routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/banks", get(list).post(create))
        .route("/banks/{uuid}", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
struct BankPayload {
    name: Option<String>,
}

impl BankPayload {
    fn validate(self) -> Result<BankInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(name) = self.name.filter(|n| !n.trim().is_empty()) else {
            errors.add("name", required("name"));
            return Err(errors);
        };
        Ok(BankInput { name })
    }
}

fn bank_json(bank: &banks::Model) -> Value {
    json!({
        "id": bank.uuid,
        "name": bank.name,
        "created_at": bank.created_at,
        "updated_at": bank.updated_at,
    })
}

/// GET /banks - paginated list.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (banks, total) = BankRepository::new(state.db()).list(org.id(), &page).await?;
    let data = banks.iter().map(bank_json).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /banks - create a bank.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<BankPayload>,
) -> ApiResult<Response> {
    let input = payload.validate().map_err(ApiError::from)?;
    let bank = BankRepository::new(state.db()).create(org.id(), input, auth.id()).await?;
    Ok((StatusCode::CREATED, Json(bank_json(&bank))).into_response())
}

/// GET /banks/{uuid} - a single bank.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let bank = BankRepository::new(state.db()).find_by_uuid(uuid).await?;
    let bank = find_owned(bank, org.id(), KIND, |b| b.organization_id)?;
    Ok(Json(bank_json(&bank)).into_response())
}

/// PUT /banks/{uuid} - replace fields.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<BankPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = BankRepository::new(state.db());
    let bank = repository.find_by_uuid(uuid).await?;
    let bank = find_owned(bank, org.id(), KIND, |b| b.organization_id)?;

    let input = payload.validate().map_err(ApiError::from)?;
    let bank = repository.update(bank, input, auth.id()).await?;
    Ok(Json(bank_json(&bank)).into_response())
}

/// DELETE /banks/{uuid} - soft delete.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = BankRepository::new(state.db());
    let bank = repository.find_by_uuid(uuid).await?;
    let bank = find_owned(bank, org.id(), KIND, |b| b.organization_id)?;

    repository.soft_delete(bank, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
