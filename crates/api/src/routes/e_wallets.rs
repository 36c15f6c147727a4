//! E-wallet CRUD routes.

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
use faktura_db::EWalletRepository;
use faktura_db::entities::e_wallets;
use faktura_db::repositories::EWalletInput;
use faktura_shared::validation::required;
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "E-wallet";

/// Creates the e-wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/e-wallets", get(list).post(create))
        .route("/e-wallets/{uuid}", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
struct EWalletPayload {
    name: Option<String>,
}

impl EWalletPayload {
    fn validate(self) -> Result<EWalletInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(name) = self.name.filter(|n| !n.trim().is_empty()) else {
            errors.add("name", required("name"));
            return Err(errors);
        };
        Ok(EWalletInput { name })
    }
}

fn e_wallet_json(e_wallet: &e_wallets::Model) -> Value {
    json!({
        "id": e_wallet.uuid,
        "name": e_wallet.name,
        "created_at": e_wallet.created_at,
        "updated_at": e_wallet.updated_at,
    })
}

/// GET /e-wallets - paginated list.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (e_wallets, total) = EWalletRepository::new(state.db()).list(org.id(), &page).await?;
    let data = e_wallets.iter().map(e_wallet_json).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /e-wallets - create an e-wallet.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<EWalletPayload>,
) -> ApiResult<Response> {
    let input = payload.validate().map_err(ApiError::from)?;
    let e_wallet = EWalletRepository::new(state.db()).create(org.id(), input, auth.id()).await?;
    Ok((StatusCode::CREATED, Json(e_wallet_json(&e_wallet))).into_response())
}

/// GET /e-wallets/{uuid} - a single e-wallet.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let e_wallet = EWalletRepository::new(state.db()).find_by_uuid(uuid).await?;
    let e_wallet = find_owned(e_wallet, org.id(), KIND, |w| w.organization_id)?;
    Ok(Json(e_wallet_json(&e_wallet)).into_response())
}

/// PUT /e-wallets/{uuid} - replace fields.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<EWalletPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = EWalletRepository::new(state.db());
    let e_wallet = repository.find_by_uuid(uuid).await?;
    let e_wallet = find_owned(e_wallet, org.id(), KIND, |w| w.organization_id)?;

    let input = payload.validate().map_err(ApiError::from)?;
    let e_wallet = repository.update(e_wallet, input, auth.id()).await?;
    Ok(Json(e_wallet_json(&e_wallet)).into_response())
}

/// DELETE /e-wallets/{uuid} - soft delete.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = EWalletRepository::new(state.db());
    let e_wallet = repository.find_by_uuid(uuid).await?;
    let e_wallet = find_owned(e_wallet, org.id(), KIND, |w| w.organization_id)?;

    repository.soft_delete(e_wallet, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
