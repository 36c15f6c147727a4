//! Unit CRUD routes.

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
use faktura_db::UnitRepository;
use faktura_db::entities::units;
use faktura_db::repositories::UnitInput;
use faktura_shared::validation::required;
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Unit";

/// Creates the unit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/units", get(list).post(create))
        .route("/units/{uuid}", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
struct UnitPayload {
    name: Option<String>,
    description: Option<String>,
}

impl UnitPayload {
    fn validate(self) -> Result<UnitInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(name) = self.name.filter(|n| !n.trim().is_empty()) else {
            errors.add("name", required("name"));
            return Err(errors);
        };
        Ok(UnitInput { name, description: self.description })
    }
}

fn unit_json(unit: &units::Model) -> Value {
    json!({
        "id": unit.uuid,
        "name": unit.name,
        "description": unit.description,
        "created_at": unit.created_at,
        "updated_at": unit.updated_at,
    })
}

/// GET /units - paginated list.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (units, total) = UnitRepository::new(state.db()).list(org.id(), &page).await?;
    let data = units.iter().map(unit_json).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /units - create a unit.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<UnitPayload>,
) -> ApiResult<Response> {
    let input = payload.validate().map_err(ApiError::from)?;
    let unit = UnitRepository::new(state.db()).create(org.id(), input, auth.id()).await?;
    Ok((StatusCode::CREATED, Json(unit_json(&unit))).into_response())
}

/// GET /units/{uuid} - a single unit.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let unit = UnitRepository::new(state.db()).find_by_uuid(uuid).await?;
    let unit = find_owned(unit, org.id(), KIND, |u| u.organization_id)?;
    Ok(Json(unit_json(&unit)).into_response())
}

/// PUT /units/{uuid} - replace fields.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<UnitPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = UnitRepository::new(state.db());
    let unit = repository.find_by_uuid(uuid).await?;
    let unit = find_owned(unit, org.id(), KIND, |u| u.organization_id)?;

    let input = payload.validate().map_err(ApiError::from)?;
    let unit = repository.update(unit, input, auth.id()).await?;
    Ok(Json(unit_json(&unit)).into_response())
}

/// DELETE /units/{uuid} - soft delete.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = UnitRepository::new(state.db());
    let unit = repository.find_by_uuid(uuid).await?;
    let unit = find_owned(unit, org.id(), KIND, |u| u.organization_id)?;

    repository.soft_delete(unit, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
