//! Category CRUD routes; listing supports free-text search.

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
use faktura_db::CategoryRepository;
use faktura_db::entities::categories;
use faktura_db::repositories::CategoryInput;
use faktura_shared::validation::required;
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Category";

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list).post(create))
        .route("/categories/{uuid}", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryPayload {
    name: Option<String>,
    description: Option<String>,
}

impl CategoryPayload {
    fn validate(self) -> Result<CategoryInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(name) = self.name.filter(|n| !n.trim().is_empty()) else {
            errors.add("name", required("name"));
            return Err(errors);
        };
        Ok(CategoryInput { name, description: self.description })
    }
}

fn category_json(category: &categories::Model) -> Value {
    json!({
        "id": category.uuid,
        "name": category.name,
        "description": category.description,
        "created_at": category.created_at,
        "updated_at": category.updated_at,
    })
}

/// GET /categories - paginated list, optionally filtered by `search`
/// over name and description.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(search): Query<SearchQuery>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (categories, total) = CategoryRepository::new(state.db())
        .list(org.id(), search.search.as_deref(), &page)
        .await?;
    let data = categories.iter().map(category_json).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /categories - create a category.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<CategoryPayload>,
) -> ApiResult<Response> {
    let input = payload.validate().map_err(ApiError::from)?;
    let category = CategoryRepository::new(state.db())
        .create(org.id(), input, auth.id())
        .await?;
    Ok((StatusCode::CREATED, Json(category_json(&category))).into_response())
}

/// GET /categories/{uuid} - a single category.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let category = CategoryRepository::new(state.db()).find_by_uuid(uuid).await?;
    let category = find_owned(category, org.id(), KIND, |c| c.organization_id)?;
    Ok(Json(category_json(&category)).into_response())
}

/// PUT /categories/{uuid} - replace fields.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = CategoryRepository::new(state.db());
    let category = repository.find_by_uuid(uuid).await?;
    let category = find_owned(category, org.id(), KIND, |c| c.organization_id)?;

    let input = payload.validate().map_err(ApiError::from)?;
    let category = repository.update(category, input, auth.id()).await?;
    Ok(Json(category_json(&category)).into_response())
}

/// DELETE /categories/{uuid} - soft delete.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = CategoryRepository::new(state.db());
    let category = repository.find_by_uuid(uuid).await?;
    let category = find_owned(category, org.id(), KIND, |c| c.organization_id)?;

    repository.soft_delete(category, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
