//! Payment term CRUD routes.

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
use faktura_db::PaymentTermRepository;
use faktura_db::entities::payment_terms;
use faktura_db::repositories::PaymentTermInput;
use faktura_shared::validation::required;
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Payment term";

/// Creates the payment term routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payment-terms", get(list).post(create))
        .route("/payment-terms/{uuid}", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
struct PaymentTermPayload {
    name: Option<String>,
    description: Option<String>,
}

impl PaymentTermPayload {
    fn validate(self) -> Result<PaymentTermInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Some(name) = self.name.filter(|n| !n.trim().is_empty()) else {
            errors.add("name", required("name"));
            return Err(errors);
        };
        Ok(PaymentTermInput { name, description: self.description })
    }
}

fn payment_term_json(payment_term: &payment_terms::Model) -> Value {
    json!({
        "id": payment_term.uuid,
        "name": payment_term.name,
        "description": payment_term.description,
        "created_at": payment_term.created_at,
        "updated_at": payment_term.updated_at,
    })
}

/// GET /payment-terms - paginated list.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (terms, total) = PaymentTermRepository::new(state.db()).list(org.id(), &page).await?;
    let data = terms.iter().map(payment_term_json).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /payment-terms - create a payment term.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<PaymentTermPayload>,
) -> ApiResult<Response> {
    let input = payload.validate().map_err(ApiError::from)?;
    let payment_term = PaymentTermRepository::new(state.db())
        .create(org.id(), input, auth.id())
        .await?;
    Ok((StatusCode::CREATED, Json(payment_term_json(&payment_term))).into_response())
}

/// GET /payment-terms/{uuid} - a single payment term.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let payment_term = PaymentTermRepository::new(state.db()).find_by_uuid(uuid).await?;
    let payment_term = find_owned(payment_term, org.id(), KIND, |t| t.organization_id)?;
    Ok(Json(payment_term_json(&payment_term)).into_response())
}

/// PUT /payment-terms/{uuid} - replace fields.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<PaymentTermPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = PaymentTermRepository::new(state.db());
    let payment_term = repository.find_by_uuid(uuid).await?;
    let payment_term = find_owned(payment_term, org.id(), KIND, |t| t.organization_id)?;

    let input = payload.validate().map_err(ApiError::from)?;
    let payment_term = repository.update(payment_term, input, auth.id()).await?;
    Ok(Json(payment_term_json(&payment_term)).into_response())
}

/// DELETE /payment-terms/{uuid} - soft delete.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = PaymentTermRepository::new(state.db());
    let payment_term = repository.find_by_uuid(uuid).await?;
    let payment_term = find_owned(payment_term, org.id(), KIND, |t| t.organization_id)?;

    repository.soft_delete(payment_term, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
