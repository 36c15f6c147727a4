//! Purchase aggregate routes.
//!
//! Same aggregate shape as invoices, on the supplier side: items are
//! persisted with the header on create and ignored on update.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, CurrentOrganization};
use crate::routes::support::{check_indexed_reference, check_reference, find_owned, parse_uuid};
use faktura_core::purchase::{PurchaseDraft, PurchasePayload};
use faktura_db::entities::{purchase_items, purchases};
use faktura_db::repositories::RefEntity;
use faktura_db::{OwnershipChecker, PurchaseRepository};
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Purchase";

/// Creates the purchase routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", get(list).post(create))
        .route("/purchases/{uuid}", get(show).put(update).delete(destroy))
}

/// Rejects supplier, payment-term, and item-product references outside
/// the organization.
async fn check_references(
    state: &AppState,
    draft: &PurchaseDraft,
    organization_id: i64,
) -> ApiResult<()> {
    let checker = OwnershipChecker::new(state.db());
    let mut errors = ValidationErrors::new();

    check_reference(
        &checker,
        &mut errors,
        "supplier_id",
        RefEntity::Supplier,
        draft.supplier_id,
        organization_id,
    )
    .await?;

    if let Some(payment_term_id) = draft.payment_term_id {
        check_reference(
            &checker,
            &mut errors,
            "payment_term_id",
            RefEntity::PaymentTerm,
            payment_term_id,
            organization_id,
        )
        .await?;
    }

    for (index, item) in draft.items.iter().enumerate() {
        check_indexed_reference(
            &checker,
            &mut errors,
            "items",
            index,
            "product_id",
            RefEntity::Product,
            item.product_id,
            organization_id,
        )
        .await?;
    }

    errors.into_result().map_err(ApiError::from)
}

fn purchase_json(purchase: &purchases::Model, items: Option<&[purchase_items::Model]>) -> Value {
    let mut body = json!({
        "id": purchase.uuid,
        "purchase_no": purchase.purchase_no,
        "supplier_id": purchase.supplier_id,
        "payment_term_id": purchase.payment_term_id,
        "purchase_date": purchase.purchase_date,
        "total_amount": purchase.total_amount,
        "status": purchase.status,
        "notes": purchase.notes,
        "created_at": purchase.created_at,
        "updated_at": purchase.updated_at,
    });

    if let Some(items) = items {
        body["items"] = items.iter().map(item_json).collect();
    }

    body
}

fn item_json(item: &purchase_items::Model) -> Value {
    json!({
        "product_id": item.product_id,
        "quantity": item.quantity,
        "unit_price": item.unit_price,
        "line_total": item.line_total,
    })
}

/// GET /purchases - paginated list.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (purchases, total) = PurchaseRepository::new(state.db()).list(org.id(), &page).await?;
    let data = purchases.iter().map(|p| purchase_json(p, None)).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /purchases - create a purchase with its items.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<PurchasePayload>,
) -> ApiResult<Response> {
    let draft = payload.validate().map_err(ApiError::from)?;
    check_references(&state, &draft, org.id()).await?;

    let repository = PurchaseRepository::new(state.db());
    let purchase = repository.create(org.id(), draft, auth.id()).await?;
    let items = repository.items(purchase.id).await?;

    Ok((StatusCode::CREATED, Json(purchase_json(&purchase, Some(&items)))).into_response())
}

/// GET /purchases/{uuid} - a single purchase with items.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = PurchaseRepository::new(state.db());
    let purchase = repository.find_by_uuid(uuid).await?;
    let purchase = find_owned(purchase, org.id(), KIND, |p| p.organization_id)?;

    let items = repository.items(purchase.id).await?;
    Ok(Json(purchase_json(&purchase, Some(&items))).into_response())
}

/// PUT /purchases/{uuid} - update header fields; items are immutable
/// after creation.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<PurchasePayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = PurchaseRepository::new(state.db());
    let purchase = repository.find_by_uuid(uuid).await?;
    let purchase = find_owned(purchase, org.id(), KIND, |p| p.organization_id)?;

    let draft = payload.validate().map_err(ApiError::from)?;
    check_references(&state, &draft, org.id()).await?;

    let purchase = repository.update_header(purchase, draft, auth.id()).await?;
    let items = repository.items(purchase.id).await?;
    Ok(Json(purchase_json(&purchase, Some(&items))).into_response())
}

/// DELETE /purchases/{uuid} - soft delete the header.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = PurchaseRepository::new(state.db());
    let purchase = repository.find_by_uuid(uuid).await?;
    let purchase = find_owned(purchase, org.id(), KIND, |p| p.organization_id)?;

    repository.soft_delete(purchase, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
