//! Payment aggregate routes.
//!
//! Unlike invoices and purchases, update full-syncs the allocation list
//! against the submitted one inside the repository transaction.

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
use faktura_core::payment::{PaymentDraft, PaymentPayload};
use faktura_db::entities::{payment_invoices, payments};
use faktura_db::repositories::RefEntity;
use faktura_db::{OwnershipChecker, PaymentRepository};
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Payment";

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list).post(create))
        .route("/payments/{uuid}", get(show).put(update).delete(destroy))
}

/// Rejects customer, method, and allocated-invoice references outside
/// the organization.
async fn check_references(
    state: &AppState,
    draft: &PaymentDraft,
    organization_id: i64,
) -> ApiResult<()> {
    let checker = OwnershipChecker::new(state.db());
    let mut errors = ValidationErrors::new();

    check_reference(
        &checker,
        &mut errors,
        "customer_id",
        RefEntity::Customer,
        draft.customer_id,
        organization_id,
    )
    .await?;

    if let Some(bank_id) = draft.bank_id {
        check_reference(&checker, &mut errors, "bank_id", RefEntity::Bank, bank_id, organization_id)
            .await?;
    }

    if let Some(e_wallet_id) = draft.e_wallet_id {
        check_reference(
            &checker,
            &mut errors,
            "e_wallet_id",
            RefEntity::EWallet,
            e_wallet_id,
            organization_id,
        )
        .await?;
    }

    for (index, allocation) in draft.allocations.iter().enumerate() {
        check_indexed_reference(
            &checker,
            &mut errors,
            "invoices",
            index,
            "invoice_id",
            RefEntity::Invoice,
            allocation.invoice_id,
            organization_id,
        )
        .await?;
    }

    errors.into_result().map_err(ApiError::from)
}

fn payment_json(payment: &payments::Model, allocations: Option<&[payment_invoices::Model]>) -> Value {
    let mut body = json!({
        "id": payment.uuid,
        "payment_no": payment.payment_no,
        "customer_id": payment.customer_id,
        "payment_type": payment.payment_type,
        "bank_id": payment.bank_id,
        "e_wallet_id": payment.e_wallet_id,
        "payment_type_reference_no": payment.payment_type_reference_no,
        "payment_type_reference_date": payment.payment_type_reference_date,
        "payment_date": payment.payment_date,
        "total_amount": payment.total_amount,
        "notes": payment.notes,
        "created_at": payment.created_at,
        "updated_at": payment.updated_at,
    });

    if let Some(allocations) = allocations {
        body["invoices"] = allocations.iter().map(allocation_json).collect();
    }

    body
}

fn allocation_json(allocation: &payment_invoices::Model) -> Value {
    json!({
        "invoice_id": allocation.invoice_id,
        "line_total": allocation.line_total,
        "notes": allocation.notes,
    })
}

/// GET /payments - paginated list.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (payments, total) = PaymentRepository::new(state.db()).list(org.id(), &page).await?;
    let data = payments.iter().map(|p| payment_json(p, None)).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /payments - create a payment with its allocations.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<PaymentPayload>,
) -> ApiResult<Response> {
    let draft = payload.validate().map_err(ApiError::from)?;
    check_references(&state, &draft, org.id()).await?;

    let repository = PaymentRepository::new(state.db());
    let payment = repository.create(org.id(), draft, auth.id()).await?;
    let allocations = repository.allocations(payment.id).await?;

    Ok((StatusCode::CREATED, Json(payment_json(&payment, Some(&allocations)))).into_response())
}

/// GET /payments/{uuid} - a single payment with allocations.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = PaymentRepository::new(state.db());
    let payment = repository.find_by_uuid(uuid).await?;
    let payment = find_owned(payment, org.id(), KIND, |p| p.organization_id)?;

    let allocations = repository.allocations(payment.id).await?;
    Ok(Json(payment_json(&payment, Some(&allocations))).into_response())
}

/// PUT /payments/{uuid} - update the header and full-sync allocations.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<PaymentPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = PaymentRepository::new(state.db());
    let payment = repository.find_by_uuid(uuid).await?;
    let payment = find_owned(payment, org.id(), KIND, |p| p.organization_id)?;

    let draft = payload.validate().map_err(ApiError::from)?;
    check_references(&state, &draft, org.id()).await?;

    let payment = repository.update(payment, draft, auth.id()).await?;
    let allocations = repository.allocations(payment.id).await?;
    Ok(Json(payment_json(&payment, Some(&allocations))).into_response())
}

/// DELETE /payments/{uuid} - soft delete the header.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = PaymentRepository::new(state.db());
    let payment = repository.find_by_uuid(uuid).await?;
    let payment = find_owned(payment, org.id(), KIND, |p| p.organization_id)?;

    repository.soft_delete(payment, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
