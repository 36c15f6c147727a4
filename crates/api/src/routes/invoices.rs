//! Invoice aggregate routes.
//!
//! Create persists the header and items in one transaction; update
//! touches the header only. `total_paid` is recomputed on every read
//! from allocations whose parent payment is still live.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, CurrentOrganization};
use crate::routes::support::{check_indexed_reference, check_reference, find_owned, parse_uuid};
use faktura_core::invoice::{InvoiceDraft, InvoicePayload};
use faktura_db::entities::{invoice_items, invoice_settings, invoices};
use faktura_db::repositories::{InvoiceSettingInput, RefEntity};
use faktura_db::{InvoiceRepository, OwnershipChecker};
use faktura_shared::validation::{min_zero, required};
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Invoice";

const DUE_REMINDERS: [&str; 3] = ["on_due_date", "before_7_days", "before_15_days"];
const LATE_FEE_TYPES: [&str; 2] = ["flat", "percentage"];

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list).post(create))
        .route("/invoices/{uuid}", get(show).put(update).delete(destroy))
        .route("/invoices/{uuid}/update-setting", put(update_setting))
}

#[derive(Debug, Deserialize)]
struct SettingPayload {
    due_reminder: Option<String>,
    late_fee_type: Option<String>,
    late_fee_rate: Option<Decimal>,
    late_fee: Option<Decimal>,
    is_gst_enabled: Option<bool>,
    is_unit_enabled: Option<bool>,
    is_recurring: Option<bool>,
    custom_fields_enabled: Option<bool>,
}

impl SettingPayload {
    fn validate(self) -> Result<InvoiceSettingInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let due_reminder = match self.due_reminder {
            None => {
                errors.add("due_reminder", required("due reminder"));
                None
            }
            Some(value) if DUE_REMINDERS.contains(&value.as_str()) => Some(value),
            Some(_) => {
                errors.add("due_reminder", "The selected due reminder is invalid.");
                None
            }
        };

        let late_fee_type = match self.late_fee_type {
            None => {
                errors.add("late_fee_type", required("late fee type"));
                None
            }
            Some(value) if LATE_FEE_TYPES.contains(&value.as_str()) => Some(value),
            Some(_) => {
                errors.add("late_fee_type", "The selected late fee type is invalid.");
                None
            }
        };

        for (field, attribute, value) in [
            ("late_fee_rate", "late fee rate", self.late_fee_rate),
            ("late_fee", "late fee", self.late_fee),
        ] {
            if let Some(v) = value
                && v < Decimal::ZERO
            {
                errors.add(field, min_zero(attribute));
            }
        }

        errors.into_result()?;

        match (due_reminder, late_fee_type) {
            (Some(due_reminder), Some(late_fee_type)) => Ok(InvoiceSettingInput {
                due_reminder,
                late_fee_type,
                late_fee_rate: self.late_fee_rate,
                late_fee: self.late_fee,
                is_gst_enabled: self.is_gst_enabled.unwrap_or_default(),
                is_unit_enabled: self.is_unit_enabled.unwrap_or_default(),
                is_recurring: self.is_recurring.unwrap_or_default(),
                custom_fields_enabled: self.custom_fields_enabled.unwrap_or_default(),
            }),
            _ => Err(ValidationErrors::new()),
        }
    }
}

/// Rejects customer, payment-term, and item-product references outside
/// the organization.
async fn check_references(
    state: &AppState,
    draft: &InvoiceDraft,
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

fn invoice_json(
    invoice: &invoices::Model,
    items: Option<&[invoice_items::Model]>,
    setting: Option<&invoice_settings::Model>,
    total_paid: Decimal,
) -> Value {
    let mut body = json!({
        "id": invoice.uuid,
        "invoice_no": invoice.invoice_no,
        "customer_id": invoice.customer_id,
        "payment_term_id": invoice.payment_term_id,
        "issue_date": invoice.issue_date,
        "due_date": invoice.due_date,
        "discount_type": invoice.discount_type,
        "discount_amount": invoice.discount_amount,
        "discount_rate": invoice.discount_rate,
        "tax_total": invoice.tax_total,
        "total_amount": invoice.total_amount,
        "total_paid": total_paid,
        "status": invoice.status,
        "bill_to": invoice.bill_to,
        "bill_from": invoice.bill_from,
        "ship_to": invoice.ship_to,
        "terms": invoice.terms,
        "notes": invoice.notes,
        "created_at": invoice.created_at,
        "updated_at": invoice.updated_at,
    });

    if let Some(items) = items {
        body["items"] = items.iter().map(item_json).collect();
    }
    if let Some(setting) = setting {
        body["setting"] = setting_json(setting);
    }

    body
}

fn item_json(item: &invoice_items::Model) -> Value {
    json!({
        "product_id": item.product_id,
        "quantity": item.quantity,
        "unit_price": item.unit_price,
        "line_total": item.line_total,
    })
}

fn setting_json(setting: &invoice_settings::Model) -> Value {
    json!({
        "due_reminder": setting.due_reminder,
        "late_fee_type": setting.late_fee_type,
        "late_fee_rate": setting.late_fee_rate,
        "late_fee": setting.late_fee,
        "is_gst_enabled": setting.is_gst_enabled,
        "is_unit_enabled": setting.is_unit_enabled,
        "is_recurring": setting.is_recurring,
        "custom_fields_enabled": setting.custom_fields_enabled,
    })
}

/// GET /invoices - paginated list with `total_paid` per invoice.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let repository = InvoiceRepository::new(state.db());
    let (invoices, total) = repository.list(org.id(), &page).await?;

    let ids: Vec<i64> = invoices.iter().map(|i| i.id).collect();
    let paid = repository.total_paid_map(&ids).await?;

    let data = invoices
        .iter()
        .map(|invoice| {
            let total_paid = paid.get(&invoice.id).copied().unwrap_or(Decimal::ZERO);
            invoice_json(invoice, None, None, total_paid)
        })
        .collect();

    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /invoices - create an invoice with its items.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<InvoicePayload>,
) -> ApiResult<Response> {
    let draft = payload.validate().map_err(ApiError::from)?;
    check_references(&state, &draft, org.id()).await?;

    let repository = InvoiceRepository::new(state.db());
    let invoice = repository.create(org.id(), draft, auth.id()).await?;
    let items = repository.items(invoice.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(invoice_json(&invoice, Some(&items), None, Decimal::ZERO)),
    )
        .into_response())
}

/// GET /invoices/{uuid} - a single invoice with items, setting, and
/// `total_paid`.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = InvoiceRepository::new(state.db());
    let invoice = repository.find_by_uuid(uuid).await?;
    let invoice = find_owned(invoice, org.id(), KIND, |i| i.organization_id)?;

    let items = repository.items(invoice.id).await?;
    let setting = repository.setting(invoice.id).await?;
    let total_paid = repository.total_paid(invoice.id).await?;

    Ok(Json(invoice_json(&invoice, Some(&items), setting.as_ref(), total_paid)).into_response())
}

/// PUT /invoices/{uuid} - update header fields; items are immutable
/// after creation.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<InvoicePayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = InvoiceRepository::new(state.db());
    let invoice = repository.find_by_uuid(uuid).await?;
    let invoice = find_owned(invoice, org.id(), KIND, |i| i.organization_id)?;

    let draft = payload.validate().map_err(ApiError::from)?;
    check_references(&state, &draft, org.id()).await?;

    let invoice = repository.update_header(invoice, draft, auth.id()).await?;
    let items = repository.items(invoice.id).await?;
    let total_paid = repository.total_paid(invoice.id).await?;

    Ok(Json(invoice_json(&invoice, Some(&items), None, total_paid)).into_response())
}

/// DELETE /invoices/{uuid} - soft delete the header.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = InvoiceRepository::new(state.db());
    let invoice = repository.find_by_uuid(uuid).await?;
    let invoice = find_owned(invoice, org.id(), KIND, |i| i.organization_id)?;

    repository.soft_delete(invoice, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// PUT /invoices/{uuid}/update-setting - upsert the settings row.
async fn update_setting(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
    Json(payload): Json<SettingPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = InvoiceRepository::new(state.db());
    let invoice = repository.find_by_uuid(uuid).await?;
    let invoice = find_owned(invoice, org.id(), KIND, |i| i.organization_id)?;

    let input = payload.validate().map_err(ApiError::from)?;
    let setting = repository.upsert_setting(invoice.id, input).await?;

    Ok(Json(setting_json(&setting)).into_response())
}
