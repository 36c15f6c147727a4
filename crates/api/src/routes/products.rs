//! Product CRUD and photo routes.
//!
//! Products carry a tax list replaced wholesale on update, and optional
//! unit/category references checked against the organization.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, CurrentOrganization};
use crate::routes::support::{
    check_reference, discard_object, find_owned, parse_uuid, read_photo, store_photo,
};
use faktura_core::photo::PhotoKind;
use faktura_db::entities::{product_photos, product_taxes, products};
use faktura_db::repositories::{ProductInput, ProductTaxInput, RefEntity};
use faktura_db::{OwnershipChecker, PhotoRepository, ProductRepository};
use faktura_shared::validation::{min_zero, required};
use faktura_shared::{PageRequest, PageResponse, ValidationErrors};

const KIND: &str = "Product";

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{uuid}", get(show).put(update).delete(destroy))
        .route("/products/{uuid}/upload-photo", post(upload_photo))
        .route("/products/{uuid}/delete-photo", delete(delete_photo))
}

#[derive(Debug, Deserialize)]
struct ProductTaxPayload {
    name: Option<String>,
    rate: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ProductPayload {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    unit_id: Option<i64>,
    category_id: Option<i64>,
    #[serde(default)]
    taxes: Vec<ProductTaxPayload>,
}

impl ProductPayload {
    fn validate(self) -> Result<ProductInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            errors.add("name", required("name"));
        }
        match self.price {
            None => errors.add("price", required("price")),
            Some(price) if price < Decimal::ZERO => errors.add("price", min_zero("price")),
            Some(_) => {}
        }

        let mut taxes = Vec::with_capacity(self.taxes.len());
        for (index, tax) in self.taxes.iter().enumerate() {
            if tax.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
                errors.add_indexed("taxes", index, "name", required("name"));
            }
            match tax.rate {
                None => errors.add_indexed("taxes", index, "rate", required("rate")),
                Some(rate) if rate < Decimal::ZERO => {
                    errors.add_indexed("taxes", index, "rate", min_zero("rate"));
                }
                Some(_) => {}
            }
            if let (Some(name), Some(rate)) = (tax.name.clone(), tax.rate) {
                taxes.push(ProductTaxInput { name, rate });
            }
        }

        errors.into_result()?;

        match (self.name, self.price) {
            (Some(name), Some(price)) => Ok(ProductInput {
                name,
                description: self.description,
                price,
                unit_id: self.unit_id,
                category_id: self.category_id,
                taxes,
            }),
            _ => Err(ValidationErrors::new()),
        }
    }
}

/// Rejects unit/category references outside the organization.
async fn check_references(
    state: &AppState,
    input: &ProductInput,
    organization_id: i64,
) -> ApiResult<()> {
    let checker = OwnershipChecker::new(state.db());
    let mut errors = ValidationErrors::new();

    if let Some(unit_id) = input.unit_id {
        check_reference(&checker, &mut errors, "unit_id", RefEntity::Unit, unit_id, organization_id)
            .await?;
    }
    if let Some(category_id) = input.category_id {
        check_reference(
            &checker,
            &mut errors,
            "category_id",
            RefEntity::Category,
            category_id,
            organization_id,
        )
        .await?;
    }

    errors.into_result().map_err(ApiError::from)
}

fn product_json(
    product: &products::Model,
    taxes: &[product_taxes::Model],
    photo: Option<&product_photos::Model>,
) -> Value {
    json!({
        "id": product.uuid,
        "name": product.name,
        "description": product.description,
        "price": product.price,
        "unit_id": product.unit_id,
        "category_id": product.category_id,
        "taxes": taxes.iter().map(tax_json).collect::<Vec<_>>(),
        "photo": photo.map(photo_json),
        "created_at": product.created_at,
        "updated_at": product.updated_at,
    })
}

fn tax_json(tax: &product_taxes::Model) -> Value {
    json!({ "name": tax.name, "rate": tax.rate })
}

fn photo_json(photo: &product_photos::Model) -> Value {
    json!({
        "file_name": photo.file_name,
        "original_name": photo.original_name,
        "path": photo.path,
    })
}

/// GET /products - paginated list.
async fn list(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let (products, total) = ProductRepository::new(state.db()).list(org.id(), &page).await?;
    let data = products.iter().map(|p| product_json(p, &[], None)).collect();
    Ok(Json(PageResponse::new(data, &page, total)).into_response())
}

/// POST /products - create a product with its taxes.
async fn create(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<Response> {
    let input = payload.validate().map_err(ApiError::from)?;
    check_references(&state, &input, org.id()).await?;

    let repository = ProductRepository::new(state.db());
    let product = repository.create(org.id(), input, auth.id()).await?;
    let taxes = repository.taxes(product.id).await?;

    Ok((StatusCode::CREATED, Json(product_json(&product, &taxes, None))).into_response())
}

/// GET /products/{uuid} - a single product with taxes and photo.
async fn show(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = ProductRepository::new(state.db());
    let product = repository.find_by_uuid(uuid).await?;
    let product = find_owned(product, org.id(), KIND, |p| p.organization_id)?;

    let taxes = repository.taxes(product.id).await?;
    let photo = PhotoRepository::new(state.db()).product_photo(product.id).await?;

    Ok(Json(product_json(&product, &taxes, photo.as_ref())).into_response())
}

/// PUT /products/{uuid} - replace fields and the tax list.
async fn update(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = ProductRepository::new(state.db());
    let product = repository.find_by_uuid(uuid).await?;
    let product = find_owned(product, org.id(), KIND, |p| p.organization_id)?;

    let input = payload.validate().map_err(ApiError::from)?;
    check_references(&state, &input, org.id()).await?;

    let product = repository.update(product, input, auth.id()).await?;
    let taxes = repository.taxes(product.id).await?;

    Ok(Json(product_json(&product, &taxes, None)).into_response())
}

/// DELETE /products/{uuid} - soft delete.
async fn destroy(
    State(state): State<AppState>,
    org: CurrentOrganization,
    auth: AuthUser,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let repository = ProductRepository::new(state.db());
    let product = repository.find_by_uuid(uuid).await?;
    let product = find_owned(product, org.id(), KIND, |p| p.organization_id)?;

    repository.soft_delete(product, auth.id()).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// POST /products/{uuid}/upload-photo - replace the product's photo.
async fn upload_photo(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let product = ProductRepository::new(state.db()).find_by_uuid(uuid).await?;
    let product = find_owned(product, org.id(), KIND, |p| p.organization_id)?;

    let upload = read_photo(multipart).await?;
    let record = store_photo(&state, PhotoKind::Product, upload).await?;

    let (photo, old_path) = PhotoRepository::new(state.db())
        .upsert_product_photo(product.id, record)
        .await?;

    if let Some(old_path) = old_path.filter(|p| *p != photo.path) {
        discard_object(&state, &old_path).await;
    }

    Ok((StatusCode::CREATED, Json(photo_json(&photo))).into_response())
}

/// DELETE /products/{uuid}/delete-photo - remove the product's photo.
async fn delete_photo(
    State(state): State<AppState>,
    org: CurrentOrganization,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let uuid = parse_uuid(&uuid, KIND)?;
    let product = ProductRepository::new(state.db()).find_by_uuid(uuid).await?;
    let product = find_owned(product, org.id(), KIND, |p| p.organization_id)?;

    if let Some(path) = PhotoRepository::new(state.db()).delete_product_photo(product.id).await? {
        discard_object(&state, &path).await;
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}
