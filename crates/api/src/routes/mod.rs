//! API route definitions.

use axum::{Router, middleware};

use crate::middleware::{auth_middleware, tenancy_middleware};
use crate::AppState;

pub mod auth;
pub mod banks;
pub mod categories;
pub mod customers;
pub mod e_wallets;
pub mod health;
pub mod invoices;
pub mod organizations;
pub mod password;
pub mod payment_terms;
pub mod payments;
pub mod products;
pub mod purchases;
pub mod suppliers;
pub mod support;
pub mod units;
pub mod verification;

/// Creates the API router: public routes, authenticated routes, and the
/// organization-scoped nest guarded by the tenancy middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let org_scoped = Router::new()
        .merge(organizations::routes())
        .merge(customers::routes())
        .merge(suppliers::routes())
        .merge(products::routes())
        .merge(categories::routes())
        .merge(units::routes())
        .merge(banks::routes())
        .merge(e_wallets::routes())
        .merge(payment_terms::routes())
        .merge(invoices::routes())
        .merge(purchases::routes())
        .merge(payments::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tenancy_middleware,
        ));

    let protected = Router::new()
        .merge(auth::protected_routes())
        .merge(verification::protected_routes())
        .nest("/organizations/{org_uuid}", org_scoped)
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(verification::routes())
        .merge(password::routes())
        .merge(protected)
}
