//! Request middleware: bearer authentication and organization tenancy.

pub mod auth;
pub mod tenancy;

pub use auth::{AuthUser, auth_middleware};
pub use tenancy::{CurrentOrganization, tenancy_middleware};
