//! `SeaORM` entity definitions.
//!
//! Conventions shared by the tenant-owned tables:
//! - `id` is the internal bigint key used for foreign keys; `uuid` is the
//!   only identifier ever exposed over the API.
//! - `created_by` / `updated_by` / `deleted_by` record the acting user.
//! - `deleted_at` drives soft deletion; queries exclude non-null rows.

pub mod access_tokens;
pub mod banks;
pub mod categories;
pub mod customer_photos;
pub mod customers;
pub mod e_wallets;
pub mod invoice_items;
pub mod invoice_settings;
pub mod invoices;
pub mod organization_photos;
pub mod organization_users;
pub mod organizations;
pub mod password_reset_tokens;
pub mod payment_invoices;
pub mod payment_terms;
pub mod payments;
pub mod product_photos;
pub mod product_taxes;
pub mod products;
pub mod purchase_items;
pub mod purchases;
pub mod roles;
pub mod suppliers;
pub mod units;
pub mod users;
