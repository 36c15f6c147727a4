//! Core business logic for Faktura.
//!
//! Pure domain rules with no web or database dependencies:
//! - Password hashing
//! - Flexible date normalization
//! - Invoice/purchase/payment draft validation
//! - Payment allocation full-sync planning
//! - Photo naming and object storage

pub mod auth;
pub mod dates;
pub mod invoice;
pub mod items;
pub mod payment;
pub mod photo;
pub mod purchase;
pub mod storage;
