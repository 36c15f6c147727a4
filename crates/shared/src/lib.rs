//! Shared types, errors, and configuration for Faktura.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error taxonomy
//! - Field-level validation error map
//! - Pagination types for list endpoints
//! - Configuration management
//! - Transactional email service

pub mod config;
pub mod email;
pub mod error;
pub mod pagination;
pub mod validation;

pub use config::{AppConfig, StorageSettings};
pub use email::EmailService;
pub use error::{AppError, AppResult};
pub use pagination::{PageRequest, PageResponse};
pub use validation::ValidationErrors;
