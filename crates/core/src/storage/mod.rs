//! Object storage for uploaded photos, built on Apache OpenDAL.
//!
//! Vendor-agnostic: S3-compatible services for deployment, local
//! filesystem for development. Only whole-object put/read/delete is
//! needed; photos are small.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::StorageService;
