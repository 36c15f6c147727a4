//! Photo repository for database operations.
//!
//! Photos are one-per-owner. Upserts return the replaced storage path so
//! the caller can delete the old object after commit; deletes return the
//! removed path the same way.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter,
    Set,
};

use crate::entities::{customer_photos, organization_photos, product_photos};

/// Derived naming of a stored photo.
#[derive(Debug, Clone)]
pub struct PhotoRecord {
    pub file_name: String,
    pub original_name: String,
    pub path: String,
}

/// Photo repository covering the three per-owner photo tables.
#[derive(Debug, Clone)]
pub struct PhotoRepository {
    db: DatabaseConnection,
}

impl PhotoRepository {
    /// Creates a new photo repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads a customer's photo, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn customer_photo(
        &self,
        customer_id: i64,
    ) -> Result<Option<customer_photos::Model>, DbErr> {
        customer_photos::Entity::find()
            .filter(customer_photos::Column::CustomerId.eq(customer_id))
            .one(&self.db)
            .await
    }

    /// Upserts a customer's photo row. Returns the new row and the
    /// storage path of the replaced photo, if there was one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn upsert_customer_photo(
        &self,
        customer_id: i64,
        record: PhotoRecord,
    ) -> Result<(customer_photos::Model, Option<String>), DbErr> {
        let now = Utc::now().into();

        match self.customer_photo(customer_id).await? {
            Some(existing) => {
                let old_path = existing.path.clone();
                let mut active: customer_photos::ActiveModel = existing.into();
                active.file_name = Set(record.file_name);
                active.original_name = Set(record.original_name);
                active.path = Set(record.path);
                active.updated_at = Set(now);
                let model = active.update(&self.db).await?;
                Ok((model, Some(old_path)))
            }
            None => {
                let photo = customer_photos::ActiveModel {
                    customer_id: Set(customer_id),
                    file_name: Set(record.file_name),
                    original_name: Set(record.original_name),
                    path: Set(record.path),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                Ok((photo.insert(&self.db).await?, None))
            }
        }
    }

    /// Deletes a customer's photo row, returning its storage path.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_customer_photo(&self, customer_id: i64) -> Result<Option<String>, DbErr> {
        let Some(photo) = self.customer_photo(customer_id).await? else {
            return Ok(None);
        };
        let path = photo.path.clone();
        photo.delete(&self.db).await?;
        Ok(Some(path))
    }

    /// Loads a product's photo, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn product_photo(
        &self,
        product_id: i64,
    ) -> Result<Option<product_photos::Model>, DbErr> {
        product_photos::Entity::find()
            .filter(product_photos::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await
    }

    /// Upserts a product's photo row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn upsert_product_photo(
        &self,
        product_id: i64,
        record: PhotoRecord,
    ) -> Result<(product_photos::Model, Option<String>), DbErr> {
        let now = Utc::now().into();

        match self.product_photo(product_id).await? {
            Some(existing) => {
                let old_path = existing.path.clone();
                let mut active: product_photos::ActiveModel = existing.into();
                active.file_name = Set(record.file_name);
                active.original_name = Set(record.original_name);
                active.path = Set(record.path);
                active.updated_at = Set(now);
                let model = active.update(&self.db).await?;
                Ok((model, Some(old_path)))
            }
            None => {
                let photo = product_photos::ActiveModel {
                    product_id: Set(product_id),
                    file_name: Set(record.file_name),
                    original_name: Set(record.original_name),
                    path: Set(record.path),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                Ok((photo.insert(&self.db).await?, None))
            }
        }
    }

    /// Deletes a product's photo row, returning its storage path.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_product_photo(&self, product_id: i64) -> Result<Option<String>, DbErr> {
        let Some(photo) = self.product_photo(product_id).await? else {
            return Ok(None);
        };
        let path = photo.path.clone();
        photo.delete(&self.db).await?;
        Ok(Some(path))
    }

    /// Loads an organization's photo, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn organization_photo(
        &self,
        organization_id: i64,
    ) -> Result<Option<organization_photos::Model>, DbErr> {
        organization_photos::Entity::find()
            .filter(organization_photos::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await
    }

    /// Upserts an organization's photo row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn upsert_organization_photo(
        &self,
        organization_id: i64,
        record: PhotoRecord,
    ) -> Result<(organization_photos::Model, Option<String>), DbErr> {
        let now = Utc::now().into();

        match self.organization_photo(organization_id).await? {
            Some(existing) => {
                let old_path = existing.path.clone();
                let mut active: organization_photos::ActiveModel = existing.into();
                active.file_name = Set(record.file_name);
                active.original_name = Set(record.original_name);
                active.path = Set(record.path);
                active.updated_at = Set(now);
                let model = active.update(&self.db).await?;
                Ok((model, Some(old_path)))
            }
            None => {
                let photo = organization_photos::ActiveModel {
                    organization_id: Set(organization_id),
                    file_name: Set(record.file_name),
                    original_name: Set(record.original_name),
                    path: Set(record.path),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                Ok((photo.insert(&self.db).await?, None))
            }
        }
    }

    /// Deletes an organization's photo row, returning its storage path.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_organization_photo(
        &self,
        organization_id: i64,
    ) -> Result<Option<String>, DbErr> {
        let Some(photo) = self.organization_photo(organization_id).await? else {
            return Ok(None);
        };
        let path = photo.path.clone();
        photo.delete(&self.db).await?;
        Ok(Some(path))
    }
}
