//! Supplier repository for database operations.

use chrono::Utc;
use faktura_shared::pagination::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::suppliers;

/// Supplier fields accepted on create and update.
#[derive(Debug, Clone)]
pub struct SupplierInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Supplier repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    db: DatabaseConnection,
}

impl SupplierRepository {
    /// Creates a new supplier repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live suppliers of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<suppliers::Model>, u64), DbErr> {
        let paginator = suppliers::Entity::find()
            .filter(suppliers::Column::OrganizationId.eq(organization_id))
            .filter(suppliers::Column::DeletedAt.is_null())
            .order_by_asc(suppliers::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live supplier by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<suppliers::Model>, DbErr> {
        suppliers::Entity::find()
            .filter(suppliers::Column::Uuid.eq(uuid))
            .filter(suppliers::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Creates a supplier in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        organization_id: i64,
        input: SupplierInput,
        actor: i64,
    ) -> Result<suppliers::Model, DbErr> {
        let now = Utc::now().into();
        let supplier = suppliers::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        supplier.insert(&self.db).await
    }

    /// Replaces a supplier's profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        supplier: suppliers::Model,
        input: SupplierInput,
        actor: i64,
    ) -> Result<suppliers::Model, DbErr> {
        let mut active: suppliers::ActiveModel = supplier.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.address = Set(input.address);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Soft-deletes a supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, supplier: suppliers::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: suppliers::ActiveModel = supplier.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }
}
