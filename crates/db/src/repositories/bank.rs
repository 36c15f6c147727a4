//! Bank repository for database operations.

use chrono::Utc;
use faktura_shared::pagination::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::banks;

/// Bank fields accepted on create and update.
#[derive(Debug, Clone)]
pub struct BankInput {
    pub name: String,
}

/// Bank repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BankRepository {
    db: DatabaseConnection,
}

impl BankRepository {
    /// Creates a new bank repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live banks of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<banks::Model>, u64), DbErr> {
        let paginator = banks::Entity::find()
            .filter(banks::Column::OrganizationId.eq(organization_id))
            .filter(banks::Column::DeletedAt.is_null())
            .order_by_asc(banks::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live bank by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<banks::Model>, DbErr> {
        banks::Entity::find()
            .filter(banks::Column::Uuid.eq(uuid))
            .filter(banks::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Creates a bank in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        organization_id: i64,
        input: BankInput,
        actor: i64,
    ) -> Result<banks::Model, DbErr> {
        let now = Utc::now().into();
        let bank = banks::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            name: Set(input.name),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        bank.insert(&self.db).await
    }

    /// Renames a bank.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        bank: banks::Model,
        input: BankInput,
        actor: i64,
    ) -> Result<banks::Model, DbErr> {
        let mut active: banks::ActiveModel = bank.into();
        active.name = Set(input.name);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Soft-deletes a bank.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, bank: banks::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: banks::ActiveModel = bank.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }
}
