//! E-wallet repository for database operations.

use chrono::Utc;
use faktura_shared::pagination::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::e_wallets;

/// E-wallet fields accepted on create and update.
#[derive(Debug, Clone)]
pub struct EWalletInput {
    pub name: String,
}

/// E-wallet repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EWalletRepository {
    db: DatabaseConnection,
}

impl EWalletRepository {
    /// Creates a new e-wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live e-wallets of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<e_wallets::Model>, u64), DbErr> {
        let paginator = e_wallets::Entity::find()
            .filter(e_wallets::Column::OrganizationId.eq(organization_id))
            .filter(e_wallets::Column::DeletedAt.is_null())
            .order_by_asc(e_wallets::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live e-wallet by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<e_wallets::Model>, DbErr> {
        e_wallets::Entity::find()
            .filter(e_wallets::Column::Uuid.eq(uuid))
            .filter(e_wallets::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Creates an e-wallet in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        organization_id: i64,
        input: EWalletInput,
        actor: i64,
    ) -> Result<e_wallets::Model, DbErr> {
        let now = Utc::now().into();
        let wallet = e_wallets::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            name: Set(input.name),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        wallet.insert(&self.db).await
    }

    /// Renames an e-wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        wallet: e_wallets::Model,
        input: EWalletInput,
        actor: i64,
    ) -> Result<e_wallets::Model, DbErr> {
        let mut active: e_wallets::ActiveModel = wallet.into();
        active.name = Set(input.name);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Soft-deletes an e-wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, wallet: e_wallets::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: e_wallets::ActiveModel = wallet.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }
}
