//! Unit repository for database operations.

use chrono::Utc;
use faktura_shared::pagination::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::units;

/// Unit fields accepted on create and update.
#[derive(Debug, Clone)]
pub struct UnitInput {
    pub name: String,
    pub description: Option<String>,
}

/// Unit repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    db: DatabaseConnection,
}

impl UnitRepository {
    /// Creates a new unit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live units of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<units::Model>, u64), DbErr> {
        let paginator = units::Entity::find()
            .filter(units::Column::OrganizationId.eq(organization_id))
            .filter(units::Column::DeletedAt.is_null())
            .order_by_asc(units::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live unit by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<units::Model>, DbErr> {
        units::Entity::find()
            .filter(units::Column::Uuid.eq(uuid))
            .filter(units::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Creates a unit in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        organization_id: i64,
        input: UnitInput,
        actor: i64,
    ) -> Result<units::Model, DbErr> {
        let now = Utc::now().into();
        let unit = units::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            name: Set(input.name),
            description: Set(input.description),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        unit.insert(&self.db).await
    }

    /// Replaces a unit's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        unit: units::Model,
        input: UnitInput,
        actor: i64,
    ) -> Result<units::Model, DbErr> {
        let mut active: units::ActiveModel = unit.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Soft-deletes a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, unit: units::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: units::ActiveModel = unit.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }
}
