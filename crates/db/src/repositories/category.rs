//! Category repository for database operations.

use chrono::Utc;
use faktura_shared::pagination::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::categories;

/// Category fields accepted on create and update.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live categories of an organization, optionally filtered by a
    /// case-insensitive search over name and description.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<categories::Model>, u64), DbErr> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::OrganizationId.eq(organization_id))
            .filter(categories::Column::DeletedAt.is_null());

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(categories::Column::Name.like(&pattern))
                    .add(categories::Column::Description.like(&pattern)),
            );
        }

        let paginator = query
            .order_by_asc(categories::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live category by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find()
            .filter(categories::Column::Uuid.eq(uuid))
            .filter(categories::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Creates a category in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        organization_id: i64,
        input: CategoryInput,
        actor: i64,
    ) -> Result<categories::Model, DbErr> {
        let now = Utc::now().into();
        let category = categories::ActiveModel {
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
        category.insert(&self.db).await
    }

    /// Replaces a category's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        category: categories::Model,
        input: CategoryInput,
        actor: i64,
    ) -> Result<categories::Model, DbErr> {
        let mut active: categories::ActiveModel = category.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Soft-deletes a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, category: categories::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: categories::ActiveModel = category.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }
}
