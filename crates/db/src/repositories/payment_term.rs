//! Payment term repository for database operations.

use chrono::Utc;
use faktura_shared::pagination::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::payment_terms;

/// Payment term fields accepted on create and update.
#[derive(Debug, Clone)]
pub struct PaymentTermInput {
    pub name: String,
    pub description: Option<String>,
}

/// Payment term repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PaymentTermRepository {
    db: DatabaseConnection,
}

impl PaymentTermRepository {
    /// Creates a new payment term repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live payment terms of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<payment_terms::Model>, u64), DbErr> {
        let paginator = payment_terms::Entity::find()
            .filter(payment_terms::Column::OrganizationId.eq(organization_id))
            .filter(payment_terms::Column::DeletedAt.is_null())
            .order_by_asc(payment_terms::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live payment term by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<payment_terms::Model>, DbErr> {
        payment_terms::Entity::find()
            .filter(payment_terms::Column::Uuid.eq(uuid))
            .filter(payment_terms::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Creates a payment term in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        organization_id: i64,
        input: PaymentTermInput,
        actor: i64,
    ) -> Result<payment_terms::Model, DbErr> {
        let now = Utc::now().into();
        let term = payment_terms::ActiveModel {
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
        term.insert(&self.db).await
    }

    /// Replaces a payment term's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        term: payment_terms::Model,
        input: PaymentTermInput,
        actor: i64,
    ) -> Result<payment_terms::Model, DbErr> {
        let mut active: payment_terms::ActiveModel = term.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Soft-deletes a payment term.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, term: payment_terms::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: payment_terms::ActiveModel = term.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }
}
