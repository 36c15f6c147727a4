//! Customer repository for database operations.

use chrono::Utc;
use faktura_shared::pagination::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::customers;

/// Customer fields accepted on create and update.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live customers of an organization, newest last.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<customers::Model>, u64), DbErr> {
        let paginator = customers::Entity::find()
            .filter(customers::Column::OrganizationId.eq(organization_id))
            .filter(customers::Column::DeletedAt.is_null())
            .order_by_asc(customers::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live customer by its exposed uuid, in any organization.
    /// The caller compares the owner against the route's organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(customers::Column::Uuid.eq(uuid))
            .filter(customers::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Creates a customer in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        organization_id: i64,
        input: CustomerInput,
        actor: i64,
    ) -> Result<customers::Model, DbErr> {
        let now = Utc::now().into();
        let customer = customers::ActiveModel {
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
        customer.insert(&self.db).await
    }

    /// Replaces a customer's profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        customer: customers::Model,
        input: CustomerInput,
        actor: i64,
    ) -> Result<customers::Model, DbErr> {
        let mut active: customers::ActiveModel = customer.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.address = Set(input.address);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Soft-deletes a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, customer: customers::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: customers::ActiveModel = customer.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }
}
