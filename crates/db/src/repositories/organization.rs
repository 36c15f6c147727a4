//! Organization repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::{organization_users, organizations};

/// Updatable organization fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Organization repository for lookup, membership, and update.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a live organization by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find()
            .filter(organizations::Column::Uuid.eq(uuid))
            .filter(organizations::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Whether a user has a membership row in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_member(&self, organization_id: i64, user_id: i64) -> Result<bool, DbErr> {
        let membership = organization_users::Entity::find()
            .filter(organization_users::Column::OrganizationId.eq(organization_id))
            .filter(organization_users::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(membership.is_some())
    }

    /// Updates an organization's profile fields. Absent fields are left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        organization: organizations::Model,
        input: OrganizationInput,
        actor: i64,
    ) -> Result<organizations::Model, DbErr> {
        let mut active: organizations::ActiveModel = organization.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }
}
