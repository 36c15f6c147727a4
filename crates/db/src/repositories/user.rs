//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{organization_users, organizations, roles, users};

/// Role name granted to the user who registers an organization.
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Input for the registration transaction.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    /// Argon2id hash, never the raw password.
    pub password_hash: String,
    /// "admin" or "tenant".
    pub user_type: String,
    pub organization_name: String,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Registers a user together with their organization: user, the
    /// organization, its "Administrator" role, and the membership carrying
    /// that role are created in one transaction.
    ///
    /// Admin users are verified immediately; tenants get a verification
    /// token the caller emails after commit.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is persisted then.
    pub async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<(users::Model, organizations::Model), DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let is_admin = registration.user_type == "admin";
        let user = users::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            name: Set(registration.name),
            email: Set(registration.email),
            password: Set(registration.password_hash),
            user_type: Set(registration.user_type),
            email_verified_at: Set(is_admin.then(|| Utc::now().into())),
            verification_token: Set((!is_admin).then(Uuid::new_v4)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let user = user.insert(&txn).await?;

        let organization = organizations::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            name: Set(registration.organization_name),
            created_by: Set(Some(user.id)),
            updated_by: Set(Some(user.id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let organization = organization.insert(&txn).await?;

        let role = roles::ActiveModel {
            name: Set(ADMINISTRATOR_ROLE.to_string()),
            organization_id: Set(organization.id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let role = role.insert(&txn).await?;

        let membership = organization_users::ActiveModel {
            user_id: Set(user.id),
            organization_id: Set(organization.id),
            role_id: Set(role.id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        membership.insert(&txn).await?;

        txn.commit().await?;

        Ok((user, organization))
    }

    /// Finds the user holding a pending verification token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_verification_token(
        &self,
        token: Uuid,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::VerificationToken.eq(token))
            .one(&self.db)
            .await
    }

    /// Marks a user's email as verified and clears the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn mark_verified(&self, user: users::Model) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.email_verified_at = Set(Some(Utc::now().into()));
        active.verification_token = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Issues a fresh verification token for an unverified user.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn regenerate_verification_token(
        &self,
        user: users::Model,
    ) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.verification_token = Set(Some(Uuid::new_v4()));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Replaces a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_password(&self, user_id: i64, password_hash: String) -> Result<(), DbErr> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("user".to_string()))?;

        let mut active: users::ActiveModel = user.into();
        active.password = Set(password_hash);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }
}
