//! Password reset token repository.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter,
    Set,
};

use crate::entities::password_reset_tokens;
use crate::repositories::token::AccessTokenRepository;

/// Reset tokens expire after one hour.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Password reset repository.
#[derive(Debug, Clone)]
pub struct PasswordResetRepository {
    db: DatabaseConnection,
}

impl PasswordResetRepository {
    /// Creates a new password reset repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a reset token for a user, invalidating earlier ones.
    /// Returns the raw token to be sent via email.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn create_token(&self, user_id: i64) -> Result<String, DbErr> {
        password_reset_tokens::Entity::delete_many()
            .filter(password_reset_tokens::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        let raw_token = AccessTokenRepository::generate_token();
        let now = Utc::now();

        let token = password_reset_tokens::ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(AccessTokenRepository::hash_token(&raw_token)),
            expires_at: Set((now + Duration::hours(RESET_TOKEN_TTL_HOURS)).into()),
            created_at: Set(now.into()),
            ..Default::default()
        };
        token.insert(&self.db).await?;

        Ok(raw_token)
    }

    /// Consumes a valid reset token, returning its user id. The row is
    /// deleted so the token is single-use. Returns `None` for unknown or
    /// expired tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn consume(&self, raw_token: &str) -> Result<Option<i64>, DbErr> {
        let token_hash = AccessTokenRepository::hash_token(raw_token);

        let Some(token) = password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::TokenHash.eq(&token_hash))
            .filter(password_reset_tokens::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let user_id = token.user_id;
        token.delete(&self.db).await?;

        Ok(Some(user_id))
    }
}
