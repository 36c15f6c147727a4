//! Access token repository.
//!
//! Bearer tokens are opaque random secrets; only their SHA-256 hash is
//! stored. Each login issues a new row, logout deletes the presenting
//! row only, so sessions revoke independently.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter,
    Set,
};
use sha2::{Digest, Sha256};

use crate::entities::{access_tokens, users};

/// Access token repository for issue/authenticate/revoke.
#[derive(Debug, Clone)]
pub struct AccessTokenRepository {
    db: DatabaseConnection,
}

impl AccessTokenRepository {
    /// Creates a new access token repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a token for storage or lookup.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Generates a URL-safe random token secret.
    #[must_use]
    pub fn generate_token() -> String {
        let bytes: [u8; 32] = rand::random();
        base64_url::encode(&bytes)
    }

    /// Issues a new token for a user. Returns the raw secret, which is
    /// shown to the client once and never stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn issue(&self, user_id: i64) -> Result<String, DbErr> {
        let raw_token = Self::generate_token();

        let token = access_tokens::ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(Self::hash_token(&raw_token)),
            last_used_at: Set(None),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        token.insert(&self.db).await?;

        Ok(raw_token)
    }

    /// Resolves a presented bearer secret to its user, touching
    /// `last_used_at`. Returns `None` for unknown or revoked tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn authenticate(&self, raw_token: &str) -> Result<Option<users::Model>, DbErr> {
        let token_hash = Self::hash_token(raw_token);

        let Some(token) = access_tokens::Entity::find()
            .filter(access_tokens::Column::TokenHash.eq(&token_hash))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let user = users::Entity::find_by_id(token.user_id).one(&self.db).await?;

        let mut active: access_tokens::ActiveModel = token.into();
        active.last_used_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;

        Ok(user)
    }

    /// Revokes the presenting token only; the user's other sessions stay
    /// valid. Revoking an unknown token is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn revoke(&self, raw_token: &str) -> Result<(), DbErr> {
        let token_hash = Self::hash_token(raw_token);

        if let Some(token) = access_tokens::Entity::find()
            .filter(access_tokens::Column::TokenHash.eq(&token_hash))
            .one(&self.db)
            .await?
        {
            token.delete(&self.db).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hash_is_hex_sha256() {
        let hash = AccessTokenRepository::hash_token("secret");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let a = AccessTokenRepository::generate_token();
        let b = AccessTokenRepository::generate_token();
        assert_ne!(a, b);
        assert!(a.len() >= 40);
    }
}
