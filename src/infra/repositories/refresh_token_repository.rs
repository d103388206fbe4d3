//! Server-side refresh token storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

use super::entities::refresh_token::{self, ActiveModel, Entity as RefreshTokenEntity};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A stored refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl From<refresh_token::Model> for RefreshToken {
    fn from(model: refresh_token::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            token: model.token,
            expires_at: model.expires_at,
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(
        &self,
        user_id: i64,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken>;

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>>;

    /// Returns whether a row was removed
    async fn delete_by_token(&self, token: &str) -> AppResult<bool>;

    /// Remove every token that expired before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

pub struct RefreshTokenStore {
    db: DatabaseConnection,
}

impl RefreshTokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    token: String,
    expires_at: DateTime<Utc>,
) -> AppResult<RefreshToken> {
    let model = ActiveModel {
        user_id: Set(user_id),
        token: Set(token),
        expires_at: Set(expires_at),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(RefreshToken::from(model))
}

pub(crate) async fn delete_by_token<C: ConnectionTrait>(db: &C, token: &str) -> AppResult<bool> {
    let result = RefreshTokenEntity::delete_many()
        .filter(refresh_token::Column::Token.eq(token))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

#[async_trait]
impl RefreshTokenRepository for RefreshTokenStore {
    async fn create(
        &self,
        user_id: i64,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken> {
        insert(&self.db, user_id, token, expires_at).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        let model = RefreshTokenEntity::find()
            .filter(refresh_token::Column::Token.eq(token))
            .one(&self.db)
            .await?;
        Ok(model.map(RefreshToken::from))
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        delete_by_token(&self.db, token).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = RefreshTokenEntity::delete_many()
            .filter(refresh_token::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
