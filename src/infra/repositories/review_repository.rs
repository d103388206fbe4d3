//! Order review repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::review::{self, ActiveModel, Entity as ReviewEntity};
use crate::domain::Review;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_order(&self, order_id: i64) -> AppResult<Option<Review>>;

    async fn create(
        &self,
        order_id: i64,
        user_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<Review>;

    /// Reviews for any of the given orders, newest first
    async fn list_by_orders(&self, order_ids: Vec<i64>) -> AppResult<Vec<Review>>;
}

pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn find_by_order(&self, order_id: i64) -> AppResult<Option<Review>> {
        let model = ReviewEntity::find()
            .filter(review::Column::OrderId.eq(order_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Review::from))
    }

    async fn create(
        &self,
        order_id: i64,
        user_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> AppResult<Review> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            order_id: Set(order_id),
            user_id: Set(user_id),
            rating: Set(rating),
            comment: Set(comment),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(Review::from(model))
    }

    async fn list_by_orders(&self, order_ids: Vec<i64>) -> AppResult<Vec<Review>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ReviewEntity::find()
            .filter(review::Column::OrderId.is_in(order_ids))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Review::from).collect())
    }
}
