//! Service catalog repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::base::{count, fetch_page, invalid_sort, sort_order};
use super::entities::service::{self, ActiveModel, Entity as ServiceEntity};
use crate::domain::{ServiceInput, ServiceOffering};
use crate::errors::{AppError, AppResult};
use crate::types::{Page, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Any service, active or not
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ServiceOffering>>;

    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<ServiceOffering>>;

    async fn list_active(&self, request: PageRequest) -> AppResult<Page<ServiceOffering>>;

    async fn list_active_by_category(&self, category: &str) -> AppResult<Vec<ServiceOffering>>;

    async fn create(&self, input: ServiceInput) -> AppResult<ServiceOffering>;

    async fn update(&self, id: i64, input: ServiceInput) -> AppResult<ServiceOffering>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn set_active(&self, id: i64, active: bool) -> AppResult<ServiceOffering>;

    async fn count(&self) -> AppResult<u64>;
}

pub struct ServiceStore {
    db: DatabaseConnection,
}

impl ServiceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i64) -> AppResult<service::Model> {
        ServiceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service not found with id: {}", id)))
    }
}

fn sort_column(field: &str) -> AppResult<service::Column> {
    match field {
        "id" => Ok(service::Column::Id),
        "name" => Ok(service::Column::Name),
        "basePrice" => Ok(service::Column::BasePrice),
        "category" => Ok(service::Column::Category),
        "createdAt" => Ok(service::Column::CreatedAt),
        other => Err(invalid_sort(other)),
    }
}

#[async_trait]
impl ServiceRepository for ServiceStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ServiceOffering>> {
        let model = ServiceEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(ServiceOffering::from))
    }

    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<ServiceOffering>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ServiceEntity::find()
            .filter(service::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(ServiceOffering::from).collect())
    }

    async fn list_active(&self, request: PageRequest) -> AppResult<Page<ServiceOffering>> {
        let column = sort_column(&request.sort_by)?;
        let select = ServiceEntity::find()
            .filter(service::Column::Active.eq(true))
            .order_by(column, sort_order(request.direction));
        Ok(fetch_page(&self.db, select, &request)
            .await?
            .map(ServiceOffering::from))
    }

    async fn list_active_by_category(&self, category: &str) -> AppResult<Vec<ServiceOffering>> {
        let models = ServiceEntity::find()
            .filter(service::Column::Active.eq(true))
            .filter(service::Column::Category.eq(category))
            .order_by_asc(service::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(ServiceOffering::from).collect())
    }

    async fn create(&self, input: ServiceInput) -> AppResult<ServiceOffering> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            base_price: Set(input.base_price),
            image_url: Set(None),
            category: Set(input.category),
            details: Set(None),
            active: Set(input.active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(ServiceOffering::from(model))
    }

    async fn update(&self, id: i64, input: ServiceInput) -> AppResult<ServiceOffering> {
        let mut active: ActiveModel = self.load(id).await?.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.base_price = Set(input.base_price);
        active.category = Set(input.category);
        active.active = Set(input.active);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(ServiceOffering::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = ServiceEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn set_active(&self, id: i64, active_flag: bool) -> AppResult<ServiceOffering> {
        let mut active: ActiveModel = self.load(id).await?.into();
        active.active = Set(active_flag);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(ServiceOffering::from(model))
    }

    async fn count(&self) -> AppResult<u64> {
        count(&self.db, ServiceEntity::find()).await
    }
}
