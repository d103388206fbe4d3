//! News articles and home page content.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::base::{fetch_page, invalid_sort, sort_order};
use super::entities::home_data::Entity as HomeDataEntity;
use super::entities::news::{self, Entity as NewsEntity};
use super::entities::testimonial::{self, Entity as TestimonialEntity};
use crate::domain::{HomeData, NewsArticle, Testimonial};
use crate::errors::AppResult;
use crate::types::{Page, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn list_published(&self, request: PageRequest) -> AppResult<Page<NewsArticle>>;

    async fn find_published(&self, id: i64) -> AppResult<Option<NewsArticle>>;

    async fn list_featured(&self) -> AppResult<Vec<NewsArticle>>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HomeRepository: Send + Sync {
    /// The hero row with the lowest id
    async fn first_home_data(&self) -> AppResult<Option<HomeData>>;

    async fn featured_testimonials(&self) -> AppResult<Vec<Testimonial>>;
}

pub struct NewsStore {
    db: DatabaseConnection,
}

impl NewsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn news_sort_column(field: &str) -> AppResult<news::Column> {
    match field {
        "id" => Ok(news::Column::Id),
        "title" => Ok(news::Column::Title),
        "createdAt" => Ok(news::Column::CreatedAt),
        "updatedAt" => Ok(news::Column::UpdatedAt),
        other => Err(invalid_sort(other)),
    }
}

#[async_trait]
impl NewsRepository for NewsStore {
    async fn list_published(&self, request: PageRequest) -> AppResult<Page<NewsArticle>> {
        let column = news_sort_column(&request.sort_by)?;
        let select = NewsEntity::find()
            .filter(news::Column::Published.eq(true))
            .order_by(column, sort_order(request.direction));
        Ok(fetch_page(&self.db, select, &request)
            .await?
            .map(NewsArticle::from))
    }

    async fn find_published(&self, id: i64) -> AppResult<Option<NewsArticle>> {
        let model = NewsEntity::find_by_id(id)
            .filter(news::Column::Published.eq(true))
            .one(&self.db)
            .await?;
        Ok(model.map(NewsArticle::from))
    }

    async fn list_featured(&self) -> AppResult<Vec<NewsArticle>> {
        let models = NewsEntity::find()
            .filter(news::Column::Published.eq(true))
            .filter(news::Column::Featured.eq(true))
            .order_by_desc(news::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(NewsArticle::from).collect())
    }
}

pub struct HomeStore {
    db: DatabaseConnection,
}

impl HomeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HomeRepository for HomeStore {
    async fn first_home_data(&self) -> AppResult<Option<HomeData>> {
        let model = HomeDataEntity::find()
            .order_by_asc(super::entities::home_data::Column::Id)
            .one(&self.db)
            .await?;
        Ok(model.map(HomeData::from))
    }

    async fn featured_testimonials(&self) -> AppResult<Vec<Testimonial>> {
        let models = TestimonialEntity::find()
            .filter(testimonial::Column::Featured.eq(true))
            .order_by_asc(testimonial::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Testimonial::from).collect())
    }
}
