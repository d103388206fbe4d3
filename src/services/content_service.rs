//! Public site content: news and the home page.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{HeroSectionDto, HomePageDto, NewsDto, TestimonialDto};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Page, PageRequest};

#[async_trait]
pub trait NewsService: Send + Sync {
    async fn list_news(&self, request: PageRequest) -> AppResult<Page<NewsDto>>;

    async fn get_news(&self, id: i64) -> AppResult<NewsDto>;

    async fn featured_news(&self) -> AppResult<Vec<NewsDto>>;
}

#[async_trait]
pub trait HomeService: Send + Sync {
    async fn home_page(&self) -> AppResult<HomePageDto>;
}

pub struct NewsDesk<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> NewsDesk<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> NewsService for NewsDesk<U> {
    async fn list_news(&self, request: PageRequest) -> AppResult<Page<NewsDto>> {
        let page = self.uow.news().list_published(request).await?;
        Ok(page.map(NewsDto::from))
    }

    async fn get_news(&self, id: i64) -> AppResult<NewsDto> {
        self.uow
            .news()
            .find_published(id)
            .await?
            .map(NewsDto::from)
            .ok_or_not_found(format!("News not found with id: {}", id))
    }

    async fn featured_news(&self) -> AppResult<Vec<NewsDto>> {
        let articles = self.uow.news().list_featured().await?;
        Ok(articles.into_iter().map(NewsDto::from).collect())
    }
}

pub struct HomePage<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> HomePage<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> HomeService for HomePage<U> {
    async fn home_page(&self) -> AppResult<HomePageDto> {
        let home = self.uow.home();
        let (hero, testimonials) =
            tokio::try_join!(home.first_home_data(), home.featured_testimonials())?;

        Ok(HomePageDto {
            hero: HeroSectionDto::from_home_data(hero),
            testimonials: testimonials.into_iter().map(TestimonialDto::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HomeData, NewsArticle, Testimonial};
    use crate::errors::AppError;
    use crate::infra::repositories::{MockHomeRepository, MockNewsRepository};
    use crate::infra::testing::TestUnitOfWork;
    use chrono::Utc;

    fn article(id: i64) -> NewsArticle {
        let now = Utc::now();
        NewsArticle {
            id,
            title: format!("Article {}", id),
            summary: None,
            content: Some("Body".into()),
            image_url: None,
            featured: true,
            published: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_unpublished_news_is_not_found() {
        let mut news = MockNewsRepository::new();
        news.expect_find_published().returning(|_| Ok(None));

        let service = NewsDesk::new(TestUnitOfWork::default().with_news(news).into_arc());
        assert!(matches!(
            service.get_news(2).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_featured_news() {
        let mut news = MockNewsRepository::new();
        news.expect_list_featured()
            .returning(|| Ok(vec![article(1), article(2)]));

        let service = NewsDesk::new(TestUnitOfWork::default().with_news(news).into_arc());
        let featured = service.featured_news().await.unwrap();
        assert_eq!(featured.len(), 2);
        assert!(featured.iter().all(|n| n.featured));
    }

    #[tokio::test]
    async fn test_home_page_defaults() {
        let mut home = MockHomeRepository::new();
        home.expect_first_home_data().returning(|| Ok(None));
        home.expect_featured_testimonials().returning(|| Ok(vec![]));

        let service = HomePage::new(TestUnitOfWork::default().with_home(home).into_arc());
        let page = service.home_page().await.unwrap();
        assert_eq!(page.hero.title, "Welcome");
        assert_eq!(page.hero.description, "Default description");
        assert!(page.testimonials.is_empty());
    }

    #[tokio::test]
    async fn test_home_page_uses_stored_hero() {
        let mut home = MockHomeRepository::new();
        home.expect_first_home_data().returning(|| {
            Ok(Some(HomeData {
                id: 1,
                hero_title: Some("Fix it fast".into()),
                hero_description: None,
                hero_image_url: Some("/hero.png".into()),
            }))
        });
        home.expect_featured_testimonials().returning(|| {
            Ok(vec![Testimonial {
                id: 1,
                customer_name: "Lan".into(),
                content: "Great work".into(),
                avatar_url: None,
                rating: 5,
                featured: true,
            }])
        });

        let service = HomePage::new(TestUnitOfWork::default().with_home(home).into_arc());
        let page = service.home_page().await.unwrap();
        assert_eq!(page.hero.title, "Fix it fast");
        assert_eq!(page.hero.description, "Default description");
        assert_eq!(page.testimonials[0].customer_name, "Lan");
    }
}
