//! Public content: news articles, home page hero and testimonials.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

const DEFAULT_HERO_TITLE: &str = "Welcome";
const DEFAULT_HERO_DESCRIPTION: &str = "Default description";

#[derive(Debug, Clone)]
pub struct NewsArticle {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsDto {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NewsArticle> for NewsDto {
    fn from(article: NewsArticle) -> Self {
        Self {
            id: article.id,
            title: article.title,
            summary: article.summary,
            content: article.content,
            image_url: article.image_url,
            featured: article.featured,
            created_at: article.created_at,
        }
    }
}

/// Stored hero section
#[derive(Debug, Clone)]
pub struct HomeData {
    pub id: i64,
    pub hero_title: Option<String>,
    pub hero_description: Option<String>,
    pub hero_image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Testimonial {
    pub id: i64,
    pub customer_name: String,
    pub content: String,
    pub avatar_url: Option<String>,
    pub rating: i32,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroSectionDto {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl HeroSectionDto {
    /// Hero from the stored row, with defaults for anything missing
    pub fn from_home_data(data: Option<HomeData>) -> Self {
        let data = data.unwrap_or(HomeData {
            id: 0,
            hero_title: None,
            hero_description: None,
            hero_image_url: None,
        });
        Self {
            title: data
                .hero_title
                .unwrap_or_else(|| DEFAULT_HERO_TITLE.to_string()),
            description: data
                .hero_description
                .unwrap_or_else(|| DEFAULT_HERO_DESCRIPTION.to_string()),
            image_url: data.hero_image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialDto {
    pub id: i64,
    pub customer_name: String,
    pub content: String,
    pub avatar_url: Option<String>,
    pub rating: i32,
}

impl From<Testimonial> for TestimonialDto {
    fn from(t: Testimonial) -> Self {
        Self {
            id: t.id,
            customer_name: t.customer_name,
            content: t.content,
            avatar_url: t.avatar_url,
            rating: t.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomePageDto {
    pub hero: HeroSectionDto,
    pub testimonials: Vec<TestimonialDto>,
}
