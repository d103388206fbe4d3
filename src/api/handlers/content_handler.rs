//! News and home page handlers.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::{HomePageDto, NewsDto};
use crate::errors::AppResult;
use crate::types::{ApiResponse, NewsPage, Page, PageQuery, SortDirection};

pub fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_news))
        .route("/featured", get(featured_news))
        .route("/:id", get(get_news))
}

pub fn home_routes() -> Router<AppState> {
    Router::new().route("/", get(home_page))
}

/// Published articles
#[utoipa::path(
    get,
    path = "/news",
    tag = "Content",
    params(PageQuery),
    responses(
        (status = 200, description = "Published news", body = NewsPage),
        (status = 400, description = "Unknown sort field")
    )
)]
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<NewsDto>>> {
    let request = query.to_request("createdAt", SortDirection::Desc);
    let page = state.services.news().list_news(request).await?;
    Ok(ApiResponse::success(page))
}

#[utoipa::path(
    get,
    path = "/news/{id}",
    tag = "Content",
    params(("id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article", body = NewsDto),
        (status = 404, description = "News not found")
    )
)]
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<NewsDto>> {
    let news = state.services.news().get_news(id).await?;
    Ok(ApiResponse::success(news))
}

#[utoipa::path(
    get,
    path = "/news/featured",
    tag = "Content",
    responses(
        (status = 200, description = "Featured articles", body = Vec<NewsDto>)
    )
)]
pub async fn featured_news(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<NewsDto>>> {
    let news = state.services.news().featured_news().await?;
    Ok(ApiResponse::success(news))
}

#[utoipa::path(
    get,
    path = "/home",
    tag = "Content",
    responses(
        (status = 200, description = "Hero section and testimonials", body = HomePageDto)
    )
)]
pub async fn home_page(State(state): State<AppState>) -> AppResult<ApiResponse<HomePageDto>> {
    let home = state.services.home().home_page().await?;
    Ok(ApiResponse::success(home))
}
