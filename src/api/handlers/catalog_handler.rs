//! Service catalog handlers.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::ServiceDto;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Page, PageQuery, ServicePage, SortDirection};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services))
        .route("/:id", get(get_service))
        .route("/category/:category", get(services_by_category))
}

/// Page of active services
#[utoipa::path(
    get,
    path = "/services",
    tag = "Services",
    params(PageQuery),
    responses(
        (status = 200, description = "Active services", body = ServicePage),
        (status = 400, description = "Unknown sort field")
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<ServiceDto>>> {
    let request = query.to_request("id", SortDirection::Asc);
    let page = state.services.catalog().list_services(request).await?;
    Ok(ApiResponse::success(page))
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service details", body = ServiceDto),
        (status = 404, description = "Service not found or inactive")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<ServiceDto>> {
    let service = state.services.catalog().get_service(id).await?;
    Ok(ApiResponse::success(service))
}

#[utoipa::path(
    get,
    path = "/services/category/{category}",
    tag = "Services",
    params(("category" = String, Path, description = "Service category")),
    responses(
        (status = 200, description = "Active services in the category", body = Vec<ServiceDto>)
    )
)]
pub async fn services_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<ApiResponse<Vec<ServiceDto>>> {
    let services = state
        .services
        .catalog()
        .services_by_category(category)
        .await?;
    Ok(ApiResponse::success(services))
}
