use axum::{
    extract::{Extension, Query, State},
    routing::get,
    Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{LoyaltyPointsDto, PointsTransactionDto};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Page, PageQuery, PointsPage, SortDirection};

pub fn loyalty_routes() -> Router<AppState> {
    Router::new()
        .route("/points", get(get_points))
        .route("/history", get(history))
}

/// Balance, tier and distance to the next tier
#[utoipa::path(
    get,
    path = "/loyalty/points",
    tag = "Loyalty",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Loyalty balance", body = LoyaltyPointsDto),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_points(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<LoyaltyPointsDto>> {
    let points = state.services.loyalty().get_points(current_user.id).await?;
    Ok(ApiResponse::success(points))
}

#[utoipa::path(
    get,
    path = "/loyalty/history",
    tag = "Loyalty",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Points transactions, newest first", body = PointsPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn history(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<PointsTransactionDto>>> {
    let request = query.to_request("createdAt", SortDirection::Desc);
    let page = state
        .services
        .loyalty()
        .history(current_user.id, request)
        .await?;
    Ok(ApiResponse::success(page))
}
