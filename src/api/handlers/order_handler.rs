//! Customer order handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Address, OrderDto, OrderStatus, ReviewDto};
use crate::errors::AppResult;
use crate::services::PlaceOrder;
use crate::types::{ApiResponse, Created, OrderPage, Page, PageQuery, SortDirection};

/// Booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[schema(example = 1)]
    pub service_id: i64,
    pub worker_id: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "Duration must be positive"))]
    #[schema(example = 120)]
    pub duration_minutes: Option<i32>,
    #[validate(length(min = 1, max = 255, message = "Address is required"))]
    #[schema(example = "12 Nguyen Trai")]
    pub address_line: String,
    pub district: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

/// Routes that need a signed-in user
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
        .route("/status/:status", get(orders_by_status))
        .route("/:id/reviews", post(create_review))
}

/// Public order routes
pub fn order_public_routes() -> Router<AppState> {
    Router::new().route("/service/:service_id/reviews", get(service_reviews))
}

/// Caller's orders
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's orders", body = OrderPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_orders(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<OrderDto>>> {
    let request = query.to_request("createdAt", SortDirection::Desc);
    let page = state
        .services
        .orders()
        .list_orders(current_user.id, request)
        .await?;
    Ok(ApiResponse::success(page))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = OrderDto),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrderDto>> {
    let order = state.services.orders().get_order(current_user.id, id).await?;
    Ok(ApiResponse::success(order))
}

/// Place an order, optionally booking a worker for a time slot
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderDto),
        (status = 400, description = "Validation error or worker not available"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn create_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<Created<OrderDto>> {
    let order = state
        .services
        .orders()
        .create_order(
            current_user.id,
            PlaceOrder {
                service_id: payload.service_id,
                worker_id: payload.worker_id,
                scheduled_at: payload.scheduled_at,
                duration_minutes: payload.duration_minutes,
                address: Address {
                    address_line: Some(payload.address_line),
                    district: payload.district,
                    city: payload.city,
                    postal_code: payload.postal_code,
                    country: payload.country,
                },
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Created(ApiResponse::with_message(
        order,
        "Order created successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/orders/status/{status}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("status" = String, Path, description = "Order status, any case")),
    responses(
        (status = 200, description = "Caller's orders in the status", body = Vec<OrderDto>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn orders_by_status(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<ApiResponse<Vec<OrderDto>>> {
    let status: OrderStatus = status.parse()?;
    let orders = state
        .services
        .orders()
        .orders_by_status(current_user.id, status)
        .await?;
    Ok(ApiResponse::success(orders))
}

#[utoipa::path(
    post,
    path = "/orders/{id}/reviews",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewDto),
        (status = 400, description = "Not the owner, already reviewed or invalid rating"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn create_review(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> AppResult<Created<ReviewDto>> {
    let review = state
        .services
        .orders()
        .create_review(current_user.id, id, payload.rating, payload.comment)
        .await?;
    Ok(Created(ApiResponse::with_message(
        review,
        "Review created successfully",
    )))
}

/// Reviews left on orders for a service
#[utoipa::path(
    get,
    path = "/orders/service/{service_id}/reviews",
    tag = "Orders",
    params(("service_id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Reviews", body = Vec<ReviewDto>)
    )
)]
pub async fn service_reviews(
    State(state): State<AppState>,
    Path(service_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<ReviewDto>>> {
    let reviews = state.services.orders().service_reviews(service_id).await?;
    Ok(ApiResponse::success(reviews))
}
