//! Back-office handlers.
//!
//! Mounted behind both the auth and admin middleware. Writes take their
//! input from query parameters.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    AdminStatsDto, OrderManagementDto, OrderStatus, ServiceDto, ServiceInput, UserManagementDto,
};
use crate::errors::{AppError, AppResult};
use crate::types::{
    ApiResponse, Created, OrderManagementPage, Page, PageQuery, SortDirection, UserPage,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// New status, any case
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminOrderQuery {
    pub user_id: i64,
    pub service_id: i64,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ServiceQuery {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[param(value_type = String, example = "150000")]
    pub base_price: Decimal,
    pub category: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ServiceQuery {
    fn into_input(self) -> AppResult<ServiceInput> {
        self.validate()?;
        if self.base_price.is_sign_negative() {
            return Err(AppError::validation(
                "basePrice",
                "Base price must not be negative",
            ));
        }
        Ok(ServiceInput {
            name: self.name,
            description: self.description,
            base_price: self.base_price,
            category: self.category,
            active: self.active,
        })
    }
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(stats))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id/block", put(block_user))
        .route("/users/:id/unblock", put(unblock_user))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order).delete(delete_order))
        .route("/orders/:id/status", put(update_order_status))
        .route("/services", post(create_service))
        .route("/services/:id", put(update_service).delete(delete_service))
        .route("/services/:id/toggle-active", put(toggle_service))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Platform totals", body = AdminStatsDto),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn stats(State(state): State<AppState>) -> AppResult<ApiResponse<AdminStatsDto>> {
    let stats = state.services.admin().stats().await?;
    Ok(ApiResponse::success(stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Accounts", body = UserPage),
        (status = 400, description = "Unknown sort field")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<UserManagementDto>>> {
    let request = query.to_request("createdAt", SortDirection::Desc);
    let page = state.services.admin().list_users(request).await?;
    Ok(ApiResponse::success(page))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account", body = UserManagementDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<UserManagementDto>> {
    let user = state.services.admin().get_user(id).await?;
    Ok(ApiResponse::success(user))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/block",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account locked", body = UserManagementDto),
        (status = 400, description = "Cannot block own account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn block_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<UserManagementDto>> {
    let user = state.services.admin().block_user(current_user.id, id).await?;
    Ok(ApiResponse::with_message(user, "User blocked successfully"))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/unblock",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account unlocked", body = UserManagementDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn unblock_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<UserManagementDto>> {
    let user = state.services.admin().unblock_user(id).await?;
    Ok(ApiResponse::with_message(user, "User unblocked successfully"))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Orders with customer and service names", body = OrderManagementPage),
        (status = 400, description = "Unknown sort field")
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<OrderManagementDto>>> {
    let request = query.to_request("createdAt", SortDirection::Desc);
    let page = state.services.admin().list_orders(request).await?;
    Ok(ApiResponse::success(page))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = OrderManagementDto),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrderManagementDto>> {
    let order = state.services.admin().get_order(id).await?;
    Ok(ApiResponse::success(order))
}

/// Change an order's status; completing it credits loyalty points once
#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID"), StatusQuery),
    responses(
        (status = 200, description = "Status updated", body = OrderManagementDto),
        (status = 400, description = "Unknown status (INVALID_STATUS)"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> AppResult<ApiResponse<OrderManagementDto>> {
    let status: OrderStatus = query.status.parse()?;
    let order = state
        .services
        .admin()
        .update_order_status(id, status)
        .await?;
    Ok(ApiResponse::with_message(
        order,
        "Order status updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/orders/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.services.admin().delete_order(id).await?;
    Ok(ApiResponse::message("Order deleted successfully"))
}

#[utoipa::path(
    post,
    path = "/api/admin/orders",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(AdminOrderQuery),
    responses(
        (status = 201, description = "Order created", body = OrderManagementDto),
        (status = 404, description = "User or service not found")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Query(query): Query<AdminOrderQuery>,
) -> AppResult<Created<OrderManagementDto>> {
    query.validate()?;
    let order = state
        .services
        .admin()
        .create_order(query.user_id, query.service_id, query.notes)
        .await?;
    Ok(Created(ApiResponse::with_message(
        order,
        "Order created successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/services",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(ServiceQuery),
    responses(
        (status = 201, description = "Service created", body = ServiceDto),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    Query(query): Query<ServiceQuery>,
) -> AppResult<Created<ServiceDto>> {
    let service = state
        .services
        .admin()
        .create_service(query.into_input()?)
        .await?;
    Ok(Created(ApiResponse::with_message(
        service,
        "Service created successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/admin/services/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Service ID"), ServiceQuery),
    responses(
        (status = 200, description = "Service updated", body = ServiceDto),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ServiceQuery>,
) -> AppResult<ApiResponse<ServiceDto>> {
    let service = state
        .services
        .admin()
        .update_service(id, query.into_input()?)
        .await?;
    Ok(ApiResponse::with_message(
        service,
        "Service updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/services/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.services.admin().delete_service(id).await?;
    Ok(ApiResponse::message("Service deleted successfully"))
}

#[utoipa::path(
    put,
    path = "/api/admin/services/{id}/toggle-active",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Active flag flipped", body = ServiceDto),
        (status = 404, description = "Service not found")
    )
)]
pub async fn toggle_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<ServiceDto>> {
    let service = state.services.admin().toggle_service(id).await?;
    Ok(ApiResponse::with_message(
        service,
        "Service status toggled successfully",
    ))
}
