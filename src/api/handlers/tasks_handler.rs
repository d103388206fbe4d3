use axum::{
    extract::{Extension, State},
    routing::get,
    Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::TasksDashboardDto;
use crate::errors::AppResult;
use crate::types::ApiResponse;

pub fn tasks_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Profile summary, order counts and recent orders of the caller
#[utoipa::path(
    get,
    path = "/api/tasks/dashboard",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard", body = TasksDashboardDto),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn dashboard(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<TasksDashboardDto>> {
    let dashboard = state.services.tasks().dashboard(current_user.id).await?;
    Ok(ApiResponse::success(dashboard))
}
