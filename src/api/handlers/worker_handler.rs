//! Worker listing handlers.
//!
//! These answer with bare JSON rather than the response envelope.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::AppState;
use crate::domain::WorkerDto;
use crate::errors::AppResult;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WorkerQuery {
    /// Skill to match, all workers when blank
    pub service: Option<String>,
    /// Start of the requested slot (RFC 3339)
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Slot length, 120 minutes when absent
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SkillQuery {
    pub service: Option<String>,
}

pub fn worker_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workers))
        .route("/:id", get(get_worker))
}

pub fn legacy_worker_routes() -> Router<AppState> {
    Router::new().route("/", get(list_by_skill))
}

/// Workers matching a skill, with availability for the slot
#[utoipa::path(
    get,
    path = "/api/workers",
    tag = "Workers",
    params(WorkerQuery),
    responses(
        (status = 200, description = "Matching workers", body = Vec<WorkerDto>)
    )
)]
pub async fn list_workers(
    State(state): State<AppState>,
    Query(query): Query<WorkerQuery>,
) -> AppResult<Json<Vec<WorkerDto>>> {
    let workers = state
        .services
        .workers()
        .list_workers(query.service, query.scheduled_at, query.duration_minutes)
        .await?;
    Ok(Json(workers))
}

#[utoipa::path(
    get,
    path = "/api/workers/{id}",
    tag = "Workers",
    params(("id" = i64, Path, description = "Worker ID")),
    responses(
        (status = 200, description = "Worker", body = WorkerDto),
        (status = 404, description = "Worker not found")
    )
)]
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<WorkerDto>> {
    let worker = state.services.workers().get_worker(id).await?;
    Ok(Json(worker))
}

#[utoipa::path(
    get,
    path = "/workers",
    tag = "Workers",
    params(SkillQuery),
    responses(
        (status = 200, description = "Matching workers", body = Vec<WorkerDto>)
    )
)]
pub async fn list_by_skill(
    State(state): State<AppState>,
    Query(query): Query<SkillQuery>,
) -> AppResult<Json<Vec<WorkerDto>>> {
    let workers = state.services.workers().list_by_skill(query.service).await?;
    Ok(Json(workers))
}
