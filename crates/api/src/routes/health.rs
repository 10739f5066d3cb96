use axum::{extract::State, Json};
use sched_core::ScheduleStore;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct Health {
    pub status: &'static str,
    pub groups: usize,
    pub timeslots: usize,
    pub lessons: usize,
}

#[utoipa::path(
    get,
    path = "/v1/health",
    responses((status = 200, description = "Service is up; sizes of the loaded snapshot", body = Health))
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<Health>, ApiError> {
    let snap = state.store.snapshot().await?;
    Ok(Json(Health {
        status: "ok",
        groups: snap.catalog.groups.len(),
        timeslots: snap.catalog.timeslots.len(),
        lessons: snap.lessons.len(),
    }))
}
