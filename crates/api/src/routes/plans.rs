use axum::{extract::State, http::StatusCode};
use axum::Json;
use sched_core::ScheduleStore;
use tracing::info;
use types::PlanHours;

use crate::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    put,
    path = "/v1/plans/hours",
    request_body = PlanHours,
    responses(
        (status = 204, description = "Hours updated"),
        (status = 404, description = "No such plan", body = crate::error::ErrorBody)
    )
)]
pub async fn set_hours(
    State(state): State<AppState>,
    Json(hours): Json<PlanHours>,
) -> Result<StatusCode, ApiError> {
    info!(group = %hours.group, discipline = %hours.discipline, "manual hours adjustment");
    state.store.set_plan_hours(hours).await?;
    Ok(StatusCode::NO_CONTENT)
}
