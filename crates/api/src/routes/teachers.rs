use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use sched_core::{teacher_load, ScheduleStore};
use serde::Deserialize;
use types::{TeacherId, TeacherLoad};
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::routes::generate::parse_date;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoadQuery {
    /// First day, `YYYY-MM-DD`; unbounded when absent.
    pub start: Option<String>,
    /// Last day, inclusive; unbounded when absent.
    pub end: Option<String>,
}

#[utoipa::path(
    get,
    path = "/v1/teachers/{id}/load",
    params(("id" = String, Path, description = "Teacher ID"), LoadQuery),
    responses(
        (status = 200, description = "Lessons, minutes, hours and working days", body = TeacherLoad),
        (status = 404, description = "Unknown teacher", body = crate::error::ErrorBody)
    )
)]
pub async fn load(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<LoadQuery>,
) -> Result<Json<TeacherLoad>, ApiError> {
    let start = match q.start.as_deref() {
        Some(raw) => parse_date("start", Some(raw))?,
        None => NaiveDate::MIN,
    };
    let end = match q.end.as_deref() {
        Some(raw) => parse_date("end", Some(raw))?,
        None => NaiveDate::MAX,
    };
    if start > end {
        return Err(ApiError::bad_request(format!("start {start} is after end {end}")));
    }

    let snapshot = state.store.snapshot().await?;
    let teacher = TeacherId(id);
    if snapshot.catalog.teacher(&teacher).is_none() {
        return Err(ApiError::not_found(format!("teacher {teacher} not found")));
    }
    Ok(Json(teacher_load(&snapshot, &teacher, start, end)))
}
