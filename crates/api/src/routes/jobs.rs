use axum::{extract::{Path, State}, Json};
use crate::error::ApiError;
use crate::state::AppState;
use axum::http::StatusCode;
use jobs::{FailureKind, JobStatus};
use types::GenerateResponse;

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Job status", body = jobs::JobStatus),
            (status = 404, description = "Unknown job", body = crate::error::ErrorBody)
        )
    )]
pub async fn status(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<JobStatus>, ApiError> {
    state
        .jobs
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("job {id} not found")))
}

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}/result",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Generation result (if ready)", body = GenerateResponse),
            (status = 400, description = "Run rejected its request", body = crate::error::ErrorBody),
            (status = 404, description = "Unknown or unfinished job", body = crate::error::ErrorBody),
            (status = 409, description = "Commit rejected", body = crate::error::ErrorBody),
            (status = 500, description = "Store failure", body = crate::error::ErrorBody)
        )
    )]
pub async fn result(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<GenerateResponse>, ApiError> {
    match state.jobs.get(&id) {
        Some(JobStatus::Done { result }) => Ok(Json(result)),
        Some(JobStatus::Failed { kind, message }) => Err(ApiError {
            status: failure_status(kind),
            message,
        }),
        Some(_) => Err(ApiError::not_found(format!("job {id} is not finished"))),
        None => Err(ApiError::not_found(format!("job {id} not found"))),
    }
}

fn failure_status(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Invalid => StatusCode::BAD_REQUEST,
        FailureKind::Rejected => StatusCode::CONFLICT,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
