use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use types::{GenerateRequest, GenerateResponse};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::state::AppState;

/// Raw query string; every field is text so that bad input becomes a 400 with a message.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenerateQuery {
    /// First day, `YYYY-MM-DD`.
    pub start: Option<String>,
    /// Last day, inclusive.
    pub end: Option<String>,
    /// Comma-separated group codes; every group when absent.
    pub groups: Option<String>,
    /// `0` commits, anything else previews. Defaults to preview.
    pub dry_run: Option<String>,
    /// `0` disables shifting to the next slot.
    pub backtrack: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct JobCreated {
    pub job_id: String,
    pub status: &'static str,
}

pub(crate) fn parse_date(name: &str, raw: Option<&str>) -> Result<NaiveDate, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("{name} is required")))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("{name} must be YYYY-MM-DD, got {raw:?}")))
}

fn flag(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some(v) => v.trim() != "0",
        None => default,
    }
}

impl GenerateQuery {
    pub fn into_request(self) -> Result<GenerateRequest, ApiError> {
        Ok(GenerateRequest {
            start: parse_date("start", self.start.as_deref())?,
            end: parse_date("end", self.end.as_deref())?,
            groups: self
                .groups
                .as_deref()
                .unwrap_or("")
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            dry_run: flag(self.dry_run.as_deref(), true),
            backtrack: flag(self.backtrack.as_deref(), true),
        })
    }
}

#[utoipa::path(
    get,
    path = "/v1/generate",
    params(GenerateQuery),
    responses(
        (status = 200, description = "Preview or commit summary", body = GenerateResponse),
        (status = 400, description = "Bad dates or group codes", body = crate::error::ErrorBody),
        (status = 409, description = "Commit rejected", body = crate::error::ErrorBody)
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    Query(q): Query<GenerateQuery>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let req = q.into_request()?;
    info!(start = %req.start, end = %req.end, dry_run = req.dry_run, "generate");
    Ok(Json(state.jobs.run_now(req).await?))
}

#[utoipa::path(
    post,
    path = "/v1/generate/jobs",
    request_body = GenerateRequest,
    responses((status = 200, description = "Job enqueued", body = JobCreated))
)]
pub async fn enqueue(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Json<JobCreated> {
    let id = state.jobs.enqueue(req);
    Json(JobCreated {
        job_id: id.0,
        status: "queued",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> GenerateQuery {
        let mut q = GenerateQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "start" => q.start = v,
                "end" => q.end = v,
                "groups" => q.groups = v,
                "dry_run" => q.dry_run = v,
                "backtrack" => q.backtrack = v,
                _ => unreachable!(),
            }
        }
        q
    }

    #[test]
    fn flags_default_on_and_only_zero_disables() {
        let req = query(&[("start", "2025-09-01"), ("end", "2025-09-05")])
            .into_request()
            .unwrap();
        assert!(req.dry_run && req.backtrack);
        assert!(req.groups.is_empty());

        let req = query(&[
            ("start", "2025-09-01"),
            ("end", "2025-09-05"),
            ("groups", "KN-21, ,ISP-31"),
            ("dry_run", "0"),
            ("backtrack", "no"),
        ])
        .into_request()
        .unwrap();
        assert!(!req.dry_run);
        assert!(req.backtrack);
        assert_eq!(req.groups, vec!["KN-21", "ISP-31"]);
    }

    #[test]
    fn malformed_or_missing_dates() {
        assert!(query(&[("end", "2025-09-05")]).into_request().is_err());
        let err = query(&[("start", "01.09.2025"), ("end", "2025-09-05")])
            .into_request()
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
