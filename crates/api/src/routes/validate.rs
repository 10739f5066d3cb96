use axum::Json;
use sched_core::{validate_catalog, ValidationError};
use serde::Serialize;
use types::Catalog;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    /// One entry per integrity problem found.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl From<Result<(), ValidationError>> for ValidationReport {
    fn from(res: Result<(), ValidationError>) -> Self {
        let errors: Vec<String> = match res {
            Ok(()) => Vec::new(),
            Err(ValidationError::Problems(errors)) => errors,
        };
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = Catalog,
    responses(
        (status = 200, description = "Catalog integrity report", body = ValidationReport)
    )
)]
pub async fn validate_handler(Json(catalog): Json<Catalog>) -> Json<ValidationReport> {
    Json(validate_catalog(&catalog).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_entry_per_problem() {
        let mut catalog = Catalog::default();
        catalog.buildings.push(types::Building {
            id: "main;east".into(),
            name: "Main".into(),
        });
        catalog.buildings.push(types::Building {
            id: "main;east".into(),
            name: "Main".into(),
        });
        let report: ValidationReport = validate_catalog(&catalog).into();
        assert!(!report.ok);
        assert_eq!(
            report.errors,
            vec!["timeslots is empty", "duplicate building id: main;east"]
        );

        let report: ValidationReport = Ok(()).into();
        assert!(report.ok && report.errors.is_empty());
    }
}
