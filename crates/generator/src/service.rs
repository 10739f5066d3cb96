//! Snapshot, run, then preview or commit.

use sched_core::{CommitError, RequestError, ScheduleStore};
use thiserror::Error;
use tracing::info;
use types::{GenerateRequest, GenerateResponse};

use crate::Generator;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Invalid(#[from] RequestError),
    #[error(transparent)]
    Commit(#[from] CommitError),
    #[error("store unavailable: {0}")]
    Store(#[from] anyhow::Error),
}

pub async fn run_generation<S>(
    store: &S,
    generator: &Generator,
    req: &GenerateRequest,
) -> Result<GenerateResponse, GenerateError>
where
    S: ScheduleStore + ?Sized,
{
    let snapshot = store.snapshot().await?;
    let report = generator.run(&snapshot, req)?;
    if req.dry_run {
        return Ok(report.preview());
    }
    let created = store.commit(report.batch()).await?;
    info!(created, "generated lessons committed");
    Ok(report.committed(created))
}
