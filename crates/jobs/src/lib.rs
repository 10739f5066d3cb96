use generator::{run_generation, GenerateError, Generator};
use parking_lot::RwLock;
use sched_core::{CommitError, ScheduleStore};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use types::{GenerateRequest, GenerateResponse};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct JobId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status")]
pub enum JobStatus {
    Queued,
    Running,
    Done { result: GenerateResponse },
    Failed { kind: FailureKind, message: String },
}

/// Why a background run failed, in the same classes the inline route reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Invalid,
    Rejected,
    NotFound,
    Internal,
}

impl From<&GenerateError> for FailureKind {
    fn from(e: &GenerateError) -> Self {
        match e {
            GenerateError::Invalid(_) | GenerateError::Commit(CommitError::Other(_)) => {
                Self::Invalid
            }
            GenerateError::Commit(CommitError::Rejected { .. }) => Self::Rejected,
            GenerateError::Commit(
                CommitError::MissingPlan { .. } | CommitError::LessonNotFound(_),
            ) => Self::NotFound,
            GenerateError::Store(_) => Self::Internal,
        }
    }
}

/// Generation runs, background or inline, all behind one gate so that two
/// runs never read and commit the same snapshot concurrently.
pub struct InMemJobs<S: ScheduleStore> {
    inner: Arc<RwLock<HashMap<String, JobStatus>>>,
    store: Arc<S>,
    generator: Arc<Generator>,
    gate: Arc<tokio::sync::Mutex<()>>,
}

impl<S: ScheduleStore> Clone for InMemJobs<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            store: self.store.clone(),
            generator: self.generator.clone(),
            gate: self.gate.clone(),
        }
    }
}

impl<S: ScheduleStore> InMemJobs<S> {
    pub fn new(store: Arc<S>, generator: Generator) -> Self {
        Self {
            inner: Default::default(),
            store,
            generator: Arc::new(generator),
            gate: Default::default(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Runs `req` now, waiting for any run in progress to finish first.
    pub async fn run_now(&self, req: GenerateRequest) -> Result<GenerateResponse, GenerateError> {
        let _turn = self.gate.lock().await;
        run_generation(self.store.as_ref(), &self.generator, &req).await
    }

    pub fn enqueue(&self, req: GenerateRequest) -> JobId {
        let id = Uuid::new_v4().to_string();
        self.inner.write().insert(id.clone(), JobStatus::Queued);

        let map = self.inner.clone();
        let store = self.store.clone();
        let generator = self.generator.clone();
        let gate = self.gate.clone();
        let id_for_task = id.clone();

        tokio::spawn(async move {
            let _turn = gate.lock().await;
            map.write()
                .insert(id_for_task.clone(), JobStatus::Running);
            let run = tokio::spawn(async move {
                run_generation(store.as_ref(), &generator, &req).await
            });
            let status = match run.await {
                Ok(Ok(result)) => {
                    info!(job = %id_for_task, placed = result.stats.placed, "job done");
                    JobStatus::Done { result }
                }
                Ok(Err(e)) => {
                    error!(job = %id_for_task, error = %e, "job failed");
                    JobStatus::Failed {
                        kind: FailureKind::from(&e),
                        message: e.to_string(),
                    }
                }
                Err(e) => {
                    error!(job = %id_for_task, error = %e, "job aborted");
                    JobStatus::Failed {
                        kind: FailureKind::Internal,
                        message: format!("generation aborted: {e}"),
                    }
                }
            };
            map.write().insert(id_for_task, status);
        });

        JobId(id)
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.inner.read().get(id).cloned()
    }
}
