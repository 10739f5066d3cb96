pub mod checks;
pub mod load;
pub mod validate;

use async_trait::async_trait;
use thiserror::Error;

pub use checks::{check_lesson, free_rooms, room_suits, Violation};
pub use load::teacher_load;
pub use types::{
    Catalog, Conflict, ConflictReason, GenerateRequest, GenerateResponse, Lesson, LessonId,
    PlanHours, Snapshot, Stats,
};
pub use validate::{validate_catalog, validate_request, MAX_RANGE_DAYS};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid catalog: {}", .0.join("; "))]
    Problems(Vec<String>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("start {start} is after end {end}")]
    StartAfterEnd {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    #[error("range of {days} days exceeds the maximum of {max}")]
    RangeTooLong { days: i64, max: i64 },
    #[error("unknown group codes: {0}")]
    UnknownGroups(String),
    #[error("no groups to schedule")]
    NoGroups,
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error(
        "lesson {lesson} rejected: {}",
        .violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; ")
    )]
    Rejected {
        lesson: LessonId,
        violations: Vec<Violation>,
    },
    #[error("no plan for group {group} and discipline {discipline}")]
    MissingPlan { group: String, discipline: String },
    #[error("lesson {0} not found")]
    LessonNotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Hours one run adds to a plan, on top of whatever the store holds at commit.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanCredit {
    pub group: types::GroupId,
    pub discipline: types::DisciplineId,
    pub hours: f64,
}

/// Everything a committed generation run writes, applied all or nothing.
#[derive(Clone, Debug, Default)]
pub struct CommitBatch {
    pub lessons: Vec<Lesson>,
    pub credits: Vec<PlanCredit>,
}

/// Data store behind the generator and the administrative edits.
#[async_trait]
pub trait ScheduleStore: Send + Sync + 'static {
    async fn snapshot(&self) -> anyhow::Result<Snapshot>;

    /// Returns the number of lessons created.
    async fn commit(&self, batch: CommitBatch) -> Result<usize, CommitError>;

    /// Creates or replaces a lesson after the same checks a commit runs.
    async fn save_lesson(&self, lesson: Lesson) -> Result<Lesson, CommitError>;

    async fn set_plan_hours(&self, hours: PlanHours) -> Result<(), CommitError>;
}
