use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use sched_core::{free_rooms, CommitError, ScheduleStore};
use serde::Deserialize;
use types::{
    DisciplineId, FreeRoom, GroupId, Lesson, LessonId, LessonTypeId, RoomId, StreamId, TeacherId,
    TimeslotId,
};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

/// Lesson as submitted by an administrator; a missing id creates a new lesson.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LessonInput {
    #[serde(default)]
    pub id: Option<LessonId>,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub timeslot: TimeslotId,
    pub group: GroupId,
    pub discipline: DisciplineId,
    pub teacher: TeacherId,
    #[serde(default)]
    pub lesson_type: Option<LessonTypeId>,
    #[serde(default)]
    pub room: Option<RoomId>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub remote_platform: Option<String>,
    #[serde(default)]
    pub stream: Option<StreamId>,
}

impl LessonInput {
    fn into_lesson(self, default_platform: &str) -> Lesson {
        let remote_platform = match (self.is_remote, self.remote_platform) {
            (true, Some(p)) if !p.trim().is_empty() => p,
            (true, _) => default_platform.to_string(),
            (false, _) => String::new(),
        };
        Lesson {
            id: self.id.unwrap_or_else(LessonId::generate),
            date: self.date,
            timeslot: self.timeslot,
            group: self.group,
            discipline: self.discipline,
            teacher: self.teacher,
            lesson_type: self.lesson_type,
            room: if self.is_remote { None } else { self.room },
            is_remote: self.is_remote,
            remote_platform,
            stream: self.stream,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoomChange {
    pub room: RoomId,
}

#[utoipa::path(
    post,
    path = "/v1/lessons",
    request_body = LessonInput,
    responses(
        (status = 200, description = "Saved lesson", body = Lesson),
        (status = 409, description = "Lesson clashes or does not fit its room", body = crate::error::ErrorBody)
    )
)]
pub async fn save(
    State(state): State<AppState>,
    Json(input): Json<LessonInput>,
) -> Result<Json<Lesson>, ApiError> {
    let lesson = input.into_lesson(&state.remote_platform);
    Ok(Json(state.store.save_lesson(lesson).await?))
}

#[utoipa::path(
    post,
    path = "/v1/lessons/{id}/room",
    params(("id" = String, Path, description = "Lesson ID")),
    request_body = RoomChange,
    responses(
        (status = 200, description = "Lesson moved to the room, now in person", body = Lesson),
        (status = 404, description = "Unknown lesson", body = crate::error::ErrorBody),
        (status = 409, description = "Room taken or unsuitable", body = crate::error::ErrorBody)
    )
)]
pub async fn change_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(change): Json<RoomChange>,
) -> Result<Json<Lesson>, ApiError> {
    let snapshot = state.store.snapshot().await?;
    let mut lesson = snapshot
        .lessons
        .into_iter()
        .find(|l| l.id.0 == id)
        .ok_or(CommitError::LessonNotFound(id))?;
    lesson.room = Some(change.room);
    lesson.is_remote = false;
    lesson.remote_platform.clear();
    Ok(Json(state.store.save_lesson(lesson).await?))
}

#[utoipa::path(
    get,
    path = "/v1/lessons/{id}/free-rooms",
    params(("id" = String, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Rooms free in the lesson's slot that fit its group", body = [FreeRoom]),
        (status = 404, description = "Unknown lesson", body = crate::error::ErrorBody)
    )
)]
pub async fn free(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<FreeRoom>>, ApiError> {
    let snapshot = state.store.snapshot().await?;
    free_rooms(&snapshot, &LessonId(id.clone()))
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("lesson {id} not found")))
}
