use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::{DeliveryMode, RoomId};

fn yes() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct GenerateRequest {
    #[schema(value_type = String, format = Date)]
    pub start: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end: NaiveDate,
    /// Group codes; empty means every group.
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default = "yes")]
    pub dry_run: bool,
    #[serde(default = "yes")]
    pub backtrack: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    NoTeacher,
    NoRoom,
    NoSlotToShift,
    BacktrackFailed,
}

impl ConflictReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictReason::NoTeacher => "no_teacher",
            ConflictReason::NoRoom => "no_room",
            ConflictReason::NoSlotToShift => "no_slot_to_shift",
            ConflictReason::BacktrackFailed => "backtrack_failed",
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Conflict {
    pub reason: ConflictReason,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub slot: u16,
    pub time: String,
    pub group: Option<String>,
    pub discipline: Option<String>,
    pub teacher: Option<String>,
    pub room: Option<String>,
    pub room_building: Option<String>,
    pub details: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct ProposalView {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub slot: u16,
    pub time: String,
    pub group: String,
    pub discipline: String,
    pub teacher: String,
    /// "Building · Room" or "remote".
    pub room: String,
    pub delivery: DeliveryMode,
    pub lesson_type: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Stats {
    pub placed: u32,
    pub skipped: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct GenerateResponse {
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposals: Option<Vec<ProposalView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<usize>,
    pub conflicts: Vec<Conflict>,
    pub stats: Stats,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct FreeRoom {
    pub id: RoomId,
    pub title: String,
    pub capacity: u32,
    pub computers: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct TeacherLoad {
    pub total_lessons: usize,
    pub total_minutes: u32,
    pub total_hours: f64,
    pub working_days: usize,
}
