use chrono::{Datelike, NaiveDate, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use utoipa::ToSchema;

pub mod report;

pub use report::{
    Conflict, ConflictReason, FreeRoom, GenerateRequest, GenerateResponse, ProposalView,
    Stats, TeacherLoad,
};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash,
            PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}
id_newtype!(BuildingId);
id_newtype!(RoomTypeId);
id_newtype!(RoomId);
id_newtype!(LessonTypeId);
id_newtype!(DisciplineId);
id_newtype!(TeacherId);
id_newtype!(GroupId);
id_newtype!(TimeslotId);
id_newtype!(LessonId);
id_newtype!(StreamId);

impl LessonId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct TimeSlot {
    pub id: TimeslotId,
    /// Position of the slot within the day: 1, 2, 3...
    pub order: u16,
    #[schema(value_type = String, example = "08:20:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "09:50:00")]
    pub end_time: NaiveTime,
}

impl TimeSlot {
    pub fn minutes(&self) -> u32 {
        (self.end_time - self.start_time).num_minutes().max(0) as u32
    }

    pub fn time_range(&self) -> String {
        format!(
            "{}–{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct RoomType {
    pub id: RoomTypeId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Room {
    pub id: RoomId,
    pub building: BuildingId,
    pub name: String,
    /// 0 means the capacity is not known.
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub computers: u32,
    #[serde(default)]
    pub room_type: Option<RoomTypeId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct LessonType {
    pub id: LessonTypeId,
    pub name: String,
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, Eq, PartialEq, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    #[default]
    InPerson,
    Remote,
    Mixed,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::InPerson => "in_person",
            DeliveryMode::Remote => "remote",
            DeliveryMode::Mixed => "mixed",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Discipline {
    pub id: DisciplineId,
    pub title: String,
    #[serde(default)]
    pub delivery_mode: DeliveryMode,
    #[serde(default)]
    pub required_room_type: Option<RoomTypeId>,
    #[serde(default)]
    pub requires_computers: bool,
    #[serde(default)]
    pub default_lesson_type: Option<LessonTypeId>,
}

impl Discipline {
    /// Disciplines bound to a room type or to computers are harder to place.
    pub fn is_constrained(&self) -> bool {
        self.required_room_type.is_some() || self.requires_computers
    }
}

fn default_weekly_limit() -> u32 {
    36
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Workload {
    #[serde(default = "default_weekly_limit")]
    pub weekly_hours_limit: u32,
    /// CSV of weekdays without work, 0 = Monday ... 6 = Sunday, e.g. "5,6".
    #[serde(default)]
    pub days_off: String,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub default_start: Option<NaiveTime>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub default_end: Option<NaiveTime>,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            weekly_hours_limit: default_weekly_limit(),
            days_off: String::new(),
            default_start: None,
            default_end: None,
        }
    }
}

impl Workload {
    pub fn off_weekdays(&self) -> HashSet<u32> {
        self.days_off
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|s| s.parse().ok())
            .collect()
    }

    pub fn is_day_off(&self, day: NaiveDate) -> bool {
        self.off_weekdays()
            .contains(&day.weekday().num_days_from_monday())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct DayOverride {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    #[serde(default)]
    pub is_off: bool,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub start: Option<NaiveTime>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub end: Option<NaiveTime>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Teacher {
    pub id: TeacherId,
    pub full_name: String,
    #[serde(default)]
    pub workload: Option<Workload>,
    #[serde(default)]
    pub overrides: Vec<DayOverride>,
}

impl Teacher {
    pub fn override_for(&self, day: NaiveDate) -> Option<&DayOverride> {
        self.overrides.iter().find(|o| o.date == day)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct StudentGroup {
    pub id: GroupId,
    pub code: String,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub department: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct BuildingPriority {
    pub group: GroupId,
    pub discipline: DisciplineId,
    pub building: BuildingId,
    /// Lower is preferred, 0 is the top choice.
    #[serde(default)]
    pub priority: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct GroupDisciplinePlan {
    pub group: GroupId,
    pub discipline: DisciplineId,
    pub hours_total: u32,
    #[serde(default)]
    pub hours_assigned: f64,
}

impl GroupDisciplinePlan {
    pub fn is_satisfied(&self) -> bool {
        self.hours_assigned >= self.hours_total as f64
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct TeachingAssignment {
    pub group: GroupId,
    pub discipline: DisciplineId,
    pub teacher: TeacherId,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Holiday {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    #[serde(default)]
    pub title: String,
    /// A forced working day despite being listed.
    #[serde(default)]
    pub is_working: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Lesson {
    pub id: LessonId,
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
    pub remote_platform: String,
    /// Lessons sharing a stream id may share room and teacher across groups.
    #[serde(default)]
    pub stream: Option<StreamId>,
}

impl Lesson {
    pub fn same_slot(&self, other: &Lesson) -> bool {
        self.date == other.date && self.timeslot == other.timeslot
    }

    pub fn is_stream_compatible(&self, other: &Lesson) -> bool {
        match (&self.stream, &other.stream) {
            (Some(a), Some(b)) if a == b => {
                self.discipline == other.discipline
                    && self.lesson_type == other.lesson_type
                    && self.is_remote == other.is_remote
                    && self.remote_platform == other.remote_platform
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Catalog {
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub lesson_types: Vec<LessonType>,
    #[serde(default)]
    pub disciplines: Vec<Discipline>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub groups: Vec<StudentGroup>,
    #[serde(default)]
    pub timeslots: Vec<TimeSlot>,
    #[serde(default)]
    pub plans: Vec<GroupDisciplinePlan>,
    #[serde(default)]
    pub assignments: Vec<TeachingAssignment>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    #[serde(default)]
    pub building_priorities: Vec<BuildingPriority>,
}

impl Catalog {
    pub fn slots_in_order(&self) -> Vec<&TimeSlot> {
        let mut slots: Vec<&TimeSlot> = self.timeslots.iter().collect();
        slots.sort_by_key(|s| s.order);
        slots
    }

    pub fn slot(&self, id: &TimeslotId) -> Option<&TimeSlot> {
        self.timeslots.iter().find(|s| &s.id == id)
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    pub fn group(&self, id: &GroupId) -> Option<&StudentGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn group_by_code(&self, code: &str) -> Option<&StudentGroup> {
        self.groups.iter().find(|g| g.code == code)
    }

    pub fn discipline(&self, id: &DisciplineId) -> Option<&Discipline> {
        self.disciplines.iter().find(|d| &d.id == id)
    }

    pub fn teacher(&self, id: &TeacherId) -> Option<&Teacher> {
        self.teachers.iter().find(|t| &t.id == id)
    }

    pub fn building_name(&self, id: &BuildingId) -> Option<&str> {
        self.buildings
            .iter()
            .find(|b| &b.id == id)
            .map(|b| b.name.as_str())
    }

    pub fn lesson_type_name(&self, id: &LessonTypeId) -> Option<&str> {
        self.lesson_types
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.name.as_str())
    }

    /// "Building · Room", falling back to the bare room name.
    pub fn describe_room(&self, room: &Room) -> String {
        match self.building_name(&room.building) {
            Some(b) => format!("{b} · {}", room.name),
            None => room.name.clone(),
        }
    }

    pub fn holiday(&self, day: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.date == day)
    }

    pub fn is_day_off(&self, day: NaiveDate) -> bool {
        self.holiday(day).is_some_and(|h| !h.is_working)
    }
}

/// Catalog plus every lesson already persisted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Snapshot {
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct PlanHours {
    pub group: GroupId,
    pub discipline: DisciplineId,
    pub hours_assigned: f64,
}
