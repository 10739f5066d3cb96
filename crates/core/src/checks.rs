//! Lesson-level hard constraints.
//!
//! Pure functions over a catalog and a set of lessons. The store runs them on
//! every commit and every administrative edit, the generator relies on
//! [`room_suits`] when it ranks rooms.

use thiserror::Error;
use types::{
    Catalog, Discipline, FreeRoom, GroupId, Lesson, LessonId, Room, RoomId, Snapshot, TeacherId,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("in-person lesson needs a room")]
    RoomRequired,
    #[error("room {0} is already taken in this slot")]
    RoomBusy(RoomId),
    #[error("teacher {0} is already taken in this slot")]
    TeacherBusy(TeacherId),
    #[error("group {0} already has a lesson in this slot")]
    GroupBusy(GroupId),
    #[error("group of {size} does not fit room {room} (capacity {capacity})")]
    Capacity { room: RoomId, size: u32, capacity: u32 },
    #[error("not enough computers in room {room}: need {need}, have {have}")]
    Computers { room: RoomId, need: u32, have: u32 },
    #[error("room {0} is not of the required type")]
    RoomType(RoomId),
    #[error("unknown {kind} {id}")]
    Unknown { kind: &'static str, id: String },
}

/// Why `room` cannot host `group_size` students of `discipline`, if it can't.
pub fn room_misfit(room: &Room, group_size: u32, discipline: &Discipline) -> Option<Violation> {
    if let Some(need) = &discipline.required_room_type {
        if room.room_type.as_ref() != Some(need) {
            return Some(Violation::RoomType(room.id.clone()));
        }
    }
    if room.capacity > 0 && group_size > 0 && room.capacity < group_size {
        return Some(Violation::Capacity {
            room: room.id.clone(),
            size: group_size,
            capacity: room.capacity,
        });
    }
    if discipline.requires_computers && (room.computers == 0 || room.computers < group_size) {
        return Some(Violation::Computers {
            room: room.id.clone(),
            need: group_size,
            have: room.computers,
        });
    }
    None
}

pub fn room_suits(room: &Room, group_size: u32, discipline: &Discipline) -> bool {
    room_misfit(room, group_size, discipline).is_none()
}

/// Checks `lesson` against the catalog and against `others` (a lesson with the
/// same id among `others` is ignored, so edits can pass the full schedule).
pub fn check_lesson<'a>(
    catalog: &Catalog,
    lesson: &Lesson,
    others: impl IntoIterator<Item = &'a Lesson>,
) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();
    let unknown = |kind: &'static str, id: &dyn ToString| Violation::Unknown {
        kind,
        id: id.to_string(),
    };

    let group = catalog.group(&lesson.group);
    if group.is_none() {
        violations.push(unknown("group", &lesson.group));
    }
    let discipline = catalog.discipline(&lesson.discipline);
    if discipline.is_none() {
        violations.push(unknown("discipline", &lesson.discipline));
    }
    if catalog.teacher(&lesson.teacher).is_none() {
        violations.push(unknown("teacher", &lesson.teacher));
    }
    if catalog.slot(&lesson.timeslot).is_none() {
        violations.push(unknown("timeslot", &lesson.timeslot));
    }

    if !lesson.is_remote {
        match &lesson.room {
            None => violations.push(Violation::RoomRequired),
            Some(id) => match catalog.room(id) {
                None => violations.push(unknown("room", id)),
                Some(room) => {
                    if let (Some(g), Some(d)) = (group, discipline) {
                        violations.extend(room_misfit(room, g.size, d));
                    }
                }
            },
        }
    }

    for other in others {
        if other.id == lesson.id || !other.same_slot(lesson) {
            continue;
        }
        if other.group == lesson.group {
            note(&mut violations, Violation::GroupBusy(lesson.group.clone()));
            continue;
        }
        let shared = lesson.is_stream_compatible(other);
        if !lesson.is_remote && lesson.room.is_some() && other.room == lesson.room && !shared {
            if let Some(room) = &lesson.room {
                note(&mut violations, Violation::RoomBusy(room.clone()));
            }
        }
        if other.teacher == lesson.teacher && !shared {
            note(&mut violations, Violation::TeacherBusy(lesson.teacher.clone()));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Clashes with several lessons are reported once each.
fn note(violations: &mut Vec<Violation>, v: Violation) {
    if !violations.contains(&v) {
        violations.push(v);
    }
}

/// Rooms free at the lesson's date and slot that fit its group and
/// discipline, ordered by building then room name. `None` if the lesson is
/// unknown.
pub fn free_rooms(snapshot: &Snapshot, lesson: &LessonId) -> Option<Vec<FreeRoom>> {
    let catalog = &snapshot.catalog;
    let target = snapshot.lessons.iter().find(|l| &l.id == lesson)?;
    let group_size = catalog.group(&target.group).map(|g| g.size).unwrap_or(0);
    let discipline = catalog.discipline(&target.discipline);

    let busy: Vec<&RoomId> = snapshot
        .lessons
        .iter()
        .filter(|l| l.id != target.id && l.same_slot(target))
        .filter_map(|l| l.room.as_ref())
        .collect();

    let mut rooms: Vec<&Room> = catalog
        .rooms
        .iter()
        .filter(|r| !busy.contains(&&r.id))
        .filter(|r| discipline.map_or(true, |d| room_suits(r, group_size, d)))
        .collect();
    rooms.sort_by(|a, b| {
        let ka = (catalog.building_name(&a.building).unwrap_or(""), a.name.as_str());
        let kb = (catalog.building_name(&b.building).unwrap_or(""), b.name.as_str());
        ka.cmp(&kb)
    });

    Some(
        rooms
            .into_iter()
            .map(|r| FreeRoom {
                id: r.id.clone(),
                title: catalog.describe_room(r),
                capacity: r.capacity,
                computers: r.computers,
            })
            .collect(),
    )
}
