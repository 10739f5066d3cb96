use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use types::{Snapshot, TeacherId, TeacherLoad, TimeslotId};

/// Lessons, minutes and distinct working days of a teacher in `[start, end]`.
pub fn teacher_load(
    snapshot: &Snapshot,
    teacher: &TeacherId,
    start: NaiveDate,
    end: NaiveDate,
) -> TeacherLoad {
    let minutes_by_slot: HashMap<&TimeslotId, u32> = snapshot
        .catalog
        .timeslots
        .iter()
        .map(|s| (&s.id, s.minutes()))
        .collect();

    let mut total_lessons = 0usize;
    let mut total_minutes = 0u32;
    let mut days: HashSet<NaiveDate> = HashSet::new();

    for l in &snapshot.lessons {
        if &l.teacher != teacher || l.date < start || l.date > end {
            continue;
        }
        total_lessons += 1;
        total_minutes += minutes_by_slot.get(&l.timeslot).copied().unwrap_or(0);
        days.insert(l.date);
    }

    TeacherLoad {
        total_lessons,
        total_minutes,
        total_hours: (total_minutes as f64 / 60.0 * 100.0).round() / 100.0,
        working_days: days.len(),
    }
}
