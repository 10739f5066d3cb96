use chrono::NaiveDate;
use tracing::debug;
use types::{Catalog, Discipline, StudentGroup, Teacher, TimeSlot};

use crate::index::Availability;
use crate::lookup::Lookup;

/// Holiday first, then a day override for that date, then the workload days off.
pub(crate) fn allowed_on_day(catalog: &Catalog, teacher: &Teacher, day: NaiveDate) -> bool {
    if catalog.is_day_off(day) {
        return false;
    }
    if let Some(o) = teacher.override_for(day) {
        return !o.is_off;
    }
    match &teacher.workload {
        Some(w) => !w.is_day_off(day),
        None => true,
    }
}

/// Each bound comes from the day override if it sets one, else from the workload.
pub(crate) fn window_ok(teacher: &Teacher, slot: &TimeSlot, day: NaiveDate) -> bool {
    let ov = teacher.override_for(day);
    let w = teacher.workload.as_ref();
    let start = ov
        .and_then(|o| o.start)
        .or_else(|| w.and_then(|w| w.default_start));
    let end = ov.and_then(|o| o.end).or_else(|| w.and_then(|w| w.default_end));
    if start.is_some_and(|s| slot.start_time < s) {
        return false;
    }
    if end.is_some_and(|e| slot.end_time > e) {
        return false;
    }
    true
}

pub(crate) fn within_weekly_limit(
    teacher: &Teacher,
    index: &Availability<'_>,
    day: NaiveDate,
    minutes: u32,
) -> bool {
    match teacher.workload.as_ref().map(|w| w.weekly_hours_limit) {
        Some(limit) if limit > 0 => {
            index.weekly_minutes(&teacher.id, day) + u64::from(minutes) <= u64::from(limit) * 60
        }
        _ => true,
    }
}

fn rejection(
    catalog: &Catalog,
    index: &Availability<'_>,
    teacher: &Teacher,
    day: NaiveDate,
    slot: &TimeSlot,
) -> Option<&'static str> {
    if index.teacher_busy(day, &slot.id, &teacher.id) {
        Some("busy")
    } else if !allowed_on_day(catalog, teacher, day) {
        Some("day off")
    } else if !window_ok(teacher, slot, day) {
        Some("outside working hours")
    } else if !within_weekly_limit(teacher, index, day, slot.minutes()) {
        Some("weekly limit")
    } else {
        None
    }
}

/// First authorized teacher, in assignment order, free to take the slot.
pub(crate) fn pick_teacher<'a>(
    lookup: &Lookup<'a>,
    index: &Availability<'a>,
    group: &'a StudentGroup,
    discipline: &'a Discipline,
    day: NaiveDate,
    slot: &TimeSlot,
) -> Option<&'a Teacher> {
    lookup
        .teachers_for(&group.id, &discipline.id)
        .iter()
        .copied()
        .find(|t| match rejection(lookup.catalog, index, t, day, slot) {
            Some(reason) => {
                debug!(teacher = %t.id, %day, slot = slot.order, reason, "teacher skipped");
                false
            }
            None => true,
        })
}
