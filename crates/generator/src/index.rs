//! Occupancy of rooms, teachers and groups during one generation run.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use types::{Catalog, GroupId, Lesson, RoomId, TeacherId, TimeslotId};

fn week_key(day: NaiveDate) -> (i32, u32) {
    let w = day.iso_week();
    (w.year(), w.week())
}

/// Busy (date, slot, X) triples plus per-teacher minutes for each ISO week.
///
/// Entries are only ever added: once something is placed it stays placed for
/// the rest of the run.
#[derive(Default)]
pub struct Availability<'a> {
    room: HashSet<(NaiveDate, &'a TimeslotId, &'a RoomId)>,
    teacher: HashSet<(NaiveDate, &'a TimeslotId, &'a TeacherId)>,
    group: HashSet<(NaiveDate, &'a TimeslotId, &'a GroupId)>,
    weekly_minutes: HashMap<(&'a TeacherId, i32, u32), u64>,
}

impl<'a> Availability<'a> {
    /// Seeds occupancy from every persisted lesson.
    pub fn seed(catalog: &'a Catalog, lessons: &'a [Lesson]) -> Self {
        let minutes: HashMap<&TimeslotId, u32> = catalog
            .timeslots
            .iter()
            .map(|s| (&s.id, s.minutes()))
            .collect();

        let mut index = Self::default();
        for l in lessons {
            index.occupy(l.date, &l.timeslot, &l.group, &l.teacher, l.room.as_ref());
            index.add_minutes(
                &l.teacher,
                l.date,
                minutes.get(&l.timeslot).copied().unwrap_or(0),
            );
        }
        index
    }

    pub fn room_busy(&self, day: NaiveDate, slot: &TimeslotId, room: &RoomId) -> bool {
        self.room.contains(&(day, slot, room))
    }

    pub fn teacher_busy(&self, day: NaiveDate, slot: &TimeslotId, teacher: &TeacherId) -> bool {
        self.teacher.contains(&(day, slot, teacher))
    }

    pub fn group_busy(&self, day: NaiveDate, slot: &TimeslotId, group: &GroupId) -> bool {
        self.group.contains(&(day, slot, group))
    }

    pub fn occupy(
        &mut self,
        day: NaiveDate,
        slot: &'a TimeslotId,
        group: &'a GroupId,
        teacher: &'a TeacherId,
        room: Option<&'a RoomId>,
    ) {
        self.group.insert((day, slot, group));
        self.teacher.insert((day, slot, teacher));
        if let Some(room) = room {
            self.room.insert((day, slot, room));
        }
    }

    /// Minutes already booked for `teacher` in the ISO week containing `day`.
    pub fn weekly_minutes(&self, teacher: &TeacherId, day: NaiveDate) -> u64 {
        let (year, week) = week_key(day);
        self.weekly_minutes
            .get(&(teacher, year, week))
            .copied()
            .unwrap_or(0)
    }

    pub fn add_minutes(&mut self, teacher: &'a TeacherId, day: NaiveDate, minutes: u32) {
        let (year, week) = week_key(day);
        *self
            .weekly_minutes
            .entry((teacher, year, week))
            .or_default() += u64::from(minutes);
    }
}
