use chrono::NaiveDate;
use types::{ConflictReason, DeliveryMode, Room, StudentGroup, Teacher, TimeSlot};

use crate::index::Availability;
use crate::lookup::Lookup;
use crate::rooms::candidate_rooms;
use crate::selector::{Candidate, PlanBook};
use crate::teachers::pick_teacher;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement<'a> {
    pub slot: &'a TimeSlot,
    pub teacher: &'a Teacher,
    pub room: Option<&'a Room>,
    pub is_remote: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Failure<'a> {
    pub reason: ConflictReason,
    pub teacher: Option<&'a Teacher>,
    pub details: String,
}

#[derive(Debug)]
pub(crate) enum Outcome<'a> {
    Placed(Placement<'a>),
    /// No room, and the caller may still try a later slot.
    Soft,
    Hard(Failure<'a>),
}

/// Mutable state of one run: occupancy and plan hours.
pub(crate) struct Placer<'l, 'a> {
    pub lookup: &'l Lookup<'a>,
    pub index: Availability<'a>,
    pub plans: PlanBook<'a>,
    academic_minutes: f64,
}

impl<'l, 'a> Placer<'l, 'a> {
    pub fn new(lookup: &'l Lookup<'a>, index: Availability<'a>, academic_minutes: u32) -> Self {
        Self {
            lookup,
            index,
            plans: PlanBook::new(lookup),
            academic_minutes: academic_minutes.max(1) as f64,
        }
    }

    pub fn try_place(
        &mut self,
        group: &'a StudentGroup,
        cand: &Candidate<'a>,
        day: NaiveDate,
        slot: &'a TimeSlot,
        allow_fallback: bool,
    ) -> Outcome<'a> {
        let discipline = cand.discipline;
        let Some(teacher) = pick_teacher(self.lookup, &self.index, group, discipline, day, slot)
        else {
            return Outcome::Hard(Failure {
                reason: ConflictReason::NoTeacher,
                teacher: None,
                details: "no authorized teacher is free, working and under the weekly limit".into(),
            });
        };

        let (room, is_remote) = if discipline.delivery_mode == DeliveryMode::Remote {
            (None, true)
        } else {
            match candidate_rooms(self.lookup, &self.index, group, discipline, day, slot).first() {
                Some(&room) => (Some(room), false),
                None if discipline.delivery_mode == DeliveryMode::Mixed => (None, true),
                None if allow_fallback => return Outcome::Soft,
                None => {
                    return Outcome::Hard(Failure {
                        reason: ConflictReason::NoRoom,
                        teacher: Some(teacher),
                        details: "no free room fits the group".into(),
                    })
                }
            }
        };

        let minutes = slot.minutes();
        self.index
            .occupy(day, &slot.id, &group.id, &teacher.id, room.map(|r| &r.id));
        self.index.add_minutes(&teacher.id, day, minutes);
        self.plans
            .credit(cand.plan, minutes as f64 / self.academic_minutes);

        Outcome::Placed(Placement {
            slot,
            teacher,
            room,
            is_remote,
        })
    }
}
