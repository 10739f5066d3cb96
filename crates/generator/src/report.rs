use chrono::NaiveDate;
use sched_core::{CommitBatch, PlanCredit};
use types::{
    Catalog, Conflict, ConflictReason, DeliveryMode, DisciplineId, GenerateResponse, GroupId,
    Lesson, LessonId, LessonTypeId, PlanHours, ProposalView, RoomId, StudentGroup, Stats,
    TeacherId, TimeSlot, TimeslotId,
};

use crate::placement::{Failure, Placement};
use crate::selector::Candidate;

pub const REMOTE_ROOM: &str = "remote";

/// A lesson the generator would create.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub date: NaiveDate,
    pub timeslot: TimeslotId,
    pub group: GroupId,
    pub discipline: DisciplineId,
    pub teacher: TeacherId,
    pub lesson_type: Option<LessonTypeId>,
    pub room: Option<RoomId>,
    pub is_remote: bool,
    pub remote_platform: String,
}

impl Proposal {
    /// Ids are minted here so that previews never carry one.
    pub fn into_lesson(self) -> Lesson {
        Lesson {
            id: LessonId::generate(),
            date: self.date,
            timeslot: self.timeslot,
            group: self.group,
            discipline: self.discipline,
            teacher: self.teacher,
            lesson_type: self.lesson_type,
            room: self.room,
            is_remote: self.is_remote,
            remote_platform: self.remote_platform,
            stream: None,
        }
    }
}

/// Everything one run produced, nothing persisted yet.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub proposals: Vec<Proposal>,
    pub views: Vec<ProposalView>,
    pub conflicts: Vec<Conflict>,
    pub stats: Stats,
    /// Final hours of every plan that received at least one proposal.
    pub plans: Vec<PlanHours>,
    /// What the run added to those plans; this is what a commit applies.
    pub credits: Vec<PlanCredit>,
}

impl GenerationReport {
    pub fn preview(self) -> GenerateResponse {
        GenerateResponse {
            dry_run: true,
            proposals: Some(self.views),
            created: None,
            conflicts: self.conflicts,
            stats: self.stats,
        }
    }

    pub fn batch(&self) -> CommitBatch {
        CommitBatch {
            lessons: self
                .proposals
                .iter()
                .cloned()
                .map(Proposal::into_lesson)
                .collect(),
            credits: self.credits.clone(),
        }
    }

    pub fn committed(self, created: usize) -> GenerateResponse {
        GenerateResponse {
            dry_run: false,
            proposals: None,
            created: Some(created),
            conflicts: self.conflicts,
            stats: self.stats,
        }
    }
}

/// Accumulates proposals and conflicts while the driver walks the calendar.
pub(crate) struct Reporter<'a> {
    catalog: &'a Catalog,
    remote_platform: &'a str,
    proposals: Vec<Proposal>,
    views: Vec<ProposalView>,
    conflicts: Vec<Conflict>,
    stats: Stats,
}

impl<'a> Reporter<'a> {
    pub fn new(catalog: &'a Catalog, remote_platform: &'a str) -> Self {
        Self {
            catalog,
            remote_platform,
            proposals: Vec::new(),
            views: Vec::new(),
            conflicts: Vec::new(),
            stats: Stats::default(),
        }
    }

    pub fn placed(
        &mut self,
        day: NaiveDate,
        group: &StudentGroup,
        cand: &Candidate<'_>,
        p: &Placement<'_>,
    ) {
        let discipline = cand.discipline;
        let lesson_type = discipline.default_lesson_type.clone();
        let delivery = if p.is_remote {
            DeliveryMode::Remote
        } else {
            discipline.delivery_mode
        };
        self.views.push(ProposalView {
            date: day,
            slot: p.slot.order,
            time: p.slot.time_range(),
            group: group.code.clone(),
            discipline: discipline.title.clone(),
            teacher: p.teacher.full_name.clone(),
            room: match p.room {
                Some(r) => self.catalog.describe_room(r),
                None => REMOTE_ROOM.to_string(),
            },
            delivery,
            lesson_type: lesson_type
                .as_ref()
                .and_then(|t| self.catalog.lesson_type_name(t))
                .map(str::to_string),
        });
        self.proposals.push(Proposal {
            date: day,
            timeslot: p.slot.id.clone(),
            group: group.id.clone(),
            discipline: discipline.id.clone(),
            teacher: p.teacher.id.clone(),
            lesson_type,
            room: p.room.map(|r| r.id.clone()),
            is_remote: p.is_remote,
            remote_platform: if p.is_remote {
                self.remote_platform.to_string()
            } else {
                String::new()
            },
        });
        self.stats.placed += 1;
    }

    pub fn conflict(
        &mut self,
        day: NaiveDate,
        slot: &TimeSlot,
        group: &StudentGroup,
        cand: &Candidate<'_>,
        failure: Failure<'_>,
    ) {
        self.conflicts.push(Conflict {
            reason: failure.reason,
            date: day,
            slot: slot.order,
            time: slot.time_range(),
            group: Some(group.code.clone()),
            discipline: Some(cand.discipline.title.clone()),
            teacher: failure.teacher.map(|t| t.full_name.clone()),
            room: None,
            room_building: None,
            details: failure.details,
        });
        self.stats.skipped += 1;
    }

    pub fn no_slot_to_shift(
        &mut self,
        day: NaiveDate,
        slot: &TimeSlot,
        group: &StudentGroup,
        cand: &Candidate<'_>,
        details: String,
    ) {
        self.conflict(
            day,
            slot,
            group,
            cand,
            Failure {
                reason: ConflictReason::NoSlotToShift,
                teacher: None,
                details,
            },
        );
    }

    pub fn finish(self, plans: Vec<PlanHours>, credits: Vec<PlanCredit>) -> GenerationReport {
        GenerationReport {
            proposals: self.proposals,
            views: self.views,
            conflicts: self.conflicts,
            stats: self.stats,
            plans,
            credits,
        }
    }
}
