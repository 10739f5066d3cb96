use chrono::NaiveDate;
use tracing::{debug, trace};
use types::{ConflictReason, StudentGroup, TimeSlot};

use crate::placement::{Failure, Outcome, Placer};
use crate::report::Reporter;
use crate::selector::Candidate;

/// Walks every working day in `[start, end]`, slot by slot, group by group.
pub(crate) fn walk<'a>(
    placer: &mut Placer<'_, 'a>,
    reporter: &mut Reporter<'_>,
    groups: &[&'a StudentGroup],
    start: NaiveDate,
    end: NaiveDate,
    backtrack: bool,
) {
    let lookup = placer.lookup;
    for day in start.iter_days().take_while(|d| *d <= end) {
        if lookup.catalog.is_day_off(day) {
            debug!(%day, "holiday skipped");
            continue;
        }
        for &slot in &lookup.slots {
            for &group in groups {
                if placer.index.group_busy(day, &slot.id, &group.id) {
                    continue;
                }
                let Some(cand) = placer.plans.pick(&group.id) else {
                    continue;
                };
                step(placer, reporter, group, &cand, day, slot, backtrack);
            }
        }
    }
}

fn step<'a>(
    placer: &mut Placer<'_, 'a>,
    reporter: &mut Reporter<'_>,
    group: &'a StudentGroup,
    cand: &Candidate<'a>,
    day: NaiveDate,
    slot: &'a TimeSlot,
    backtrack: bool,
) {
    match placer.try_place(group, cand, day, slot, backtrack) {
        Outcome::Placed(p) => reporter.placed(day, group, cand, &p),
        Outcome::Hard(f) => reporter.conflict(day, slot, group, cand, f),
        Outcome::Soft => shift(placer, reporter, group, cand, day, slot),
    }
}

/// One retry in the next slot of the same day, without another fallback.
fn shift<'a>(
    placer: &mut Placer<'_, 'a>,
    reporter: &mut Reporter<'_>,
    group: &'a StudentGroup,
    cand: &Candidate<'a>,
    day: NaiveDate,
    slot: &'a TimeSlot,
) {
    let Some(next) = placer.lookup.next_slot(slot) else {
        reporter.no_slot_to_shift(day, slot, group, cand, "no later slot on this day".into());
        return;
    };
    if placer.index.group_busy(day, &next.id, &group.id) {
        reporter.no_slot_to_shift(
            day,
            slot,
            group,
            cand,
            format!("group already busy in slot {}", next.order),
        );
        return;
    }
    trace!(%day, from = slot.order, to = next.order, group = %group.code, "shifting");
    match placer.try_place(group, cand, day, next, false) {
        Outcome::Placed(p) => reporter.placed(day, group, cand, &p),
        Outcome::Hard(f) => reporter.conflict(
            day,
            slot,
            group,
            cand,
            Failure {
                reason: ConflictReason::BacktrackFailed,
                details: format!("shift to slot {} failed: {}", next.order, f.reason),
                teacher: f.teacher,
            },
        ),
        // fallback is disabled on the retry
        Outcome::Soft => reporter.conflict(
            day,
            slot,
            group,
            cand,
            Failure {
                reason: ConflictReason::BacktrackFailed,
                teacher: None,
                details: format!("shift to slot {} failed", next.order),
            },
        ),
    }
}
