use chrono::NaiveDate;
use sched_core::room_suits;
use types::{DeliveryMode, Discipline, Room, StudentGroup, TimeSlot};

use crate::index::Availability;
use crate::lookup::Lookup;

const LAST: u32 = 9999;
const UNLISTED: u16 = 9999;

/// Unknown capacity or computer counts rank after every known value.
fn or_last(v: u32) -> u32 {
    if v == 0 {
        LAST
    } else {
        v
    }
}

/// Free rooms that fit the group and discipline, best first. Empty for remote disciplines.
pub(crate) fn candidate_rooms<'a>(
    lookup: &Lookup<'a>,
    index: &Availability<'a>,
    group: &'a StudentGroup,
    discipline: &'a Discipline,
    day: NaiveDate,
    slot: &TimeSlot,
) -> Vec<&'a Room> {
    if discipline.delivery_mode == DeliveryMode::Remote {
        return Vec::new();
    }
    let mut rooms: Vec<&'a Room> = lookup
        .rooms
        .iter()
        .copied()
        .filter(|r| !index.room_busy(day, &slot.id, &r.id))
        .filter(|r| room_suits(r, group.size, discipline))
        .collect();

    match lookup.building_prefs(&group.id, &discipline.id) {
        Some(prefs) => rooms.sort_by_key(|r| {
            (
                prefs.get(&r.building).copied().unwrap_or(UNLISTED),
                r.capacity,
                r.computers,
            )
        }),
        None => rooms.sort_by(|a, b| {
            (
                or_last(a.capacity),
                or_last(a.computers),
                lookup.building_name(&a.building),
                a.name.as_str(),
            )
                .cmp(&(
                    or_last(b.capacity),
                    or_last(b.computers),
                    lookup.building_name(&b.building),
                    b.name.as_str(),
                ))
        }),
    }
    rooms
}
