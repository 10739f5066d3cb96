use std::collections::HashSet;

use types::{Catalog, DeliveryMode, GenerateRequest, GroupId};

use crate::checks::room_suits;
use crate::{RequestError, ValidationError};

/// Structural integrity of a catalog: unique ids, resolvable references,
/// sane slots, plans that have someone to teach them and somewhere to sit.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    if catalog.timeslots.is_empty() {
        errors.push("timeslots is empty".into());
    }
    let mut orders = HashSet::new();
    for s in &catalog.timeslots {
        if s.end_time <= s.start_time {
            errors.push(format!("timeslot {} ends before it starts", s.id));
        }
        if !orders.insert(s.order) {
            errors.push(format!("duplicate timeslot order {}", s.order));
        }
    }

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name} id: {s}"));
            }
        }
    }
    chk_unique("building", catalog.buildings.iter().map(|x| &x.id), &mut errors);
    chk_unique("room type", catalog.room_types.iter().map(|x| &x.id), &mut errors);
    chk_unique("room", catalog.rooms.iter().map(|x| &x.id), &mut errors);
    chk_unique("lesson type", catalog.lesson_types.iter().map(|x| &x.id), &mut errors);
    chk_unique("discipline", catalog.disciplines.iter().map(|x| &x.id), &mut errors);
    chk_unique("teacher", catalog.teachers.iter().map(|x| &x.id), &mut errors);
    chk_unique("group", catalog.groups.iter().map(|x| &x.id), &mut errors);
    chk_unique("group code", catalog.groups.iter().map(|x| &x.code), &mut errors);
    chk_unique("timeslot", catalog.timeslots.iter().map(|x| &x.id), &mut errors);
    chk_unique(
        "plan",
        catalog
            .plans
            .iter()
            .map(|p| format!("{}/{}", p.group, p.discipline)),
        &mut errors,
    );

    let buildings: HashSet<_> = catalog.buildings.iter().map(|b| &b.id).collect();
    let room_types: HashSet<_> = catalog.room_types.iter().map(|t| &t.id).collect();
    let lesson_types: HashSet<_> = catalog.lesson_types.iter().map(|t| &t.id).collect();
    let teachers: HashSet<_> = catalog.teachers.iter().map(|t| &t.id).collect();

    for r in &catalog.rooms {
        if !buildings.contains(&r.building) {
            errors.push(format!("room {} references missing building {}", r.id, r.building));
        }
        if let Some(t) = &r.room_type {
            if !room_types.contains(t) {
                errors.push(format!("room {} references missing room type {t}", r.id));
            }
        }
    }

    for d in &catalog.disciplines {
        if let Some(t) = &d.required_room_type {
            if !room_types.contains(t) {
                errors.push(format!("discipline {} requires missing room type {t}", d.id));
            }
        }
        if let Some(t) = &d.default_lesson_type {
            if !lesson_types.contains(t) {
                errors.push(format!("discipline {} references missing lesson type {t}", d.id));
            }
        }
    }

    for t in &catalog.teachers {
        let mut dates = HashSet::new();
        for o in &t.overrides {
            if !dates.insert(o.date) {
                errors.push(format!("teacher {} has two overrides for {}", t.id, o.date));
            }
        }
    }

    for a in &catalog.assignments {
        if catalog.group(&a.group).is_none() {
            errors.push(format!("assignment references missing group {}", a.group));
        }
        if catalog.discipline(&a.discipline).is_none() {
            errors.push(format!("assignment references missing discipline {}", a.discipline));
        }
        if !teachers.contains(&a.teacher) {
            errors.push(format!("assignment references missing teacher {}", a.teacher));
        }
    }

    for p in &catalog.building_priorities {
        if !buildings.contains(&p.building) {
            errors.push(format!("building priority references missing building {}", p.building));
        }
    }

    for p in &catalog.plans {
        let Some(group) = catalog.group(&p.group) else {
            errors.push(format!("plan references missing group {}", p.group));
            continue;
        };
        let Some(discipline) = catalog.discipline(&p.discipline) else {
            errors.push(format!("plan references missing discipline {}", p.discipline));
            continue;
        };
        if p.is_satisfied() {
            continue;
        }
        let taught = catalog
            .assignments
            .iter()
            .any(|a| a.group == p.group && a.discipline == p.discipline);
        if !taught {
            errors.push(format!(
                "plan {}/{} has no teacher assigned",
                group.code, discipline.title
            ));
        }
        if discipline.delivery_mode == DeliveryMode::InPerson
            && !catalog.rooms.iter().any(|r| room_suits(r, group.size, discipline))
        {
            errors.push(format!(
                "plan {}/{} is unschedulable: no suitable room",
                group.code, discipline.title
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Problems(errors))
    }
}

/// Longest range, in days, one run may cover: a full academic year with room
/// to spare.
pub const MAX_RANGE_DAYS: i64 = 400;

/// Resolves the groups a run covers, in catalog order.
pub fn validate_request(
    req: &GenerateRequest,
    catalog: &Catalog,
) -> Result<Vec<GroupId>, RequestError> {
    if req.start > req.end {
        return Err(RequestError::StartAfterEnd {
            start: req.start,
            end: req.end,
        });
    }
    let days = (req.end - req.start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(RequestError::RangeTooLong {
            days,
            max: MAX_RANGE_DAYS,
        });
    }

    let codes: Vec<&str> = req
        .groups
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    let groups: Vec<GroupId> = if codes.is_empty() {
        catalog.groups.iter().map(|g| g.id.clone()).collect()
    } else {
        let unknown: Vec<&str> = codes
            .iter()
            .copied()
            .filter(|c| catalog.group_by_code(c).is_none())
            .collect();
        if !unknown.is_empty() {
            return Err(RequestError::UnknownGroups(unknown.join(",")));
        }
        catalog
            .groups
            .iter()
            .filter(|g| codes.contains(&g.code.as_str()))
            .map(|g| g.id.clone())
            .collect()
    };

    if groups.is_empty() {
        return Err(RequestError::NoGroups);
    }
    Ok(groups)
}
