use chrono::{NaiveDate, NaiveTime};
use generator::{run_generation, Generator, GeneratorConfig, REMOTE_ROOM};
use sched_core::ScheduleStore;
use store::InMemStore;
use types::{
    Building, Catalog, ConflictReason, DayOverride, DeliveryMode, Discipline, GenerateRequest,
    GroupDisciplinePlan, Holiday, Lesson, Room, Snapshot, StudentGroup, Teacher,
    TeachingAssignment, TimeSlot, Workload,
};

// 2025-09-01 is a Monday
fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
}

fn slot(order: u16) -> TimeSlot {
    let start = 8 * 60 + 20 + (order as u32 - 1) * 100;
    let end = start + 90;
    TimeSlot {
        id: format!("s{order}").as_str().into(),
        order,
        start_time: NaiveTime::from_hms_opt(start / 60, start % 60, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end / 60, end % 60, 0).unwrap(),
    }
}

fn group(id: &str, size: u32) -> StudentGroup {
    StudentGroup {
        id: id.into(),
        code: id.to_uppercase(),
        size,
        department: String::new(),
    }
}

fn teacher(id: &str) -> Teacher {
    Teacher {
        id: id.into(),
        full_name: format!("Teacher {}", id.to_uppercase()),
        workload: None,
        overrides: vec![],
    }
}

fn discipline(id: &str, mode: DeliveryMode, computers: bool) -> Discipline {
    Discipline {
        id: id.into(),
        title: id.to_uppercase(),
        delivery_mode: mode,
        required_room_type: None,
        requires_computers: computers,
        default_lesson_type: None,
    }
}

fn room(id: &str, capacity: u32, computers: u32) -> Room {
    Room {
        id: id.into(),
        building: "main".into(),
        name: id.to_uppercase(),
        capacity,
        computers,
        room_type: None,
    }
}

fn plan(g: &str, d: &str, hours: u32) -> GroupDisciplinePlan {
    GroupDisciplinePlan {
        group: g.into(),
        discipline: d.into(),
        hours_total: hours,
        hours_assigned: 0.0,
    }
}

fn assign(g: &str, d: &str, t: &str) -> TeachingAssignment {
    TeachingAssignment {
        group: g.into(),
        discipline: d.into(),
        teacher: t.into(),
    }
}

fn base(slots: u16) -> Catalog {
    let mut c = Catalog::default();
    c.buildings.push(Building {
        id: "main".into(),
        name: "Main".into(),
    });
    c.timeslots = (1..=slots).map(slot).collect();
    c
}

fn request(start: u32, end: u32, backtrack: bool) -> GenerateRequest {
    GenerateRequest {
        start: day(start),
        end: day(end),
        groups: vec![],
        dry_run: true,
        backtrack,
    }
}

fn snapshot(catalog: Catalog) -> Snapshot {
    Snapshot {
        catalog,
        lessons: vec![],
    }
}

#[test]
fn single_plan_is_placed_once_without_conflicts() {
    let mut c = base(4);
    c.groups.push(group("g1", 25));
    c.teachers.push(teacher("t1"));
    c.disciplines
        .push(discipline("math", DeliveryMode::InPerson, false));
    c.rooms.push(room("r1", 30, 0));
    c.plans.push(plan("g1", "math", 2));
    c.assignments.push(assign("g1", "math", "t1"));

    let report = Generator::default()
        .run(&snapshot(c), &request(1, 5, true))
        .unwrap();
    assert_eq!(report.proposals.len(), 1);
    assert!(report.conflicts.is_empty());
    assert_eq!(report.plans.len(), 1);
    assert!(report.plans[0].hours_assigned >= 2.0);

    let p = &report.proposals[0];
    assert_eq!((p.date, p.timeslot.0.as_str()), (day(1), "s1"));
    assert_eq!(p.room.as_ref().map(|r| r.0.as_str()), Some("r1"));
    assert!(!p.is_remote);
    assert_eq!(report.views[0].room, "Main · R1");
    assert_eq!(report.stats.placed, 1);
}

fn lab_contest(slots: u16) -> Catalog {
    let mut c = base(slots);
    c.groups.push(group("g1", 20));
    c.groups.push(group("g2", 20));
    c.teachers.push(teacher("t1"));
    c.teachers.push(teacher("t2"));
    c.disciplines
        .push(discipline("prog", DeliveryMode::InPerson, true));
    c.rooms.push(room("lab", 24, 24));
    c.rooms.push(room("hall", 100, 0));
    c.plans.push(plan("g1", "prog", 2));
    c.plans.push(plan("g2", "prog", 2));
    c.assignments.push(assign("g1", "prog", "t1"));
    c.assignments.push(assign("g2", "prog", "t2"));
    c
}

#[test]
fn contested_lab_without_backtracking_is_no_room() {
    let report = Generator::default()
        .run(&snapshot(lab_contest(1)), &request(1, 1, false))
        .unwrap();
    assert_eq!(report.proposals.len(), 1);
    assert_eq!(report.proposals[0].group.0, "g1");
    assert_eq!(report.conflicts.len(), 1);
    let c = &report.conflicts[0];
    assert_eq!(c.reason, ConflictReason::NoRoom);
    assert_eq!(c.group.as_deref(), Some("G2"));
    assert_eq!(c.teacher.as_deref(), Some("Teacher T2"));
    assert_eq!(report.stats.skipped, 1);
}

#[test]
fn contested_lab_shifts_to_next_slot() {
    let report = Generator::default()
        .run(&snapshot(lab_contest(2)), &request(1, 1, true))
        .unwrap();
    assert!(report.conflicts.is_empty());
    let placed: Vec<(&str, &str)> = report
        .proposals
        .iter()
        .map(|p| (p.group.0.as_str(), p.timeslot.0.as_str()))
        .collect();
    assert_eq!(placed, vec![("g1", "s1"), ("g2", "s2")]);
}

#[test]
fn last_slot_of_the_day_has_nowhere_to_shift() {
    let report = Generator::default()
        .run(&snapshot(lab_contest(1)), &request(1, 1, true))
        .unwrap();
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].reason, ConflictReason::NoSlotToShift);
    assert_eq!(report.conflicts[0].slot, 1);
}

#[test]
fn failed_shift_reports_the_retry_reason() {
    let mut snap = snapshot(lab_contest(2));
    snap.catalog.groups.push(group("g3", 10));
    snap.catalog.teachers.push(teacher("t3"));
    snap.lessons.push(Lesson {
        id: "existing".into(),
        date: day(1),
        timeslot: "s2".into(),
        group: "g3".into(),
        discipline: "prog".into(),
        teacher: "t3".into(),
        lesson_type: None,
        room: Some("lab".into()),
        is_remote: false,
        remote_platform: String::new(),
        stream: None,
    });
    let mut req = request(1, 1, true);
    req.groups = vec!["G1".into(), "G2".into()];

    let report = Generator::default().run(&snap, &req).unwrap();
    assert_eq!(report.proposals.len(), 1);
    let c = &report.conflicts[0];
    assert_eq!(c.reason, ConflictReason::BacktrackFailed);
    assert_eq!(c.slot, 1);
    assert_eq!(c.teacher.as_deref(), Some("Teacher T2"));
    assert!(c.details.contains("slot 2"));
    assert!(c.details.contains("no_room"));
    // g2 is still unplaced when slot 2 itself comes up
    assert_eq!(report.conflicts.len(), 2);
    assert_eq!(report.conflicts[1].reason, ConflictReason::NoSlotToShift);
    assert_eq!(report.conflicts[1].slot, 2);
    assert_eq!(report.stats.skipped, 2);
}

#[test]
fn teacher_day_off_override_blocks_that_date_only() {
    let mut c = base(1);
    c.groups.push(group("g1", 20));
    let mut t2 = teacher("t2");
    t2.overrides.push(DayOverride {
        date: day(2),
        is_off: true,
        start: None,
        end: None,
    });
    c.teachers.push(t2);
    c.disciplines
        .push(discipline("math", DeliveryMode::InPerson, false));
    c.rooms.push(room("r1", 30, 0));
    c.plans.push(plan("g1", "math", 6));
    c.assignments.push(assign("g1", "math", "t2"));

    let report = Generator::default()
        .run(&snapshot(c), &request(1, 4, true))
        .unwrap();
    assert!(report.proposals.iter().all(|p| p.date != day(2)));
    let dates: Vec<NaiveDate> = report.proposals.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![day(1), day(3), day(4)]);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].reason, ConflictReason::NoTeacher);
    assert_eq!(report.conflicts[0].date, day(2));
}

#[test]
fn mixed_discipline_without_room_goes_remote() {
    let mut c = base(1);
    c.groups.push(group("g1", 40));
    c.teachers.push(teacher("t1"));
    c.disciplines
        .push(discipline("eco", DeliveryMode::Mixed, false));
    // too small for the group
    c.rooms.push(room("r1", 20, 0));
    c.plans.push(plan("g1", "eco", 2));
    c.assignments.push(assign("g1", "eco", "t1"));

    let report = Generator::new(GeneratorConfig {
        remote_platform: "Teams".into(),
        ..GeneratorConfig::default()
    })
    .run(&snapshot(c), &request(1, 1, false))
    .unwrap();
    assert!(report.conflicts.is_empty());
    let p = &report.proposals[0];
    assert!(p.is_remote);
    assert!(p.room.is_none());
    assert_eq!(p.remote_platform, "Teams");
    assert_eq!(report.views[0].room, REMOTE_ROOM);
    assert_eq!(report.views[0].delivery, DeliveryMode::Remote);
}

#[test]
fn holidays_are_skipped_unless_forced_working() {
    let mut c = base(1);
    c.groups.push(group("g1", 20));
    c.teachers.push(teacher("t1"));
    c.disciplines
        .push(discipline("eng", DeliveryMode::Remote, false));
    c.plans.push(plan("g1", "eng", 20));
    c.assignments.push(assign("g1", "eng", "t1"));
    c.holidays.push(Holiday {
        date: day(2),
        title: "Independence".into(),
        is_working: false,
    });
    c.holidays.push(Holiday {
        date: day(3),
        title: "Moved working day".into(),
        is_working: true,
    });

    let report = Generator::default()
        .run(&snapshot(c), &request(1, 3, true))
        .unwrap();
    let dates: Vec<NaiveDate> = report.proposals.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![day(1), day(3)]);
}

#[test]
fn weekly_limit_counts_lessons_already_in_the_schedule() {
    let mut c = base(2);
    c.groups.push(group("g1", 20));
    c.groups.push(group("g2", 20));
    let mut t1 = teacher("t1");
    t1.workload = Some(Workload {
        weekly_hours_limit: 3,
        ..Workload::default()
    });
    c.teachers.push(t1);
    c.disciplines
        .push(discipline("eng", DeliveryMode::Remote, false));
    c.plans.push(plan("g1", "eng", 20));
    c.assignments.push(assign("g1", "eng", "t1"));

    let mut snap = snapshot(c);
    snap.lessons.push(Lesson {
        id: "old".into(),
        date: day(1),
        timeslot: "s1".into(),
        group: "g2".into(),
        discipline: "eng".into(),
        teacher: "t1".into(),
        lesson_type: None,
        room: None,
        is_remote: true,
        remote_platform: "Moodle".into(),
        stream: None,
    });
    let mut req = request(1, 5, true);
    req.groups = vec!["G1".into()];

    let report = Generator::default().run(&snap, &req).unwrap();
    // 180 weekly minutes, 90 already booked
    assert_eq!(report.proposals.len(), 1);
    assert!(report
        .conflicts
        .iter()
        .all(|c| c.reason == ConflictReason::NoTeacher));
}

#[test]
fn academic_minutes_scale_the_credit() {
    let mut c = base(1);
    c.groups.push(group("g1", 20));
    c.teachers.push(teacher("t1"));
    c.disciplines
        .push(discipline("eng", DeliveryMode::Remote, false));
    c.plans.push(plan("g1", "eng", 2));
    c.assignments.push(assign("g1", "eng", "t1"));

    let report = Generator::new(GeneratorConfig {
        academic_minutes: 60,
        ..GeneratorConfig::default()
    })
    .run(&snapshot(c), &request(1, 3, true))
    .unwrap();
    // 1.5 per slot: the second placement overshoots the target of 2
    assert_eq!(report.proposals.len(), 2);
    assert_eq!(report.plans[0].hours_assigned, 3.0);
}

#[tokio::test]
async fn commit_persists_lessons_and_plan_hours() {
    let mut c = base(2);
    c.groups.push(group("g1", 20));
    c.teachers.push(teacher("t1"));
    c.disciplines
        .push(discipline("math", DeliveryMode::InPerson, false));
    c.rooms.push(room("r1", 30, 0));
    c.plans.push(plan("g1", "math", 4));
    c.assignments.push(assign("g1", "math", "t1"));
    let store = InMemStore::new(snapshot(c));
    let generator = Generator::default();

    let preview = run_generation(&store, &generator, &request(1, 1, true))
        .await
        .unwrap();
    assert!(preview.dry_run);
    assert_eq!(preview.proposals.as_ref().map(Vec::len), Some(2));
    assert!(store.snapshot().await.unwrap().lessons.is_empty());

    let mut req = request(1, 1, true);
    req.dry_run = false;
    let done = run_generation(&store, &generator, &req).await.unwrap();
    assert_eq!(done.created, Some(2));
    assert_eq!(done.stats.placed, 2);

    let after = store.snapshot().await.unwrap();
    assert_eq!(after.lessons.len(), 2);
    assert_eq!(after.catalog.plans[0].hours_assigned, 4.0);
}
