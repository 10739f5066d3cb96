//! In-memory [`ScheduleStore`] behind a single `RwLock`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use parking_lot::RwLock;
use sched_core::{check_lesson, CommitBatch, CommitError, ScheduleStore};
use tracing::{info, warn};
use types::{DisciplineId, GroupId, Lesson, PlanHours, Snapshot};

#[derive(Clone, Default)]
pub struct InMemStore {
    inner: Arc<RwLock<Snapshot>>,
}

impl InMemStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Seeds the store from a JSON-encoded [`Snapshot`].
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("parsing snapshot {}", path.display()))?;
        info!(
            path = %path.display(),
            lessons = snapshot.lessons.len(),
            groups = snapshot.catalog.groups.len(),
            "snapshot loaded"
        );
        Ok(Self::new(snapshot))
    }
}

fn plan_index(
    snapshot: &Snapshot,
    group: &GroupId,
    discipline: &DisciplineId,
) -> Result<usize, CommitError> {
    snapshot
        .catalog
        .plans
        .iter()
        .position(|p| &p.group == group && &p.discipline == discipline)
        .ok_or_else(|| CommitError::MissingPlan {
            group: group.to_string(),
            discipline: discipline.to_string(),
        })
}

#[async_trait]
impl ScheduleStore for InMemStore {
    async fn snapshot(&self) -> anyhow::Result<Snapshot> {
        Ok(self.inner.read().clone())
    }

    async fn commit(&self, batch: CommitBatch) -> Result<usize, CommitError> {
        let mut w = self.inner.write();

        // everything is checked before anything is written
        let mut accepted: Vec<&Lesson> = Vec::with_capacity(batch.lessons.len());
        for lesson in &batch.lessons {
            let others = w.lessons.iter().chain(accepted.iter().copied());
            if let Err(violations) = check_lesson(&w.catalog, lesson, others) {
                warn!(lesson = %lesson.id, ?violations, "batch rejected");
                return Err(CommitError::Rejected {
                    lesson: lesson.id.clone(),
                    violations,
                });
            }
            accepted.push(lesson);
        }
        let slots = batch
            .credits
            .iter()
            .map(|c| plan_index(&w, &c.group, &c.discipline))
            .collect::<Result<Vec<_>, _>>()?;

        // credits add to the stored hours, so manual edits made since the
        // run's snapshot survive
        for (i, c) in slots.into_iter().zip(&batch.credits) {
            w.catalog.plans[i].hours_assigned += c.hours;
        }
        let created = batch.lessons.len();
        w.lessons.extend(batch.lessons);
        info!(created, plans = batch.credits.len(), "batch committed");
        Ok(created)
    }

    async fn save_lesson(&self, lesson: Lesson) -> Result<Lesson, CommitError> {
        let mut w = self.inner.write();
        if let Err(violations) = check_lesson(&w.catalog, &lesson, &w.lessons) {
            return Err(CommitError::Rejected {
                lesson: lesson.id.clone(),
                violations,
            });
        }
        match w.lessons.iter_mut().find(|l| l.id == lesson.id) {
            Some(existing) => *existing = lesson.clone(),
            None => w.lessons.push(lesson.clone()),
        }
        info!(lesson = %lesson.id, "lesson saved");
        Ok(lesson)
    }

    async fn set_plan_hours(&self, hours: PlanHours) -> Result<(), CommitError> {
        if !hours.hours_assigned.is_finite() || hours.hours_assigned < 0.0 {
            return Err(anyhow::anyhow!("hours must be a non-negative number").into());
        }
        let mut w = self.inner.write();
        let i = plan_index(&w, &hours.group, &hours.discipline)?;
        w.catalog.plans[i].hours_assigned = hours.hours_assigned;
        info!(group = %hours.group, discipline = %hours.discipline, hours = hours.hours_assigned, "plan hours set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use sched_core::{PlanCredit, Violation};
    use types::{
        Building, Catalog, DeliveryMode, Discipline, GroupDisciplinePlan, LessonId, Room,
        StudentGroup, Teacher, TimeSlot,
    };

    fn snapshot() -> Snapshot {
        let mut c = Catalog::default();
        c.buildings.push(Building { id: "b1".into(), name: "Main".into() });
        c.rooms.push(Room {
            id: "r1".into(),
            building: "b1".into(),
            name: "101".into(),
            capacity: 30,
            computers: 0,
            room_type: None,
        });
        for g in ["g1", "g2"] {
            c.groups.push(StudentGroup {
                id: g.into(),
                code: g.to_uppercase(),
                size: 20,
                department: String::new(),
            });
        }
        c.disciplines.push(Discipline {
            id: "math".into(),
            title: "Math".into(),
            delivery_mode: DeliveryMode::InPerson,
            required_room_type: None,
            requires_computers: false,
            default_lesson_type: None,
        });
        for t in ["t1", "t2"] {
            c.teachers.push(Teacher {
                id: t.into(),
                full_name: t.to_uppercase(),
                workload: None,
                overrides: vec![],
            });
        }
        c.timeslots.push(TimeSlot {
            id: "s1".into(),
            order: 1,
            start_time: NaiveTime::from_hms_opt(8, 20, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 50, 0).unwrap(),
        });
        c.plans.push(GroupDisciplinePlan {
            group: "g1".into(),
            discipline: "math".into(),
            hours_total: 4,
            hours_assigned: 0.0,
        });
        Snapshot {
            catalog: c,
            lessons: vec![],
        }
    }

    fn lesson(id: &str, group: &str, teacher: &str, room: &str) -> Lesson {
        Lesson {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            timeslot: "s1".into(),
            group: group.into(),
            discipline: "math".into(),
            teacher: teacher.into(),
            lesson_type: None,
            room: Some(room.into()),
            is_remote: false,
            remote_platform: String::new(),
            stream: None,
        }
    }

    fn hours(h: f64) -> PlanHours {
        PlanHours {
            group: "g1".into(),
            discipline: "math".into(),
            hours_assigned: h,
        }
    }

    fn credit(h: f64) -> PlanCredit {
        PlanCredit {
            group: "g1".into(),
            discipline: "math".into(),
            hours: h,
        }
    }

    #[tokio::test]
    async fn commit_applies_lessons_and_hours() {
        let store = InMemStore::new(snapshot());
        let created = store
            .commit(CommitBatch {
                lessons: vec![lesson("l1", "g1", "t1", "r1")],
                credits: vec![credit(2.0)],
            })
            .await
            .unwrap();
        assert_eq!(created, 1);
        let snap = store.snapshot().await.unwrap();
        assert_eq!(snap.lessons.len(), 1);
        assert_eq!(snap.catalog.plans[0].hours_assigned, 2.0);
    }

    #[tokio::test]
    async fn one_bad_lesson_rejects_the_whole_batch() {
        let store = InMemStore::new(snapshot());
        let err = store
            .commit(CommitBatch {
                lessons: vec![
                    lesson("l1", "g1", "t1", "r1"),
                    // same room, same slot, different group
                    lesson("l2", "g2", "t2", "r1"),
                ],
                credits: vec![credit(4.0)],
            })
            .await
            .unwrap_err();
        match err {
            CommitError::Rejected { lesson, violations } => {
                assert_eq!(lesson, LessonId::from("l2"));
                assert_eq!(violations, vec![Violation::RoomBusy("r1".into())]);
            }
            other => panic!("unexpected {other:?}"),
        }
        let snap = store.snapshot().await.unwrap();
        assert!(snap.lessons.is_empty());
        assert_eq!(snap.catalog.plans[0].hours_assigned, 0.0);
    }

    #[tokio::test]
    async fn commit_adds_to_hours_edited_after_the_snapshot() {
        let store = InMemStore::new(snapshot());
        let _taken = store.snapshot().await.unwrap();
        store.set_plan_hours(hours(10.0)).await.unwrap();
        store
            .commit(CommitBatch {
                lessons: vec![lesson("l1", "g1", "t1", "r1")],
                credits: vec![credit(2.0)],
            })
            .await
            .unwrap();
        let snap = store.snapshot().await.unwrap();
        assert_eq!(snap.catalog.plans[0].hours_assigned, 12.0);
    }

    #[tokio::test]
    async fn unknown_plan_rejects_the_batch() {
        let store = InMemStore::new(snapshot());
        let mut c = credit(1.0);
        c.group = "g2".into();
        let err = store
            .commit(CommitBatch {
                lessons: vec![lesson("l1", "g1", "t1", "r1")],
                credits: vec![c],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CommitError::MissingPlan { .. }));
        assert!(store.snapshot().await.unwrap().lessons.is_empty());
    }

    #[tokio::test]
    async fn save_lesson_replaces_by_id_and_checks_clashes() {
        let store = InMemStore::new(snapshot());
        store.save_lesson(lesson("l1", "g1", "t1", "r1")).await.unwrap();

        let err = store
            .save_lesson(lesson("l2", "g2", "t1", "r1"))
            .await
            .unwrap_err();
        assert!(matches!(err, CommitError::Rejected { .. }));

        // editing l1 itself is not a clash with its old version
        store.save_lesson(lesson("l1", "g1", "t2", "r1")).await.unwrap();
        let snap = store.snapshot().await.unwrap();
        assert_eq!(snap.lessons.len(), 1);
        assert_eq!(snap.lessons[0].teacher.0, "t2");
    }

    #[tokio::test]
    async fn plan_hours_are_set_or_rejected() {
        let store = InMemStore::new(snapshot());
        store.set_plan_hours(hours(3.5)).await.unwrap();
        assert_eq!(
            store.snapshot().await.unwrap().catalog.plans[0].hours_assigned,
            3.5
        );
        assert!(store.set_plan_hours(hours(-1.0)).await.is_err());
        let mut h = hours(1.0);
        h.discipline = "history".into();
        assert!(matches!(
            store.set_plan_hours(h).await,
            Err(CommitError::MissingPlan { .. })
        ));
    }
}
