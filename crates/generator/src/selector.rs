use std::collections::HashMap;

use sched_core::PlanCredit;
use types::{Discipline, DisciplineId, GroupDisciplinePlan, GroupId, PlanHours};

use crate::lookup::Lookup;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate<'a> {
    pub plan: &'a GroupDisciplinePlan,
    pub discipline: &'a Discipline,
}

/// Working copy of plan hours for one run.
pub(crate) struct PlanBook<'a> {
    /// Per group, constrained disciplines first, otherwise catalog order.
    by_group: HashMap<&'a GroupId, Vec<Candidate<'a>>>,
    hours: HashMap<(&'a GroupId, &'a DisciplineId), f64>,
    touched: Vec<&'a GroupDisciplinePlan>,
}

impl<'a> PlanBook<'a> {
    pub fn new(lookup: &Lookup<'a>) -> Self {
        let catalog = lookup.catalog;
        let mut by_group: HashMap<&GroupId, Vec<Candidate>> = HashMap::new();
        let mut hours = HashMap::new();
        for plan in &catalog.plans {
            let Some(&discipline) = lookup.disciplines.get(&plan.discipline) else {
                continue;
            };
            by_group
                .entry(&plan.group)
                .or_default()
                .push(Candidate { plan, discipline });
            hours.insert((&plan.group, &plan.discipline), plan.hours_assigned);
        }
        for list in by_group.values_mut() {
            list.sort_by_key(|c| !c.discipline.is_constrained());
        }
        Self {
            by_group,
            hours,
            touched: Vec::new(),
        }
    }

    pub fn hours(&self, plan: &GroupDisciplinePlan) -> f64 {
        self.hours
            .get(&(&plan.group, &plan.discipline))
            .copied()
            .unwrap_or(plan.hours_assigned)
    }

    /// First plan of the group that still needs hours.
    pub fn pick(&self, group: &GroupId) -> Option<Candidate<'a>> {
        self.by_group
            .get(group)?
            .iter()
            .find(|c| self.hours(c.plan) < c.plan.hours_total as f64)
            .copied()
    }

    pub fn credit(&mut self, plan: &'a GroupDisciplinePlan, academic_hours: f64) {
        *self
            .hours
            .entry((&plan.group, &plan.discipline))
            .or_insert(plan.hours_assigned) += academic_hours;
        if !self.touched.iter().any(|p| std::ptr::eq(*p, plan)) {
            self.touched.push(plan);
        }
    }

    /// Final hours of every plan that received a placement, in first-touch order.
    pub fn touched(&self) -> Vec<PlanHours> {
        self.touched
            .iter()
            .map(|p| PlanHours {
                group: p.group.clone(),
                discipline: p.discipline.clone(),
                hours_assigned: self.hours(p),
            })
            .collect()
    }

    /// Hours added during this run to every touched plan.
    pub fn credits(&self) -> Vec<PlanCredit> {
        self.touched
            .iter()
            .map(|p| PlanCredit {
                group: p.group.clone(),
                discipline: p.discipline.clone(),
                hours: self.hours(p) - p.hours_assigned,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Catalog, DeliveryMode};

    fn discipline(id: &str, computers: bool) -> Discipline {
        Discipline {
            id: id.into(),
            title: id.to_uppercase(),
            delivery_mode: DeliveryMode::InPerson,
            required_room_type: None,
            requires_computers: computers,
            default_lesson_type: None,
        }
    }

    fn plan(discipline: &str, total: u32, assigned: f64) -> GroupDisciplinePlan {
        GroupDisciplinePlan {
            group: "g1".into(),
            discipline: discipline.into(),
            hours_total: total,
            hours_assigned: assigned,
        }
    }

    #[test]
    fn constrained_disciplines_go_first_and_done_plans_are_skipped() {
        let mut catalog = Catalog::default();
        catalog.disciplines = vec![
            discipline("history", false),
            discipline("math", false),
            discipline("prog", true),
        ];
        catalog.plans = vec![
            plan("history", 2, 2.0),
            plan("math", 4, 0.0),
            plan("prog", 2, 0.0),
        ];
        let lookup = Lookup::new(&catalog);
        let mut book = PlanBook::new(&lookup);

        let first = book.pick(&"g1".into()).unwrap();
        assert_eq!(first.discipline.id.0, "prog");

        book.credit(first.plan, 2.0);
        let next = book.pick(&"g1".into()).unwrap();
        assert_eq!(next.discipline.id.0, "math");

        book.credit(next.plan, 2.0);
        book.credit(next.plan, 2.0);
        assert!(book.pick(&"g1".into()).is_none());
        assert!(book.pick(&"g2".into()).is_none());

        let touched = book.touched();
        assert_eq!(touched.len(), 2);
        assert_eq!(touched[0].discipline.0, "prog");
        assert_eq!(touched[1].hours_assigned, 4.0);
        let credits: Vec<f64> = book.credits().iter().map(|c| c.hours).collect();
        assert_eq!(credits, vec![2.0, 4.0]);
    }
}
