use std::collections::HashMap;

use types::{
    BuildingId, Catalog, Discipline, DisciplineId, GroupId, Room, Teacher, TeacherId, TimeSlot,
};

/// Read-only indices over the catalog, built once per run.
pub(crate) struct Lookup<'a> {
    pub catalog: &'a Catalog,
    /// Ascending by `order`.
    pub slots: Vec<&'a TimeSlot>,
    pub disciplines: HashMap<&'a DisciplineId, &'a Discipline>,
    /// Authorized teachers in assignment order.
    teachers_for: HashMap<(&'a GroupId, &'a DisciplineId), Vec<&'a Teacher>>,
    building_prefs: HashMap<(&'a GroupId, &'a DisciplineId), HashMap<&'a BuildingId, u16>>,
    building_names: HashMap<&'a BuildingId, &'a str>,
    /// Pre-ordered by capacity, computers, building and room name.
    pub rooms: Vec<&'a Room>,
}

impl<'a> Lookup<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let teachers: HashMap<&TeacherId, &Teacher> =
            catalog.teachers.iter().map(|t| (&t.id, t)).collect();

        let mut teachers_for: HashMap<(&GroupId, &DisciplineId), Vec<&Teacher>> = HashMap::new();
        for a in &catalog.assignments {
            if let Some(&t) = teachers.get(&a.teacher) {
                teachers_for
                    .entry((&a.group, &a.discipline))
                    .or_default()
                    .push(t);
            }
        }

        let mut building_prefs: HashMap<(&GroupId, &DisciplineId), HashMap<&BuildingId, u16>> =
            HashMap::new();
        for p in &catalog.building_priorities {
            building_prefs
                .entry((&p.group, &p.discipline))
                .or_default()
                .insert(&p.building, p.priority);
        }

        let building_names: HashMap<&BuildingId, &str> = catalog
            .buildings
            .iter()
            .map(|b| (&b.id, b.name.as_str()))
            .collect();

        let mut rooms: Vec<&Room> = catalog.rooms.iter().collect();
        rooms.sort_by(|a, b| {
            let an = building_names.get(&a.building).copied().unwrap_or("");
            let bn = building_names.get(&b.building).copied().unwrap_or("");
            (a.capacity, a.computers, an, a.name.as_str())
                .cmp(&(b.capacity, b.computers, bn, b.name.as_str()))
        });

        Self {
            catalog,
            slots: catalog.slots_in_order(),
            disciplines: catalog.disciplines.iter().map(|d| (&d.id, d)).collect(),
            teachers_for,
            building_prefs,
            building_names,
            rooms,
        }
    }

    pub fn teachers_for(&self, group: &'a GroupId, discipline: &'a DisciplineId) -> &[&'a Teacher] {
        self.teachers_for
            .get(&(group, discipline))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn building_prefs(
        &self,
        group: &'a GroupId,
        discipline: &'a DisciplineId,
    ) -> Option<&HashMap<&'a BuildingId, u16>> {
        self.building_prefs
            .get(&(group, discipline))
            .filter(|m| !m.is_empty())
    }

    pub fn building_name(&self, id: &BuildingId) -> &'a str {
        self.building_names.get(id).copied().unwrap_or("")
    }

    /// First slot with a higher order than `slot`.
    pub fn next_slot(&self, slot: &TimeSlot) -> Option<&'a TimeSlot> {
        self.slots.iter().copied().find(|s| s.order > slot.order)
    }
}
