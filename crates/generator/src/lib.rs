//! Greedy timetable generator.
//!
//! A run walks the requested dates slot by slot and, for every selected group
//! that is still free, places the most constrained unfinished discipline with
//! the first available teacher and the best fitting room. When no room is free
//! the lesson may be shifted once to the next slot of the same day.

mod driver;
pub mod index;
mod lookup;
mod placement;
mod report;
mod rooms;
mod selector;
pub mod service;
mod teachers;

use tracing::{info, instrument};
use types::{GenerateRequest, Snapshot, StudentGroup};

use sched_core::{validate_request, RequestError};

pub use report::{GenerationReport, Proposal, REMOTE_ROOM};
pub use service::{run_generation, GenerateError};

pub const DEFAULT_ACADEMIC_MINUTES: u32 = 45;
pub const DEFAULT_REMOTE_PLATFORM: &str = "Moodle";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Length of one academic hour in minutes; plan hours grow by slot minutes / this.
    pub academic_minutes: u32,
    /// Platform label written on remote lessons.
    pub remote_platform: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            academic_minutes: DEFAULT_ACADEMIC_MINUTES,
            remote_platform: DEFAULT_REMOTE_PLATFORM.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Plans lessons for `req` over `snapshot`. Pure: nothing is persisted.
    #[instrument(skip(self, snapshot), fields(start = %req.start, end = %req.end))]
    pub fn run(
        &self,
        snapshot: &Snapshot,
        req: &GenerateRequest,
    ) -> Result<GenerationReport, RequestError> {
        let catalog = &snapshot.catalog;
        let group_ids = validate_request(req, catalog)?;
        let groups: Vec<&StudentGroup> = group_ids
            .iter()
            .filter_map(|id| catalog.group(id))
            .collect();

        let lookup = lookup::Lookup::new(catalog);
        let seeded = index::Availability::seed(catalog, &snapshot.lessons);
        let mut placer = placement::Placer::new(&lookup, seeded, self.config.academic_minutes);
        let mut reporter = report::Reporter::new(catalog, &self.config.remote_platform);

        driver::walk(
            &mut placer,
            &mut reporter,
            &groups,
            req.start,
            req.end,
            req.backtrack,
        );

        let report = reporter.finish(placer.plans.touched(), placer.plans.credits());
        info!(
            groups = groups.len(),
            placed = report.stats.placed,
            skipped = report.stats.skipped,
            "generation finished"
        );
        Ok(report)
    }
}
