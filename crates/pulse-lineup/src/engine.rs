//! The two-stage lineup pipeline: schedule every event, then repair coverage.
//!
//! ## Usage
//!
//! ```ignore
//! use pulse_lineup::{LineupConfig, LineupEngine, LineupInputs};
//! use rand::SeedableRng;
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
//! let engine = LineupEngine::new(LineupConfig::default())?;
//! let outcome = engine.run(&inputs, &mut rng);
//! println!("{} performances", outcome.lineup.len());
//! ```

use anyhow::Result;
use rand::Rng;
use tracing::{info, warn};

use crate::checks::LineupChecks;
use crate::config::LineupConfig;
use crate::coverage::{CoverageReport, CoverageRepairer};
use crate::history::PerformanceYearHistory;
use crate::model::{Event, Festival, Lineup, Location, Roster};
use crate::scheduler::{ScheduleStats, Scheduler};

/// Entities the engine reads. Produced by the dataset generator.
#[derive(Debug, Clone, Copy)]
pub struct LineupInputs<'a> {
    pub locations: &'a [Location],
    pub festivals: &'a [Festival],
    pub events: &'a [Event],
    pub roster: &'a Roster,
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct LineupOutcome {
    pub lineup: Lineup,
    pub schedule: ScheduleStats,
    pub coverage: CoverageReport,
    pub checks: LineupChecks,
}

/// Runs the scheduler and the coverage repairer in order.
#[derive(Debug, Clone)]
pub struct LineupEngine {
    scheduler: Scheduler,
    repairer: CoverageRepairer,
    config: LineupConfig,
}

impl LineupEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: LineupConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: Scheduler::new(config.clone()),
            repairer: CoverageRepairer::new(config.clone()),
            config,
        })
    }

    /// Schedule every event, repair continent coverage, then audit the result.
    ///
    /// The year history starts empty and is dropped with the run. Only the
    /// scheduler reads or writes it.
    pub fn run<R: Rng>(&self, inputs: &LineupInputs<'_>, rng: &mut R) -> LineupOutcome {
        let mut history = PerformanceYearHistory::new();
        let mut lineup = Lineup::new();

        let schedule = self.scheduler.schedule_all(
            inputs.events,
            inputs.festivals,
            inputs.roster,
            &mut history,
            &mut lineup,
            rng,
        );
        info!(
            events = schedule.events,
            filled = schedule.events_filled,
            without_pool = schedule.events_without_pool,
            performances = schedule.performances,
            "Scheduled performances"
        );

        let coverage = self.repairer.repair(
            &mut lineup,
            inputs.events,
            inputs.festivals,
            inputs.locations,
            rng,
        );

        let checks = LineupChecks::run(
            &lineup,
            inputs.events,
            inputs.festivals,
            inputs.roster,
            self.config.schedule.opening_time,
            self.config.eligibility.max_consecutive_years,
        );
        if !checks.is_clean() {
            warn!(?checks, "Lineup failed invariant checks");
        }

        LineupOutcome {
            lineup,
            schedule,
            coverage,
            checks,
        }
    }
}
