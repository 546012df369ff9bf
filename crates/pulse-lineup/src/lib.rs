//! Pulse Lineup: performance scheduling and continent-coverage repair.
//!
//! Given festivals, stages, events and a roster of artists and groups, the
//! engine books performers into each event's evening window and then widens
//! the continent coverage of a handful of artists.
//!
//! ## Stages
//!
//! 1. **Scheduler**: per event, builds the pool of solo artists and groups
//!    that pass the consecutive-year rule for the festival year, then packs
//!    random performances and changeover gaps into the window from the
//!    opening time onward. Drawn years are recorded in a shared history that
//!    later events see.
//! 2. **Coverage repairer**: picks up to N artists that have played on
//!    fewer than the required continents and books them as special guests
//!    at festivals on the continents they are missing.
//!
//! All randomness comes from an injected [`rand::Rng`], so a seeded
//! generator reproduces the same lineup.

pub mod checks;
pub mod config;
pub mod coverage;
pub mod engine;
pub mod history;
pub mod model;
pub mod scheduler;

pub use checks::LineupChecks;
pub use config::LineupConfig;
pub use coverage::{CoverageReport, CoverageRepairer};
pub use engine::{LineupEngine, LineupInputs, LineupOutcome};
pub use history::{PerformanceYearHistory, is_eligible};
pub use model::{
    ArtistGroupMember, ArtistId, Continent, Event, EventId, Festival, FestivalId, GroupId, Lineup,
    Location, LocationId, Performance, PerformanceId, PerformanceMember, PerformanceOrigin,
    PerformanceType, Performer, PerformerKey, Roster, Stage, StageId,
};
pub use scheduler::{EventOutcome, ScheduleStats, Scheduler};
