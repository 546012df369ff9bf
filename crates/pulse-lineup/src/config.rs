//! Configuration for the lineup engine.

use anyhow::{Result, bail};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Top-level lineup configuration.
///
/// Every field has a default, so partial TOML/JSON documents are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineupConfig {
    /// Packing of performances into each event window.
    pub schedule: ScheduleConfig,
    /// Streak rule for repeat bookings.
    pub eligibility: EligibilityConfig,
    /// Continent coverage goal and the shape of repair slots.
    pub coverage: CoverageConfig,
}

/// How the scheduler fills an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Target performances per event (min, max), inclusive.
    pub performances_per_event: (u32, u32),
    /// Clock time of the first slot on the event date.
    pub opening_time: NaiveTime,
    /// Performance length in minutes (min, max), inclusive.
    pub duration_minutes: (i64, i64),
    /// Changeover between consecutive performances in minutes (min, max), inclusive.
    pub gap_minutes: (i64, i64),
}

/// The consecutive-year rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    /// Longest allowed run of consecutive festival years per performer.
    pub max_consecutive_years: usize,
}

/// The repair pass that spreads artists across continents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Number of under-covered artists to feature (N).
    pub target_artists: usize,
    /// Distinct continents an artist should reach.
    pub min_continents: usize,
    /// Clock time of a repair slot on the chosen event's date.
    pub guest_start_time: NaiveTime,
    /// Length of a repair slot in minutes.
    pub guest_duration_minutes: i64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            performances_per_event: (3, 5),
            opening_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            duration_minutes: (30, 120),
            gap_minutes: (5, 30),
        }
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            max_consecutive_years: 3,
        }
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            target_artists: 5,
            min_continents: 3,
            guest_start_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN),
            guest_duration_minutes: 60,
        }
    }
}

/// Longest duration, gap or guest slot accepted, in minutes.
pub const MAX_SLOT_MINUTES: i64 = 24 * 60;

impl LineupConfig {
    /// Reject configurations the scheduler cannot honour.
    pub fn validate(&self) -> Result<()> {
        let s = &self.schedule;
        check_range("schedule.performances_per_event", s.performances_per_event)?;
        check_range("schedule.duration_minutes", s.duration_minutes)?;
        check_range("schedule.gap_minutes", s.gap_minutes)?;

        if s.duration_minutes.0 <= 0 {
            bail!(
                "schedule.duration_minutes must be positive, got {:?}",
                s.duration_minutes
            );
        }
        if s.gap_minutes.0 < 0 {
            bail!("schedule.gap_minutes must not be negative, got {:?}", s.gap_minutes);
        }
        check_max_minutes("schedule.duration_minutes", s.duration_minutes.1)?;
        check_max_minutes("schedule.gap_minutes", s.gap_minutes.1)?;
        check_max_minutes(
            "coverage.guest_duration_minutes",
            self.coverage.guest_duration_minutes,
        )?;
        if self.eligibility.max_consecutive_years == 0 {
            bail!("eligibility.max_consecutive_years must be at least 1");
        }
        if self.coverage.min_continents == 0 {
            bail!("coverage.min_continents must be at least 1");
        }
        if self.coverage.guest_duration_minutes <= 0 {
            bail!(
                "coverage.guest_duration_minutes must be positive, got {}",
                self.coverage.guest_duration_minutes
            );
        }
        Ok(())
    }
}

fn check_max_minutes(name: &str, minutes: i64) -> Result<()> {
    if minutes > MAX_SLOT_MINUTES {
        bail!(
            "{} may not exceed {} minutes, got {}",
            name,
            MAX_SLOT_MINUTES,
            minutes
        );
    }
    Ok(())
}

fn check_range<T: PartialOrd + std::fmt::Debug>(name: &str, range: (T, T)) -> Result<()> {
    if range.0 > range.1 {
        bail!("{} has min greater than max: {:?}", name, range);
    }
    Ok(())
}
