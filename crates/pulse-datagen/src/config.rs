//! Dataset configuration: entity counts, value ranges and the lineup engine.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use pulse_lineup::LineupConfig;
use serde::{Deserialize, Serialize};

/// Longest event accepted, in hours.
pub const MAX_EVENT_HOURS: i64 = 24;

/// Configuration for generating a dataset.
///
/// Loaded from TOML or JSON; missing fields take the standard values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Seed for the single random source.
    pub seed: u64,
    /// "Today" for festival years and ticket dates. Defaults to the current date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
    /// Number of venue locations.
    pub locations: usize,
    /// Festivals in the years before the reference year.
    pub past_festivals: usize,
    /// Festivals in the years after the reference year.
    pub future_festivals: usize,
    /// Number of stages, spread randomly over festivals.
    pub stages: usize,
    /// Stage capacity range (min, max).
    pub stage_capacity: (u32, u32),
    /// Number of artists.
    pub artists: usize,
    /// Number of groups.
    pub groups: usize,
    /// Members per group (min, max).
    pub group_size: (usize, usize),
    /// Events per festival with stages (min, max).
    pub events_per_festival: (usize, usize),
    /// Event length in hours (min, max).
    pub event_hours: (i64, i64),
    /// Number of visitors.
    pub visitors: usize,
    /// Target number of tickets.
    pub tickets: usize,
    /// Number of staff members.
    pub staff: usize,
    /// Scheduling and coverage settings.
    pub lineup: LineupConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl DatasetConfig {
    /// Small dataset for quick runs and tests.
    pub fn small() -> Self {
        Self {
            locations: 6,
            past_festivals: 4,
            future_festivals: 1,
            stages: 10,
            artists: 20,
            groups: 4,
            visitors: 30,
            tickets: 60,
            staff: 20,
            ..Self::standard()
        }
    }

    /// The reference dataset size.
    pub fn standard() -> Self {
        Self {
            seed: 42,
            reference_date: None,
            locations: 10,
            past_festivals: 8,
            future_festivals: 2,
            stages: 30,
            stage_capacity: (8, 10),
            artists: 50,
            groups: 10,
            group_size: (3, 5),
            events_per_festival: (5, 10),
            event_hours: (4, 12),
            visitors: 150,
            tickets: 400,
            staff: 50,
            lineup: LineupConfig::default(),
        }
    }

    /// Larger dataset for load testing queries.
    pub fn large() -> Self {
        Self {
            locations: 24,
            past_festivals: 16,
            future_festivals: 4,
            stages: 90,
            stage_capacity: (40, 120),
            artists: 300,
            groups: 40,
            visitors: 1_500,
            tickets: 6_000,
            staff: 150,
            ..Self::standard()
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "small" => Ok(Self::small()),
            "standard" => Ok(Self::standard()),
            "large" => Ok(Self::large()),
            other => bail!("Unknown preset: {} (expected small, standard or large)", other),
        }
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&text)
                .with_context(|| format!("parsing TOML config {}", path.display()))?,
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("parsing JSON config {}", path.display()))?,
            _ => bail!(
                "Unsupported config format for {} (expected .toml or .json)",
                path.display()
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }

    /// Total festivals across past and future years.
    pub fn festivals(&self) -> usize {
        self.past_festivals + self.future_festivals
    }

    /// Reject configurations the generator cannot satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.locations == 0 {
            bail!("locations must be at least 1");
        }
        if self.festivals() == 0 {
            bail!("at least one past or future festival is required");
        }
        if self.stage_capacity.0 == 0 || self.stage_capacity.0 > self.stage_capacity.1 {
            bail!("stage_capacity must be a positive (min, max) range, got {:?}", self.stage_capacity);
        }
        if self.group_size.0 > self.group_size.1 {
            bail!("group_size has min greater than max: {:?}", self.group_size);
        }
        if self.groups > 0 && self.group_size.1 > self.artists {
            bail!(
                "group_size max {} exceeds the number of artists {}",
                self.group_size.1,
                self.artists
            );
        }
        if self.events_per_festival.0 > self.events_per_festival.1 {
            bail!(
                "events_per_festival has min greater than max: {:?}",
                self.events_per_festival
            );
        }
        if self.event_hours.0 <= 0 || self.event_hours.0 > self.event_hours.1 {
            bail!("event_hours must be a positive (min, max) range, got {:?}", self.event_hours);
        }
        if self.event_hours.1 > MAX_EVENT_HOURS {
            bail!(
                "event_hours may not exceed {} hours, got {:?}",
                MAX_EVENT_HOURS,
                self.event_hours
            );
        }
        self.lineup.validate().context("invalid lineup settings")?;
        Ok(())
    }
}
