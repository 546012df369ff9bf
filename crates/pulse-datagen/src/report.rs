//! Generation report: what was produced and how the lineup engine fared.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pulse_lineup::{CoverageReport, LineupChecks, ScheduleStats};
use serde::Serialize;

use crate::dataset::Dataset;

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub seed: u64,
    /// Continents an artist needs to count as covered.
    pub continent_goal: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Rows per table.
    pub tables: BTreeMap<&'static str, usize>,
    pub schedule: ScheduleStats,
    pub coverage: CoverageReport,
    pub checks: LineupChecks,
}

impl GenerationReport {
    pub fn new(
        seed: u64,
        continent_goal: usize,
        started_at: DateTime<Utc>,
        dataset: &Dataset,
    ) -> Self {
        Self {
            seed,
            continent_goal,
            started_at,
            ended_at: Utc::now(),
            tables: dataset.table_counts(),
            schedule: dataset.schedule.clone(),
            coverage: dataset.coverage.clone(),
            checks: dataset.checks.clone(),
        }
    }

    /// Total rows across all tables.
    pub fn total_rows(&self) -> usize {
        self.tables.values().sum()
    }

    /// Write as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("serializing report")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report {}", path.display()))?;
        Ok(())
    }

    /// One-screen summary for the terminal.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Seed {}: {} rows in {} tables\n",
            self.seed,
            self.total_rows(),
            self.tables.values().filter(|&&n| n > 0).count()
        );
        for (table, rows) in &self.tables {
            out.push_str(&format!("  {:<22} {:>6}\n", table, rows));
        }
        out.push_str(&format!(
            "Schedule: {} of {} events filled, {} performances\n",
            self.schedule.events_filled, self.schedule.events, self.schedule.performances
        ));
        out.push_str(&format!(
            "Coverage: {} -> {} artists on {}+ continents, {} guest slots added{}\n",
            self.coverage.artists_at_goal_before,
            self.coverage.artists_at_goal_after,
            self.continent_goal,
            self.coverage.performances_added,
            if self.coverage.shortfall { " (shortfall)" } else { "" }
        ));
        out.push_str(&format!(
            "Checks: {}\n",
            if self.checks.is_clean() {
                "clean".to_string()
            } else {
                format!("{} violations", self.checks.total())
            }
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let report = GenerationReport::new(11, 3, Utc::now(), &Dataset::default());
        report.save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["seed"], 11);
        assert_eq!(value["tables"]["Performance"], 0);
        assert!(value["coverage"]["shortfall"].is_boolean());
        assert!(report.started_at <= report.ended_at);
    }

    #[test]
    fn test_summary_mentions_checks() {
        let report = GenerationReport::new(1, 3, Utc::now(), &Dataset::default());
        let summary = report.summary();
        assert!(summary.starts_with("Seed 1: 0 rows in 0 tables"));
        assert!(summary.contains("Checks: clean"));
    }
}
