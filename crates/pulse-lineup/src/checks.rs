//! Post-generation audit of a lineup.
//!
//! Counts violations of the lineup invariants instead of failing, so the
//! caller can log or report them. Coverage-repair performances are exempt
//! from the streak and overlap checks.

use std::collections::HashMap;

use serde::Serialize;

use crate::history::longest_streak;
use crate::model::{
    Event, EventId, Festival, FestivalId, Lineup, Performance, PerformanceId, PerformanceOrigin,
    PerformerKey, Roster,
};

/// Violation counts for a lineup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineupChecks {
    /// Performers whose scheduled years contain a run longer than allowed.
    pub streak_violations: usize,
    /// Pairs of scheduled performances in one event that overlap.
    pub overlaps: usize,
    /// Scheduled performances starting before the opening time or ending after the deadline.
    pub out_of_window: usize,
    /// Group member rows whose artist is not in the group.
    pub foreign_members: usize,
    /// Member rows or performances with a dangling reference.
    pub dangling_references: usize,
}

impl LineupChecks {
    /// Total violations across all checks.
    pub fn total(&self) -> usize {
        self.streak_violations
            + self.overlaps
            + self.out_of_window
            + self.foreign_members
            + self.dangling_references
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Audit `lineup` against the events, festivals and roster it was built from.
    pub fn run(
        lineup: &Lineup,
        events: &[Event],
        festivals: &[Festival],
        roster: &Roster,
        opening_time: chrono::NaiveTime,
        max_consecutive_years: usize,
    ) -> Self {
        let mut checks = Self::default();

        let events_by_id: HashMap<EventId, &Event> = events.iter().map(|e| (e.id, e)).collect();
        let years: HashMap<FestivalId, i32> = festivals.iter().map(|f| (f.id, f.year)).collect();
        let performances: HashMap<PerformanceId, &Performance> =
            lineup.performances.iter().map(|p| (p.id, p)).collect();

        // Window and overlap, scheduled performances only
        let mut by_event: HashMap<EventId, Vec<&Performance>> = HashMap::new();
        for perf in &lineup.performances {
            let Some(event) = events_by_id.get(&perf.event_id) else {
                checks.dangling_references += 1;
                continue;
            };
            if perf.origin != PerformanceOrigin::Scheduled {
                continue;
            }

            let opening = event.date.and_time(opening_time);
            if perf.start_time < opening || perf.end_time() > opening + event.total_duration {
                checks.out_of_window += 1;
            }
            by_event.entry(perf.event_id).or_default().push(perf);
        }
        for slots in by_event.values_mut() {
            slots.sort_by_key(|p| p.start_time);
            checks.overlaps += slots
                .windows(2)
                .filter(|pair| pair[1].start_time < pair[0].end_time())
                .count();
        }

        // Membership and streaks
        let mut performer_years: HashMap<PerformerKey, Vec<i32>> = HashMap::new();
        for member in &lineup.members {
            let Some(perf) = performances.get(&member.performance_id) else {
                checks.dangling_references += 1;
                continue;
            };

            let key = match member.group_id {
                Some(group_id) => {
                    if !roster.members_of(group_id).contains(&member.artist_id) {
                        checks.foreign_members += 1;
                    }
                    PerformerKey::Group(group_id)
                }
                None => PerformerKey::Artist(member.artist_id),
            };

            if perf.origin != PerformanceOrigin::Scheduled {
                continue;
            }
            let year = events_by_id
                .get(&perf.event_id)
                .and_then(|e| years.get(&e.festival_id));
            if let Some(year) = year {
                performer_years.entry(key).or_default().push(*year);
            }
        }
        checks.streak_violations = performer_years
            .values()
            .filter(|years| longest_streak(years) > max_consecutive_years)
            .count();

        checks
    }
}
