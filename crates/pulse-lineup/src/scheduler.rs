//! Per-event performance scheduler.
//!
//! For each event the scheduler builds the pool of performers that pass the
//! consecutive-year rule for the festival's year, then greedily packs random
//! performances into the event window starting at the opening time.
//!
//! Eligibility is decided once per event. The pool is not reduced after a
//! draw, so the same performer can fill several slots of one event.

use std::collections::HashMap;

use chrono::Duration;
use rand::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::LineupConfig;
use crate::history::PerformanceYearHistory;
use crate::model::{
    Event, Festival, FestivalId, Lineup, PerformanceOrigin, PerformanceType, Performer, Roster,
};

/// Counters from a scheduling pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleStats {
    /// Events visited.
    pub events: usize,
    /// Events that got at least one performance.
    pub events_filled: usize,
    /// Events skipped because nobody was eligible.
    pub events_without_pool: usize,
    /// Events skipped because their festival is unknown.
    pub events_without_festival: usize,
    /// Performances created.
    pub performances: usize,
}

/// What happened while filling one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Performers that passed the streak rule.
    pub pool_size: usize,
    /// Performances the event aimed for, zero when the pool was empty.
    pub target: usize,
    /// Performances actually created.
    pub scheduled: usize,
}

/// Greedy window-packing scheduler.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: LineupConfig,
}

impl Scheduler {
    pub fn new(config: LineupConfig) -> Self {
        Self { config }
    }

    /// Performers eligible for a festival year.
    ///
    /// Solo candidates are artists outside every group; groups are listed
    /// after them with their resolved members.
    pub fn eligible_pool(
        &self,
        year: i32,
        roster: &Roster,
        history: &PerformanceYearHistory,
    ) -> Vec<Performer> {
        let max = self.config.eligibility.max_consecutive_years;

        let solos = roster
            .artists()
            .iter()
            .filter(|aid| !roster.is_grouped(**aid))
            .map(|aid| Performer::Solo(*aid));

        let groups = roster.groups().iter().map(|(gid, members)| Performer::Group {
            id: *gid,
            members: members.clone(),
        });

        solos
            .chain(groups)
            .filter(|performer| history.is_eligible(performer.key(), year, max))
            .collect()
    }

    /// Fill one event with performances.
    ///
    /// Every drawn performer has `year` appended to its history, including
    /// the draw whose duration no longer fits before the deadline.
    pub fn schedule_event<R: Rng>(
        &self,
        event: &Event,
        year: i32,
        roster: &Roster,
        history: &mut PerformanceYearHistory,
        lineup: &mut Lineup,
        rng: &mut R,
    ) -> EventOutcome {
        let pool = self.eligible_pool(year, roster, history);
        if pool.is_empty() {
            debug!(event_id = event.id, year, "No eligible performers");
            return EventOutcome::default();
        }

        let schedule = &self.config.schedule;
        let (min_count, max_count) = schedule.performances_per_event;
        let (min_dur, max_dur) = schedule.duration_minutes;
        let (min_gap, max_gap) = schedule.gap_minutes;

        let target = rng.random_range(min_count..=max_count) as usize;
        let mut cursor = event.date.and_time(schedule.opening_time);
        let deadline = cursor + event.total_duration;
        let mut scheduled = 0;

        while scheduled < target && cursor < deadline {
            let Some(performer) = pool.choose(rng) else {
                break;
            };
            history.record(performer.key(), year);

            let duration = Duration::minutes(rng.random_range(min_dur..=max_dur));
            if cursor + duration > deadline {
                break;
            }

            let kind = PerformanceType::ALL[rng.random_range(0..PerformanceType::ALL.len())];
            lineup.push(
                event,
                cursor,
                duration,
                kind,
                PerformanceOrigin::Scheduled,
                performer,
            );
            scheduled += 1;

            cursor += if scheduled < target {
                duration + Duration::minutes(rng.random_range(min_gap..=max_gap))
            } else {
                duration
            };
        }

        debug!(
            event_id = event.id,
            year,
            pool = pool.len(),
            target,
            scheduled,
            "Scheduled event"
        );
        EventOutcome {
            pool_size: pool.len(),
            target,
            scheduled,
        }
    }

    /// Schedule every event in iteration order.
    ///
    /// History written while scheduling one event is visible to every later
    /// event, regardless of event dates.
    pub fn schedule_all<R: Rng>(
        &self,
        events: &[Event],
        festivals: &[Festival],
        roster: &Roster,
        history: &mut PerformanceYearHistory,
        lineup: &mut Lineup,
        rng: &mut R,
    ) -> ScheduleStats {
        let years: HashMap<FestivalId, i32> =
            festivals.iter().map(|f| (f.id, f.year)).collect();
        let mut stats = ScheduleStats::default();

        for event in events {
            stats.events += 1;

            let Some(&year) = years.get(&event.festival_id) else {
                warn!(
                    event_id = event.id,
                    festival_id = event.festival_id,
                    "Event references unknown festival, skipping"
                );
                stats.events_without_festival += 1;
                continue;
            };

            let outcome = self.schedule_event(event, year, roster, history, lineup, rng);
            if outcome.pool_size == 0 {
                stats.events_without_pool += 1;
            }
            if outcome.scheduled > 0 {
                stats.events_filled += 1;
            }
            stats.performances += outcome.scheduled;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::longest_streak;
    use crate::model::{ArtistGroupMember, PerformerKey};
    use chrono::NaiveDate;
    use rand_chacha::ChaCha8Rng;

    fn event(id: u32, festival_id: u32, hours: i64) -> Event {
        Event {
            id,
            festival_id,
            stage_id: 1,
            date: NaiveDate::from_ymd_opt(2021, 7, 10).unwrap(),
            total_duration: Duration::hours(hours),
        }
    }

    fn roster() -> Roster {
        let membership = vec![
            ArtistGroupMember { group_id: 1, artist_id: 1 },
            ArtistGroupMember { group_id: 1, artist_id: 2 },
            ArtistGroupMember { group_id: 1, artist_id: 3 },
        ];
        Roster::new((1..=6).collect(), &[1], &membership)
    }

    #[test]
    fn test_pool_excludes_grouped_artists() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let history = PerformanceYearHistory::new();
        let pool = scheduler.eligible_pool(2021, &roster(), &history);

        let keys: Vec<PerformerKey> = pool.iter().map(Performer::key).collect();
        assert_eq!(
            keys,
            vec![
                PerformerKey::Artist(4),
                PerformerKey::Artist(5),
                PerformerKey::Artist(6),
                PerformerKey::Group(1),
            ]
        );
    }

    #[test]
    fn test_streak_artist_excluded_then_readmitted() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let mut history = PerformanceYearHistory::new();
        for year in [2018, 2019, 2020] {
            history.record(PerformerKey::Artist(4), year);
        }

        let pool_2021 = scheduler.eligible_pool(2021, &roster(), &history);
        assert!(!pool_2021.contains(&Performer::Solo(4)));

        let pool_2023 = scheduler.eligible_pool(2023, &roster(), &history);
        assert!(pool_2023.contains(&Performer::Solo(4)));
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let mut history = PerformanceYearHistory::new();
        let mut lineup = Lineup::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = scheduler.schedule_event(
            &event(1, 1, 6),
            2021,
            &Roster::default(),
            &mut history,
            &mut lineup,
            &mut rng,
        );
        assert_eq!(outcome, EventOutcome::default());
        assert!(lineup.is_empty());
    }

    #[test]
    fn test_year_recorded_when_slot_overflows() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let roster = Roster::new(vec![1], &[], &[]);
        let mut history = PerformanceYearHistory::new();
        let mut lineup = Lineup::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Shorter than the minimum performance length
        let short = Event {
            total_duration: Duration::minutes(20),
            ..event(1, 1, 1)
        };

        let outcome =
            scheduler.schedule_event(&short, 2021, &roster, &mut history, &mut lineup, &mut rng);

        assert!(lineup.is_empty());
        assert_eq!(outcome.scheduled, 0);
        assert_eq!(outcome.pool_size, 1);
        assert_eq!(history.years(PerformerKey::Artist(1)), &[2021]);
    }

    #[test]
    fn test_performances_stay_inside_window_without_overlap() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let roster = roster();

        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut history = PerformanceYearHistory::new();
            let mut lineup = Lineup::new();
            let ev = event(1, 1, 4);

            let outcome =
                scheduler.schedule_event(&ev, 2021, &roster, &mut history, &mut lineup, &mut rng);
            assert!(outcome.scheduled <= outcome.target);
            assert!(outcome.target <= 5);

            let opening = ev.date.and_hms_opt(18, 0, 0).unwrap();
            let deadline = opening + ev.total_duration;
            let mut previous_end = opening;
            for perf in lineup.for_event(ev.id) {
                assert!(perf.start_time >= previous_end, "seed {} overlaps", seed);
                assert!(perf.end_time() <= deadline, "seed {} overruns", seed);
                assert!(perf.duration >= Duration::minutes(30));
                assert!(perf.duration <= Duration::minutes(120));
                previous_end = perf.end_time();
            }
        }
    }

    #[test]
    fn test_first_slot_opens_at_six() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut history = PerformanceYearHistory::new();
        let mut lineup = Lineup::new();
        let ev = event(3, 1, 12);

        scheduler.schedule_event(&ev, 2021, &roster(), &mut history, &mut lineup, &mut rng);

        let first = lineup.for_event(3).next().unwrap();
        assert_eq!(first.start_time, ev.date.and_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn test_long_event_reaches_target_count() {
        // 12h always fits five slots of at most 120 + 30 minutes
        let scheduler = Scheduler::new(LineupConfig::default());
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut history = PerformanceYearHistory::new();
            let mut lineup = Lineup::new();
            let outcome = scheduler.schedule_event(
                &event(1, 1, 12),
                2021,
                &roster(),
                &mut history,
                &mut lineup,
                &mut rng,
            );
            assert_eq!(outcome.scheduled, outcome.target);
            assert!((3..=5).contains(&outcome.scheduled));
        }
    }

    #[test]
    fn test_group_slots_fan_out_to_members() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let roster = roster();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut history = PerformanceYearHistory::new();
        let mut lineup = Lineup::new();
        let events: Vec<Event> = (1..=20).map(|id| event(id, 1, 12)).collect();
        let festivals = vec![Festival { id: 1, year: 2021, location_id: 1 }];

        scheduler.schedule_all(&events, &festivals, &roster, &mut history, &mut lineup, &mut rng);

        for member in &lineup.members {
            if let Some(gid) = member.group_id {
                assert!(roster.members_of(gid).contains(&member.artist_id));
            } else {
                assert!(!roster.is_grouped(member.artist_id));
            }
        }
    }

    #[test]
    fn test_history_enforced_across_festival_years() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let roster = roster();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut history = PerformanceYearHistory::new();
        let mut lineup = Lineup::new();

        let festivals: Vec<Festival> = (0..8)
            .map(|i| Festival { id: i + 1, year: 2015 + i as i32, location_id: 1 })
            .collect();
        let events: Vec<Event> = (0..24).map(|i| event(i + 1, i % 8 + 1, 8)).collect();

        let stats =
            scheduler.schedule_all(&events, &festivals, &roster, &mut history, &mut lineup, &mut rng);
        assert_eq!(stats.events, 24);

        for key in [
            PerformerKey::Artist(4),
            PerformerKey::Artist(5),
            PerformerKey::Artist(6),
            PerformerKey::Group(1),
        ] {
            assert!(longest_streak(history.years(key)) <= 3, "{} broke the streak rule", key);
        }
    }

    #[test]
    fn test_unknown_festival_counted() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut history = PerformanceYearHistory::new();
        let mut lineup = Lineup::new();

        let stats = scheduler.schedule_all(
            &[event(1, 99, 6)],
            &[],
            &roster(),
            &mut history,
            &mut lineup,
            &mut rng,
        );
        assert_eq!(stats.events_without_festival, 1);
        assert!(lineup.is_empty());
    }

    #[test]
    fn test_same_seed_same_lineup() {
        let scheduler = Scheduler::new(LineupConfig::default());
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut history = PerformanceYearHistory::new();
            let mut lineup = Lineup::new();
            scheduler.schedule_event(&event(1, 1, 10), 2021, &roster(), &mut history, &mut lineup, &mut rng);
            lineup
                .performances
                .iter()
                .map(|p| (p.start_time, p.duration, p.kind))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
