//! Continent-coverage repair pass.
//!
//! After scheduling, a bounded number of artists that have played on fewer
//! than the required number of continents are booked as special guests at
//! festivals on the continents they are missing.
//!
//! Repair slots skip the streak rule and the overlap check. They exist only
//! to widen coverage and never touch the year history.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Duration;
use rand::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LineupConfig;
use crate::model::{
    ArtistId, Continent, Event, EventId, Festival, FestivalId, Lineup, Location, LocationId,
    PerformanceId, PerformanceOrigin, PerformanceType, Performer,
};

/// Continents each artist has performed on.
pub type ArtistContinents = BTreeMap<ArtistId, BTreeSet<Continent>>;

/// Outcome of a repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Artists already at the continent goal before repair.
    pub artists_at_goal_before: usize,
    /// Artists below the goal before repair.
    pub candidates: usize,
    /// Artists picked for repair, in processing order.
    pub selected: Vec<ArtistId>,
    /// Repair performances appended to the lineup.
    pub performances_added: usize,
    /// Artists at the continent goal after repair.
    pub artists_at_goal_after: usize,
    /// Fewer candidates existed than the configured target.
    pub shortfall: bool,
}

/// Map every festival to the continent of its location.
///
/// Festivals whose location is unknown are left out.
pub fn festival_continents(
    festivals: &[Festival],
    locations: &[Location],
) -> HashMap<FestivalId, Continent> {
    let by_location: HashMap<LocationId, Continent> =
        locations.iter().map(|l| (l.id, l.continent)).collect();

    festivals
        .iter()
        .filter_map(|f| match by_location.get(&f.location_id) {
            Some(continent) => Some((f.id, *continent)),
            None => {
                warn!(
                    festival_id = f.id,
                    location_id = f.location_id,
                    "Festival location is unknown"
                );
                None
            }
        })
        .collect()
}

/// Resolve every member row to a continent via performance, event and festival.
pub fn artist_continents(
    lineup: &Lineup,
    events: &[Event],
    continents: &HashMap<FestivalId, Continent>,
) -> ArtistContinents {
    let event_of: HashMap<PerformanceId, EventId> =
        lineup.performances.iter().map(|p| (p.id, p.event_id)).collect();
    let festival_of: HashMap<EventId, FestivalId> =
        events.iter().map(|e| (e.id, e.festival_id)).collect();

    let mut covered = ArtistContinents::new();
    for member in &lineup.members {
        let continent = event_of
            .get(&member.performance_id)
            .and_then(|eid| festival_of.get(eid))
            .and_then(|fid| continents.get(fid));

        if let Some(continent) = continent {
            covered.entry(member.artist_id).or_default().insert(*continent);
        }
    }
    covered
}

/// Count artists that reached `min_continents`.
pub fn artists_at_goal(covered: &ArtistContinents, min_continents: usize) -> usize {
    covered
        .values()
        .filter(|set| set.len() >= min_continents)
        .count()
}

/// Books under-covered artists onto festivals on missing continents.
#[derive(Debug, Clone)]
pub struct CoverageRepairer {
    config: LineupConfig,
}

impl CoverageRepairer {
    pub fn new(config: LineupConfig) -> Self {
        Self { config }
    }

    /// Append repair performances to `lineup`.
    ///
    /// Candidates are artists with at least one performance that are below
    /// the goal, taken in id order, then shuffled and truncated to the
    /// configured target. A missing continent whose drawn festival has no
    /// events is skipped.
    pub fn repair<R: Rng>(
        &self,
        lineup: &mut Lineup,
        events: &[Event],
        festivals: &[Festival],
        locations: &[Location],
        rng: &mut R,
    ) -> CoverageReport {
        let coverage = &self.config.coverage;
        let goal = coverage.min_continents;

        let continents = festival_continents(festivals, locations);
        let mut covered = artist_continents(lineup, events, &continents);
        let artists_at_goal_before = artists_at_goal(&covered, goal);

        let mut selected: Vec<ArtistId> = covered
            .iter()
            .filter(|(_, set)| set.len() < goal)
            .map(|(aid, _)| *aid)
            .collect();
        let candidates = selected.len();
        selected.shuffle(rng);
        selected.truncate(coverage.target_artists);

        let shortfall = candidates < coverage.target_artists;
        if shortfall {
            warn!(
                candidates,
                target = coverage.target_artists,
                "Fewer under-covered artists than the coverage target"
            );
        }

        let mut festivals_on: BTreeMap<Continent, Vec<FestivalId>> = BTreeMap::new();
        for festival in festivals {
            if let Some(continent) = continents.get(&festival.id) {
                festivals_on.entry(*continent).or_default().push(festival.id);
            }
        }
        let mut events_of: HashMap<FestivalId, Vec<&Event>> = HashMap::new();
        for event in events {
            events_of.entry(event.festival_id).or_default().push(event);
        }

        let duration = Duration::minutes(coverage.guest_duration_minutes);
        let mut performances_added = 0;

        for &artist_id in &selected {
            let have = covered.get(&artist_id).cloned().unwrap_or_default();
            let needed = goal.saturating_sub(have.len());
            let missing: Vec<Continent> = festivals_on
                .keys()
                .filter(|c| !have.contains(c))
                .copied()
                .take(needed)
                .collect();

            for continent in missing {
                let Some(&festival_id) = festivals_on.get(&continent).and_then(|f| f.choose(rng))
                else {
                    continue;
                };
                let Some(event) = events_of
                    .get(&festival_id)
                    .and_then(|evts| evts.choose(rng))
                else {
                    debug!(
                        artist_id,
                        festival_id,
                        continent = %continent,
                        "Festival has no events, skipping continent"
                    );
                    continue;
                };

                let id = lineup.push(
                    event,
                    event.date.and_time(coverage.guest_start_time),
                    duration,
                    PerformanceType::SpecialGuest,
                    PerformanceOrigin::CoverageRepair,
                    &Performer::Solo(artist_id),
                );
                covered.entry(artist_id).or_default().insert(continent);
                performances_added += 1;

                debug!(
                    artist_id,
                    performance_id = id,
                    event_id = event.id,
                    continent = %continent,
                    "Booked coverage guest slot"
                );
            }
        }

        let report = CoverageReport {
            artists_at_goal_before,
            candidates,
            selected,
            performances_added,
            artists_at_goal_after: artists_at_goal(&covered, goal),
            shortfall,
        };

        info!(
            before = report.artists_at_goal_before,
            after = report.artists_at_goal_after,
            added = report.performances_added,
            "Continent coverage repaired"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand_chacha::ChaCha8Rng;

    fn locations() -> Vec<Location> {
        vec![
            Location { id: 1, continent: Continent::Europe },
            Location { id: 2, continent: Continent::Asia },
            Location { id: 3, continent: Continent::Africa },
            Location { id: 4, continent: Continent::Australia },
        ]
    }

    fn festivals() -> Vec<Festival> {
        (1..=4)
            .map(|i| Festival { id: i, year: 2016 + i as i32, location_id: i })
            .collect()
    }

    fn events() -> Vec<Event> {
        (1..=4)
            .map(|i| Event {
                id: i,
                festival_id: i,
                stage_id: i,
                date: NaiveDate::from_ymd_opt(2016 + i as i32, 5, 1).unwrap(),
                total_duration: Duration::hours(6),
            })
            .collect()
    }

    fn book(lineup: &mut Lineup, event: &Event, artist_id: ArtistId) {
        let start = event.date.and_hms_opt(18, 0, 0).unwrap();
        lineup.push(
            event,
            start,
            Duration::minutes(45),
            PerformanceType::Headline,
            PerformanceOrigin::Scheduled,
            &Performer::Solo(artist_id),
        );
    }

    #[test]
    fn test_artist_continents_resolves_chain() {
        let events = events();
        let mut lineup = Lineup::new();
        book(&mut lineup, &events[0], 1);
        book(&mut lineup, &events[1], 1);
        book(&mut lineup, &events[1], 2);

        let continents = festival_continents(&festivals(), &locations());
        let covered = artist_continents(&lineup, &events, &continents);

        assert_eq!(covered[&1].len(), 2);
        assert_eq!(covered[&2], BTreeSet::from([Continent::Asia]));
    }

    #[test]
    fn test_repair_brings_artists_to_three_continents() {
        let events = events();
        let mut lineup = Lineup::new();
        book(&mut lineup, &events[0], 1);
        book(&mut lineup, &events[0], 2);

        let repairer = CoverageRepairer::new(LineupConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let report = repairer.repair(
            &mut lineup,
            &events,
            &festivals(),
            &locations(),
            &mut rng,
        );

        assert_eq!(report.candidates, 2);
        assert!(report.shortfall);
        assert_eq!(report.performances_added, 4);
        assert_eq!(report.artists_at_goal_after, 2);

        let continents = festival_continents(&festivals(), &locations());
        let covered = artist_continents(&lineup, &events, &continents);
        assert!(covered.values().all(|set| set.len() >= 3));
    }

    #[test]
    fn test_repair_slots_are_fixed_special_guest() {
        let events = events();
        let mut lineup = Lineup::new();
        book(&mut lineup, &events[0], 5);
        let repairer = CoverageRepairer::new(LineupConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        repairer.repair(&mut lineup, &events, &festivals(), &locations(), &mut rng);

        assert_eq!(lineup.len(), 3);
        for perf in &lineup.performances[1..] {
            let event = events.iter().find(|e| e.id == perf.event_id).unwrap();
            assert_eq!(perf.kind, PerformanceType::SpecialGuest);
            assert_eq!(perf.origin, PerformanceOrigin::CoverageRepair);
            assert_eq!(perf.duration, Duration::minutes(60));
            assert_eq!(perf.start_time, event.date.and_hms_opt(20, 0, 0).unwrap());
            assert_eq!(perf.stage_id, event.stage_id);
        }
        assert!(lineup.members.iter().all(|m| m.artist_id == 5 && m.group_id.is_none()));
    }

    #[test]
    fn test_artist_already_at_goal_untouched() {
        let events = events();
        let mut lineup = Lineup::new();
        for event in &events[..3] {
            book(&mut lineup, event, 7);
        }
        let before = lineup.len();

        let repairer = CoverageRepairer::new(LineupConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = repairer.repair(
            &mut lineup,
            &events,
            &festivals(),
            &locations(),
            &mut rng,
        );

        assert_eq!(report.candidates, 0);
        assert!(report.selected.is_empty());
        assert_eq!(report.artists_at_goal_before, 1);
        assert_eq!(lineup.len(), before);
    }

    #[test]
    fn test_selection_capped_at_target() {
        let events = events();
        let mut lineup = Lineup::new();
        for artist_id in 1..=12 {
            book(&mut lineup, &events[0], artist_id);
        }

        let repairer = CoverageRepairer::new(LineupConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let report = repairer.repair(
            &mut lineup,
            &events,
            &festivals(),
            &locations(),
            &mut rng,
        );

        assert_eq!(report.candidates, 12);
        assert_eq!(report.selected.len(), 5);
        assert!(!report.shortfall);
        assert_eq!(report.artists_at_goal_after, 5);
    }

    #[test]
    fn test_continent_without_events_is_skipped() {
        // Festival 4 (Australia) has no events
        let events: Vec<Event> = events().into_iter().take(3).collect();
        let mut lineup = Lineup::new();
        book(&mut lineup, &events[0], 1);
        book(&mut lineup, &events[1], 1);

        let repairer = CoverageRepairer::new(LineupConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut locations = locations();
        // Move Africa off the map so the only missing continent is eventless
        locations[2].continent = Continent::Europe;

        let report = repairer.repair(&mut lineup, &events, &festivals(), &locations, &mut rng);

        assert_eq!(report.performances_added, 0);
        assert_eq!(report.artists_at_goal_after, 0);
    }

    #[test]
    fn test_unreachable_goal_is_best_effort() {
        // Only two continents host festivals
        let locations = vec![
            Location { id: 1, continent: Continent::Europe },
            Location { id: 2, continent: Continent::Asia },
        ];
        let festivals: Vec<Festival> = festivals().into_iter().take(2).collect();
        let events: Vec<Event> = events().into_iter().take(2).collect();
        let mut lineup = Lineup::new();
        for artist_id in 1..=3 {
            book(&mut lineup, &events[0], artist_id);
        }

        let repairer = CoverageRepairer::new(LineupConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let report = repairer.repair(&mut lineup, &events, &festivals, &locations, &mut rng);

        // Each artist can only add Asia
        assert_eq!(report.performances_added, 3);
        assert_eq!(report.artists_at_goal_after, 0);
    }

    #[test]
    fn test_artists_without_performances_not_candidates() {
        let events = events();
        let mut lineup = Lineup::new();
        book(&mut lineup, &events[0], 1);

        let repairer = CoverageRepairer::new(LineupConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let report = repairer.repair(&mut lineup, &events, &festivals(), &locations(), &mut rng);

        assert_eq!(report.candidates, 1);
        assert_eq!(report.selected, vec![1]);
        assert!(report.shortfall);
        assert_eq!(report.performances_added, 2);
        assert!(lineup.members.iter().all(|m| m.artist_id == 1));
    }
}
