//! Dataset generator.
//!
//! Produces every table in dependency order from one seeded random source,
//! handing the lineup tables to the [`LineupEngine`].

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use pulse_lineup::{
    ArtistGroupMember, ArtistId, Continent, Event, Festival, GroupId, LineupEngine, LineupInputs,
    Location, Roster, Stage,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use uuid::{Builder, Uuid};

use crate::audience;
use crate::config::DatasetConfig;
use crate::dataset::Dataset;
use crate::rows::{
    ArtistGenre, ArtistRow, Equipment, FestivalRow, Genre, GroupRow, LocationRow, StageEquipment,
    StageRow,
};
use crate::staffing;
use crate::words;

const EQUIPMENT_TYPES: [&str; 5] = ["Speakers", "Lights", "Microphones", "Consoles", "Effects"];

const GENRES: [(&str, &str); 5] = [
    ("Rock", "Hard Rock"),
    ("Jazz", "Bebop"),
    ("Pop", "Synthpop"),
    ("Electronic", "Techno"),
    ("Hip Hop", "Trap"),
];

/// Redraws of a stage name before falling back to an id suffix.
const STAGE_NAME_ATTEMPTS: usize = 100;
/// Redraws of an event's (stage, date) pair before the event is dropped.
const EVENT_SLOT_ATTEMPTS: usize = 100;

/// `date` moved back by whole years, clamped to month end.
fn years_before(date: NaiveDate, years: u32) -> Result<NaiveDate> {
    date.checked_sub_months(Months::new(years * 12))
        .with_context(|| format!("{} minus {} years is out of range", date, years))
}

fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.random()).into_uuid()
}

/// Generates a complete festival dataset.
pub struct DatasetGenerator {
    config: DatasetConfig,
    rng: ChaCha8Rng,
    now: NaiveDateTime,
}

impl DatasetGenerator {
    /// Create a generator seeded from `config.seed`.
    ///
    /// "Now" is noon on the configured reference date, or the current UTC
    /// time when none is set.
    pub fn new(config: DatasetConfig) -> Result<Self> {
        config.validate()?;
        let now = match config.reference_date {
            Some(date) => date
                .and_hms_opt(12, 0, 0)
                .context("building reference time")?,
            None => Utc::now().naive_utc(),
        };

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            now,
        })
    }

    /// Generate every table.
    pub fn generate(&mut self) -> Result<Dataset> {
        let mut dataset = Dataset {
            locations: self.generate_locations(),
            ..Dataset::default()
        };
        dataset.festivals = self.generate_festivals(&dataset.locations);
        dataset.stages = self.generate_stages(&dataset.festivals);
        dataset.equipment = Self::generate_equipment();
        dataset.stage_equipment = self.generate_stage_equipment(&dataset.stages, &dataset.equipment);
        info!(
            locations = dataset.locations.len(),
            festivals = dataset.festivals.len(),
            stages = dataset.stages.len(),
            "Generated venues"
        );

        dataset.artists = self.generate_artists()?;
        dataset.groups = self.generate_groups()?;
        dataset.group_members = self.assign_group_members(&dataset.groups, &dataset.artists);
        dataset.genres = Self::generate_genres();
        dataset.artist_genres = self.assign_genres(&dataset.artists, &dataset.genres);
        info!(
            artists = dataset.artists.len(),
            groups = dataset.groups.len(),
            memberships = dataset.group_members.len(),
            "Generated performers"
        );

        dataset.events = self.generate_events(&dataset.festivals, &dataset.stages)?;
        info!(events = dataset.events.len(), "Generated events");

        self.run_lineup(&mut dataset)?;

        let capacities = dataset.stage_capacities();
        dataset.visitors = audience::generate_visitors(&mut self.rng, self.config.visitors);
        let sales = audience::sell_tickets(
            &mut self.rng,
            self.config.tickets,
            &dataset.visitors,
            &dataset.events,
            &capacities,
            self.now,
        );
        dataset.tickets = sales.tickets;
        dataset.resale_interest = sales.resale_interest;
        dataset.reviews =
            audience::generate_reviews(&mut self.rng, &dataset.tickets, &dataset.performances);

        dataset.staff = staffing::generate_staff(&mut self.rng, self.config.staff);
        dataset.staff_assignments =
            staffing::assign_staff(&mut self.rng, &dataset.staff, &dataset.events, &capacities);
        info!(
            visitors = dataset.visitors.len(),
            reviews = dataset.reviews.len(),
            staff = dataset.staff.len(),
            assignments = dataset.staff_assignments.len(),
            "Generated audience and staff"
        );

        Ok(dataset)
    }

    /// Schedule performances and repair continent coverage.
    fn run_lineup(&mut self, dataset: &mut Dataset) -> Result<()> {
        let locations: Vec<Location> = dataset.locations.iter().map(|r| r.location.clone()).collect();
        let festivals: Vec<Festival> = dataset.festivals.iter().map(|r| r.festival.clone()).collect();
        let artist_ids: Vec<ArtistId> = dataset.artists.iter().map(|a| a.id).collect();
        let group_ids: Vec<GroupId> = dataset.groups.iter().map(|g| g.id).collect();
        let roster = Roster::new(artist_ids, &group_ids, &dataset.group_members);

        let engine = LineupEngine::new(self.config.lineup.clone())?;
        let outcome = engine.run(
            &LineupInputs {
                locations: &locations,
                festivals: &festivals,
                events: &dataset.events,
                roster: &roster,
            },
            &mut self.rng,
        );

        dataset.performances = outcome.lineup.performances;
        dataset.performance_members = outcome.lineup.members;
        dataset.schedule = outcome.schedule;
        dataset.coverage = outcome.coverage;
        dataset.checks = outcome.checks;
        Ok(())
    }

    /// One location per continent first, then random continents.
    fn generate_locations(&mut self) -> Vec<LocationRow> {
        let mut rows = Vec::with_capacity(self.config.locations);
        for i in 0..self.config.locations {
            let continent = match Continent::ALL.get(i) {
                Some(c) => *c,
                None => Continent::ALL[self.rng.random_range(0..Continent::ALL.len())],
            };
            rows.push(LocationRow {
                location: Location {
                    id: i as u32 + 1,
                    continent,
                },
                address: words::street_address(&mut self.rng),
                latitude: words::latitude(&mut self.rng),
                longitude: words::longitude(&mut self.rng),
                city: words::city(&mut self.rng),
                country: words::country(&mut self.rng),
            });
        }
        rows
    }

    /// Past editions counting back from the reference year, then future ones.
    fn generate_festivals(&mut self, locations: &[LocationRow]) -> Vec<FestivalRow> {
        let current = self.now.year();
        let past = (1..=self.config.past_festivals as i32).map(|i| current - i);
        let future = (1..=self.config.future_festivals as i32).map(|i| current + i);
        let years: Vec<i32> = past.chain(future).collect();

        let mut rows = Vec::with_capacity(years.len());
        for (i, year) in years.into_iter().enumerate() {
            let id = i as u32 + 1;
            let location_id = locations
                .choose(&mut self.rng)
                .map(|l| l.location.id)
                .unwrap_or(1);
            rows.push(FestivalRow {
                festival: Festival {
                    id,
                    year,
                    location_id,
                },
                name: format!("Pulse University {}", year),
                duration_days: self.rng.random_range(1..=7),
                poster_image: format!("poster_{}.jpg", id),
                description: words::sentence(&mut self.rng),
            });
        }
        rows
    }

    fn generate_stages(&mut self, festivals: &[FestivalRow]) -> Vec<StageRow> {
        let (min_cap, max_cap) = self.config.stage_capacity;
        let mut used_names: HashSet<String> = HashSet::new();
        let mut rows = Vec::with_capacity(self.config.stages);

        for i in 0..self.config.stages {
            let id = i as u32 + 1;
            let mut name = None;
            for _ in 0..STAGE_NAME_ATTEMPTS {
                let candidate = format!(
                    "{} {}",
                    words::color_name(&mut self.rng),
                    words::street_suffix(&mut self.rng)
                );
                if used_names.insert(candidate.clone()) {
                    name = Some(candidate);
                    break;
                }
            }
            let name = name.unwrap_or_else(|| format!("Stage {}", id));

            let festival_id = festivals
                .choose(&mut self.rng)
                .map(|f| f.festival.id)
                .unwrap_or(1);
            rows.push(StageRow {
                stage: Stage {
                    id,
                    festival_id,
                    capacity: self.rng.random_range(min_cap..=max_cap),
                },
                name,
                description: words::sentence(&mut self.rng),
                image: format!("stage_{}.jpg", random_uuid(&mut self.rng)),
            });
        }
        rows
    }

    fn generate_equipment() -> Vec<Equipment> {
        EQUIPMENT_TYPES
            .iter()
            .enumerate()
            .map(|(i, kind)| Equipment {
                id: i as u32 + 1,
                kind: kind.to_string(),
                description: format!("Professional {} for stage use", kind),
                image: format!("{}.jpg", kind.to_lowercase()),
            })
            .collect()
    }

    fn generate_stage_equipment(
        &mut self,
        stages: &[StageRow],
        equipment: &[Equipment],
    ) -> Vec<StageEquipment> {
        let max_items = equipment.len().min(6);
        let min_items = max_items.min(3);
        let mut rows = Vec::new();

        for stage in stages {
            let count = self.rng.random_range(min_items..=max_items);
            let picked: Vec<u32> = equipment
                .choose_multiple(&mut self.rng, count)
                .map(|e| e.id)
                .collect();
            for equipment_id in picked {
                rows.push(StageEquipment {
                    stage_id: stage.stage.id,
                    equipment_id,
                    quantity: self.rng.random_range(1..=10),
                });
            }
        }
        rows
    }

    /// Artists aged 18 to 60 on the reference date.
    fn generate_artists(&mut self) -> Result<Vec<ArtistRow>> {
        let today = self.now.date();
        let oldest = years_before(today, 61)? + Duration::days(1);
        let youngest = years_before(today, 18)?;

        let mut rows = Vec::with_capacity(self.config.artists);
        for i in 0..self.config.artists {
            let id = i as u32 + 1;
            rows.push(ArtistRow {
                id,
                name: words::full_name(&mut self.rng),
                stage_name: words::user_name(&mut self.rng),
                dob: words::date_between(&mut self.rng, oldest, youngest),
                website: words::url(&mut self.rng),
                instagram: format!("@{}", words::user_name(&mut self.rng)),
                photo: format!("artist_{}.jpg", id),
            });
        }
        Ok(rows)
    }

    fn generate_groups(&mut self) -> Result<Vec<GroupRow>> {
        let today = self.now.date();
        let earliest = years_before(today, 20)?;

        let mut rows = Vec::with_capacity(self.config.groups);
        for i in 0..self.config.groups {
            rows.push(GroupRow {
                id: i as u32 + 1,
                name: words::company(&mut self.rng),
                formation_date: words::date_between(&mut self.rng, earliest, today),
                website: words::url(&mut self.rng),
                photo: GroupRow::photo_for(random_uuid(&mut self.rng)),
            });
        }
        Ok(rows)
    }

    /// Distinct members per group, sampled from all artists. An artist may
    /// join several groups.
    fn assign_group_members(
        &mut self,
        groups: &[GroupRow],
        artists: &[ArtistRow],
    ) -> Vec<ArtistGroupMember> {
        let (min_size, max_size) = self.config.group_size;
        let mut rows = Vec::new();

        for group in groups {
            let size = self.rng.random_range(min_size..=max_size).min(artists.len());
            let members: Vec<ArtistId> = artists
                .choose_multiple(&mut self.rng, size)
                .map(|a| a.id)
                .collect();
            rows.extend(members.into_iter().map(|artist_id| ArtistGroupMember {
                group_id: group.id,
                artist_id,
            }));
        }
        rows
    }

    fn generate_genres() -> Vec<Genre> {
        GENRES
            .iter()
            .enumerate()
            .map(|(i, (name, subgenre))| Genre {
                id: i as u32 + 1,
                name: name.to_string(),
                subgenre: subgenre.to_string(),
            })
            .collect()
    }

    fn assign_genres(&mut self, artists: &[ArtistRow], genres: &[Genre]) -> Vec<ArtistGenre> {
        let max_genres = genres.len().min(3);
        let mut rows = Vec::new();

        for artist in artists {
            let count = self.rng.random_range(max_genres.min(1)..=max_genres);
            let picked: Vec<u32> = genres
                .choose_multiple(&mut self.rng, count)
                .map(|g| g.id)
                .collect();
            rows.extend(picked.into_iter().map(|genre_id| ArtistGenre {
                artist_id: artist.id,
                genre_id,
            }));
        }
        rows
    }

    /// Events for every festival that has stages.
    ///
    /// Dates fall within the festival year and a (stage, date) pair is used
    /// at most once.
    fn generate_events(
        &mut self,
        festivals: &[FestivalRow],
        stages: &[StageRow],
    ) -> Result<Vec<Event>> {
        let (min_events, max_events) = self.config.events_per_festival;
        let (min_hours, max_hours) = self.config.event_hours;
        let mut events = Vec::new();

        for festival in festivals {
            let festival = &festival.festival;
            let festival_stages: Vec<u32> = stages
                .iter()
                .filter(|s| s.stage.festival_id == festival.id)
                .map(|s| s.stage.id)
                .collect();
            if festival_stages.is_empty() {
                debug!(festival_id = festival.id, "Festival has no stages, no events");
                continue;
            }

            let first_day = NaiveDate::from_ymd_opt(festival.year, 1, 1)
                .with_context(|| format!("no January 1st in year {}", festival.year))?;
            let last_day = NaiveDate::from_ymd_opt(festival.year, 12, 31)
                .with_context(|| format!("no December 31st in year {}", festival.year))?;

            let mut used: HashSet<(u32, NaiveDate)> = HashSet::new();
            let count = self.rng.random_range(min_events..=max_events);

            for _ in 0..count {
                let mut slot = None;
                for _ in 0..EVENT_SLOT_ATTEMPTS {
                    let Some(&stage_id) = festival_stages.choose(&mut self.rng) else {
                        break;
                    };
                    let date = words::date_between(&mut self.rng, first_day, last_day);
                    if used.insert((stage_id, date)) {
                        slot = Some((stage_id, date));
                        break;
                    }
                }
                let Some((stage_id, date)) = slot else {
                    warn!(
                        festival_id = festival.id,
                        attempts = EVENT_SLOT_ATTEMPTS,
                        "No free stage date found, dropping event"
                    );
                    continue;
                };

                events.push(Event {
                    id: events.len() as u32 + 1,
                    festival_id: festival.id,
                    stage_id,
                    date,
                    total_duration: Duration::hours(self.rng.random_range(min_hours..=max_hours)),
                });
            }
        }

        Ok(events)
    }
}
