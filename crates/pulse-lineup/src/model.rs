//! Entity types shared by the scheduler and the coverage repairer.
//!
//! Only the fields the lineup engine reads are modelled here. Descriptive
//! columns (names, photos, descriptions) live with the dataset generator.

use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Unique identifier for a location.
pub type LocationId = u32;

/// Unique identifier for a festival.
pub type FestivalId = u32;

/// Unique identifier for a stage.
pub type StageId = u32;

/// Unique identifier for an event.
pub type EventId = u32;

/// Unique identifier for an artist.
pub type ArtistId = u32;

/// Unique identifier for a group.
pub type GroupId = u32;

/// Unique identifier for a performance.
pub type PerformanceId = u32;

/// The continents a festival can be hosted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Continent {
    Europe,
    Asia,
    NorthAmerica,
    SouthAmerica,
    Africa,
    Australia,
}

impl Continent {
    /// All continents in their canonical order.
    pub const ALL: [Continent; 6] = [
        Continent::Europe,
        Continent::Asia,
        Continent::NorthAmerica,
        Continent::SouthAmerica,
        Continent::Africa,
        Continent::Australia,
    ];

    /// Display name as stored in the `continent` column.
    pub fn name(&self) -> &'static str {
        match self {
            Continent::Europe => "Europe",
            Continent::Asia => "Asia",
            Continent::NorthAmerica => "North America",
            Continent::SouthAmerica => "South America",
            Continent::Africa => "Africa",
            Continent::Australia => "Australia",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A festival venue location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub continent: Continent,
}

/// One yearly edition of the festival.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Festival {
    pub id: FestivalId,
    pub year: i32,
    pub location_id: LocationId,
}

/// A stage belonging to a festival.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub festival_id: FestivalId,
    pub capacity: u32,
}

/// A single evening on a stage.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub festival_id: FestivalId,
    pub stage_id: StageId,
    pub date: NaiveDate,
    pub total_duration: Duration,
}

/// Membership row linking an artist to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistGroupMember {
    pub group_id: GroupId,
    pub artist_id: ArtistId,
}

/// Something that can be booked for a performance slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Performer {
    /// An artist performing alone.
    Solo(ArtistId),
    /// A group, carrying its resolved member list.
    Group { id: GroupId, members: Vec<ArtistId> },
}

impl Performer {
    /// Key under which this performer's participation years are tracked.
    pub fn key(&self) -> PerformerKey {
        match self {
            Performer::Solo(id) => PerformerKey::Artist(*id),
            Performer::Group { id, .. } => PerformerKey::Group(*id),
        }
    }
}

/// Identity of a performer without its membership payload.
///
/// Artist and group ids come from separate sequences, so the variant is
/// part of the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PerformerKey {
    Artist(ArtistId),
    Group(GroupId),
}

impl fmt::Display for PerformerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformerKey::Artist(id) => write!(f, "artist#{}", id),
            PerformerKey::Group(id) => write!(f, "group#{}", id),
        }
    }
}

/// Billing of a performance within its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceType {
    WarmUp,
    Headline,
    SpecialGuest,
}

impl PerformanceType {
    pub const ALL: [PerformanceType; 3] = [
        PerformanceType::WarmUp,
        PerformanceType::Headline,
        PerformanceType::SpecialGuest,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PerformanceType::WarmUp => "warm up",
            PerformanceType::Headline => "headline",
            PerformanceType::SpecialGuest => "special guest",
        }
    }
}

impl fmt::Display for PerformanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which pass created a performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceOrigin {
    /// Packed into the event window by the scheduler.
    Scheduled,
    /// Added by the continent-coverage repair pass.
    CoverageRepair,
}

/// A booked slot on an event's stage.
#[derive(Debug, Clone)]
pub struct Performance {
    pub id: PerformanceId,
    pub event_id: EventId,
    pub start_time: NaiveDateTime,
    pub stage_id: StageId,
    pub duration: Duration,
    pub kind: PerformanceType,
    pub origin: PerformanceOrigin,
}

impl Performance {
    pub fn end_time(&self) -> NaiveDateTime {
        self.start_time + self.duration
    }
}

/// One contributing artist of a performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerformanceMember {
    pub performance_id: PerformanceId,
    pub artist_id: ArtistId,
    pub group_id: Option<GroupId>,
}

/// The bookable population: every artist plus every group with its members.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    artists: Vec<ArtistId>,
    groups: Vec<(GroupId, Vec<ArtistId>)>,
}

impl Roster {
    /// Build a roster from flat membership rows.
    ///
    /// Groups keep the order of `groups`; members keep the order in which
    /// their rows appear in `membership`.
    pub fn new(artists: Vec<ArtistId>, groups: &[GroupId], membership: &[ArtistGroupMember]) -> Self {
        let mut members_by_group: HashMap<GroupId, Vec<ArtistId>> = HashMap::new();
        for row in membership {
            members_by_group
                .entry(row.group_id)
                .or_default()
                .push(row.artist_id);
        }

        let groups = groups
            .iter()
            .map(|gid| (*gid, members_by_group.remove(gid).unwrap_or_default()))
            .collect();

        Self { artists, groups }
    }

    pub fn artists(&self) -> &[ArtistId] {
        &self.artists
    }

    pub fn groups(&self) -> &[(GroupId, Vec<ArtistId>)] {
        &self.groups
    }

    /// Members of a group, empty if the group is unknown.
    pub fn members_of(&self, group_id: GroupId) -> &[ArtistId] {
        self.groups
            .iter()
            .find(|(gid, _)| *gid == group_id)
            .map(|(_, members)| members.as_slice())
            .unwrap_or(&[])
    }

    /// Whether an artist belongs to at least one group.
    pub fn is_grouped(&self, artist_id: ArtistId) -> bool {
        self.groups
            .iter()
            .any(|(_, members)| members.contains(&artist_id))
    }
}

/// Performances and their member rows, in creation order.
#[derive(Debug, Clone)]
pub struct Lineup {
    pub performances: Vec<Performance>,
    pub members: Vec<PerformanceMember>,
    next_id: PerformanceId,
}

impl Default for Lineup {
    fn default() -> Self {
        Self::new()
    }
}

impl Lineup {
    pub fn new() -> Self {
        Self {
            performances: Vec::new(),
            members: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a performance and the member rows for `performer`.
    ///
    /// Returns the id assigned to the new performance.
    pub fn push(
        &mut self,
        event: &Event,
        start_time: NaiveDateTime,
        duration: Duration,
        kind: PerformanceType,
        origin: PerformanceOrigin,
        performer: &Performer,
    ) -> PerformanceId {
        let id = self.next_id;
        self.next_id += 1;

        self.performances.push(Performance {
            id,
            event_id: event.id,
            start_time,
            stage_id: event.stage_id,
            duration,
            kind,
            origin,
        });

        match performer {
            Performer::Solo(artist_id) => self.members.push(PerformanceMember {
                performance_id: id,
                artist_id: *artist_id,
                group_id: None,
            }),
            Performer::Group { id: group_id, members } => {
                self.members
                    .extend(members.iter().map(|artist_id| PerformanceMember {
                        performance_id: id,
                        artist_id: *artist_id,
                        group_id: Some(*group_id),
                    }));
            }
        }

        id
    }

    /// Performances booked for one event, in creation order.
    pub fn for_event(&self, event_id: EventId) -> impl Iterator<Item = &Performance> {
        self.performances
            .iter()
            .filter(move |p| p.event_id == event_id)
    }

    pub fn len(&self) -> usize {
        self.performances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.performances.is_empty()
    }
}
