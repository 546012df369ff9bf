//! The generated dataset: every table plus the lineup engine's statistics.

use std::collections::{BTreeMap, HashMap};

use pulse_lineup::{
    ArtistGroupMember, CoverageReport, Event, LineupChecks, Performance, PerformanceMember,
    ScheduleStats, StageId,
};

use crate::rows::{
    ArtistGenre, ArtistRow, Equipment, FestivalRow, Genre, GroupRow, LocationRow, ResaleInterest,
    Review, Staff, StaffAssignment, StageEquipment, StageRow, Ticket, Visitor,
};

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub locations: Vec<LocationRow>,
    pub festivals: Vec<FestivalRow>,
    pub stages: Vec<StageRow>,
    pub equipment: Vec<Equipment>,
    pub stage_equipment: Vec<StageEquipment>,
    pub groups: Vec<GroupRow>,
    pub artists: Vec<ArtistRow>,
    pub group_members: Vec<ArtistGroupMember>,
    pub genres: Vec<Genre>,
    pub artist_genres: Vec<ArtistGenre>,
    pub events: Vec<Event>,
    pub performances: Vec<Performance>,
    pub performance_members: Vec<PerformanceMember>,
    pub visitors: Vec<Visitor>,
    pub tickets: Vec<Ticket>,
    pub resale_interest: Vec<ResaleInterest>,
    pub reviews: Vec<Review>,
    pub staff: Vec<Staff>,
    pub staff_assignments: Vec<StaffAssignment>,

    pub schedule: ScheduleStats,
    pub coverage: CoverageReport,
    pub checks: LineupChecks,
}

impl Dataset {
    /// Row count per table, keyed by table name.
    pub fn table_counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("Location", self.locations.len()),
            ("Festival", self.festivals.len()),
            ("Stage", self.stages.len()),
            ("Equipment", self.equipment.len()),
            ("Stage_Equipment", self.stage_equipment.len()),
            ("Artist_Group", self.groups.len()),
            ("Artist", self.artists.len()),
            ("Artist_Group_Members", self.group_members.len()),
            ("Genre", self.genres.len()),
            ("Artist_Genres", self.artist_genres.len()),
            ("Event", self.events.len()),
            ("Performance", self.performances.len()),
            ("performance_members", self.performance_members.len()),
            ("Visitor", self.visitors.len()),
            ("Ticket", self.tickets.len()),
            ("resale_interest", self.resale_interest.len()),
            ("Review", self.reviews.len()),
            ("Staff", self.staff.len()),
            ("Staff_Assignment", self.staff_assignments.len()),
        ])
    }

    /// Capacity of each stage.
    pub fn stage_capacities(&self) -> HashMap<StageId, u32> {
        self.stages
            .iter()
            .map(|s| (s.stage.id, s.stage.capacity))
            .collect()
    }

    /// Performances of one event, in start-time order.
    pub fn performances_for(&self, event_id: u32) -> Vec<&Performance> {
        let mut perfs: Vec<&Performance> = self
            .performances
            .iter()
            .filter(|p| p.event_id == event_id)
            .collect();
        perfs.sort_by_key(|p| (p.start_time, p.id));
        perfs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_counts() {
        let counts = Dataset::default().table_counts();
        assert_eq!(counts.len(), 19);
        assert!(counts.values().all(|&n| n == 0));
    }
}
