//! Festival staff and per-event assignments.

use std::collections::HashMap;

use pulse_lineup::{Event, StageId};
use rand::prelude::*;

use crate::rows::{ExperienceLevel, Staff, StaffAssignment, StaffRole};
use crate::words;

/// Role pool for `count` staff: two fifths security, two fifths support,
/// the rest technicians.
fn role_pool(count: usize) -> Vec<StaffRole> {
    let security = count * 2 / 5;
    let support = count * 2 / 5;
    let technicians = count - security - support;

    std::iter::repeat_n(StaffRole::Security, security)
        .chain(std::iter::repeat_n(StaffRole::Support, support))
        .chain(std::iter::repeat_n(StaffRole::Technician, technicians))
        .collect()
}

fn with_role(staff: &[Staff], role: StaffRole) -> Vec<&Staff> {
    staff.iter().filter(|s| s.role == role).collect()
}

pub fn generate_staff<R: Rng>(rng: &mut R, count: usize) -> Vec<Staff> {
    let mut roles = role_pool(count);
    roles.shuffle(rng);

    roles
        .into_iter()
        .enumerate()
        .map(|(i, role)| Staff {
            id: i as u32 + 1,
            name: words::full_name(rng),
            age: rng.random_range(18..=65),
            role,
            experience: ExperienceLevel::ALL[rng.random_range(0..ExperienceLevel::ALL.len())],
        })
        .collect()
}

/// Staff every event according to its stage capacity.
///
/// Security covers 5% and support 2% of capacity (at least one each), plus
/// two to five technicians. Counts are capped by available staff.
pub fn assign_staff<R: Rng>(
    rng: &mut R,
    staff: &[Staff],
    events: &[Event],
    capacities: &HashMap<StageId, u32>,
) -> Vec<StaffAssignment> {
    let security = with_role(staff, StaffRole::Security);
    let support = with_role(staff, StaffRole::Support);
    let technicians = with_role(staff, StaffRole::Technician);

    let mut assignments = Vec::new();
    for event in events {
        let capacity = capacities.get(&event.stage_id).copied().unwrap_or(0) as usize;
        let security_needed = (capacity * 5 / 100).max(1);
        let support_needed = (capacity * 2 / 100).max(1);
        let technicians_needed = rng.random_range(2..=5);

        let picked: Vec<&Staff> = security
            .choose_multiple(rng, security_needed.min(security.len()))
            .chain(support.choose_multiple(rng, support_needed.min(support.len())))
            .chain(technicians.choose_multiple(rng, technicians_needed.min(technicians.len())))
            .copied()
            .collect();

        for member in picked {
            assignments.push(StaffAssignment {
                id: assignments.len() as u32 + 1,
                staff_id: member.id,
                event_id: event.id,
                assignment_date: event.date,
                role: member.role,
            });
        }
    }

    assignments
}
