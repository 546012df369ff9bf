//! Row types for every generated table.
//!
//! Entities the lineup engine reads wrap the `pulse_lineup` model and add
//! the descriptive columns; the rest are plain rows.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use pulse_lineup::{ArtistId, EventId, Festival, GroupId, Location, PerformanceId, Stage, StageId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EquipmentId = u32;
pub type GenreId = u32;
pub type VisitorId = u32;
pub type TicketId = u32;
pub type ReviewId = u32;
pub type StaffId = u32;
pub type AssignmentId = u32;

#[derive(Debug, Clone)]
pub struct LocationRow {
    pub location: Location,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct FestivalRow {
    pub festival: Festival,
    pub name: String,
    pub duration_days: u32,
    pub poster_image: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct StageRow {
    pub stage: Stage,
    pub name: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct Equipment {
    pub id: EquipmentId,
    pub kind: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEquipment {
    pub stage_id: StageId,
    pub equipment_id: EquipmentId,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct ArtistRow {
    pub id: ArtistId,
    pub name: String,
    pub stage_name: String,
    pub dob: NaiveDate,
    pub website: String,
    pub instagram: String,
    pub photo: String,
}

#[derive(Debug, Clone)]
pub struct GroupRow {
    pub id: GroupId,
    pub name: String,
    pub formation_date: NaiveDate,
    pub website: String,
    pub photo: String,
}

impl GroupRow {
    pub fn photo_for(uuid: Uuid) -> String {
        format!("group_{}.jpg", uuid)
    }
}

#[derive(Debug, Clone)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub subgenre: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtistGenre {
    pub artist_id: ArtistId,
    pub genre_id: GenreId,
}

#[derive(Debug, Clone)]
pub struct Visitor {
    pub id: VisitorId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketCategory {
    General,
    Backstage,
    Vip,
}

impl TicketCategory {
    pub fn name(&self) -> &'static str {
        match self {
            TicketCategory::General => "general",
            TicketCategory::Backstage => "backstage",
            TicketCategory::Vip => "VIP",
        }
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::BankTransfer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub event_id: EventId,
    pub visitor_id: VisitorId,
    pub category: TicketCategory,
    pub price: f64,
    pub purchase_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub ean_code: String,
    pub activated: bool,
}

/// A visitor who wanted a ticket for a sold-out event.
#[derive(Debug, Clone)]
pub struct ResaleInterest {
    pub visitor_id: VisitorId,
    pub event_id: EventId,
    pub category: TicketCategory,
    pub expressed_on: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct Review {
    pub id: ReviewId,
    pub visitor_id: VisitorId,
    pub performance_id: PerformanceId,
    pub interpretation: u8,
    pub lights_sound: u8,
    pub stage_presence: u8,
    pub organization: u8,
    pub overall_impression: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    Security,
    Support,
    Technician,
}

impl StaffRole {
    pub fn name(&self) -> &'static str {
        match self {
            StaffRole::Security => "security",
            StaffRole::Support => "support",
            StaffRole::Technician => "technician",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Intern,
    Junior,
    Average,
    Experienced,
    Senior,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 5] = [
        ExperienceLevel::Intern,
        ExperienceLevel::Junior,
        ExperienceLevel::Average,
        ExperienceLevel::Experienced,
        ExperienceLevel::Senior,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExperienceLevel::Intern => "intern",
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Average => "average",
            ExperienceLevel::Experienced => "experienced",
            ExperienceLevel::Senior => "senior",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    pub age: u32,
    pub role: StaffRole,
    pub experience: ExperienceLevel,
}

#[derive(Debug, Clone)]
pub struct StaffAssignment {
    pub id: AssignmentId,
    pub staff_id: StaffId,
    pub event_id: EventId,
    pub assignment_date: NaiveDate,
    pub role: StaffRole,
}
