//! INSERT statement serialization.
//!
//! Each table becomes one multi-row `INSERT INTO` statement. Tables are
//! written in dependency order so every foreign key refers to rows that were
//! inserted earlier.

use std::fmt;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use pulse_lineup::{ArtistGroupMember, Event, Performance, PerformanceMember};

use crate::dataset::Dataset;
use crate::rows::{
    ArtistGenre, ArtistRow, Equipment, FestivalRow, Genre, GroupRow, LocationRow, ResaleInterest,
    Review, Staff, StaffAssignment, StageEquipment, StageRow, Ticket, Visitor,
};

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Interval(Duration),
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<u8> for SqlValue {
    fn from(v: u8) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::Text(v.clone())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

impl From<Duration> for SqlValue {
    fn from(v: Duration) -> Self {
        SqlValue::Interval(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Format a duration as `H:MM:SS`.
pub fn format_interval(d: Duration) -> String {
    let total = d.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Bool(v) => f.write_str(if *v { "TRUE" } else { "FALSE" }),
            SqlValue::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
            SqlValue::Date(v) => write!(f, "'{}'", v.format("%Y-%m-%d")),
            SqlValue::DateTime(v) => write!(f, "'{}'", v.format("%Y-%m-%d %H:%M:%S")),
            SqlValue::Interval(v) => write!(f, "'{}'", format_interval(*v)),
        }
    }
}

/// A row type that maps to one table.
pub trait SqlRow {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Values in `COLUMNS` order.
    fn values(&self) -> Vec<SqlValue>;
}

/// Write `rows` as one INSERT statement. Empty tables are skipped.
pub fn write_table<W: Write, T: SqlRow>(out: &mut W, rows: &[T]) -> std::io::Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    writeln!(out, "INSERT INTO {} ({}) VALUES", T::TABLE, T::COLUMNS.join(", "))?;
    for (i, row) in rows.iter().enumerate() {
        let values: Vec<String> = row.values().iter().map(|v| v.to_string()).collect();
        let terminator = if i + 1 < rows.len() { ",\n" } else { ";\n\n" };
        write!(out, "({}){}", values.join(", "), terminator)?;
    }
    Ok(())
}

/// Write every table of `dataset` in dependency order.
pub fn write_dataset<W: Write>(out: &mut W, dataset: &Dataset) -> Result<()> {
    fn table<W: Write, T: SqlRow>(out: &mut W, rows: &[T]) -> Result<()> {
        write_table(out, rows).with_context(|| format!("writing table {}", T::TABLE))
    }

    table(out, &dataset.locations)?;
    table(out, &dataset.festivals)?;
    table(out, &dataset.stages)?;
    table(out, &dataset.equipment)?;
    table(out, &dataset.stage_equipment)?;
    table(out, &dataset.groups)?;
    table(out, &dataset.artists)?;
    table(out, &dataset.group_members)?;
    table(out, &dataset.genres)?;
    table(out, &dataset.artist_genres)?;
    table(out, &dataset.events)?;
    table(out, &dataset.performances)?;
    table(out, &dataset.performance_members)?;
    table(out, &dataset.visitors)?;
    table(out, &dataset.tickets)?;
    table(out, &dataset.resale_interest)?;
    table(out, &dataset.reviews)?;
    table(out, &dataset.staff)?;
    table(out, &dataset.staff_assignments)?;
    out.flush().context("flushing SQL output")?;
    Ok(())
}

impl SqlRow for LocationRow {
    const TABLE: &'static str = "Location";
    const COLUMNS: &'static [&'static str] = &[
        "location_id",
        "address",
        "latitude",
        "longitude",
        "city",
        "country",
        "continent",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.location.id.into(),
            (&self.address).into(),
            self.latitude.into(),
            self.longitude.into(),
            (&self.city).into(),
            (&self.country).into(),
            self.location.continent.name().into(),
        ]
    }
}

impl SqlRow for FestivalRow {
    const TABLE: &'static str = "Festival";
    const COLUMNS: &'static [&'static str] = &[
        "festival_id",
        "location_id",
        "name",
        "year",
        "duration_days",
        "poster_image",
        "description",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.festival.id.into(),
            self.festival.location_id.into(),
            (&self.name).into(),
            self.festival.year.into(),
            self.duration_days.into(),
            (&self.poster_image).into(),
            (&self.description).into(),
        ]
    }
}

impl SqlRow for StageRow {
    const TABLE: &'static str = "Stage";
    const COLUMNS: &'static [&'static str] = &[
        "stage_id",
        "festival_id",
        "name",
        "description",
        "capacity",
        "image",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.stage.id.into(),
            self.stage.festival_id.into(),
            (&self.name).into(),
            (&self.description).into(),
            self.stage.capacity.into(),
            (&self.image).into(),
        ]
    }
}

impl SqlRow for Equipment {
    const TABLE: &'static str = "Equipment";
    const COLUMNS: &'static [&'static str] = &["equipment_id", "type", "description", "image"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            (&self.kind).into(),
            (&self.description).into(),
            (&self.image).into(),
        ]
    }
}

impl SqlRow for StageEquipment {
    const TABLE: &'static str = "Stage_Equipment";
    const COLUMNS: &'static [&'static str] = &["stage_id", "equipment_id", "quantity"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.stage_id.into(),
            self.equipment_id.into(),
            self.quantity.into(),
        ]
    }
}

impl SqlRow for GroupRow {
    const TABLE: &'static str = "Artist_Group";
    const COLUMNS: &'static [&'static str] =
        &["group_id", "name", "formation_date", "website", "photo"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            (&self.name).into(),
            self.formation_date.into(),
            (&self.website).into(),
            (&self.photo).into(),
        ]
    }
}

impl SqlRow for ArtistRow {
    const TABLE: &'static str = "Artist";
    const COLUMNS: &'static [&'static str] = &[
        "artist_id",
        "name",
        "stage_name",
        "dob",
        "website",
        "instagram",
        "photo",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            (&self.name).into(),
            (&self.stage_name).into(),
            self.dob.into(),
            (&self.website).into(),
            (&self.instagram).into(),
            (&self.photo).into(),
        ]
    }
}

impl SqlRow for ArtistGroupMember {
    const TABLE: &'static str = "Artist_Group_Members";
    const COLUMNS: &'static [&'static str] = &["group_id", "artist_id"];

    fn values(&self) -> Vec<SqlValue> {
        vec![self.group_id.into(), self.artist_id.into()]
    }
}

impl SqlRow for Genre {
    const TABLE: &'static str = "Genre";
    const COLUMNS: &'static [&'static str] = &["genre_id", "name", "subgenre"];

    fn values(&self) -> Vec<SqlValue> {
        vec![self.id.into(), (&self.name).into(), (&self.subgenre).into()]
    }
}

impl SqlRow for ArtistGenre {
    const TABLE: &'static str = "Artist_Genres";
    const COLUMNS: &'static [&'static str] = &["artist_id", "genre_id"];

    fn values(&self) -> Vec<SqlValue> {
        vec![self.artist_id.into(), self.genre_id.into()]
    }
}

impl SqlRow for Event {
    const TABLE: &'static str = "Event";
    const COLUMNS: &'static [&'static str] = &[
        "event_id",
        "festival_id",
        "stage_id",
        "event_date",
        "total_duration",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.festival_id.into(),
            self.stage_id.into(),
            self.date.into(),
            self.total_duration.into(),
        ]
    }
}

impl SqlRow for Performance {
    const TABLE: &'static str = "Performance";
    const COLUMNS: &'static [&'static str] = &[
        "performance_id",
        "event_id",
        "start_time",
        "stage_id",
        "duration",
        "type",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.event_id.into(),
            self.start_time.into(),
            self.stage_id.into(),
            self.duration.into(),
            self.kind.name().into(),
        ]
    }
}

impl SqlRow for PerformanceMember {
    const TABLE: &'static str = "performance_members";
    const COLUMNS: &'static [&'static str] = &["performance_id", "artist_id", "group_id"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.performance_id.into(),
            self.artist_id.into(),
            self.group_id.into(),
        ]
    }
}

impl SqlRow for Visitor {
    const TABLE: &'static str = "Visitor";
    const COLUMNS: &'static [&'static str] = &[
        "visitor_id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "age",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            (&self.first_name).into(),
            (&self.last_name).into(),
            (&self.email).into(),
            (&self.phone).into(),
            self.age.into(),
        ]
    }
}

impl SqlRow for Ticket {
    const TABLE: &'static str = "Ticket";
    const COLUMNS: &'static [&'static str] = &[
        "ticket_id",
        "event_id",
        "visitor_id",
        "ticket_category",
        "price",
        "purchase_date",
        "payment_method",
        "ean_code",
        "activated",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.event_id.into(),
            self.visitor_id.into(),
            self.category.name().into(),
            self.price.into(),
            self.purchase_date.into(),
            self.payment_method.name().into(),
            (&self.ean_code).into(),
            self.activated.into(),
        ]
    }
}

impl SqlRow for ResaleInterest {
    const TABLE: &'static str = "resale_interest";
    const COLUMNS: &'static [&'static str] = &[
        "interested_visitor_id",
        "event_id",
        "ticket_category",
        "expressed_on",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.visitor_id.into(),
            self.event_id.into(),
            self.category.name().into(),
            self.expressed_on.into(),
        ]
    }
}

impl SqlRow for Review {
    const TABLE: &'static str = "Review";
    const COLUMNS: &'static [&'static str] = &[
        "review_id",
        "visitor_id",
        "performance_id",
        "interpretation",
        "lights_sound",
        "stage_presence",
        "organization",
        "overall_impression",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.visitor_id.into(),
            self.performance_id.into(),
            self.interpretation.into(),
            self.lights_sound.into(),
            self.stage_presence.into(),
            self.organization.into(),
            self.overall_impression.into(),
        ]
    }
}

impl SqlRow for Staff {
    const TABLE: &'static str = "Staff";
    const COLUMNS: &'static [&'static str] =
        &["staff_id", "name", "age", "staff_role", "experience_level"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            (&self.name).into(),
            self.age.into(),
            self.role.name().into(),
            self.experience.name().into(),
        ]
    }
}

impl SqlRow for StaffAssignment {
    const TABLE: &'static str = "Staff_Assignment";
    const COLUMNS: &'static [&'static str] = &[
        "assignment_id",
        "staff_id",
        "event_id",
        "assignment_date",
        "staff_role",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.staff_id.into(),
            self.event_id.into(),
            self.assignment_date.into(),
            self.role.name().into(),
        ]
    }
}
