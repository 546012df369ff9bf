//! Pulse Datagen: synthetic festival datasets as SQL insert scripts.
//!
//! Builds locations, festivals, stages, performers, events, visitors,
//! tickets, reviews and staff from one seeded random source. Performances
//! come from the `pulse_lineup` engine, so every lineup obeys the
//! consecutive-year rule and the continent-coverage guarantee.

pub mod audience;
pub mod config;
pub mod dataset;
pub mod generator;
pub mod report;
pub mod rows;
pub mod sql;
pub mod staffing;
pub mod words;

pub use config::DatasetConfig;
pub use dataset::Dataset;
pub use generator::DatasetGenerator;
pub use report::GenerationReport;
pub use sql::{SqlRow, SqlValue, write_dataset};
