// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO cross-repository calls
// - Explicit SQL only

pub mod area_repository;
pub mod bird_count_repository;
pub mod datetime;
pub mod lookup;
pub mod species_repository;

pub use area_repository::{MonitoringAreaRepository, SqliteMonitoringAreaRepository};
pub use bird_count_repository::{BirdCountRepository, SqliteBirdCountRepository};
pub use datetime::{format_timestamp, parse_timestamp, TIMESTAMP_FORMAT};
pub use species_repository::{SpeciesRepository, SqliteSpeciesRepository};
