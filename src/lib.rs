// src/lib.rs
//
// birdcensus - field data collection for sea-bird censuses
//
// Layering (dependencies point downwards only):
//   services     -> use-case orchestration around the active census
//   repositories -> SQL mappers between the domain and SQLite
//   domain       -> aggregate, value types and their invariants
//   db           -> connection pool and schema migrations
//   seed         -> JSON reference data for areas and species

pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod seed;
pub mod services;

pub use domain::{
    BirdCount, Group, Location, MonitoringArea, MonitoringStation, Observation, Species,
    WatchList, WeatherData,
};
pub use error::{AppError, AppResult};
pub use services::CensusService;
