// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod area;
pub mod bird_count;
pub mod observation;
pub mod species;
pub mod watch_list;
pub mod weather;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use area::{Location, MonitoringArea, MonitoringStation};
pub use bird_count::{validate_time_range, BirdCount};
pub use observation::Observation;
pub use species::{Group, Species};
pub use watch_list::WatchList;
pub use weather::{GlaciationLevel, Precipitation, Visibility, WeatherData, WindDirection};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Bird count has already been terminated")]
    AlreadyTerminated,

    #[error("Start time must not be after end time (start: {start}, end: {end})")]
    StartAfterEnd {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
