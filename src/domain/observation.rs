// src/domain/observation.rs

use crate::domain::{DomainError, DomainResult, MonitoringArea, Species};

/// One `(area, species, count)` fact within a census - the unit persisted
/// in the observation join table.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    species: Species,
    area: MonitoringArea,
    count: u32,
}

impl Observation {
    /// Creates a new observation. The count must be positive.
    pub fn of(species: Species, area: MonitoringArea, count: u32) -> DomainResult<Self> {
        if count == 0 {
            return Err(DomainError::InvariantViolation(
                "Observation count must be positive".to_string(),
            ));
        }
        Ok(Self {
            species,
            area,
            count,
        })
    }

    // Internal constructor for counts already guaranteed positive by the
    // owning watchlist.
    pub(crate) fn from_watchlist_entry(species: Species, area: MonitoringArea, count: u32) -> Self {
        debug_assert!(count > 0);
        Self {
            species,
            area,
            count,
        }
    }

    pub fn species(&self) -> &Species {
        &self.species
    }

    pub fn area(&self) -> &MonitoringArea {
        &self.area
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x {} at {}", self.count, self.species, self.area)
    }
}
