// src/services/census_service.rs
//
// Orchestration around the single active census.
//
// The domain assumes exactly one census at a time; this service enforces it.
// The aggregate performs no locking of its own, so the service expects a
// single logical writer (see the repository layer for the storage contract).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::domain::{BirdCount, DomainError, Species, WeatherData};
use crate::error::{AppError, AppResult};
use crate::repositories::{BirdCountRepository, MonitoringAreaRepository, SpeciesRepository};

pub struct CensusService {
    bird_count_repo: Arc<dyn BirdCountRepository>,
    species_repo: Arc<dyn SpeciesRepository>,
    area_repo: Arc<dyn MonitoringAreaRepository>,
    current: Option<BirdCount>,
}

impl CensusService {
    pub fn new(
        bird_count_repo: Arc<dyn BirdCountRepository>,
        species_repo: Arc<dyn SpeciesRepository>,
        area_repo: Arc<dyn MonitoringAreaRepository>,
    ) -> Self {
        Self {
            bird_count_repo,
            species_repo,
            area_repo,
            current: None,
        }
    }

    /// The census currently being recorded, if any.
    pub fn current(&self) -> Option<&BirdCount> {
        self.current.as_ref()
    }

    pub fn is_ongoing(&self) -> bool {
        self.current.is_some()
    }

    /// Initiates a new bird count. Fails if one is already running.
    pub fn start_census(
        &mut self,
        start_time: DateTime<Utc>,
        observer_name: &str,
        weather: WeatherData,
    ) -> AppResult<()> {
        if self.current.is_some() {
            return Err(DomainError::InvalidStateTransition(
                "Another bird count has already started".to_string(),
            )
            .into());
        }
        info!("Starting bird count at {} by {}", start_time, observer_name);
        self.current = Some(BirdCount::start(start_time, observer_name, weather));
        Ok(())
    }

    /// Adds a sighting to the current census. The area is resolved through
    /// the repository by its code; a count of 0 is ignored.
    pub fn add_sighting(&mut self, area_code: &str, species: Species, count: u32) -> AppResult<()> {
        let census = self.current.as_mut().ok_or_else(|| {
            DomainError::InvalidStateTransition("No bird count ongoing".to_string())
        })?;
        if count == 0 {
            return Ok(());
        }

        let area = self
            .area_repo
            .find_by_code(area_code)?
            .ok_or(AppError::NotFound)?;

        debug!("Recording {}x {} in {}", count, species, area_code);
        census.add_to_watchlist(area, species, count)?;
        Ok(())
    }

    /// Registers a new species so it can be observed later. It is not added
    /// as an observation.
    pub fn register_species(
        &mut self,
        name: &str,
        scientific_name: Option<&str>,
    ) -> AppResult<Species> {
        let scientific_name = scientific_name.filter(|s| !s.is_empty());

        match scientific_name {
            Some(scientific) => {
                if self
                    .species_repo
                    .find_by_scientific_name(scientific)?
                    .is_some()
                {
                    return Err(AppError::ExistingSpecies(scientific.to_string()));
                }
            }
            None => {
                if !self.species_repo.find_by_name(name)?.is_empty() {
                    return Err(AppError::ExistingSpecies(name.to_string()));
                }
            }
        }

        let species = match scientific_name {
            Some(scientific) => Species::with_scientific_name(name, scientific),
            None => Species::new(name),
        };
        let id = self.species_repo.save(&species)?;
        info!("Registered species {} (id {})", species, id);
        Ok(species)
    }

    /// Finishes the current bird count and persists it, returning the
    /// generated census id.
    pub fn terminate_census(&mut self) -> AppResult<i64> {
        let census = self.current.as_mut().ok_or_else(|| {
            DomainError::InvalidStateTransition("No ongoing bird count".to_string())
        })?;

        // a previous terminate may have succeeded while the save failed;
        // only flip the state once
        if !census.is_terminated() {
            census.terminate()?;
        }
        let id = self.bird_count_repo.save(census)?;
        info!("Bird count persisted with id {}", id);
        self.current = None;
        Ok(id)
    }

    /// Aborts the current bird count without saving. A missing census is
    /// ignored.
    pub fn abort_census(&mut self) {
        if let Some(census) = self.current.take() {
            warn!("Aborting bird count started at {}", census.start_time());
        }
    }
}
