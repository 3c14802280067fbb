// src/domain/bird_count/entity.rs
//
// The census aggregate root

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::bird_count::invariants::validate_time_range;
use crate::domain::{
    DomainError, DomainResult, MonitoringArea, Observation, Species, WatchList, WeatherData,
};

/// A single bird count: one timed observation session with an observer,
/// weather conditions and a per-area tally of species sightings.
///
/// Lifecycle: `Ongoing` (no end time) -> `Terminated` (end time set),
/// terminal. All mutation goes through [`BirdCount::add_to_watchlist`] and
/// [`BirdCount::terminate`], both of which fail once the count has ended.
#[derive(Debug, Clone, PartialEq)]
pub struct BirdCount {
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    observer_name: String,
    weather_info: WeatherData,
    observed_species: HashMap<MonitoringArea, WatchList>,
}

impl BirdCount {
    /// Starts a new, ongoing bird count.
    pub fn start(
        start_time: DateTime<Utc>,
        observer_name: impl Into<String>,
        weather_info: WeatherData,
    ) -> Self {
        Self {
            start_time,
            end_time: None,
            observer_name: observer_name.into(),
            weather_info,
            observed_species: HashMap::new(),
        }
    }

    /// Re-instantiates an already-passed bird count, e.g. from storage.
    pub fn restore(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        observer_name: impl Into<String>,
        weather_info: WeatherData,
        observed_species: HashMap<MonitoringArea, WatchList>,
    ) -> DomainResult<Self> {
        validate_time_range(start_time, end_time)?;
        Ok(Self {
            start_time,
            end_time: Some(end_time),
            observer_name: observer_name.into(),
            weather_info,
            observed_species,
        })
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn observer_name(&self) -> &str {
        &self.observer_name
    }

    pub fn weather_info(&self) -> &WeatherData {
        &self.weather_info
    }

    /// Read-only view of the per-area watchlists.
    pub fn observed_species(&self) -> &HashMap<MonitoringArea, WatchList> {
        &self.observed_species
    }

    pub fn is_terminated(&self) -> bool {
        self.end_time.is_some()
    }

    /// Closes the count. No more species may be recorded afterwards.
    pub fn terminate(&mut self) -> DomainResult<()> {
        if self.is_terminated() {
            return Err(DomainError::AlreadyTerminated);
        }
        self.end_time = Some(Utc::now());
        Ok(())
    }

    /// Records a sighting of `count` instances of `species` in `area`.
    ///
    /// The area's watchlist is created on first use. A count of 0 is a
    /// defensive no-op (the state check still applies). Counts for a species
    /// already on the watchlist are summed.
    pub fn add_to_watchlist(
        &mut self,
        area: MonitoringArea,
        species: Species,
        count: u32,
    ) -> DomainResult<()> {
        if self.is_terminated() {
            return Err(DomainError::AlreadyTerminated);
        }
        if count == 0 {
            return Ok(());
        }
        self.observed_species
            .entry(area)
            .or_default()
            .add_sighting(species, count);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Derived queries - pure, computed from the watchlists on demand
    // ------------------------------------------------------------------

    /// Merges every area's watchlist into one species -> total count map.
    pub fn observation_summary(&self) -> HashMap<Species, u32> {
        let mut summary: HashMap<Species, u32> = HashMap::new();
        for watchlist in self.observed_species.values() {
            for (species, count) in watchlist.iter() {
                *summary.entry(species.clone()).or_insert(0) += count;
            }
        }
        summary
    }

    /// Number of distinct species across all areas (set-union semantics).
    pub fn different_species_count(&self) -> usize {
        self.observed_species
            .values()
            .flat_map(|watchlist| watchlist.species())
            .collect::<std::collections::HashSet<_>>()
            .len()
    }

    /// Total number of individuals recorded, across all areas and species.
    pub fn total_observed_species_count(&self) -> u32 {
        self.observed_species
            .values()
            .map(|watchlist| watchlist.total_count())
            .sum()
    }

    /// How often `species` was recorded, summed across all areas.
    pub fn observed_count_of(&self, species: &Species) -> u32 {
        self.observed_species
            .values()
            .map(|watchlist| watchlist.count_of(species))
            .sum()
    }

    /// How often `species` was recorded in `area`. 0 if either is unknown.
    pub fn observed_count_in(&self, species: &Species, area: &MonitoringArea) -> u32 {
        self.observed_species
            .get(area)
            .map(|watchlist| watchlist.count_of(species))
            .unwrap_or(0)
    }

    /// How often `species` was recorded in the area with the given code.
    /// Linear scan over the current areas; fine at census scale.
    pub fn observed_count_in_code(&self, species: &Species, code: &str) -> u32 {
        self.observed_species
            .iter()
            .find(|(area, _)| area.code() == code)
            .map(|(_, watchlist)| watchlist.count_of(species))
            .unwrap_or(0)
    }

    pub fn was_observed(&self, species: &Species) -> bool {
        self.observed_count_of(species) > 0
    }

    pub fn was_observed_in(&self, species: &Species, area: &MonitoringArea) -> bool {
        self.observed_count_in(species, area) > 0
    }

    pub fn was_observed_in_code(&self, species: &Species, code: &str) -> bool {
        self.observed_count_in_code(species, code) > 0
    }

    /// Iterates over every single observation of this count, one
    /// `(area, species, count)` triple at a time. Order is unspecified.
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.observed_species.iter().flat_map(|(area, watchlist)| {
            watchlist.iter().map(move |(species, count)| {
                Observation::from_watchlist_entry(species.clone(), area.clone(), count)
            })
        })
    }
}

impl std::fmt::Display for BirdCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end_time {
            Some(end) => write!(
                f,
                "Bird count [by={}; start={}; end={}]",
                self.observer_name, self.start_time, end
            ),
            None => write!(
                f,
                "Bird count [by={}; started={}; ongoing]",
                self.observer_name, self.start_time
            ),
        }
    }
}
