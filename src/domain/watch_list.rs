// src/domain/watch_list.rs
//
// Per-area tally of observed species

use std::collections::HashMap;

use crate::domain::Species;

/// The tally of species and counts recorded for one area during one census.
///
/// Invariant: counts are always >= 1. A sighting of count 0 is a no-op and
/// never creates an entry. Adding a sighting for an already-present species
/// sums the counts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WatchList {
    observed_species: HashMap<Species, u32>,
}

impl WatchList {
    /// Creates an empty watchlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-instantiates a watchlist, e.g. from persisted observation rows.
    /// Zero counts are dropped to uphold the invariant.
    pub fn from_map(observed_species: HashMap<Species, u32>) -> Self {
        let observed_species = observed_species
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .collect();
        Self { observed_species }
    }

    /// Records `count` sightings of `species`. Count 0 is a no-op.
    pub fn add_sighting(&mut self, species: Species, count: u32) {
        if count == 0 {
            return;
        }
        *self.observed_species.entry(species).or_insert(0) += count;
    }

    pub fn count_of(&self, species: &Species) -> u32 {
        self.observed_species.get(species).copied().unwrap_or(0)
    }

    pub fn contains(&self, species: &Species) -> bool {
        self.observed_species.contains_key(species)
    }

    /// Read-only view of the species set.
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.observed_species.keys()
    }

    /// Read-only view of the species -> count map.
    pub fn as_map(&self) -> &HashMap<Species, u32> {
        &self.observed_species
    }

    /// Iterates over `(species, count)` pairs. No ordering is guaranteed;
    /// in particular the order differs between a live aggregate and one
    /// reconstructed from storage.
    pub fn iter(&self) -> impl Iterator<Item = (&Species, u32)> {
        self.observed_species.iter().map(|(species, count)| (species, *count))
    }

    /// Sum of all counts on this watchlist.
    pub fn total_count(&self) -> u32 {
        self.observed_species.values().sum()
    }

    pub fn len(&self) -> usize {
        self.observed_species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed_species.is_empty()
    }
}
