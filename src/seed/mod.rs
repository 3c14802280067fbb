// src/seed/mod.rs
//
// Reference-data seeding
//
// Monitoring areas and species are shipped as JSON documents and loaded
// into the reference tables on first start. Loading is idempotent: entries
// whose natural key is already on file are skipped.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use crate::domain::{Group, Location, MonitoringArea, Species};
use crate::error::{AppError, AppResult};
use crate::repositories::{MonitoringAreaRepository, SpeciesRepository};

#[derive(Debug, Deserialize)]
struct AreaSeed {
    name: String,
    code: String,
    position: PositionSeed,
}

#[derive(Debug, Deserialize)]
struct PositionSeed {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct SpeciesSeed {
    name: String,
    #[serde(default)]
    scientific_name: Option<String>,
    #[serde(default)]
    group: Option<GroupSeed>,
}

#[derive(Debug, Deserialize)]
struct GroupSeed {
    name: String,
    scientific_name: String,
}

/// Parses a JSON list of monitoring areas.
pub fn parse_areas(json: &str) -> AppResult<Vec<MonitoringArea>> {
    let seeds: Vec<AreaSeed> = serde_json::from_str(json)?;

    let mut areas: Vec<MonitoringArea> = Vec::with_capacity(seeds.len());
    for seed in seeds {
        if seed.name.is_empty() {
            return Err(AppError::MalformedInput(format!(
                "Area '{}' has no name",
                seed.code
            )));
        }
        if seed.code.is_empty() {
            return Err(AppError::MalformedInput(format!(
                "Area '{}' has no code",
                seed.name
            )));
        }
        if !seed.position.latitude.is_finite() || !seed.position.longitude.is_finite() {
            return Err(AppError::MalformedInput(format!(
                "Area '{}' has a non-finite position",
                seed.code
            )));
        }
        if areas.iter().any(|existing| existing.code() == seed.code) {
            return Err(AppError::MalformedInput(format!(
                "Duplicate area code '{}'",
                seed.code
            )));
        }
        areas.push(MonitoringArea::new(
            seed.name,
            seed.code,
            Location::new(seed.position.latitude, seed.position.longitude),
        ));
    }
    Ok(areas)
}

/// Parses a JSON list of species. An empty scientific name is treated as
/// absent, matching how the database rows are read back.
pub fn parse_species(json: &str) -> AppResult<Vec<Species>> {
    let seeds: Vec<SpeciesSeed> = serde_json::from_str(json)?;

    let mut species = Vec::with_capacity(seeds.len());
    for seed in seeds {
        if seed.name.is_empty() {
            return Err(AppError::MalformedInput(
                "Species without a name".to_string(),
            ));
        }
        let mut entry = match seed.scientific_name.filter(|s| !s.is_empty()) {
            Some(scientific) => Species::with_scientific_name(seed.name, scientific),
            None => Species::new(seed.name),
        };
        if let Some(group) = seed.group {
            if group.name.is_empty() || group.scientific_name.is_empty() {
                return Err(AppError::MalformedInput(format!(
                    "Species '{}' has an incomplete group",
                    entry.name()
                )));
            }
            entry.set_group(Group::new(group.name, group.scientific_name));
        }
        species.push(entry);
    }
    Ok(species)
}

pub fn load_areas_from_file(path: &Path) -> AppResult<Vec<MonitoringArea>> {
    parse_areas(&fs::read_to_string(path)?)
}

pub fn load_species_from_file(path: &Path) -> AppResult<Vec<Species>> {
    parse_species(&fs::read_to_string(path)?)
}

/// Inserts the given areas, skipping codes that are already on file.
/// Returns the number of newly inserted rows.
pub fn populate_areas(
    repo: &dyn MonitoringAreaRepository,
    areas: &[MonitoringArea],
) -> AppResult<usize> {
    let mut inserted = 0;
    for area in areas {
        if repo.exists(area.code())? {
            debug!("Area {} already on file, skipping", area.code());
            continue;
        }
        repo.save(area)?;
        inserted += 1;
    }
    info!("Seeded {} of {} monitoring areas", inserted, areas.len());
    Ok(inserted)
}

/// Inserts the given species, skipping entries whose natural key (the
/// scientific name, or the plain name for entries without one) is already
/// on file. Returns the number of newly inserted rows.
pub fn populate_species(repo: &dyn SpeciesRepository, species: &[Species]) -> AppResult<usize> {
    let mut inserted = 0;
    for entry in species {
        let on_file = match entry.scientific_name() {
            Some(scientific) => repo.find_by_scientific_name(scientific)?.is_some(),
            None => !repo.find_by_name(entry.name())?.is_empty(),
        };
        if on_file {
            debug!("Species {} already on file, skipping", entry);
            continue;
        }
        repo.save(entry)?;
        inserted += 1;
    }
    info!("Seeded {} of {} species", inserted, species.len());
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool_at, get_connection, initialize_database};
    use crate::repositories::{SqliteMonitoringAreaRepository, SqliteSpeciesRepository};
    use std::sync::Arc;

    const AREAS_JSON: &str = r#"[
        {"name": "Southern Bay", "code": "SB",
         "position": {"latitude": 54.1, "longitude": 8.85}},
        {"name": "Great Pond", "code": "GP",
         "position": {"latitude": 54.2, "longitude": 8.9}}
    ]"#;

    const SPECIES_JSON: &str = r#"[
        {"name": "Common kestrel", "scientific_name": "Falco tinnunculus",
         "group": {"name": "Falcons", "scientific_name": "Falconidae"}},
        {"name": "Common blackbird", "scientific_name": "Turdus merula"},
        {"name": "Owl"}
    ]"#;

    #[test]
    fn areas_parse_with_position() {
        let areas = parse_areas(AREAS_JSON).unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].code(), "SB");
        assert_eq!(areas[0].location().latitude, 54.1);
    }

    #[test]
    fn duplicate_area_code_is_rejected() {
        let json = r#"[
            {"name": "A", "code": "SB", "position": {"latitude": 1.0, "longitude": 2.0}},
            {"name": "B", "code": "SB", "position": {"latitude": 3.0, "longitude": 4.0}}
        ]"#;
        assert!(matches!(
            parse_areas(json),
            Err(AppError::MalformedInput(_))
        ));
    }

    #[test]
    fn empty_area_name_is_rejected() {
        let json = r#"[{"name": "", "code": "SB",
                        "position": {"latitude": 1.0, "longitude": 2.0}}]"#;
        assert!(matches!(
            parse_areas(json),
            Err(AppError::MalformedInput(_))
        ));
    }

    #[test]
    fn broken_json_is_a_serialization_error() {
        assert!(matches!(
            parse_areas("[{\"name\":"),
            Err(AppError::Serialization(_))
        ));
    }

    #[test]
    fn species_parse_with_optional_fields() {
        let species = parse_species(SPECIES_JSON).unwrap();
        assert_eq!(species.len(), 3);
        assert_eq!(species[0].group().unwrap().name(), "Falcons");
        assert!(!species[2].has_scientific_name());
        assert!(species[2].group().is_none());
    }

    #[test]
    fn empty_scientific_name_is_treated_as_absent() {
        let species =
            parse_species(r#"[{"name": "Owl", "scientific_name": ""}]"#).unwrap();
        assert!(!species[0].has_scientific_name());
    }

    #[test]
    fn nameless_species_is_rejected() {
        assert!(matches!(
            parse_species(r#"[{"name": ""}]"#),
            Err(AppError::MalformedInput(_))
        ));
    }

    #[test]
    fn populate_skips_entries_already_on_file() {
        let dir = tempfile::tempdir().unwrap();
        let pool = Arc::new(create_connection_pool_at(&dir.path().join("census.db")).unwrap());
        initialize_database(&get_connection(&pool).unwrap()).unwrap();

        let area_repo = SqliteMonitoringAreaRepository::new(Arc::clone(&pool));
        let species_repo = SqliteSpeciesRepository::new(pool);

        let areas = parse_areas(AREAS_JSON).unwrap();
        let species = parse_species(SPECIES_JSON).unwrap();

        assert_eq!(populate_areas(&area_repo, &areas).unwrap(), 2);
        assert_eq!(populate_species(&species_repo, &species).unwrap(), 3);

        // a second run changes nothing
        assert_eq!(populate_areas(&area_repo, &areas).unwrap(), 0);
        assert_eq!(populate_species(&species_repo, &species).unwrap(), 0);
        assert_eq!(species_repo.find_all().unwrap().len(), 3);
    }
}
