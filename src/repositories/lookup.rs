// src/repositories/lookup.rs
//
// Identity resolution by natural key, shared by the write and read mapping
// directions. All helpers operate on a borrowed connection so the write path
// can run them inside a single transaction.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::domain::{Location, MonitoringArea, Species};
use crate::error::{AppError, AppResult};
use crate::repositories::datetime::format_timestamp;

/// Resolves a species to its persisted surrogate id.
///
/// A species carrying a scientific name is matched by that name (unique by
/// schema). A name-only species is matched by plain name among rows whose
/// scientific name is NULL or empty; more than one such row is reported as
/// [`AppError::AmbiguousSpecies`] instead of silently picking the first.
pub fn species_id(conn: &Connection, species: &Species) -> AppResult<Option<i64>> {
    match species.scientific_name() {
        Some(scientific) => {
            let mut stmt = conn.prepare("SELECT id FROM species WHERE scientific_name = ?1")?;
            match stmt.query_row(params![scientific], |row| row.get(0)) {
                Ok(id) => Ok(Some(id)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id FROM species
                 WHERE name = ?1 AND (scientific_name IS NULL OR scientific_name = '')",
            )?;
            let ids: Vec<i64> = stmt
                .query_map(params![species.name()], |row| row.get(0))?
                .collect::<Result<_, _>>()?;

            match ids.as_slice() {
                [] => Ok(None),
                [id] => Ok(Some(*id)),
                _ => Err(AppError::AmbiguousSpecies(species.name().to_string())),
            }
        }
    }
}

/// Resolves a census to its surrogate id via the formatted start time.
pub fn census_id(conn: &Connection, start_time: DateTime<Utc>) -> AppResult<Option<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM bird_count WHERE start_time = ?1")?;
    match stmt.query_row(params![format_timestamp(start_time)], |row| row.get(0)) {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Reloads a monitoring area by its code (unique by invariant).
pub fn area_by_code(conn: &Connection, code: &str) -> AppResult<Option<MonitoringArea>> {
    let mut stmt = conn
        .prepare("SELECT name, latitude, longitude FROM monitoring_area WHERE code = ?1")?;
    match stmt.query_row(params![code], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, f64>(1)?,
            row.get::<_, f64>(2)?,
        ))
    }) {
        Ok((name, latitude, longitude)) => Ok(Some(MonitoringArea::new(
            name,
            code,
            Location::new(latitude, longitude),
        ))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Reloads a species by its surrogate id.
pub fn species_by_id(conn: &Connection, id: i64) -> AppResult<Option<Species>> {
    let mut stmt = conn.prepare("SELECT name, scientific_name FROM species WHERE id = ?1")?;
    match stmt.query_row(params![id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
        ))
    }) {
        Ok((name, scientific_name)) => Ok(Some(rebuild_species(name, scientific_name))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn rebuild_species(name: String, scientific_name: Option<String>) -> Species {
    match scientific_name.filter(|s| !s.is_empty()) {
        Some(scientific) => Species::with_scientific_name(name, scientific),
        None => Species::new(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_connection, initialize_database};
    use chrono::TimeZone;

    fn setup() -> Connection {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        conn
    }

    #[test]
    fn species_with_scientific_name_resolves_by_it() {
        let conn = setup();
        conn.execute(
            "INSERT INTO species (scientific_name, name) VALUES ('Falco tinnunculus', 'Kestrel')",
            [],
        )
        .unwrap();

        let probe = Species::with_scientific_name("Common kestrel", "Falco tinnunculus");
        assert!(species_id(&conn, &probe).unwrap().is_some());

        let missing = Species::with_scientific_name("Kestrel", "Falco sparverius");
        assert_eq!(species_id(&conn, &missing).unwrap(), None);
    }

    #[test]
    fn name_only_species_matches_null_scientific_rows_only() {
        let conn = setup();
        conn.execute(
            "INSERT INTO species (scientific_name, name) VALUES ('Strix aluco', 'Owl')",
            [],
        )
        .unwrap();

        // the fully-specified row must not satisfy a name-only lookup
        assert_eq!(species_id(&conn, &Species::new("Owl")).unwrap(), None);

        conn.execute("INSERT INTO species (name) VALUES ('Owl')", [])
            .unwrap();
        assert!(species_id(&conn, &Species::new("Owl")).unwrap().is_some());
    }

    #[test]
    fn ambiguous_plain_name_is_surfaced() {
        let conn = setup();
        conn.execute("INSERT INTO species (name) VALUES ('Gull')", [])
            .unwrap();
        conn.execute("INSERT INTO species (name) VALUES ('Gull')", [])
            .unwrap();

        assert!(matches!(
            species_id(&conn, &Species::new("Gull")),
            Err(AppError::AmbiguousSpecies(_))
        ));
    }

    #[test]
    fn census_id_resolves_by_formatted_start_time() {
        let conn = setup();
        conn.execute(
            "INSERT INTO bird_count (start_time, end_time, observer)
             VALUES ('2018-04-07 06:30:15', '2018-04-07 09:00:00', 'Tom Fool')",
            [],
        )
        .unwrap();

        let start = Utc.with_ymd_and_hms(2018, 4, 7, 6, 30, 15).unwrap();
        assert!(census_id(&conn, start).unwrap().is_some());

        let other = Utc.with_ymd_and_hms(2018, 4, 8, 6, 30, 15).unwrap();
        assert_eq!(census_id(&conn, other).unwrap(), None);
    }

    #[test]
    fn area_by_code_rebuilds_the_value_object() {
        let conn = setup();
        conn.execute(
            "INSERT INTO monitoring_area (code, name, latitude, longitude)
             VALUES ('SB', 'Southern Bay', 54.1, 8.85)",
            [],
        )
        .unwrap();

        let area = area_by_code(&conn, "SB").unwrap().unwrap();
        assert_eq!(area.name(), "Southern Bay");
        assert_eq!(area.location().latitude, 54.1);
        assert_eq!(area_by_code(&conn, "GP").unwrap(), None);
    }
}
