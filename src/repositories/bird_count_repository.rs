// src/repositories/bird_count_repository.rs
//
// Census persistence: flattens a terminated aggregate into one header row
// plus N observation rows, and rebuilds an equivalent aggregate from them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::db::ConnectionPool;
use crate::domain::{
    BirdCount, GlaciationLevel, MonitoringArea, Precipitation, Species, Visibility, WatchList,
    WeatherData, WindDirection,
};
use crate::error::{AppError, AppResult};
use crate::repositories::datetime::{format_timestamp, parse_timestamp};
use crate::repositories::lookup;

pub trait BirdCountRepository: Send + Sync {
    /// Persists a terminated census and returns its generated id.
    ///
    /// The header row and all observation rows are written as one atomic
    /// unit; a failure rolls the whole census back.
    fn save(&self, census: &BirdCount) -> AppResult<i64>;
    fn find_by_id(&self, id: i64) -> AppResult<Option<BirdCount>>;
    fn find_by_start_time(&self, start_time: DateTime<Utc>) -> AppResult<Option<BirdCount>>;
    fn find_by_observer(&self, observer: &str) -> AppResult<Vec<BirdCount>>;
    fn find_all(&self) -> AppResult<Vec<BirdCount>>;
    fn exists_id(&self, id: i64) -> AppResult<bool>;
    fn exists_start_time(&self, start_time: DateTime<Utc>) -> AppResult<bool>;
    /// Committed censuses are append-only; always fails.
    fn remove(&self, id: i64) -> AppResult<()>;
}

pub struct SqliteBirdCountRepository {
    pool: Arc<ConnectionPool>,
}

/// Header row as stored, before value objects are rebuilt.
struct RawHeader {
    id: i64,
    start_time: String,
    end_time: String,
    water_gauge: Option<f64>,
    wind_strength: Option<i64>,
    wind_direction: Option<i64>,
    precipitation: Option<i64>,
    visibility: Option<i64>,
    glaciation_level: Option<i64>,
    observer: Option<String>,
}

const HEADER_COLUMNS: &str = "id, start_time, end_time, water_gauge, wind_strength, \
     wind_direction, precipitation, visibility, glaciation_level, observer";

impl SqliteBirdCountRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_header(row: &Row) -> Result<RawHeader, rusqlite::Error> {
        Ok(RawHeader {
            id: row.get("id")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            water_gauge: row.get("water_gauge")?,
            wind_strength: row.get("wind_strength")?,
            wind_direction: row.get("wind_direction")?,
            precipitation: row.get("precipitation")?,
            visibility: row.get("visibility")?,
            glaciation_level: row.get("glaciation_level")?,
            observer: row.get("observer")?,
        })
    }

    // ------------------------------------------------------------------
    // Write path
    // ------------------------------------------------------------------

    fn insert_header(tx: &Connection, census: &BirdCount) -> AppResult<()> {
        let end_time = census.end_time().ok_or(AppError::NotYetTerminated)?;
        let weather = census.weather_info();
        tx.execute(
            "INSERT INTO bird_count (start_time, end_time, water_gauge, wind_strength,
                 wind_direction, precipitation, visibility, glaciation_level, observer)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                format_timestamp(census.start_time()),
                format_timestamp(end_time),
                weather.water_gauge,
                weather.wind_strength.map(i64::from),
                weather.wind_direction.map(WindDirection::ordinal),
                weather.precipitation.map(Precipitation::ordinal),
                weather.visibility.map(Visibility::ordinal),
                weather.glaciation_level.map(GlaciationLevel::ordinal),
                census.observer_name(),
            ],
        )?;
        Ok(())
    }

    fn insert_observations(tx: &Connection, census: &BirdCount, census_id: i64) -> AppResult<()> {
        let mut stmt = tx.prepare(
            "INSERT INTO observation (area, species, census, count) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (area, watchlist) in census.observed_species() {
            for (species, count) in watchlist.iter() {
                let species_id = lookup::species_id(tx, species)?
                    .ok_or_else(|| AppError::SpeciesNotPersisted(species.to_string()))?;
                stmt.execute(params![area.code(), species_id, census_id, count])?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    /// Rebuilds the aggregate for a header row:
    /// observation rows are partitioned by area code, the distinct areas and
    /// species are resolved back into value objects, each area's watchlist is
    /// reassembled and the restore constructor puts the pieces together.
    fn assemble(conn: &Connection, header: RawHeader) -> AppResult<BirdCount> {
        let start_time = parse_timestamp(&header.start_time)?;
        let end_time = parse_timestamp(&header.end_time)?;
        let weather = Self::rebuild_weather(&header)?;
        let observer = header.observer.unwrap_or_default();

        let rows = Self::load_observation_rows(conn, header.id)?;
        let observed_species = Self::rebuild_observed_species(conn, rows)?;

        BirdCount::restore(start_time, end_time, observer, weather, observed_species)
            .map_err(AppError::Domain)
    }

    fn rebuild_weather(header: &RawHeader) -> AppResult<WeatherData> {
        // NULL means "unset"; a stored ordinal must be in range
        let wind_strength = header
            .wind_strength
            .map(|raw| {
                u8::try_from(raw).map_err(|_| {
                    AppError::DatabaseStateCorrupt(format!("wind strength out of range: {}", raw))
                })
            })
            .transpose()?;
        let wind_direction = header
            .wind_direction
            .map(|raw| {
                WindDirection::from_ordinal(raw).ok_or_else(|| {
                    AppError::DatabaseStateCorrupt(format!("unknown wind direction: {}", raw))
                })
            })
            .transpose()?;
        let precipitation = header
            .precipitation
            .map(|raw| {
                Precipitation::from_ordinal(raw).ok_or_else(|| {
                    AppError::DatabaseStateCorrupt(format!("unknown precipitation: {}", raw))
                })
            })
            .transpose()?;
        let visibility = header
            .visibility
            .map(|raw| {
                Visibility::from_ordinal(raw).ok_or_else(|| {
                    AppError::DatabaseStateCorrupt(format!("unknown visibility: {}", raw))
                })
            })
            .transpose()?;
        let glaciation_level = header
            .glaciation_level
            .map(|raw| {
                GlaciationLevel::from_ordinal(raw).ok_or_else(|| {
                    AppError::DatabaseStateCorrupt(format!("unknown glaciation level: {}", raw))
                })
            })
            .transpose()?;

        Ok(WeatherData::new(
            header.water_gauge,
            wind_strength,
            wind_direction,
            precipitation,
            visibility,
            glaciation_level,
        ))
    }

    fn load_observation_rows(conn: &Connection, census_id: i64) -> AppResult<Vec<(String, i64, i64)>> {
        let mut stmt =
            conn.prepare("SELECT area, species, count FROM observation WHERE census = ?1")?;
        let rows = stmt.query_map(params![census_id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;

        let mut observations = Vec::new();
        for row in rows {
            observations.push(row?);
        }
        Ok(observations)
    }

    fn rebuild_observed_species(
        conn: &Connection,
        rows: Vec<(String, i64, i64)>,
    ) -> AppResult<HashMap<MonitoringArea, WatchList>> {
        // partition by area code
        let mut partitions: HashMap<String, Vec<(i64, i64)>> = HashMap::new();
        for (area_code, species_id, count) in rows {
            partitions
                .entry(area_code)
                .or_default()
                .push((species_id, count));
        }

        // resolve every distinct species id once
        let distinct_species: HashSet<i64> = partitions
            .values()
            .flatten()
            .map(|(species_id, _)| *species_id)
            .collect();
        let mut species_by_id: HashMap<i64, Species> = HashMap::new();
        for species_id in distinct_species {
            let species = lookup::species_by_id(conn, species_id)?.ok_or_else(|| {
                AppError::DatabaseStateCorrupt(format!(
                    "observation references unknown species {}",
                    species_id
                ))
            })?;
            species_by_id.insert(species_id, species);
        }

        // resolve every distinct area code once and reassemble its watchlist
        let mut observed_species = HashMap::with_capacity(partitions.len());
        for (area_code, entries) in partitions {
            let area = lookup::area_by_code(conn, &area_code)?.ok_or_else(|| {
                AppError::DatabaseStateCorrupt(format!(
                    "observation references unknown area {}",
                    area_code
                ))
            })?;

            let mut tally: HashMap<Species, u32> = HashMap::new();
            for (species_id, raw_count) in entries {
                let count = u32::try_from(raw_count).map_err(|_| {
                    AppError::DatabaseStateCorrupt(format!(
                        "invalid observation count: {}",
                        raw_count
                    ))
                })?;
                let species = species_by_id
                    .get(&species_id)
                    .cloned()
                    .ok_or_else(|| AppError::NotFound)?;
                *tally.entry(species).or_insert(0) += count;
            }
            observed_species.insert(area, WatchList::from_map(tally));
        }

        Ok(observed_species)
    }

    fn find_by_selection(&self, selection: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<BirdCount>> {
        let conn = self.pool.get()?;
        let query = format!(
            "SELECT {} FROM bird_count WHERE {}",
            HEADER_COLUMNS, selection
        );
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(args, Self::row_to_header)?;

        let mut headers = Vec::new();
        for header in rows {
            headers.push(header?);
        }

        let mut censuses = Vec::with_capacity(headers.len());
        for header in headers {
            censuses.push(Self::assemble(&conn, header)?);
        }
        Ok(censuses)
    }
}

impl BirdCountRepository for SqliteBirdCountRepository {
    fn save(&self, census: &BirdCount) -> AppResult<i64> {
        if !census.is_terminated() {
            return Err(AppError::NotYetTerminated);
        }

        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        Self::insert_header(&tx, census)?;
        // re-resolve through the natural key: the insert must be visible
        let census_id = lookup::census_id(&tx, census.start_time())?
            .ok_or_else(|| AppError::CensusNotPersisted(census.to_string()))?;
        Self::insert_observations(&tx, census, census_id)?;

        tx.commit()?;
        Ok(census_id)
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<BirdCount>> {
        let conn = self.pool.get()?;
        let query = format!("SELECT {} FROM bird_count WHERE id = ?1", HEADER_COLUMNS);
        let mut stmt = conn.prepare(&query)?;
        let header = match stmt.query_row(params![id], Self::row_to_header) {
            Ok(header) => header,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        drop(stmt);
        Ok(Some(Self::assemble(&conn, header)?))
    }

    fn find_by_start_time(&self, start_time: DateTime<Utc>) -> AppResult<Option<BirdCount>> {
        let conn = self.pool.get()?;
        let query = format!(
            "SELECT {} FROM bird_count WHERE start_time = ?1",
            HEADER_COLUMNS
        );
        let mut stmt = conn.prepare(&query)?;
        let header = match stmt.query_row(params![format_timestamp(start_time)], Self::row_to_header)
        {
            Ok(header) => header,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        drop(stmt);
        Ok(Some(Self::assemble(&conn, header)?))
    }

    fn find_by_observer(&self, observer: &str) -> AppResult<Vec<BirdCount>> {
        let pattern = format!("%{}%", observer);
        self.find_by_selection("observer LIKE ?1", &[&pattern])
    }

    fn find_all(&self) -> AppResult<Vec<BirdCount>> {
        self.find_by_selection("1 = 1", &[])
    }

    fn exists_id(&self, id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM bird_count WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn exists_start_time(&self, start_time: DateTime<Utc>) -> AppResult<bool> {
        let conn = self.pool.get()?;
        Ok(lookup::census_id(&conn, start_time)?.is_some())
    }

    fn remove(&self, _id: i64) -> AppResult<()> {
        Err(AppError::UnsupportedOperation(
            "Existing bird counts may not be removed".to_string(),
        ))
    }
}
