// src/repositories/area_repository.rs
//
// Monitoring-area persistence

use std::sync::Arc;

use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::{Location, MonitoringArea};
use crate::error::{AppError, AppResult};

pub trait MonitoringAreaRepository: Send + Sync {
    /// Inserts the area and returns its natural key (the code).
    fn save(&self, area: &MonitoringArea) -> AppResult<String>;
    fn find_by_code(&self, code: &str) -> AppResult<Option<MonitoringArea>>;
    fn find_by_name(&self, name: &str) -> AppResult<Option<MonitoringArea>>;
    fn find_all(&self) -> AppResult<Vec<MonitoringArea>>;
    fn exists(&self, code: &str) -> AppResult<bool>;
    /// Areas are append-only; always fails.
    fn remove(&self, code: &str) -> AppResult<()>;
}

pub struct SqliteMonitoringAreaRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMonitoringAreaRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_area(row: &Row) -> Result<MonitoringArea, rusqlite::Error> {
        let code: String = row.get("code")?;
        let name: String = row.get("name")?;
        let latitude: f64 = row.get("latitude")?;
        let longitude: f64 = row.get("longitude")?;
        Ok(MonitoringArea::new(
            name,
            code,
            Location::new(latitude, longitude),
        ))
    }
}

impl MonitoringAreaRepository for SqliteMonitoringAreaRepository {
    fn save(&self, area: &MonitoringArea) -> AppResult<String> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO monitoring_area (code, name, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                area.code(),
                area.name(),
                area.location().latitude,
                area.location().longitude
            ],
        )?;
        Ok(area.code().to_string())
    }

    fn find_by_code(&self, code: &str) -> AppResult<Option<MonitoringArea>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT code, name, latitude, longitude FROM monitoring_area WHERE code = ?1",
        )?;
        match stmt.query_row(params![code], Self::row_to_area) {
            Ok(area) => Ok(Some(area)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_name(&self, name: &str) -> AppResult<Option<MonitoringArea>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT code, name, latitude, longitude FROM monitoring_area WHERE name = ?1",
        )?;
        match stmt.query_row(params![name], Self::row_to_area) {
            Ok(area) => Ok(Some(area)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_all(&self) -> AppResult<Vec<MonitoringArea>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT code, name, latitude, longitude FROM monitoring_area")?;
        let rows = stmt.query_map([], Self::row_to_area)?;

        let mut areas = Vec::new();
        for area in rows {
            areas.push(area?);
        }
        Ok(areas)
    }

    fn exists(&self, code: &str) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM monitoring_area WHERE code = ?1",
            params![code],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn remove(&self, _code: &str) -> AppResult<()> {
        Err(AppError::UnsupportedOperation(
            "Deleting monitoring areas is forbidden".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool_at, get_connection, initialize_database};

    fn repository() -> (tempfile::TempDir, SqliteMonitoringAreaRepository) {
        let dir = tempfile::tempdir().unwrap();
        let pool = Arc::new(create_connection_pool_at(&dir.path().join("census.db")).unwrap());
        initialize_database(&get_connection(&pool).unwrap()).unwrap();
        (dir, SqliteMonitoringAreaRepository::new(pool))
    }

    fn bay() -> MonitoringArea {
        MonitoringArea::new("Southern Bay", "SB", Location::new(54.1, 8.85))
    }

    #[test]
    fn saved_area_round_trips() {
        let (_dir, repo) = repository();
        assert_eq!(repo.save(&bay()).unwrap(), "SB");

        let reloaded = repo.find_by_code("SB").unwrap().unwrap();
        assert_eq!(reloaded, bay());
        assert_eq!(reloaded.name(), "Southern Bay");
        assert_eq!(reloaded.location().longitude, 8.85);
    }

    #[test]
    fn lookup_by_name_and_existence() {
        let (_dir, repo) = repository();
        repo.save(&bay()).unwrap();

        assert!(repo.exists("SB").unwrap());
        assert!(!repo.exists("GP").unwrap());
        assert_eq!(repo.find_by_name("Southern Bay").unwrap(), Some(bay()));
        assert_eq!(repo.find_by_name("Great Pond").unwrap(), None);
    }

    #[test]
    fn find_all_returns_every_area() {
        let (_dir, repo) = repository();
        repo.save(&bay()).unwrap();
        repo.save(&MonitoringArea::new("Great Pond", "GP", Location::new(54.2, 8.9)))
            .unwrap();
        assert_eq!(repo.find_all().unwrap().len(), 2);
    }

    #[test]
    fn removal_is_unsupported() {
        let (_dir, repo) = repository();
        repo.save(&bay()).unwrap();
        assert!(matches!(
            repo.remove("SB"),
            Err(AppError::UnsupportedOperation(_))
        ));
        assert!(repo.exists("SB").unwrap());
    }
}
