// src/repositories/species_repository.rs
//
// Species reference-table persistence

use std::sync::Arc;

use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::Species;
use crate::error::{AppError, AppResult};
use crate::repositories::lookup::rebuild_species;

pub trait SpeciesRepository: Send + Sync {
    /// Inserts the species and returns its generated id.
    fn save(&self, species: &Species) -> AppResult<i64>;
    fn find_by_id(&self, id: i64) -> AppResult<Option<Species>>;
    /// Exact lookup by scientific name (unique by schema).
    fn find_by_scientific_name(&self, scientific_name: &str) -> AppResult<Option<Species>>;
    /// Plain-name lookup among rows without a scientific name.
    fn find_by_name(&self, name: &str) -> AppResult<Vec<Species>>;
    fn find_all(&self) -> AppResult<Vec<Species>>;
    fn exists(&self, id: i64) -> AppResult<bool>;
    /// Species are append-only; always fails.
    fn remove(&self, id: i64) -> AppResult<()>;
}

pub struct SqliteSpeciesRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteSpeciesRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_species(row: &Row) -> Result<Species, rusqlite::Error> {
        let name: String = row.get("name")?;
        let scientific_name: Option<String> = row.get("scientific_name")?;
        Ok(rebuild_species(name, scientific_name))
    }
}

impl SpeciesRepository for SqliteSpeciesRepository {
    fn save(&self, species: &Species) -> AppResult<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO species (name, scientific_name) VALUES (?1, ?2)",
            params![species.name(), species.scientific_name()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<Species>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT name, scientific_name FROM species WHERE id = ?1")?;
        match stmt.query_row(params![id], Self::row_to_species) {
            Ok(species) => Ok(Some(species)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_scientific_name(&self, scientific_name: &str) -> AppResult<Option<Species>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT name, scientific_name FROM species WHERE scientific_name = ?1")?;
        match stmt.query_row(params![scientific_name], Self::row_to_species) {
            Ok(species) => Ok(Some(species)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_name(&self, name: &str) -> AppResult<Vec<Species>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT name, scientific_name FROM species
             WHERE name = ?1 AND (scientific_name IS NULL OR scientific_name = '')",
        )?;
        let rows = stmt.query_map(params![name], Self::row_to_species)?;

        let mut species = Vec::new();
        for entry in rows {
            species.push(entry?);
        }
        Ok(species)
    }

    fn find_all(&self) -> AppResult<Vec<Species>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT name, scientific_name FROM species")?;
        let rows = stmt.query_map([], Self::row_to_species)?;

        let mut species = Vec::new();
        for entry in rows {
            species.push(entry?);
        }
        Ok(species)
    }

    fn exists(&self, id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM species WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn remove(&self, _id: i64) -> AppResult<()> {
        Err(AppError::UnsupportedOperation(
            "Deleting species is forbidden".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool_at, get_connection, initialize_database};

    fn repository() -> (tempfile::TempDir, SqliteSpeciesRepository) {
        let dir = tempfile::tempdir().unwrap();
        let pool = Arc::new(create_connection_pool_at(&dir.path().join("census.db")).unwrap());
        initialize_database(&get_connection(&pool).unwrap()).unwrap();
        (dir, SqliteSpeciesRepository::new(pool))
    }

    #[test]
    fn saved_species_can_be_found_again() {
        let (_dir, repo) = repository();
        let kestrel = Species::with_scientific_name("Common kestrel", "Falco tinnunculus");
        let id = repo.save(&kestrel).unwrap();

        assert!(repo.exists(id).unwrap());
        assert_eq!(repo.find_by_id(id).unwrap(), Some(kestrel.clone()));
        assert_eq!(
            repo.find_by_scientific_name("Falco tinnunculus").unwrap(),
            Some(kestrel)
        );
    }

    #[test]
    fn name_search_skips_fully_specified_rows() {
        let (_dir, repo) = repository();
        repo.save(&Species::with_scientific_name("Owl", "Strix aluco"))
            .unwrap();
        repo.save(&Species::new("Owl")).unwrap();

        let matches = repo.find_by_name("Owl").unwrap();
        assert_eq!(matches.len(), 1);
        assert!(!matches[0].has_scientific_name());
    }

    #[test]
    fn find_all_returns_every_row() {
        let (_dir, repo) = repository();
        repo.save(&Species::new("Owl")).unwrap();
        repo.save(&Species::with_scientific_name("Common blackbird", "Turdus merula"))
            .unwrap();
        assert_eq!(repo.find_all().unwrap().len(), 2);
    }

    #[test]
    fn duplicate_scientific_name_is_a_database_error() {
        let (_dir, repo) = repository();
        repo.save(&Species::with_scientific_name("Kestrel", "Falco tinnunculus"))
            .unwrap();
        let result = repo.save(&Species::with_scientific_name("Kestrel 2", "Falco tinnunculus"));
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[test]
    fn removal_is_unsupported() {
        let (_dir, repo) = repository();
        let id = repo.save(&Species::new("Owl")).unwrap();
        assert!(matches!(
            repo.remove(id),
            Err(AppError::UnsupportedOperation(_))
        ));
        assert!(repo.exists(id).unwrap());
    }
}
