use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::models::Person;

use super::connection::open_connection;
use super::persons::{delete_person, fetch_persons, insert_person, update_person};

/// Persistence boundary the controller talks to.
pub trait PersonStore {
    /// Every stored person, in store order.
    fn list_all(&mut self) -> StoreResult<Vec<Person>>;

    /// Persist a new person and return its generated id.
    fn insert(&mut self, person: &Person) -> StoreResult<i64>;

    /// Overwrite the stored fields of `id` with those of `person`.
    fn update(&mut self, id: i64, person: &Person) -> StoreResult<()>;

    fn delete_by_id(&mut self, id: i64) -> StoreResult<()>;
}

/// SQLite-backed store. It only remembers where the database lives: each
/// operation opens its own connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> StoreResult<Connection> {
        open_connection(&self.path)
    }
}

impl PersonStore for SqliteStore {
    fn list_all(&mut self) -> StoreResult<Vec<Person>> {
        let conn = self.connect()?;
        let persons = fetch_persons(&conn)?;
        debug!(count = persons.len(), "fetched persons");
        Ok(persons)
    }

    fn insert(&mut self, person: &Person) -> StoreResult<i64> {
        let conn = self.connect()?;
        let id = insert_person(&conn, person)?;
        info!(id, name = %person.full_name(), "inserted person");
        Ok(id)
    }

    fn update(&mut self, id: i64, person: &Person) -> StoreResult<()> {
        let conn = self.connect()?;
        update_person(&conn, id, person)?;
        info!(id, name = %person.full_name(), "updated person");
        Ok(())
    }

    fn delete_by_id(&mut self, id: i64) -> StoreResult<()> {
        let conn = self.connect()?;
        delete_person(&conn, id)?;
        info!(id, "deleted person");
        Ok(())
    }
}
