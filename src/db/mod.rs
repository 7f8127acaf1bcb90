//! Persistence module split across logical submodules.

mod connection;
mod persons;
mod store;

pub use connection::{ensure_schema, open_connection};
pub use persons::{delete_person, fetch_persons, insert_person, update_person};
pub use store::{PersonStore, SqliteStore};
