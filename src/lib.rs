//! Core library surface for the Persona Manager TUI application.
//!
//! The binary only wires these pieces together; the controller and the store
//! are usable (and tested) without a terminal.
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Args, Config};
pub use controller::{Alert, AlertKind, Dialogs, PersonController};
pub use db::{PersonStore, SqliteStore};
pub use error::StoreError;
pub use models::Person;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
