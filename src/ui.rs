//! Ratatui front-end: a single table screen with a live filter, plus blocking
//! popups for the person form, confirmations and alerts.

mod app;
mod dialogs;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
