//! Binary entry point: resolve the database location, start logging, and
//! drive the Ratatui event loop until the user exits.
use clap::Parser;
use persona_manager::{logging, run_app, App, Args, Config, PersonController, SqliteStore};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::from_args(Args::parse())?;
    logging::init(&config.log_file)?;
    info!(database = %config.database.display(), "starting persona manager");

    let store = SqliteStore::new(config.database);
    let mut app = App::new(PersonController::new(store));
    run_app(&mut app)
}
