use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".persona-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "personas.sqlite";
const LOG_FILE_NAME: &str = "persona-manager.log";

/// Manage the Persona table from the terminal.
#[derive(Debug, Parser)]
#[command(name = "persona-manager", version)]
pub struct Args {
    /// SQLite database holding the Persona table.
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Where diagnostic logs are appended. The terminal belongs to the UI,
    /// so nothing is logged to stdout or stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    /// Fill unset paths with defaults under `~/.persona-manager`.
    pub fn from_args(args: Args) -> Result<Self> {
        if let (Some(database), Some(log_file)) = (&args.database, &args.log_file) {
            return Ok(Self {
                database: database.clone(),
                log_file: log_file.clone(),
            });
        }
        Ok(Self::resolve(args, &data_dir()?))
    }

    /// Like `from_args`, with an explicit data directory for the defaults.
    pub fn resolve(args: Args, data_dir: &Path) -> Self {
        Self {
            database: args
                .database
                .unwrap_or_else(|| data_dir.join(DB_FILE_NAME)),
            log_file: args
                .log_file
                .unwrap_or_else(|| data_dir.join(LOG_FILE_NAME)),
        }
    }
}

fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
