use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every way a store call can fail. The controller catches all of them and
/// turns them into alerts, so nothing past it ever sees a `StoreError`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not create data directory {}: {source}", .path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not open database {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{context}: {message}")]
    Constraint {
        context: &'static str,
        message: String,
    },

    #[error("no person with id {0}")]
    NotFound(i64),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
