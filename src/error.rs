//! Error types shared across the core components.
//!
//! Every public store, scheduler and config operation returns `Result<_, Error>`;
//! nothing panics across a component boundary. Validation and not-found failures
//! are distinct from storage-engine failures so callers can treat the former as
//! ordinary no-ops and the latter as fatal.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Validation failures, rejected before any store mutation.
    #[error("invalid task: {0}")]
    InvalidTask(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // No-op failures.
    #[error("no task with id {0}")]
    NotFound(i64),

    // Storage-engine and environment failures.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
