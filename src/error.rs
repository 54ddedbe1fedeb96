use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Failed to snapshot database {path:?}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot of {path:?} is not a valid SQLite database: {source}")]
    SnapshotFormat {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Bookmark query failed: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("Bookmark {id} has a parent chain that never reaches the root")]
    MalformedTree { id: i64 },

    #[error("ROFI_RETV=1 but ROFI_INFO is not set")]
    MissingSelection,

    #[error("Icon error: {0}")]
    Icon(String),
}

pub type Result<T> = std::result::Result<T, Error>;
