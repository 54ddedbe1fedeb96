//! Favicons from `favicons.sqlite`, cached on disk so rofi can load them by path.

use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{Error, Result};

/// Largest stored icon for the page at `url`, if Firefox has one.
pub fn icon_for_url(conn: &Connection, url: &str) -> Result<Option<Vec<u8>>> {
    conn.query_row(
        "SELECT i.data
         FROM moz_icons i
         JOIN moz_icons_to_pages ip ON ip.icon_id = i.id
         JOIN moz_pages_w_icons p ON p.id = ip.page_id
         WHERE p.page_url = ?1 AND i.data IS NOT NULL
         ORDER BY i.width DESC
         LIMIT 1",
        [url],
        |row| row.get(0),
    )
    .optional()
    .map_err(Error::Query)
}

/// Content-addressed icon store: one file per distinct icon, named by the
/// SHA-256 of its bytes.
pub struct IconCache {
    dir: PathBuf,
}

impl IconCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `icon` unless an identical one is already cached and return its path.
    pub fn store(&self, icon: &[u8]) -> Result<PathBuf> {
        let mut hasher = Sha256::new();
        hasher.update(icon);
        let path = self.dir.join(format!("{:x}", hasher.finalize()));

        if !path.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|e| Error::Icon(format!("cannot create {:?}: {}", self.dir, e)))?;
            fs::write(&path, icon)
                .map_err(|e| Error::Icon(format!("cannot write {:?}: {}", path, e)))?;
            debug!("Cached icon {:?}", path);
        }

        Ok(path)
    }
}
