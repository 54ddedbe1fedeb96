use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

/// `moz_bookmarks.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Bookmark,
    Folder,
    Separator,
    Other(i64),
}

impl From<i64> for EntryKind {
    fn from(raw: i64) -> Self {
        match raw {
            1 => EntryKind::Bookmark,
            2 => EntryKind::Folder,
            3 => EntryKind::Separator,
            other => EntryKind::Other(other),
        }
    }
}

/// One row of `moz_bookmarks` joined with its `moz_places` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkRow {
    pub id: i64,
    pub parent_id: i64,
    pub kind: EntryKind,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl BookmarkRow {
    pub fn is_bookmark(&self) -> bool {
        self.kind == EntryKind::Bookmark
    }
}

/// Every bookmark tree node, folders included. Type filtering is left to the
/// caller since folders are needed to rebuild paths.
pub fn query_bookmarks(conn: &Connection) -> Result<Vec<BookmarkRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT b.id, b.parent, b.type, b.title, p.url
             FROM moz_bookmarks b
             LEFT JOIN moz_places p ON b.fk = p.id",
        )
        .map_err(Error::Query)?;

    let rows = stmt
        .query_map([], |row| {
            Ok(BookmarkRow {
                id: row.get(0)?,
                parent_id: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
                kind: EntryKind::from(row.get::<_, i64>(2)?),
                title: row.get(3)?,
                url: row.get(4)?,
            })
        })
        .map_err(Error::Query)?;

    let mut bookmarks = Vec::new();
    for row in rows {
        bookmarks.push(row.map_err(Error::Query)?);
    }

    debug!("Read {} rows from moz_bookmarks", bookmarks.len());
    Ok(bookmarks)
}
