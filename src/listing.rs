use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{ListOptions, Settings};
use crate::favicons::{self, IconCache};
use crate::places::{self, BookmarkRow};
use crate::profile;
use crate::rofi::{self, Entry};
use crate::snapshot;
use crate::tree::{AncestorPath, ParentIndex};

pub const PLACES_DB: &str = "places.sqlite";
pub const FAVICONS_DB: &str = "favicons.sqlite";

/// Turn raw rows into rofi entries: bookmarks only, filtered by folder path,
/// rendered per `options.style`. Bookmarks whose parent chain is broken are
/// logged and skipped.
pub fn build_entries(rows: &[BookmarkRow], options: &ListOptions) -> Vec<Entry> {
    let index = ParentIndex::from_rows(rows);
    let filter = &options.filter;
    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for row in rows.iter().filter(|r| r.is_bookmark()) {
        let path = match index.ancestor_path(row.id) {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping bookmark: {}", e);
                skipped += 1;
                continue;
            }
        };

        if !path.matches(filter) {
            continue;
        }

        let Some(url) = row.url.clone() else {
            debug!("Bookmark {} has no URL, skipping", row.id);
            continue;
        };

        let mut title = options.style.render(&displayed(&path, filter.len(), options.relative));
        if title.is_empty() {
            title = url.clone();
        }

        entries.push(Entry::new(title, url));
    }

    if skipped > 0 {
        warn!("⚠️  {} bookmarks skipped because of a malformed tree", skipped);
    }
    entries
}

fn displayed(path: &AncestorPath, filter_len: usize, relative: bool) -> AncestorPath {
    if relative && path.len() > filter_len {
        path.strip_prefix(filter_len)
    } else {
        path.clone()
    }
}

/// Attach cached favicons from the profile's `favicons.sqlite`. Icons are
/// cosmetic, so every failure here is only a warning.
pub fn attach_icons(profile_dir: &Path, cache: &IconCache, entries: &mut [Entry]) {
    let db = profile_dir.join(FAVICONS_DB);
    if !db.exists() {
        warn!("No {} in {:?}, listing without icons", FAVICONS_DB, profile_dir);
        return;
    }

    let result = snapshot::with_snapshot(&db, |conn| {
        for entry in entries.iter_mut() {
            match favicons::icon_for_url(conn, &entry.url) {
                Ok(Some(bytes)) => match cache.store(&bytes) {
                    Ok(path) => entry.icon = Some(path),
                    Err(e) => warn!("{}", e),
                },
                Ok(None) => {}
                Err(e) => warn!("Icon lookup for {} failed: {}", entry.url, e),
            }
        }
        Ok(())
    });

    if let Err(e) = result {
        warn!("Favicons unavailable: {}", e);
    }
}

/// List mode: resolve the profile, read its bookmarks from a snapshot and
/// write the rofi rows to `out`. Nothing is written unless every step up to
/// formatting succeeded. Returns the number of entries written.
pub fn run<W: Write>(
    settings: &Settings,
    profile_name: Option<&str>,
    options: &ListOptions,
    out: &mut W,
) -> Result<usize> {
    let profile_dir = profile::resolve(&settings.profile_root, profile_name)
        .context("Failed to resolve Firefox profile")?;
    debug!("Using profile {:?}", profile_dir);

    let rows = snapshot::with_snapshot(&profile_dir.join(PLACES_DB), places::query_bookmarks)
        .context("Failed to read bookmarks")?;

    let mut entries = build_entries(&rows, options);
    if options.icons {
        attach_icons(&profile_dir, &IconCache::new(&settings.cache_dir), &mut entries);
    }

    rofi::write_prompt(out, &options.prompt)?;
    for entry in &entries {
        rofi::write_entry(out, entry)?;
    }
    out.flush()?;

    info!("📖 Listed {} of {} bookmark rows", entries.len(), rows.len());
    Ok(entries.len())
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::places::EntryKind;
    use proptest::prelude::*;

    /// One folder chain per depth, each ending in a single bookmark.
    fn chains(depths: &[usize]) -> Vec<BookmarkRow> {
        let mut rows = vec![BookmarkRow {
            id: 1,
            parent_id: 0,
            kind: EntryKind::Folder,
            title: None,
            url: None,
        }];
        let mut next_id = 2;
        for (n, depth) in depths.iter().enumerate() {
            let mut parent = 1;
            for level in 0..*depth {
                rows.push(BookmarkRow {
                    id: next_id,
                    parent_id: parent,
                    kind: EntryKind::Folder,
                    title: Some(format!("f{}-{}", n, level)),
                    url: None,
                });
                parent = next_id;
                next_id += 1;
            }
            rows.push(BookmarkRow {
                id: next_id,
                parent_id: parent,
                kind: EntryKind::Bookmark,
                title: Some(format!("b{}", n)),
                url: Some(format!("http://example.com/{}", n)),
            });
            next_id += 1;
        }
        rows
    }

    /// **Property 2: without a filter every bookmark is listed exactly once**
    proptest! {
        #[test]
        fn prop_every_bookmark_once(depths in prop::collection::vec(0usize..30, 0..20)) {
            let entries = build_entries(&chains(&depths), &ListOptions::default());

            prop_assert_eq!(entries.len(), depths.len());
            for (n, entry) in entries.iter().enumerate() {
                prop_assert_eq!(&entry.url, &format!("http://example.com/{}", n));
                prop_assert_eq!(&entry.title, &format!("b{}", n));
            }
        }
    }
}
