use std::path::PathBuf;

use directories::BaseDirs;

use crate::tree::TitleStyle;

pub const DEFAULT_BROWSER: &str = "firefox";
pub const DEFAULT_PROMPT: &str = " ";
pub const DEFAULT_SEPARATOR: &str = " / ";

/// Locations resolved once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding `installs.ini`, `profiles.ini` and the profiles.
    pub profile_root: PathBuf,
    /// Where favicon bytes are cached.
    pub cache_dir: PathBuf,
    /// Browser executable used in launch mode.
    pub browser: String,
}

impl Settings {
    /// Build settings from explicit overrides, falling back to the user's
    /// home (`~/.mozilla/firefox`) and XDG cache directory.
    pub fn resolve(
        profile_root: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        browser: Option<String>,
    ) -> anyhow::Result<Self> {
        let base = BaseDirs::new();

        let profile_root = match profile_root {
            Some(path) => path,
            None => base
                .as_ref()
                .map(|b| b.home_dir().join(".mozilla/firefox"))
                .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?,
        };

        let cache_dir = match cache_dir {
            Some(path) => path,
            None => base
                .as_ref()
                .map(|b| b.cache_dir().join("rofi-bookmarks"))
                .ok_or_else(|| anyhow::anyhow!("Cannot determine cache directory"))?,
        };

        Ok(Self {
            profile_root,
            cache_dir,
            browser: browser.unwrap_or_else(|| DEFAULT_BROWSER.to_string()),
        })
    }
}

/// Per-invocation options for list mode.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub filter: Vec<String>,
    pub style: TitleStyle,
    pub relative: bool,
    pub icons: bool,
    pub prompt: String,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            filter: Vec::new(),
            style: TitleStyle::FinalSegment,
            relative: false,
            icons: false,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// Split a `/`-separated folder path into filter segments, dropping empty
/// pieces so `"/Work//Mail/"` and `"Work/Mail"` are the same filter.
pub fn parse_filter(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert!(parse_filter("").is_empty());
        assert!(parse_filter("/").is_empty());
        assert_eq!(parse_filter("toolbar/Work"), vec!["toolbar", "Work"]);
        assert_eq!(parse_filter("/toolbar//Work/"), vec!["toolbar", "Work"]);
    }

    #[test]
    fn test_parse_filter_keeps_inner_spaces() {
        assert_eq!(parse_filter("Other Bookmarks/My Stuff"), vec!["Other Bookmarks", "My Stuff"]);
    }

    #[test]
    fn test_explicit_overrides_win() {
        let settings = Settings::resolve(
            Some(PathBuf::from("/tmp/profiles")),
            Some(PathBuf::from("/tmp/cache")),
            Some("waterfox".to_string()),
        )
        .unwrap();

        assert_eq!(settings.profile_root, PathBuf::from("/tmp/profiles"));
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(settings.browser, "waterfox");
    }
}
