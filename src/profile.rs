//! Firefox profile discovery.
//!
//! `installs.ini` maps each installation to its default profile, `profiles.ini`
//! lists every profile with its `Name` and `Path`. Both are plain INI files
//! living in the profile root (`~/.mozilla/firefox` on Linux).

use ini::Ini;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

fn load_ini(path: &Path) -> Result<Ini> {
    Ini::load_from_file_noescape(path)
        .map_err(|e| Error::ProfileNotFound(format!("cannot read {:?}: {}", path, e)))
}

/// Path of the default profile: the `Default` key of the first section in
/// `installs.ini` that has one. Keys match case-insensitively.
pub fn default_profile_path(profile_root: &Path) -> Result<PathBuf> {
    let installs = load_ini(&profile_root.join("installs.ini"))?;

    for (section, props) in installs.iter() {
        if let Some(default) = props.get("Default") {
            debug!("Default profile {:?} from section {:?}", default, section);
            return Ok(profile_root.join(default));
        }
    }

    Err(Error::ProfileNotFound(
        "could not find a default profile in installs.ini".to_string(),
    ))
}

/// Path of the first profile in `profiles.ini` whose `Name` equals `name`.
///
/// Relative paths are resolved against `profile_root`; an absolute `Path`
/// (`IsRelative=0`) is returned as is.
pub fn profile_path_from_name(profile_root: &Path, name: &str) -> Result<PathBuf> {
    let profiles = load_ini(&profile_root.join("profiles.ini"))?;

    for (section, props) in profiles.iter() {
        if props.get("Name") != Some(name) {
            continue;
        }
        if let Some(path) = props.get("Path") {
            debug!("Profile {:?} found in section {:?}", name, section);
            return Ok(profile_root.join(path));
        }
    }

    Err(Error::ProfileNotFound(format!("no profile named {:?}", name)))
}

/// Resolve the named profile if given, otherwise the default one.
pub fn resolve(profile_root: &Path, name: Option<&str>) -> Result<PathBuf> {
    match name {
        Some(name) => profile_path_from_name(profile_root, name),
        None => default_profile_path(profile_root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PROFILES_INI: &str = "\
[General]
StartWithLastProfile=1
Version=2

[Profile1]
Name=work
IsRelative=1
Path=abcd.work

[Profile0]
Name=default-release
IsRelative=1
Path=wxyz.default-release
Default=1

[Profile2]
Name=work
IsRelative=1
Path=second.work

[Profile3]
Name=elsewhere
IsRelative=0
Path=/srv/firefox/elsewhere
";

    fn root_with(file: &str, content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(file), content).unwrap();
        dir
    }

    #[test]
    fn test_default_profile_first_section_with_key() {
        let dir = root_with(
            "installs.ini",
            "[4F96D1932A9F858E]\nLocked=1\n\n[46F4A6B6B4A12C3D]\nDefault=wxyz.default-release\nLocked=1\n\n[ABCDEF]\nDefault=other\n",
        );

        let path = default_profile_path(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("wxyz.default-release"));
    }

    #[test]
    fn test_default_profile_missing_key() {
        let dir = root_with("installs.ini", "[4F96D1932A9F858E]\nLocked=1\n");
        assert!(matches!(
            default_profile_path(dir.path()),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_default_profile_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            default_profile_path(dir.path()),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_named_profile_first_match() {
        let dir = root_with("profiles.ini", PROFILES_INI);
        let path = profile_path_from_name(dir.path(), "work").unwrap();
        assert_eq!(path, dir.path().join("abcd.work"));
    }

    #[test]
    fn test_named_profile_value_is_case_sensitive() {
        let dir = root_with("profiles.ini", PROFILES_INI);
        assert!(matches!(
            profile_path_from_name(dir.path(), "Work"),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_named_profile_absolute_path() {
        let dir = root_with("profiles.ini", PROFILES_INI);
        let path = profile_path_from_name(dir.path(), "elsewhere").unwrap();
        assert_eq!(path, PathBuf::from("/srv/firefox/elsewhere"));
    }

    #[test]
    fn test_named_profile_absent() {
        let dir = root_with("profiles.ini", PROFILES_INI);
        assert!(matches!(
            profile_path_from_name(dir.path(), "nope"),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let dir = root_with("installs.ini", "[X]\ndefault=lower.default\n");
        fs::write(
            dir.path().join("profiles.ini"),
            "[Profile0]\nNAME=work\npath=lower.work\n",
        )
        .unwrap();

        assert_eq!(
            default_profile_path(dir.path()).unwrap(),
            dir.path().join("lower.default")
        );
        assert_eq!(
            profile_path_from_name(dir.path(), "work").unwrap(),
            dir.path().join("lower.work")
        );
    }

    #[test]
    fn test_resolve_dispatches_on_name() {
        let dir = root_with("profiles.ini", PROFILES_INI);
        fs::write(dir.path().join("installs.ini"), "[X]\nDefault=dflt\n").unwrap();

        assert_eq!(resolve(dir.path(), None).unwrap(), dir.path().join("dflt"));
        assert_eq!(
            resolve(dir.path(), Some("default-release")).unwrap(),
            dir.path().join("wxyz.default-release")
        );
    }
}
