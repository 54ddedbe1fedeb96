//! rofi script-mode output.
//!
//! Each line is `<display text>\0<key>\x1f<value>[\x1f<key>\x1f<value>...]`.
//! A line starting with `\0` sets a mode option such as the prompt.

use std::io::{self, Write};
use std::path::PathBuf;

/// `ROFI_RETV=1` means the user picked an entry.
pub const RETV_VAR: &str = "ROFI_RETV";
/// The `info` payload of the picked entry.
pub const INFO_VAR: &str = "ROFI_INFO";

/// One selectable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub url: String,
    pub icon: Option<PathBuf>,
}

impl Entry {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            icon: None,
        }
    }
}

/// NUL and newline would split or truncate the row.
fn sanitize(text: &str) -> String {
    text.replace(['\0', '\n', '\r'], " ")
}

pub fn write_prompt<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    writeln!(out, "\0prompt\x1f{}", sanitize(text))
}

pub fn write_entry<W: Write>(out: &mut W, entry: &Entry) -> io::Result<()> {
    let title = sanitize(&entry.title);
    let url = sanitize(&entry.url);
    match &entry.icon {
        Some(icon) => writeln!(
            out,
            "{}\0icon\x1f{}\x1finfo\x1f{}",
            title,
            sanitize(&icon.to_string_lossy()),
            url
        ),
        None => writeln!(out, "{}\0info\x1f{}", title, url),
    }
}

/// Launch mode is selected when rofi reports a pick.
pub fn is_selection(retv: Option<&str>) -> bool {
    retv == Some("1")
}
