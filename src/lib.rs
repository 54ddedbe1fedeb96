//! List Firefox bookmarks for rofi's script mode and open the picked one.

pub mod config;
pub mod error;
pub mod favicons;
pub mod launch;
pub mod listing;
pub mod places;
pub mod profile;
pub mod rofi;
pub mod snapshot;
pub mod tree;

pub use error::{Error, Result};
