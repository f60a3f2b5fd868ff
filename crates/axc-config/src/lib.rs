//! axc-config: input decks for the meanline solver.
//!
//! A deck is read into a [`RawConfig`] (bracketed sections or YAML), then
//! [`normalize`]d into a [`CompressorConfig`] holding SI quantities only.

pub mod error;
pub mod normalize;
pub mod raw;
pub mod schema;
pub mod template;
pub mod units;

pub use error::{ConfigError, ConfigResult};
pub use normalize::{normalize, parse_table, stage_section};
pub use raw::RawConfig;
pub use schema::*;
pub use template::template;
pub use units::{Quantity, UnitSystem};

use std::path::Path;

/// Read a deck file; `.yaml`/`.yml` files are parsed as YAML, anything else as sections.
pub fn load_raw(path: &Path) -> ConfigResult<RawConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        RawConfig::from_yaml(&content)
    } else {
        RawConfig::parse(&content)
    }
}

/// Read and normalize a deck file.
pub fn load(path: &Path) -> ConfigResult<CompressorConfig> {
    normalize(&load_raw(path)?)
}

/// Parse and normalize deck text in the section format.
pub fn from_str(text: &str) -> ConfigResult<CompressorConfig> {
    normalize(&RawConfig::parse(text)?)
}
