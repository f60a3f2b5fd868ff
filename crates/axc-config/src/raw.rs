//! Raw section map read from a deck, before any interpretation.
//!
//! Two deck syntaxes are accepted:
//!
//! ```text
//! [INLET]
//! - total_pressure: 101325
//! - mass_flow: 100
//! ```
//!
//! and a YAML mapping of section → key → scalar. Section names and keys are
//! case-insensitive; both are stored upper/lower-cased respectively. Keys with empty
//! values are treated as absent, so the blank template parses to an empty map.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `section → key → raw value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

fn section_name(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

fn key_name(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the bracketed section format.
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let mut raw = Self::new();
        let mut current: Option<String> = None;

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('=') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| ConfigError::Syntax {
                    line: idx + 1,
                    what: format!("unterminated section header '{line}'"),
                })?;
                let name = section_name(name);
                raw.sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }

            let entry = line.strip_prefix('-').unwrap_or(line);
            let (key, value) = entry.split_once(':').ok_or_else(|| ConfigError::Syntax {
                line: idx + 1,
                what: format!("expected '- key: value', found '{line}'"),
            })?;
            let section = current.as_deref().ok_or_else(|| ConfigError::Syntax {
                line: idx + 1,
                what: "entry before the first section header".to_string(),
            })?;
            let section = section.to_string();
            raw.insert(&section, key, value);
        }

        Ok(raw)
    }

    /// Parse a YAML mapping of section → key → value.
    ///
    /// Sequence values are flattened: a list of `[phi, value]` pairs becomes the
    /// `phi:value, …` table syntax, a list of numbers becomes a comma separated list.
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let doc: BTreeMap<String, Option<BTreeMap<String, serde_yaml::Value>>> =
            serde_yaml::from_str(text)?;
        let mut raw = Self::new();
        for (section, entries) in doc {
            raw.sections.entry(section_name(&section)).or_default();
            for (key, value) in entries.unwrap_or_default() {
                let text = yaml_to_text(&value).ok_or_else(|| ConfigError::Parse {
                    section: section_name(&section),
                    key: key_name(&key),
                    value: format!("{value:?}"),
                    reason: "expected a scalar, a list of numbers or a list of pairs".into(),
                })?;
                raw.insert(&section, &key, &text);
            }
        }
        Ok(raw)
    }

    /// Insert one entry; an empty value removes the key.
    pub fn insert(&mut self, section: &str, key: &str, value: &str) {
        let entries = self.sections.entry(section_name(section)).or_default();
        let value = value.trim();
        if value.is_empty() {
            entries.remove(&key_name(key));
        } else {
            entries.insert(key_name(key), value.to_string());
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section_name(section))?
            .get(&key_name(key))
            .map(String::as_str)
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(&section_name(section))
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render back to the bracketed section format.
    #[cfg(test)]
    fn to_deck(&self) -> String {
        let mut out = String::new();
        for (section, entries) in &self.sections {
            out.push_str(&format!("[{section}]\n"));
            for (key, value) in entries {
                out.push_str(&format!("- {key}: {value}\n"));
            }
            out.push('\n');
        }
        out
    }
}

fn yaml_to_text(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(items) => {
            let parts = items
                .iter()
                .map(|item| match item {
                    Value::Sequence(pair) if pair.len() == 2 => {
                        Some(format!("{}:{}", yaml_to_text(&pair[0])?, yaml_to_text(&pair[1])?))
                    }
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?;
            Some(parts.join(", "))
        }
        _ => None,
    }
}
