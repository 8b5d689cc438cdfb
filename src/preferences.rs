use crate::catalog::Catalog;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

const FILENAME: &str = "gaslighter.toml";

pub const DEFAULT_LISTING_TEMPLATE: &str = "{{ path }}:{{ line }}:{{ column }}: {{ message }}";

/// User preferences from `gaslighter.toml`.
///
/// The file is read once at startup and never written back. Runtime
/// changes (the toggle, percentage updates) live and die with the
/// process; only this file carries settings across restarts.
#[derive(Debug, Deserialize)]
pub struct Preferences {
    /// Percentage of eligible lines that receive an annotation, 1-100.
    #[serde(default = "default_percentage")]
    pub percentage: u8,

    /// Quiet period in milliseconds after an edit or focus change
    /// before the overlay repaints.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Template for `annotate` listing lines.
    #[serde(default = "default_listing_template")]
    pub listing_template: String,

    /// Replacement message catalog. Absent means the built-in set.
    #[serde(default)]
    pub messages: Option<Vec<String>>,
}

fn default_percentage() -> u8 {
    5
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_listing_template() -> String {
    DEFAULT_LISTING_TEMPLATE.into()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            percentage: default_percentage(),
            debounce_ms: default_debounce_ms(),
            listing_template: default_listing_template(),
            messages: None,
        }
    }
}

impl Preferences {
    /// Load preferences from `gaslighter.toml` in `dir`. A missing file
    /// means defaults; a present file must parse and validate.
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_file(&dir.join(FILENAME))
    }

    /// Load preferences from an explicit path (the `--config` flag).
    pub fn load_file(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let prefs: Preferences = toml::from_str(&contents)
                    .with_context(|| format!("parsing {}", path.display()))?;
                if !(1..=100).contains(&prefs.percentage) {
                    bail!(
                        "percentage must be between 1 and 100, got {} in {}",
                        prefs.percentage,
                        path.display()
                    );
                }
                Ok(prefs)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Build the message catalog: the `messages` override when present,
    /// the built-in set otherwise.
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.messages {
            Some(messages) => Catalog::from_messages(messages.clone()).context(
                "messages list in gaslighter.toml is empty; omit the key to keep the built-in catalog",
            ),
            None => Ok(Catalog::built_in()),
        }
    }
}
