//! CLI configuration: file locations and the default actor, read from
//! `reqtrace.toml` in the working directory. Every field has a default so a
//! missing file just means defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "reqtrace.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// JSON dump of the link record collection.
    pub ledger: PathBuf,
    /// Entity snapshot exported by the host model.
    pub entities: PathBuf,
    /// Topology edge snapshot (orphan detection only).
    pub edges: PathBuf,
    /// Recorded as `created_by` when adding links; falls back to `$USER`.
    pub actor: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            ledger: PathBuf::from("links.json"),
            entities: PathBuf::from("entities.json"),
            edges: PathBuf::from("edges.json"),
            actor: None,
        }
    }
}

impl CliConfig {
    /// Load the config file, or defaults if it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Serialize the default config, for `reqtrace init`.
    pub fn default_toml() -> anyhow::Result<String> {
        toml::to_string_pretty(&Self::default()).context("serializing default config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = CliConfig::load(Path::new("does-not-exist.toml")).expect("defaults");
        assert_eq!(config.ledger, PathBuf::from("links.json"));
        assert_eq!(config.actor, None);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let config: CliConfig = toml::from_str("actor = \"jane\"").expect("parse");
        assert_eq!(config.actor.as_deref(), Some("jane"));
        assert_eq!(config.entities, PathBuf::from("entities.json"));
    }

    #[test]
    fn default_toml_roundtrips() {
        let raw = CliConfig::default_toml().expect("serialize");
        let back: CliConfig = toml::from_str(&raw).expect("parse");
        assert_eq!(back.ledger, CliConfig::default().ledger);
    }
}
