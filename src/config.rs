//! Run configuration.
//!
//! Loaded from a YAML file; a missing file degrades to defaults with a
//! warning so the tool stays usable out of the box. SMTP credentials are
//! never stored in the file; they come from environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "clubscout.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input roster CSV (Club Name + Website URL columns).
    pub roster: PathBuf,
    /// Incrementally-updated results store.
    pub results: PathBuf,
    /// Append-only outreach send log (JSONL).
    pub send_log: PathBuf,
    pub reference_sources: Vec<ReferenceSourceConfig>,
    /// Pause between clubs so target sites are not hammered.
    pub politeness_delay_ms: u64,
    /// Per-fetch network timeout.
    pub fetch_timeout_secs: u64,
    /// Visible-text length below which a page is considered JS-heavy.
    pub min_visible_text: usize,
    /// Enable the headless-browser fallback for JS-heavy pages.
    pub js_fallback: bool,
    pub webdriver_url: String,
    pub smtp: SmtpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            roster: PathBuf::from("data/clubs.csv"),
            results: PathBuf::from("results/clubs.json"),
            send_log: PathBuf::from("results/send_log.jsonl"),
            reference_sources: vec![
                ReferenceSourceConfig {
                    name: "association-directory".to_string(),
                    kind: ReferenceKind::Association,
                    path: PathBuf::from("data/association_clubs.csv"),
                },
                ReferenceSourceConfig {
                    name: "city-facilities".to_string(),
                    kind: ReferenceKind::City,
                    path: PathBuf::from("data/city_facilities.csv"),
                },
            ],
            politeness_delay_ms: 500,
            fetch_timeout_secs: 10,
            min_visible_text: 200,
            js_fallback: false,
            webdriver_url: "http://localhost:9515".to_string(),
            smtp: SmtpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSourceConfig {
    pub name: String,
    pub kind: ReferenceKind,
    pub path: PathBuf,
}

/// Which column layout a reference dataset uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// name, email, website_url, type, location
    Association,
    /// name, website_url, courts, membership_status, phone, type
    City,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    /// From address; falls back to the EMAIL_ADDRESS env var.
    pub from: Option<String>,
    /// Pause between sends.
    pub send_delay_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        SmtpConfig {
            server: "smtp.gmail.com".to_string(),
            port: 587,
            from: None,
            send_delay_secs: 5,
        }
    }
}

impl Config {
    /// Read the config file, or fall back to defaults when it does not
    /// exist. A file that exists but fails to parse is a hard error;
    /// silently ignoring a typo'd config would be worse than stopping.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).context("failed to parse config YAML")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_yaml_over_defaults() {
        let yaml = r#"
roster: my/clubs.csv
js_fallback: true
reference_sources:
  - name: assoc
    kind: association
    path: data/assoc.csv
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.roster, PathBuf::from("my/clubs.csv"));
        assert!(config.js_fallback);
        assert_eq!(config.reference_sources.len(), 1);
        assert_eq!(config.reference_sources[0].kind, ReferenceKind::Association);
        // Untouched keys keep their defaults.
        assert_eq!(config.politeness_delay_ms, 500);
        assert_eq!(config.smtp.port, 587);
    }

    #[test]
    fn default_config_round_trips() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.min_visible_text, 200);
        assert_eq!(back.reference_sources.len(), 2);
    }
}
