use crate::safety::CrisisResource;
use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

pub const CONFIG_ENV: &str = "MOOD_JOURNAL_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "mood_journal.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sentiment: SentimentConfig,
    pub journal: JournalConfig,
    pub safety: SafetyConfig,
    pub logging: LoggingConfig,
}

/// Remote provider settings. Leaving `endpoint` or `api_key` unset is a
/// supported configuration: the classifier then always scores locally.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub language: String,
    pub max_text_chars: usize,
    pub timeout_secs: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            language: "en".to_string(),
            max_text_chars: 5000,
            timeout_secs: 10,
        }
    }
}

impl SentimentConfig {
    /// Endpoint and key, when both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let endpoint = self.endpoint.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let key = self.api_key.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((endpoint, key))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub path: PathBuf,
    pub trend_window: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("mood_journal.json"),
            trend_window: 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    pub consecutive_negatives: usize,
    pub crisis_resources: Vec<CrisisResource>,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            consecutive_negatives: 3,
            crisis_resources: vec![
                CrisisResource::new("iCall", "9152987821"),
                CrisisResource::new("Vandrevala Foundation", "1860-2662-345"),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("mood_journal.log"),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

impl Config {
    /// Loads from `$MOOD_JOURNAL_CONFIG` or `./mood_journal.toml`, then applies
    /// environment overrides. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .wrap_err_with(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(endpoint) = get("AZURE_LANGUAGE_ENDPOINT") {
            self.sentiment.endpoint = Some(endpoint);
        }
        if let Some(key) = get("AZURE_LANGUAGE_KEY") {
            self.sentiment.api_key = Some(key);
        }
        if let Some(path) = get("MOOD_JOURNAL_PATH") {
            self.journal.path = PathBuf::from(path);
        }
    }
}
