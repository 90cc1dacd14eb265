use crate::insight::TeamKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Which team cards get rendered. Stored as part of the config record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTeams {
    pub product: bool,
    pub business: bool,
    pub tech: bool,
    pub marketing: bool,
}

impl Default for SelectedTeams {
    fn default() -> Self {
        Self {
            product: true,
            business: true,
            tech: true,
            marketing: true,
        }
    }
}

impl SelectedTeams {
    pub fn is_selected(&self, team: TeamKey) -> bool {
        match team {
            TeamKey::Product => self.product,
            TeamKey::Business => self.business,
            TeamKey::Tech => self.tech,
            TeamKey::Marketing => self.marketing,
        }
    }

    /// Selection containing exactly the listed teams.
    pub fn from_list(teams: &[TeamKey]) -> Self {
        let mut selected = Self {
            product: false,
            business: false,
            tech: false,
            marketing: false,
        };
        for team in teams {
            match team {
                TeamKey::Product => selected.product = true,
                TeamKey::Business => selected.business = true,
                TeamKey::Tech => selected.tech = true,
                TeamKey::Marketing => selected.marketing = true,
            }
        }
        selected
    }
}

/// The persisted user configuration. Field names match the JSON record the
/// store keeps on disk (`apiKey`, `selectedModel`, `selectedTeams`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub api_key: String,
    pub selected_model: String,
    pub selected_teams: SelectedTeams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            selected_model: DEFAULT_MODEL.to_string(),
            selected_teams: SelectedTeams::default(),
        }
    }
}

impl Config {
    /// Built-in default record. The deployment environment may pre-fill the
    /// API key through GEMINI_API_KEY (loaded from `.env` by the binary).
    pub fn default_from_env() -> Self {
        Self {
            api_key: env("GEMINI_API_KEY", ""),
            ..Self::default()
        }
    }
}

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Persistent key-value store for the config record, one JSON file under a
/// fixed per-user path. The core only ever reads it at request time; writes
/// happen at explicit save boundaries.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("insights-dashboard")
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record, falling back to the built-in default when the
    /// file is missing or unreadable.
    pub fn load(&self) -> Config {
        if let Ok(raw) = fs::read_to_string(&self.path) {
            match serde_json::from_str(&raw) {
                Ok(config) => return config,
                Err(e) => warn!("Stored config unreadable ({e}), using defaults"),
            }
        }
        Config::default_from_env()
    }

    pub fn save(&self, config: &Config) -> bool {
        match serde_json::to_value(config) {
            Ok(Value::Object(map)) => self.write_record(&map),
            _ => false,
        }
    }

    /// Read a single field of the stored record.
    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.record().get(key).cloned()
    }

    /// Write a single field of the stored record, keeping the rest intact
    /// (including keys the typed [`Config`] does not know about).
    #[allow(dead_code)]
    pub fn set(&self, key: &str, value: Value) -> bool {
        let mut record = self.record();
        record.insert(key.to_string(), value);
        self.write_record(&record)
    }

    /// The raw stored record, or the serialized default when the file is
    /// missing or unreadable.
    fn record(&self) -> serde_json::Map<String, Value> {
        if let Ok(raw) = fs::read_to_string(&self.path) {
            if let Ok(Value::Object(map)) = serde_json::from_str(&raw) {
                return map;
            }
        }
        match serde_json::to_value(Config::default_from_env()) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }

    fn write_record(&self, record: &serde_json::Map<String, Value>) -> bool {
        if let Some(dir) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                error!("Error saving config: {e}");
                return false;
            }
        }
        let raw = match serde_json::to_string_pretty(record) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error saving config: {e}");
                return false;
            }
        };
        match fs::write(&self.path, raw) {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving config: {e}");
                false
            }
        }
    }

    pub fn clear(&self) {
        fs::remove_file(&self.path).ok();
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
