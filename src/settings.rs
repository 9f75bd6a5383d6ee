// Settings - which rows to show, the confidence gate, and per-host opt-outs
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const MAX_RAW_LENGTH_BONUS: u8 = 6;
pub const MAX_MIN_CONFIDENCE: u8 = 100;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("minConfidence must be between 0 and 100, got {0}")]
    MinConfidenceOutOfRange(i64),
    #[error("rawLengthBonus must be between 0 and 6, got {0}")]
    RawBonusOutOfRange(i64),
    #[error("Unknown setting: {0}. Supported: showHumanReadable, showISO8601, showRelative, minConfidence, rawLengthBonus")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed settings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub show_human_readable: bool,
    #[serde(rename = "showISO8601")]
    pub show_iso8601: bool,
    pub show_relative: bool,
    /// Percent a candidate must reach before it is surfaced
    pub min_confidence: u8,
    /// Score given to bare numbers with no surrounding structure
    pub raw_length_bonus: u8,
    pub disabled_hosts: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_human_readable: true,
            show_iso8601: true,
            show_relative: true,
            min_confidence: 50,
            raw_length_bonus: 3,
            disabled_hosts: Vec::new(),
        }
    }
}

impl Settings {
    /// Default settings file location
    pub fn config_file_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|dir| dir.join("epochlens").join("settings.json"))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load from the default location, falling back to defaults when no file exists
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_confidence > MAX_MIN_CONFIDENCE {
            return Err(SettingsError::MinConfidenceOutOfRange(self.min_confidence as i64));
        }
        if self.raw_length_bonus > MAX_RAW_LENGTH_BONUS {
            return Err(SettingsError::RawBonusOutOfRange(self.raw_length_bonus as i64));
        }
        Ok(())
    }

    /// Update a single field by its on-disk name
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        match key {
            "showHumanReadable" => self.show_human_readable = parse_bool(key, value)?,
            "showISO8601" => self.show_iso8601 = parse_bool(key, value)?,
            "showRelative" => self.show_relative = parse_bool(key, value)?,
            "minConfidence" => {
                let n = parse_int(key, value)?;
                if !(0..=MAX_MIN_CONFIDENCE as i64).contains(&n) {
                    return Err(SettingsError::MinConfidenceOutOfRange(n));
                }
                self.min_confidence = n as u8;
            }
            "rawLengthBonus" => {
                let n = parse_int(key, value)?;
                if !(0..=MAX_RAW_LENGTH_BONUS as i64).contains(&n) {
                    return Err(SettingsError::RawBonusOutOfRange(n));
                }
                self.raw_length_bonus = n as u8;
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// True when `host` or one of its parent domains is disabled
    pub fn is_host_disabled(&self, host: &str) -> bool {
        let host = host.trim().trim_end_matches('.').to_lowercase();
        self.disabled_hosts.iter().any(|disabled| {
            let disabled = disabled.trim().trim_end_matches('.').to_lowercase();
            !disabled.is_empty()
                && (host == disabled || host.ends_with(&format!(".{}", disabled)))
        })
    }

    /// Returns false if the host was already disabled
    pub fn disable_host(&mut self, host: &str) -> bool {
        let host = host.trim().to_lowercase();
        if host.is_empty() || self.disabled_hosts.iter().any(|h| h.eq_ignore_ascii_case(&host)) {
            return false;
        }
        self.disabled_hosts.push(host);
        true
    }

    /// Returns false if the host was not in the list
    pub fn enable_host(&mut self, host: &str) -> bool {
        let before = self.disabled_hosts.len();
        self.disabled_hosts
            .retain(|h| !h.eq_ignore_ascii_case(host.trim()));
        self.disabled_hosts.len() != before
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_int(key: &str, value: &str) -> Result<i64, SettingsError> {
    value.trim().parse::<i64>().map_err(|_| SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
