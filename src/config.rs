//! Game configuration loaded from TOML with environment overrides.

use std::path::{Path, PathBuf};

use ball_knowledge_rules::MatchSettings;
use chrono_tz::Tz;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};
use tracing::{debug, info, instrument};

/// Environment variable overriding [`GameConfig::database_path`].
pub const DB_ENV: &str = "BALL_KNOWLEDGE_DB";
/// Environment variable overriding [`GameConfig::snapshot_path`].
pub const SNAPSHOT_ENV: &str = "BALL_KNOWLEDGE_SNAPSHOT";
/// Environment variable overriding [`GameConfig::timezone`].
pub const TIMEZONE_ENV: &str = "TIMEZONE";

/// Which game variant a suggestion threshold applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay, EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// One subject per reference day.
    Daily,
    /// Rapid rounds against the clock.
    Timed,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// IANA name of the reference time zone.
    #[serde(default = "default_timezone")]
    timezone: String,

    /// SQLite database file. Absent means local (snapshot-only) mode.
    #[serde(default)]
    database_path: Option<String>,

    /// JSON snapshot used as the local population.
    #[serde(default = "default_snapshot_path")]
    snapshot_path: PathBuf,

    /// Maximum number of suggestions offered after a wrong guess.
    #[serde(default = "default_suggestion_limit")]
    suggestion_limit: usize,

    /// Minimum suggestion score in daily mode.
    #[serde(default = "default_daily_min_score")]
    daily_min_score: f64,

    /// Minimum suggestion score in timed mode.
    #[serde(default = "default_timed_min_score")]
    timed_min_score: f64,
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/players_seed.json")
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_daily_min_score() -> f64 {
    80.0
}

fn default_timed_min_score() -> f64 {
    72.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            database_path: None,
            snapshot_path: default_snapshot_path(),
            suggestion_limit: default_suggestion_limit(),
            daily_min_score: default_daily_min_score(),
            timed_min_score: default_timed_min_score(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file; missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(timezone = %config.timezone, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, typically `|k| std::env::var(k).ok()`.
    ///
    /// An empty database override switches to local mode.
    #[instrument(skip(self, lookup))]
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(db) = lookup(DB_ENV) {
            debug!(db = %db, "Database path overridden");
            self.database_path = Some(db).filter(|d| !d.trim().is_empty());
        }
        if let Some(snapshot) = lookup(SNAPSHOT_ENV) {
            debug!(snapshot = %snapshot, "Snapshot path overridden");
            self.snapshot_path = PathBuf::from(snapshot);
        }
        if let Some(tz) = lookup(TIMEZONE_ENV) {
            debug!(timezone = %tz, "Time zone overridden");
            self.timezone = tz;
        }
        self.validate()?;
        Ok(self)
    }

    /// Replaces the database path.
    pub fn with_database_path(mut self, path: Option<String>) -> Self {
        self.database_path = path;
        self
    }

    /// Replaces the snapshot path.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    /// The parsed reference time zone.
    #[instrument(skip(self), fields(timezone = %self.timezone))]
    pub fn reference_zone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::new(format!("Unknown time zone '{}': {}", self.timezone, e)))
    }

    /// Suggestion settings for `mode`.
    pub fn match_settings(&self, mode: GameMode) -> MatchSettings {
        let min_score = match mode {
            GameMode::Daily => self.daily_min_score,
            GameMode::Timed => self.timed_min_score,
        };
        MatchSettings::new(self.suggestion_limit, min_score)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.reference_zone()?;
        for (name, value) in [
            ("daily_min_score", self.daily_min_score),
            ("timed_min_score", self.timed_min_score),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::new(format!(
                    "{} must be within 0..=100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
