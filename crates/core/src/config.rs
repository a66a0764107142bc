//! Application configuration
//!
//! Loaded from a TOML file. Every field has a default, so a missing file or
//! a partial one is fine; unknown keys are ignored.
//!
//! ```toml
//! [calendar]
//! calendar_id = "primary"
//! access_token = "ya29..."
//! time_zone = "Asia/Jakarta"
//! timeout_ms = 5000
//! max_attempts = 2
//!
//! [wheel]
//! single_duration_ms = 4000
//! seed = 42
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::session::SessionTiming;
use crate::wheel::SpinProfile;

/// Google Calendar v3 API root
pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Environment variable overriding `calendar.access_token`
pub const ENV_CALENDAR_TOKEN: &str = "RAPAT_CALENDAR_TOKEN";
/// Environment variable overriding `calendar.calendar_id`
pub const ENV_CALENDAR_ID: &str = "RAPAT_CALENDAR_ID";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub calendar: CalendarSettings,
    pub wheel: WheelSettings,
}

/// Calendar provider connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub base_url: String,
    pub calendar_id: String,
    /// OAuth bearer token; preferred over `api_key`
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    /// IANA zone sent with created events
    pub time_zone: String,
    pub timeout_ms: u64,
    pub max_attempts: u32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CALENDAR_BASE_URL.to_string(),
            calendar_id: "primary".to_string(),
            access_token: None,
            api_key: None,
            time_zone: "Asia/Jakarta".to_string(),
            timeout_ms: 5000,
            max_attempts: 2,
        }
    }
}

impl CalendarSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Attempt budget, never below one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Whether any credential is available
    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some() || self.api_key.is_some()
    }
}

/// Wheel animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSettings {
    pub single_duration_ms: u64,
    pub sequential_duration_ms: u64,
    pub reveal_pause_ms: u64,
    pub frame_interval_ms: u64,
    /// Fixed random seed for reproducible draws
    pub seed: Option<u64>,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            single_duration_ms: 4000,
            sequential_duration_ms: 2000,
            reveal_pause_ms: 800,
            frame_interval_ms: 16,
            seed: None,
        }
    }
}

impl WheelSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Session timing derived from these settings
    pub fn timing(&self) -> SessionTiming {
        SessionTiming {
            single: SpinProfile::SINGLE
                .with_duration(Duration::from_millis(self.single_duration_ms)),
            sequential: SpinProfile::SEQUENTIAL
                .with_duration(Duration::from_millis(self.sequential_duration_ms)),
            reveal_pause: Duration::from_millis(self.reveal_pause_ms),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, using defaults if the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse configuration from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `RAPAT_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_CALENDAR_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.calendar.access_token = Some(token);
        }
        if let Some(id) = lookup(ENV_CALENDAR_ID).filter(|v| !v.trim().is_empty()) {
            self.calendar.calendar_id = id;
        }
        self
    }
}
