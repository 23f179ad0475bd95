use std::time;

use chrono::Duration;
use ironlog_domain::SEARCH_DEBOUNCE_MILLIS;

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, String>;
    async fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

/// User-adjustable configuration. Missing fields take their default value.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub search_debounce_millis: i64,
    pub search_result_limit: usize,
    pub version_poll_interval_secs: u64,
    pub log_level: LogLevel,
}

impl Settings {
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::milliseconds(self.search_debounce_millis.max(0))
    }

    #[must_use]
    pub fn version_poll_interval(&self) -> time::Duration {
        time::Duration::from_secs(self.version_poll_interval_secs.max(1))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_debounce_millis: SEARCH_DEBOUNCE_MILLIS,
            search_result_limit: 50,
            version_poll_interval_secs: 300,
            log_level: LogLevel::default(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
