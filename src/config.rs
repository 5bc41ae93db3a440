use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotwatchError};

/// Accepted poll interval range, in seconds
pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub service: ServiceConfig,
    pub credentials: CredentialsConfig,
    pub poll: PollConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub query_url: String,
    pub book_url: String,
    pub locale_id: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            query_url: "https://hr-welcometo.huawei.com/obdService/api/app/heo/checkinplace_query"
                .to_string(),
            book_url: "https://hr-welcometo.huawei.com/obdService/api/app/heo/checkininfo_save"
                .to_string(),
            locale_id: "zh_CN".to_string(),
            connect_timeout_ms: 3000,
            read_timeout_ms: 10000,
        }
    }
}

impl ServiceConfig {
    /// Point both endpoints at a different host, keeping the service paths
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            query_url: format!("{}/obdService/api/app/heo/checkinplace_query", base),
            book_url: format!("{}/obdService/api/app/heo/checkininfo_save", base),
            ..Default::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub path: PathBuf,
    pub tenant_header: String,
    pub auth_header: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config.txt"),
            tenant_header: "X-Jalor-Tenantalias".to_string(),
            auth_header: "Authorization".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
    pub sleep_step_ms: u64,
    pub stop_grace_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            sleep_step_ms: 500,
            stop_grace_ms: 1000,
        }
    }
}

impl PollConfig {
    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 5, 12).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2025, 12, 22).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// Check a poll interval against the accepted range
pub fn validate_interval(secs: u64) -> Result<Duration> {
    if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
        return Err(SlotwatchError::InvalidInterval(secs));
    }
    Ok(Duration::from_secs(secs))
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Primary location ~/.config/<project>/<project>.yml, then ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let mut candidates = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(project_name).join(format!("{}.yml", project_name)));
        }
        candidates.push(PathBuf::from(format!("{}.yml", project_name)));

        Self::load_first_existing(&candidates)
    }

    /// Load the first candidate that exists. A file that exists but does not
    /// load is an error, never a silent fall back to defaults.
    fn load_first_existing(candidates: &[PathBuf]) -> Result<Self> {
        for path in candidates {
            if path.exists() {
                return Self::load_from_file(path).map_err(|e| {
                    log::error!("Failed to load config from {}: {}", path.display(), e);
                    SlotwatchError::Configuration(format!("{}: {}", path.display(), e))
                });
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values the poll loop cannot run with
    pub fn validate(&self) -> Result<()> {
        validate_interval(self.poll.interval_secs)?;
        if self.poll.sleep_step_ms == 0 {
            return Err(SlotwatchError::Configuration(
                "poll.sleep_step_ms must be greater than zero".to_string(),
            ));
        }
        if self.calendar.start > self.calendar.end {
            return Err(SlotwatchError::Configuration(format!(
                "calendar.start {} is after calendar.end {}",
                self.calendar.start, self.calendar.end
            )));
        }
        Ok(())
    }
}
