use crate::error::ConfigError;
use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use reqwest::Url;
use serde_derive::Deserialize;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub(crate) fn load_app_config() -> Result<AppConfig> {
    match envy::from_env::<AppConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load AppConfig: {}", err)),
    }
}

fn default_look_days_in_past() -> u32 {
    7
}

fn default_sleep_duration_min() -> u64 {
    60
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_timezone() -> String {
    "America/Toronto".to_string()
}

/// What to do with a CSV row whose hour label cannot be resolved.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MalformedSlotPolicy {
    /// Log and drop the row, keep the rest of the day
    #[default]
    Skip,
    /// Fail the whole day
    Abort,
}

#[derive(Deserialize, Debug)]
pub struct CollectorConfig {
    // how many days before today to look for missing data
    #[serde(default = "default_look_days_in_past")]
    pub look_days_in_past: u32,
    // 0 runs a single cycle and exits
    #[serde(default = "default_sleep_duration_min")]
    pub sleep_duration_min: u64,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub malformed_slot_policy: MalformedSlotPolicy,
}

impl CollectorConfig {
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::invalid("timezone", e.to_string()))
    }

    pub fn sleep_duration(&self) -> Option<Duration> {
        match self.sleep_duration_min {
            0 => None,
            minutes => Some(Duration::from_secs(minutes * 60)),
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

pub fn load_collector_config() -> Result<CollectorConfig> {
    match envy::prefixed("COLLECTOR_").from_env::<CollectorConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load CollectorConfig: {}", err)),
    }
}

fn default_portal_url() -> String {
    "https://www.torontohydro.com".to_string()
}

fn default_mock_url() -> String {
    "http://localhost:9999".to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct TorontoHydroConfig {
    pub username: String,
    pub password: String,
    #[serde(default = "default_portal_url")]
    pub url: String,
    // restricts the cycle to a single meter number
    #[serde(default)]
    pub meter: Option<String>,
    #[serde(default)]
    pub mock: bool,
    #[serde(default = "default_mock_url")]
    pub mock_url: String,
}

impl TorontoHydroConfig {
    /// Base URL requests are sent to, honouring mock mode.
    pub fn base_url(&self) -> &str {
        if self.mock {
            &self.mock_url
        } else {
            &self.url
        }
    }

    /// Address the in-process mock portal listens on: every interface, on
    /// the port of `mock_url`.
    pub fn mock_listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let url = Url::parse(&self.mock_url)
            .map_err(|e| ConfigError::invalid("TORONTO_HYDRO_MOCK_URL", e.to_string()))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| ConfigError::invalid("TORONTO_HYDRO_MOCK_URL", "no port"))?;
        Ok(SocketAddr::from(([0, 0, 0, 0], port)))
    }
}

pub(crate) fn load_toronto_hydro_config() -> Result<TorontoHydroConfig> {
    match envy::prefixed("TORONTO_HYDRO_").from_env::<TorontoHydroConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load TorontoHydroConfig: {}", err)),
    }
}

#[derive(Deserialize, Debug)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

pub fn load_influx_config() -> Result<InfluxConfig> {
    match envy::prefixed("INFLUXDB_").from_env::<InfluxConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load InfluxConfig: {}", err)),
    }
}
