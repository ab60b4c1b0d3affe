//! Environment based configuration for the sync binary.

use std::env;

use chainmap_core::errors::ErrorInfo;
use chainmap_core::ChainError;
use reqwest::Url;

/// Default horizontal step between chain depth levels, in map units.
const DEFAULT_X_SEPARATION: f64 = 195.0;
/// Default vertical separation between sibling systems, in map units.
const DEFAULT_Y_SEPARATION: f64 = 60.0;
/// Default pause between sync cycles, in seconds.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Runtime configuration, loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the target map service (`MAP_URL`).
    pub map_url: String,
    /// Bearer token for the target map (`MAP_API_KEY`).
    pub map_api_key: String,
    /// Map identifier within the target service (`MAP_SLUG`).
    pub map_slug: String,
    /// Root system the chain is discovered from (`MAP_HOME_SYSTEM_ID`).
    pub home_system_id: i64,
    /// Base URL of the source inventory (`SOURCE_URL`).
    pub source_url: String,
    /// Basic auth user for the source (`SOURCE_USER`).
    pub source_user: String,
    /// Basic auth password for the source (`SOURCE_PASSWORD`).
    pub source_password: String,
    /// Sharing mask the source scopes its records to (`SOURCE_MASK_ID`).
    pub source_mask_id: String,
    /// Horizontal layout step (`POSITION_X_SEPARATION`).
    pub position_x_separation: f64,
    /// Vertical layout separation (`POSITION_Y_SEPARATION`).
    pub position_y_separation: f64,
    /// Seconds between sync cycles (`POLL_INTERVAL_SECONDS`).
    pub poll_interval_secs: u64,
    /// Optional guard system (`SKIP_GUARD_SYSTEM_ID`): while this system is
    /// present anywhere on the target map, the write phase is suppressed.
    pub skip_guard_system_id: Option<i64>,
}

impl SyncConfig {
    /// Loads and validates the configuration from the process environment.
    pub fn from_env() -> Result<Self, ChainError> {
        let config = Self {
            map_url: trimmed_env("MAP_URL").trim_end_matches('/').to_string(),
            map_api_key: trimmed_env("MAP_API_KEY"),
            map_slug: trimmed_env("MAP_SLUG"),
            home_system_id: required_positive_int("MAP_HOME_SYSTEM_ID")?,
            source_url: trimmed_env("SOURCE_URL").trim_end_matches('/').to_string(),
            source_user: trimmed_env("SOURCE_USER"),
            source_password: trimmed_env("SOURCE_PASSWORD"),
            source_mask_id: trimmed_env("SOURCE_MASK_ID"),
            position_x_separation: optional_positive_float(
                "POSITION_X_SEPARATION",
                DEFAULT_X_SEPARATION,
            )?,
            position_y_separation: optional_positive_float(
                "POSITION_Y_SEPARATION",
                DEFAULT_Y_SEPARATION,
            )?,
            poll_interval_secs: optional_positive_int("POLL_INTERVAL_SECONDS")?
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            skip_guard_system_id: optional_positive_int("SKIP_GUARD_SYSTEM_ID")?
                .map(|value| value as i64),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates field presence and URL shape. Split from [`Self::from_env`]
    /// so constructed configurations can be checked directly in tests.
    pub fn validate(&self) -> Result<(), ChainError> {
        require_nonempty("MAP_URL", &self.map_url)?;
        require_url("MAP_URL", &self.map_url)?;
        require_nonempty("MAP_API_KEY", &self.map_api_key)?;
        require_nonempty("MAP_SLUG", &self.map_slug)?;
        require_nonempty("SOURCE_URL", &self.source_url)?;
        require_url("SOURCE_URL", &self.source_url)?;
        require_nonempty("SOURCE_USER", &self.source_user)?;
        require_nonempty("SOURCE_PASSWORD", &self.source_password)?;
        require_nonempty("SOURCE_MASK_ID", &self.source_mask_id)?;
        if self.home_system_id <= 0 {
            return Err(config_error("non-positive", "value must be positive")
                .with_field("MAP_HOME_SYSTEM_ID"));
        }
        Ok(())
    }
}

fn trimmed_env(key: &str) -> String {
    env::var(key).unwrap_or_default().trim().to_string()
}

fn required_positive_int(key: &str) -> Result<i64, ChainError> {
    let raw = trimmed_env(key);
    if raw.is_empty() {
        return Err(config_error("missing", "required setting is not set").with_field(key));
    }
    parse_positive_int(key, &raw)
}

fn optional_positive_int(key: &str) -> Result<Option<u64>, ChainError> {
    let raw = trimmed_env(key);
    if raw.is_empty() {
        return Ok(None);
    }
    parse_positive_int(key, &raw).map(|value| Some(value as u64))
}

fn parse_positive_int(key: &str, raw: &str) -> Result<i64, ChainError> {
    let value: i64 = raw.parse().map_err(|_| {
        config_error("not-an-integer", "value must be a valid integer").with_field(key)
    })?;
    if value <= 0 {
        return Err(config_error("non-positive", "value must be positive").with_field(key));
    }
    Ok(value)
}

fn optional_positive_float(key: &str, default: f64) -> Result<f64, ChainError> {
    let raw = trimmed_env(key);
    if raw.is_empty() {
        return Ok(default);
    }
    let value: f64 = raw.parse().map_err(|_| {
        config_error("not-a-number", "value must be a valid number").with_field(key)
    })?;
    if value <= 0.0 {
        return Err(config_error("non-positive", "value must be positive").with_field(key));
    }
    Ok(value)
}

fn require_nonempty(key: &str, value: &str) -> Result<(), ChainError> {
    if value.is_empty() {
        return Err(config_error("missing", "required setting is not set").with_field(key));
    }
    Ok(())
}

fn require_url(key: &str, value: &str) -> Result<(), ChainError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|_| config_error("invalid-url", "value is not a valid URL").with_field(key))
}

fn config_error(code: &str, message: &str) -> ChainError {
    ChainError::Config(ErrorInfo::new(code, message))
}

trait FieldExt {
    fn with_field(self, key: &str) -> ChainError;
}

impl FieldExt for ChainError {
    fn with_field(self, key: &str) -> ChainError {
        match self {
            ChainError::Config(info) => ChainError::Config(info.with_context("setting", key)),
            other => other,
        }
    }
}
