//! Environment-driven configuration.
//!
//! Every knob has a typed default except the user id. Unparseable values,
//! and zero periods or timeouts, fall back to the default rather than
//! failing startup.

use std::time::Duration;

use tracing::warn;

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::layout::editor::{DEFAULT_SAVE_TIMEOUT_MS, EditorOptions};
use crate::layout::keys::Platform;
use crate::motion::context::{ConnectionClass, RuntimeContext, UserPreference};
use crate::motion::perf::{DEFAULT_DROP_THRESHOLD_FPS, DEFAULT_WINDOW_FRAMES, TrackerConfig};
use crate::net::http::HttpTimeouts;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },
}

impl ConfigError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "E_CONFIG_MISSING",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_url: String,
    pub user_id: String,
    pub save_timeout: Duration,
    pub http: HttpTimeouts,
    pub history_capacity: usize,
    pub poll_interval: Duration,
    pub tracker: TrackerConfig,
    pub prefers_reduced_motion: bool,
    pub platform: Platform,
    pub runtime: RuntimeContext,
}

impl DashboardConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `DASHBOARD_USER_ID` is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if `DASHBOARD_USER_ID` is missing or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let user_id = lookup("DASHBOARD_USER_ID")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing { var: "DASHBOARD_USER_ID" })?;
        let api_url = lookup("DASHBOARD_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());

        let save_timeout_ms = env_parse_nonzero(&lookup, "DASHBOARD_SAVE_TIMEOUT_MS", DEFAULT_SAVE_TIMEOUT_MS);
        let poll_interval_ms = env_parse_nonzero(&lookup, "DASHBOARD_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS);

        Ok(Self {
            api_url,
            user_id,
            save_timeout: Duration::from_millis(save_timeout_ms),
            http: HttpTimeouts {
                request_secs: env_parse_nonzero(
                    &lookup,
                    "DASHBOARD_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                ),
                connect_secs: env_parse_nonzero(
                    &lookup,
                    "DASHBOARD_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CONNECT_TIMEOUT_SECS,
                ),
            },
            history_capacity: env_parse(&lookup, "DASHBOARD_HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY),
            poll_interval: Duration::from_millis(poll_interval_ms),
            tracker: TrackerConfig {
                window_frames: env_parse(&lookup, "MOTION_TRACK_WINDOW_FRAMES", DEFAULT_WINDOW_FRAMES),
                drop_threshold_fps: env_parse(&lookup, "MOTION_DROP_THRESHOLD_FPS", DEFAULT_DROP_THRESHOLD_FPS),
            },
            prefers_reduced_motion: env_parse(&lookup, "PREFERS_REDUCED_MOTION", false),
            platform: lookup("DASHBOARD_PLATFORM").map_or_else(Platform::default, |p| Platform::detect(&p)),
            runtime: RuntimeContext {
                is_mobile: env_parse(&lookup, "MOTION_IS_MOBILE", false),
                is_low_power: env_parse(&lookup, "MOTION_LOW_POWER", false),
                connection: lookup("MOTION_CONNECTION")
                    .map_or_else(ConnectionClass::default, |c| ConnectionClass::from_effective_type(&c)),
                preference: lookup("MOTION_STYLE")
                    .map_or_else(UserPreference::default, |s| UserPreference::parse(&s)),
            },
        })
    }

    #[must_use]
    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            history_capacity: self.history_capacity,
            save_timeout: self.save_timeout,
            platform: self.platform,
        }
    }
}

fn env_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Like [`env_parse`], but zero also falls back to the default. Used for
/// periods and timeouts, where zero is never meaningful.
fn env_parse_nonzero(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    match env_parse(lookup, key, default) {
        0 => {
            warn!(key, default, "zero is not a valid value; using default");
            default
        }
        value => value,
    }
}
