//! # Client Configuration Module
//!
//! Loads the settings the reservation page client needs to reach its backend.
//!
//! ## Environment Variables
//!
//! - `PIANOROOM_BASE_URL`: Backend origin (default: "http://127.0.0.1:5000")
//! - `PIANOROOM_SESSION_COOKIE`: Cookie header value of a logged-in session (optional)
//! - `PIANOROOM_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (optional, no timeout when unset)
//! - `PIANOROOM_TIME_ZONE`: IANA zone used to render slot times (optional)
//! - `PIANOROOM_UTC_OFFSET_MINUTES`: Fixed offset used to render slot times when
//!   no zone is named (default: the host's local zone)
//! - `LOG_LEVEL`: Logging level (default: "info")
//!
//! Variables set to an empty string count as unset.

use chrono::FixedOffset;
use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use std::env;
use std::time::Duration;
use tracing::Level;

use crate::clock::DisplayZone;

/// Configuration for the reservation page client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash
    pub base_url: String,

    /// Session cookie forwarded with every request (both endpoints require a login)
    pub session_cookie: Option<String>,

    /// Request timeout; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,

    /// Zone applied when rendering slot start/end times
    pub display_zone: DisplayZone,

    /// Log level for the application
    pub log_level: Level,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            session_cookie: None,
            request_timeout: None,
            display_zone: DisplayZone::Local,
            log_level: Level::INFO,
        }
    }
}

impl ClientConfig {
    /// Creates a new ClientConfig from environment variables
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_vars`].
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Creates a new ClientConfig from the variables `lookup` resolves.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `PIANOROOM_REQUEST_TIMEOUT_SECONDS` is not a positive whole number of seconds
    /// - `PIANOROOM_TIME_ZONE` is not a known IANA zone
    /// - `PIANOROOM_UTC_OFFSET_MINUTES` is not a valid offset in minutes
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let base_url = var("PIANOROOM_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let session_cookie = var("PIANOROOM_SESSION_COOKIE");

        let request_timeout = match var("PIANOROOM_REQUEST_TIMEOUT_SECONDS") {
            Some(seconds) => {
                let seconds: u64 = seconds
                    .parse()
                    .wrap_err("Invalid PIANOROOM_REQUEST_TIMEOUT_SECONDS value")?;
                if seconds == 0 {
                    return Err(eyre!("PIANOROOM_REQUEST_TIMEOUT_SECONDS must be at least 1"));
                }
                Some(Duration::from_secs(seconds))
            }
            None => None,
        };

        let display_zone = match (var("PIANOROOM_TIME_ZONE"), var("PIANOROOM_UTC_OFFSET_MINUTES")) {
            (Some(name), _) => DisplayZone::Named(
                name.parse::<Tz>()
                    .map_err(|err| eyre!("Invalid PIANOROOM_TIME_ZONE value: {err}"))?,
            ),
            (None, Some(minutes)) => {
                let minutes: i32 = minutes
                    .parse()
                    .wrap_err("Invalid PIANOROOM_UTC_OFFSET_MINUTES value")?;
                let offset = minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| eyre!("PIANOROOM_UTC_OFFSET_MINUTES out of range: {minutes}"))?;
                DisplayZone::Fixed(offset)
            }
            (None, None) => defaults.display_zone,
        };

        let log_level = var("LOG_LEVEL")
            .map(|level| parse_log_level(&level))
            .unwrap_or(defaults.log_level);

        Ok(Self {
            base_url,
            session_cookie,
            request_timeout,
            display_zone,
            log_level,
        })
    }

    /// Absolute URL of a backend path, e.g. `endpoint("/admin/system/server-time")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Unknown levels fall back to `info`.
pub fn parse_log_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
