//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_MIN_LATENCY_MS: u64 = 2000;
const TOKEN_DIR: &str = ".jrats";
const TOKEN_FILE: &str = "session.json";
const FALLBACK_TOKEN_FILE: &str = ".jrats-session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root without a trailing slash.
    pub api_url: String,
    /// Where the access/refresh tokens are kept between runs.
    pub token_file: PathBuf,
    /// Perceived-latency floor for page loads and form submits.
    pub min_latency: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token_file: default_token_file(std::env::var_os("HOME").map(PathBuf::from)),
            min_latency: Duration::from_millis(DEFAULT_MIN_LATENCY_MS),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `JRATS_API_URL`: default `http://127.0.0.1:8000/api`
    /// - `JRATS_TOKEN_FILE`: default `$HOME/.jrats/session.json`
    /// - `JRATS_MIN_LATENCY_MS`: default 2000
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = match std::env::var("JRATS_API_URL") {
            Ok(raw) => parse_api_url(&raw)?,
            Err(_) => defaults.api_url,
        };
        let token_file = std::env::var_os("JRATS_TOKEN_FILE")
            .filter(|raw| !raw.is_empty())
            .map_or(defaults.token_file, PathBuf::from);
        let min_latency = match std::env::var("JRATS_MIN_LATENCY_MS") {
            Ok(raw) => parse_latency_ms(&raw)?,
            Err(_) => defaults.min_latency,
        };

        Ok(Self { api_url, token_file, min_latency })
    }
}

/// Validate and normalize an API root URL.
///
/// # Errors
///
/// Returns an error unless the URL is `http://` or `https://`.
pub fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed.strip_prefix("http://").or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::Invalid {
            var: "JRATS_API_URL",
            reason: format!("expected an http(s) URL, got '{raw}'"),
        }),
    }
}

/// Parse a latency floor in milliseconds.
///
/// # Errors
///
/// Returns an error if `raw` is not a non-negative integer.
pub fn parse_latency_ms(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::Invalid { var: "JRATS_MIN_LATENCY_MS", reason: e.to_string() })
}

fn default_token_file(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) if !home.as_os_str().is_empty() => home.join(TOKEN_DIR).join(TOKEN_FILE),
        _ => PathBuf::from(FALLBACK_TOKEN_FILE),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
