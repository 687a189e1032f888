//! Configuration for the leads client and its binaries
//!
//! Sources, highest priority first: explicit values (CLI flags), process
//! environment (`LEADS_API_URL`, `LEADS_SESSION_PATH`, optionally from a
//! `.env` file), built-in defaults.

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://zi-affiliates-backend.onrender.com";
pub const DEFAULT_SESSION_PATH: &str = ".leads_session";

pub const API_URL_ENV: &str = "LEADS_API_URL";
pub const SESSION_PATH_ENV: &str = "LEADS_SESSION_PATH";

/// Settings the HTTP client needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    base: Url,
}

impl ClientConfig {
    /// Validates the URL and drops trailing slashes so paths can be appended.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            base: parsed,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL).expect("default API URL is valid")
    }
}

/// Application-level settings shared by the binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub session_path: String,
}

impl AppConfig {
    /// Resolve settings from overrides, then environment, then defaults.
    ///
    /// Loads `.env` first if one exists; a missing file is not an error.
    pub fn resolve(api_url: Option<&str>, session_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::resolve_with(api_url, session_path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::resolve`] with an explicit environment lookup.
    pub fn resolve_with<F>(
        api_url: Option<&str>,
        session_path: Option<&str>,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = api_url
            .map(str::to_string)
            .or_else(|| env(API_URL_ENV))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let session_path = session_path
            .map(str::to_string)
            .or_else(|| env(SESSION_PATH_ENV))
            .unwrap_or_else(|| DEFAULT_SESSION_PATH.to_string());
        Ok(Self {
            client: ClientConfig::new(&api_url)?,
            session_path,
        })
    }
}
