//! Startup configuration for the Clockify server.

use crate::error::{Error, Result};

/// Default Clockify REST API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.clockify.me/api/v1";

/// Credential and endpoint settings, built once at startup and handed to
/// the [`Client`](crate::client::Client).
#[derive(Clone)]
pub struct Config {
    /// Clockify API key, sent as the `X-Api-Key` header.
    pub api_key: String,
    /// Base URL that endpoints are appended to, without a trailing slash.
    pub base_url: String,
}

impl Config {
    /// Build a configuration, failing when no API key is supplied.
    ///
    /// A missing `base_url` falls back to [`DEFAULT_BASE_URL`].
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("CLOCKIFY_API_KEY is required".into()))?;
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self { api_key, base_url })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
