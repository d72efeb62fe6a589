//! Ambient configuration shared read-only by every invocation.

use crate::error::{Error, Result};
use std::fmt;
use url::Url;

/// Fallback `host:port` of the Evolution API when no base URL is configured.
pub const DEFAULT_API_URL: &str = "localhost:8080";

pub const API_KEY_ENV: &str = "EVOLUTION_API_KEY";
pub const INSTANCE_ENV: &str = "EVOLUTION_INSTANCE";
pub const API_URL_ENV: &str = "EVOLUTION_API_URL";

/// Process-wide settings resolved once at startup.
///
/// Missing values are not a startup error: only operations that need a value fail, and only
/// when they run.
#[derive(Clone, PartialEq, Eq)]
pub struct AmbientConfig {
    api_key: Option<String>,
    instance_id: Option<String>,
    api_base_url: String,
}

impl AmbientConfig {
    /// Build a config. Blank values count as unset.
    #[must_use]
    pub fn new(
        api_key: Option<String>,
        instance_id: Option<String>,
        api_base_url: Option<String>,
    ) -> Self {
        Self {
            api_key: non_blank(api_key),
            instance_id: non_blank(instance_id),
            api_base_url: non_blank(api_base_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::Config`] if no API key is configured.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config(format!("API key is not configured (set {API_KEY_ENV})")))
    }

    /// # Errors
    ///
    /// Returns [`Error::Config`] if no instance identifier is configured.
    pub fn instance_id(&self) -> Result<&str> {
        self.instance_id.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "instance name is not configured (set {INSTANCE_ENV})"
            ))
        })
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Absolute base URL of the API.
    ///
    /// A bare `host[:port]` is addressed over `https`; an explicit `http://` or `https://` prefix is
    /// kept as given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configured value is not a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.api_base_url.trim().trim_end_matches('/');
        let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_string()
        } else {
            format!("https://{raw}")
        };
        let url = Url::parse(&with_scheme).map_err(|e| {
            Error::Config(format!("Invalid API base URL '{}': {e}", self.api_base_url))
        })?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Invalid API base URL '{}': cannot be used as a base",
                self.api_base_url
            )));
        }
        Ok(url)
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

// The API key never shows up in logs.
impl fmt::Debug for AmbientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmbientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("instance_id", &self.instance_id)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
