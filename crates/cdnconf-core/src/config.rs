//! Configuration types for the cdnconf client
//!
//! Configuration is supplied when a transport is constructed; there is no
//! process-wide default client.

use serde::{Deserialize, Serialize};
use std::env;

/// Default API endpoint
pub const DEFAULT_API_URL: &str = "https://api.fastly.com";

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "CDNCONF_API_KEY";
/// Environment variable overriding the API endpoint
pub const ENV_API_URL: &str = "CDNCONF_API_URL";
/// Environment variable overriding the request timeout
pub const ENV_TIMEOUT_SECS: &str = "CDNCONF_TIMEOUT_SECS";
/// Environment variable overriding the User-Agent
pub const ENV_USER_AGENT: &str = "CDNCONF_USER_AGENT";

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent with every request
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// Base URL of the API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<REDACTED>")
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with the given key and defaults for the rest
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Set the API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the User-Agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// `CDNCONF_API_KEY` is required; the others fall back to defaults.
    pub fn from_env() -> Result<Self, crate::Error> {
        let api_key = env::var(ENV_API_KEY)
            .map_err(|_| crate::Error::config(format!("{} is required", ENV_API_KEY)))?;

        let mut config = Self::new(api_key);

        if let Ok(url) = env::var(ENV_API_URL) {
            config.api_url = url;
        }

        if let Ok(raw) = env::var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                crate::Error::config(format!(
                    "{} must be a whole number of seconds. Got: {}",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
        }

        if let Ok(agent) = env::var(ENV_USER_AGENT) {
            config.user_agent = agent;
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.trim().is_empty() {
            return Err(crate::Error::config("API key cannot be empty"));
        }

        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "API URL must use HTTP or HTTPS scheme. Got: {}",
                self.api_url
            )));
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "Timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }

        if self.user_agent.is_empty() {
            return Err(crate::Error::config("User-Agent cannot be empty"));
        }

        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("cdnconf/{}", env!("CARGO_PKG_VERSION"))
}
