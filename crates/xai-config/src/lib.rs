//! Configuration for the xAI chat client
//!
//! Settings are read from a TOML file (with `{{ env.VAR }}` expansion) or
//! bootstrapped from the `XAI_APIKEY` environment variable.

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

pub use env::ExpandError;

/// Default service endpoint
pub const DEFAULT_ENDPOINT: &str = "api.x.ai:443";

/// Default per-call timeout for blocking operations
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat model used when a request names none
pub const DEFAULT_MODEL: &str = "grok-4-1-fast-reasoning";

/// Image model used when a request names none
pub const DEFAULT_IMAGE_MODEL: &str = "grok-2-image";

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "XAI_APIKEY";

/// Client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Service endpoint handed to the transport
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Timeout applied to blocking calls that carry no caller deadline
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Model substituted when a request does not set one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Image model substituted when an image request does not set one
    #[serde(default = "default_image_model")]
    pub default_image_model: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            default_model: default_model(),
            default_image_model: default_image_model(),
        }
    }
}

impl ClientConfig {
    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the blocking-call timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the default chat model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the default image generation model
    #[must_use]
    pub fn with_default_image_model(mut self, model: impl Into<String>) -> Self {
        self.default_image_model = model.into();
        self
    }

    /// Set the endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_owned()
}

/// Accept durations written as `"90s"`, `"2m"`, `"1m 30s"`
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}
