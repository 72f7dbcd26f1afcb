use std::path::Path;

use secrecy::ExposeSecret;

use crate::{ClientConfig, ENV_API_KEY};

impl ClientConfig {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// expanded, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::from_toml(&raw)?;

        tracing::debug!(
            path = %path.display(),
            endpoint = %config.endpoint,
            default_model = %config.default_model,
            "loaded client configuration"
        );

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Build a configuration from `XAI_APIKEY`, using defaults elsewhere
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or empty
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var(ENV_API_KEY).unwrap_or_default();
        if api_key.is_empty() {
            anyhow::bail!("environment variable {ENV_API_KEY} is not set");
        }

        Ok(Self::default().with_api_key(api_key))
    }

    /// Validate that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or empty, the timeout is
    /// zero, or no default model is named
    pub fn validate(&self) -> anyhow::Result<()> {
        let has_key = self
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty());
        if !has_key {
            anyhow::bail!("API key is required");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than zero");
        }

        if self.default_model.trim().is_empty() {
            anyhow::bail!("default_model must not be empty");
        }

        Ok(())
    }
}
