//! Programmatic client configuration for tests

use std::sync::Arc;
use std::time::Duration;

use xai_chat::ChatClient;
use xai_config::ClientConfig;

use super::transport::MockTransport;

/// API key every test client authenticates with
pub const TEST_API_KEY: &str = "xai-test-0123456789abcdef";

/// Builder for test client configurations
pub struct ConfigBuilder {
    config: ClientConfig,
}

impl ConfigBuilder {
    /// Test key, library defaults elsewhere
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default().with_api_key(TEST_API_KEY),
        }
    }

    /// Set the blocking-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Set the model substituted into requests that name none
    pub fn with_default_model(mut self, model: &str) -> Self {
        self.config = self.config.with_default_model(model);
        self
    }

    /// Set the model substituted into image requests that name none
    pub fn with_default_image_model(mut self, model: &str) -> Self {
        self.config = self.config.with_default_image_model(model);
        self
    }

    /// Build the final config
    pub fn build(self) -> ClientConfig {
        self.config
    }

    /// Client wired to `transport`
    pub fn client(self, transport: &Arc<MockTransport>) -> ChatClient {
        let transport: Arc<dyn xai_chat::ChatTransport> = transport.clone();
        ChatClient::new(&self.config, transport).expect("test config carries an API key")
    }
}
