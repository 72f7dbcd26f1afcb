//! Client facade over a [`ChatTransport`]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tokio::time::Instant;
use tonic::Status;
use xai_config::ClientConfig;

use crate::context::{self, CallContext, CallMetadata};
use crate::convert;
use crate::credentials::{CredentialSource, StaticApiKey};
use crate::deferred;
use crate::error::{Error, ErrorKind, Result};
use crate::image::ImageRequest;
use crate::request::RequestBuilder;
use crate::stream::ChunkStream;
use crate::transport::ChatTransport;
use crate::types::{
    ApiKeyInfo, ChatResponse, DeferredCompletion, EmbeddingModel, ImageModel, ImageResponse, LanguageModel, Token,
    Tokenization,
};

/// Entry point for chat completions
///
/// Every failure is translated into [`Error`] before it is returned. Blocking
/// calls get the configured timeout unless the [`CallContext`] already
/// carries a deadline.
#[derive(Clone)]
pub struct ChatClient {
    transport: Arc<dyn ChatTransport>,
    credentials: Arc<dyn CredentialSource>,
    default_model: String,
    default_image_model: String,
    timeout: Duration,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("default_model", &self.default_model)
            .field("default_image_model", &self.default_image_model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Client authorized with the configured API key
    pub fn new(config: &ClientConfig, transport: Arc<dyn ChatTransport>) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .ok_or_else(|| Error::new(ErrorKind::Auth, "API key is required"))?;

        let credentials = StaticApiKey::from(api_key.clone());
        tracing::debug!(
            endpoint = %config.endpoint,
            api_key = %credentials.redacted(),
            default_model = %config.default_model,
            "chat client created"
        );

        Ok(Self::with_credentials(config, transport, Arc::new(credentials)))
    }

    /// Client configured from `XAI_APIKEY` and defaults
    pub fn from_env(transport: Arc<dyn ChatTransport>) -> Result<Self> {
        let config = ClientConfig::from_env().map_err(|e| Error::new(ErrorKind::Auth, e.to_string()))?;
        Self::new(&config, transport)
    }

    /// Client that asks `credentials` for a bearer token on every call
    pub fn with_credentials(
        config: &ClientConfig,
        transport: Arc<dyn ChatTransport>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            transport,
            credentials,
            default_model: config.default_model.clone(),
            default_image_model: config.default_image_model.clone(),
            timeout: config.timeout,
        }
    }

    /// Model used when a request names none
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Model used when an image request names none
    pub fn default_image_model(&self) -> &str {
        &self.default_image_model
    }

    /// Timeout applied to blocking calls without a caller deadline
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a completion and wait for the full response
    pub async fn complete(&self, ctx: &CallContext, request: &RequestBuilder) -> Result<ChatResponse> {
        let request = request.build(&self.default_model);
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            chained = request.previous_response_id.is_some(),
            "submitting completion"
        );

        let call = self.transport.submit_blocking(&request, &metadata);
        let raw = guarded(ctx, Some(deadline), "completion", call).await?;

        Ok(convert::response_from_raw(raw))
    }

    /// Start a streaming completion
    ///
    /// The stream observes the context's cancellation and the caller's
    /// deadline. The configured timeout is not applied to streams.
    pub async fn stream(&self, ctx: &CallContext, request: &RequestBuilder) -> Result<ChunkStream> {
        let request = request.build(&self.default_model);
        let deadline = ctx.deadline();
        let metadata = CallMetadata {
            bearer: self.credentials.bearer_token()?,
            deadline,
        };

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            bounded = deadline.is_some(),
            "opening completion stream"
        );

        let call = self.transport.submit_streaming(&request, &metadata);
        let inner = guarded(ctx, deadline, "stream", call).await?;

        Ok(ChunkStream::new(inner, ctx.cancellation().clone(), deadline))
    }

    /// Submit a deferred completion and return its request id
    pub async fn start_deferred(&self, ctx: &CallContext, request: &RequestBuilder) -> Result<String> {
        let request = request.build(&self.default_model);
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.start_deferred(&request, &metadata);
        let request_id = guarded(ctx, Some(deadline), "deferred start", call).await?;

        tracing::debug!(model = %request.model, request_id = %request_id, "deferred completion started");
        Ok(request_id)
    }

    /// Check a deferred completion once
    pub async fn poll_deferred(&self, ctx: &CallContext, request_id: &str) -> Result<DeferredCompletion> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.poll_deferred(request_id, &metadata);
        let raw = guarded(ctx, Some(deadline), "deferred poll", call).await?;

        Ok(convert::deferred_from_raw(request_id, raw))
    }

    /// Poll every `interval` until the completion resolves or `timeout` elapses
    pub async fn wait_for_deferred(
        &self,
        ctx: &CallContext,
        request_id: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<ChatResponse> {
        deferred::wait_for(ctx, request_id, interval, timeout, || self.poll_deferred(ctx, request_id)).await
    }

    /// Fetch a response stored with `store_messages`
    pub async fn get_stored_completion(&self, ctx: &CallContext, response_id: &str) -> Result<ChatResponse> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.fetch_stored(response_id, &metadata);
        let raw = guarded(ctx, Some(deadline), "stored completion lookup", call).await?;

        Ok(convert::response_from_raw(raw))
    }

    /// Delete a stored response
    pub async fn delete_stored_completion(&self, ctx: &CallContext, response_id: &str) -> Result<()> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.delete_stored(response_id, &metadata);
        guarded(ctx, Some(deadline), "stored completion delete", call).await?;

        tracing::debug!(response_id, "stored completion deleted");
        Ok(())
    }

    /// Language models offered by the service
    pub async fn list_models(&self, ctx: &CallContext) -> Result<Vec<LanguageModel>> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.list_language_models(&metadata);
        let raw = guarded(ctx, Some(deadline), "model listing", call).await?;

        Ok(raw.into_iter().map(LanguageModel::from).collect())
    }

    /// Single language model by name or alias
    pub async fn get_model(&self, ctx: &CallContext, name: &str) -> Result<LanguageModel> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.get_language_model(name, &metadata);
        let raw = guarded(ctx, Some(deadline), "model lookup", call).await?;

        Ok(LanguageModel::from(raw))
    }

    /// Embedding models offered by the service
    pub async fn list_embedding_models(&self, ctx: &CallContext) -> Result<Vec<EmbeddingModel>> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.list_embedding_models(&metadata);
        let raw = guarded(ctx, Some(deadline), "embedding model listing", call).await?;

        Ok(raw.into_iter().map(EmbeddingModel::from).collect())
    }

    pub async fn get_embedding_model(&self, ctx: &CallContext, name: &str) -> Result<EmbeddingModel> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.get_embedding_model(name, &metadata);
        let raw = guarded(ctx, Some(deadline), "embedding model lookup", call).await?;

        Ok(EmbeddingModel::from(raw))
    }

    /// Image generation models offered by the service
    pub async fn list_image_models(&self, ctx: &CallContext) -> Result<Vec<ImageModel>> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.list_image_models(&metadata);
        let raw = guarded(ctx, Some(deadline), "image model listing", call).await?;

        Ok(raw.into_iter().map(ImageModel::from).collect())
    }

    pub async fn get_image_model(&self, ctx: &CallContext, name: &str) -> Result<ImageModel> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.get_image_model(name, &metadata);
        let raw = guarded(ctx, Some(deadline), "image model lookup", call).await?;

        Ok(ImageModel::from(raw))
    }

    /// Split `text` with the default model's tokenizer
    pub async fn tokenize(&self, ctx: &CallContext, text: &str) -> Result<Tokenization> {
        self.tokenize_with_model(ctx, &self.default_model, text).await
    }

    /// Split `text` with the tokenizer of `model`
    pub async fn tokenize_with_model(&self, ctx: &CallContext, model: &str, text: &str) -> Result<Tokenization> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.tokenize(model, text, &metadata);
        let raw = guarded(ctx, Some(deadline), "tokenize", call).await?;

        let tokenization = Tokenization {
            model: model.to_owned(),
            tokens: raw.into_iter().map(Token::from).collect(),
        };
        tracing::debug!(model, tokens = tokenization.count(), "text tokenized");
        Ok(tokenization)
    }

    /// Metadata of the API key this client authenticates with
    pub async fn api_key_info(&self, ctx: &CallContext) -> Result<ApiKeyInfo> {
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        let call = self.transport.api_key_info(&metadata);
        let raw = guarded(ctx, Some(deadline), "api key info", call).await?;

        Ok(ApiKeyInfo::from(raw))
    }

    /// Generate images from a prompt
    ///
    /// The configured default image model applies when the request names none.
    pub async fn generate_image(&self, ctx: &CallContext, request: &ImageRequest) -> Result<ImageResponse> {
        let request = request.build(&self.default_image_model);
        let (deadline, metadata) = self.blocking_metadata(ctx)?;

        tracing::debug!(model = %request.model, count = ?request.n, format = ?request.format, "generating images");

        let call = self.transport.generate_image(&request, &metadata);
        let raw = guarded(ctx, Some(deadline), "image generation", call).await?;

        Ok(ImageResponse::from(raw))
    }

    fn blocking_metadata(&self, ctx: &CallContext) -> Result<(Instant, CallMetadata)> {
        let deadline = ctx.effective_deadline(self.timeout);
        let metadata = CallMetadata {
            bearer: self.credentials.bearer_token()?,
            deadline: Some(deadline),
        };
        Ok((deadline, metadata))
    }
}

/// Translate transport failures and bound the call by cancellation and deadline
async fn guarded<T, F>(ctx: &CallContext, deadline: Option<Instant>, what: &str, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, Status>>,
{
    let translated = async {
        call.await.map_err(|status| {
            let err = Error::from_status(status).with_context(what);
            tracing::warn!(operation = what, kind = %err.kind(), error = %err, "transport call failed");
            err
        })
    };

    context::guard(ctx.cancellation(), deadline, what, translated).await
}
