//! Seam to the RPC layer that carries requests to the service
//!
//! Implementations own connection setup and wire encoding. They report
//! failures as raw [`Status`] values; translation into [`crate::Error`]
//! happens in the client. The auxiliary services (tokenizer, key
//! metadata, embedding and image catalogs, image generation) answer
//! `Unimplemented` unless a transport overrides them.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use tonic::Status;

use crate::context::CallMetadata;
use crate::image::GenerateImageRequest;
use crate::request::ChatRequest;
use crate::wire::{
    RawApiKeyInfo, RawChunk, RawDeferredStatus, RawEmbeddingModel, RawImageModel, RawImageResponse, RawLanguageModel,
    RawResponse, RawToken,
};

/// Fragments of a streaming completion as delivered by the transport
pub type RawChunkStream = Pin<Box<dyn Stream<Item = Result<RawChunk, Status>> + Send>>;

/// Operations the chat service exposes
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Run a completion to the end and return the full response
    async fn submit_blocking(&self, request: &ChatRequest, metadata: &CallMetadata) -> Result<RawResponse, Status>;

    /// Start a completion whose fragments are delivered as they are produced
    async fn submit_streaming(&self, request: &ChatRequest, metadata: &CallMetadata)
    -> Result<RawChunkStream, Status>;

    /// Start a deferred completion and return its request id
    async fn start_deferred(&self, request: &ChatRequest, metadata: &CallMetadata) -> Result<String, Status>;

    /// Check a deferred completion once
    async fn poll_deferred(&self, request_id: &str, metadata: &CallMetadata) -> Result<RawDeferredStatus, Status>;

    /// Look up a response stored with `store_messages`
    async fn fetch_stored(&self, response_id: &str, metadata: &CallMetadata) -> Result<RawResponse, Status>;

    /// Delete a stored response
    async fn delete_stored(&self, response_id: &str, metadata: &CallMetadata) -> Result<(), Status>;

    /// Catalog of language models
    async fn list_language_models(&self, metadata: &CallMetadata) -> Result<Vec<RawLanguageModel>, Status>;

    /// Single catalog entry by name or alias
    async fn get_language_model(&self, name: &str, metadata: &CallMetadata) -> Result<RawLanguageModel, Status>;

    /// Split `text` with the tokenizer of `model`
    async fn tokenize(&self, model: &str, text: &str, metadata: &CallMetadata) -> Result<Vec<RawToken>, Status> {
        let _ = (model, text, metadata);
        Err(unsupported("tokenize"))
    }

    /// Metadata of the key carried in `metadata`
    async fn api_key_info(&self, metadata: &CallMetadata) -> Result<RawApiKeyInfo, Status> {
        let _ = metadata;
        Err(unsupported("api key info"))
    }

    async fn list_embedding_models(&self, metadata: &CallMetadata) -> Result<Vec<RawEmbeddingModel>, Status> {
        let _ = metadata;
        Err(unsupported("embedding model listing"))
    }

    async fn get_embedding_model(&self, name: &str, metadata: &CallMetadata) -> Result<RawEmbeddingModel, Status> {
        let _ = (name, metadata);
        Err(unsupported("embedding model lookup"))
    }

    async fn list_image_models(&self, metadata: &CallMetadata) -> Result<Vec<RawImageModel>, Status> {
        let _ = metadata;
        Err(unsupported("image model listing"))
    }

    async fn get_image_model(&self, name: &str, metadata: &CallMetadata) -> Result<RawImageModel, Status> {
        let _ = (name, metadata);
        Err(unsupported("image model lookup"))
    }

    async fn generate_image(
        &self,
        request: &GenerateImageRequest,
        metadata: &CallMetadata,
    ) -> Result<RawImageResponse, Status> {
        let _ = (request, metadata);
        Err(unsupported("image generation"))
    }
}

fn unsupported(operation: &str) -> Status {
    Status::unimplemented(format!("{operation} is not supported by this transport"))
}
