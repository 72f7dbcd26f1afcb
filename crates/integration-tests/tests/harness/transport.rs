//! Scripted in-memory transport
//!
//! Each operation replays results queued by the test, in order. The last
//! queued deferred poll repeats once the queue runs dry, so a completion
//! can be left pending forever. Every call is recorded with the request
//! and metadata the client sent.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use secrecy::ExposeSecret;
use tokio::time::Instant;
use tonic::Status;
use xai_chat::wire::{
    RawApiKeyInfo, RawChunk, RawDeferredStatus, RawEmbeddingModel, RawImageModel, RawImageResponse, RawLanguageModel,
    RawResponse, RawToken,
};
use xai_chat::{CallMetadata, ChatRequest, ChatTransport, GenerateImageRequest, RawChunkStream};

/// One call observed by the transport
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub request: Option<ChatRequest>,
    pub image_request: Option<GenerateImageRequest>,
    /// Request id, response id or model name the call addressed
    pub target: Option<String>,
    pub bearer: String,
    pub deadline: Option<Instant>,
}

enum ScriptedStream {
    Finite(Vec<Result<RawChunk, Status>>),
    Hanging(Vec<Result<RawChunk, Status>>),
}

#[derive(Default)]
struct Script {
    blocking: VecDeque<Result<RawResponse, Status>>,
    streams: VecDeque<Result<ScriptedStream, Status>>,
    deferred_starts: VecDeque<Result<String, Status>>,
    polls: VecDeque<Result<RawDeferredStatus, Status>>,
    stored: HashMap<String, RawResponse>,
    models: Vec<RawLanguageModel>,
    embedding_models: Vec<RawEmbeddingModel>,
    image_models: Vec<RawImageModel>,
    key_info: Option<RawApiKeyInfo>,
    images: VecDeque<Result<RawImageResponse, Status>>,
    failures: HashMap<&'static str, Status>,
    calls: Vec<RecordedCall>,
}

/// Transport that replays scripted results
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<Script>,
    latency: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every blocking call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn push_response(&self, response: RawResponse) -> &Self {
        self.lock().blocking.push_back(Ok(response));
        self
    }

    pub fn push_response_failure(&self, status: Status) -> &Self {
        self.lock().blocking.push_back(Err(status));
        self
    }

    /// Stream that yields `items` and then ends
    pub fn push_stream(&self, items: Vec<Result<RawChunk, Status>>) -> &Self {
        self.lock().streams.push_back(Ok(ScriptedStream::Finite(items)));
        self
    }

    /// Stream that yields `items` and then never produces another fragment
    pub fn push_hanging_stream(&self, items: Vec<Result<RawChunk, Status>>) -> &Self {
        self.lock().streams.push_back(Ok(ScriptedStream::Hanging(items)));
        self
    }

    /// Stream that cannot be opened
    pub fn push_stream_failure(&self, status: Status) -> &Self {
        self.lock().streams.push_back(Err(status));
        self
    }

    pub fn push_deferred_start(&self, result: Result<String, Status>) -> &Self {
        self.lock().deferred_starts.push_back(result);
        self
    }

    pub fn push_poll(&self, result: Result<RawDeferredStatus, Status>) -> &Self {
        self.lock().polls.push_back(result);
        self
    }

    /// Make a stored response available for lookup
    pub fn store(&self, response: RawResponse) -> &Self {
        self.lock().stored.insert(response.id.clone(), response);
        self
    }

    pub fn add_model(&self, model: RawLanguageModel) -> &Self {
        self.lock().models.push(model);
        self
    }

    pub fn add_embedding_model(&self, model: RawEmbeddingModel) -> &Self {
        self.lock().embedding_models.push(model);
        self
    }

    pub fn add_image_model(&self, model: RawImageModel) -> &Self {
        self.lock().image_models.push(model);
        self
    }

    /// Metadata returned for whatever key the client sends
    pub fn set_key_info(&self, info: RawApiKeyInfo) -> &Self {
        self.lock().key_info = Some(info);
        self
    }

    pub fn push_images(&self, result: Result<RawImageResponse, Status>) -> &Self {
        self.lock().images.push_back(result);
        self
    }

    /// Image requests submitted, in order
    pub fn image_requests(&self) -> Vec<GenerateImageRequest> {
        self.calls().into_iter().filter_map(|call| call.image_request).collect()
    }

    /// Fail every call to `operation` with `status`
    pub fn fail(&self, operation: &'static str, status: Status) -> &Self {
        self.lock().failures.insert(operation, status);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|call| call.operation == operation).collect()
    }

    /// Requests submitted through any operation, in order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.calls().into_iter().filter_map(|call| call.request).collect()
    }

    pub fn is_stored(&self, response_id: &str) -> bool {
        self.lock().stored.contains_key(response_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().expect("script lock poisoned")
    }

    /// Record the call and return the scripted failure for the operation, if any
    fn record(
        &self,
        operation: &'static str,
        request: Option<&ChatRequest>,
        target: Option<&str>,
        metadata: &CallMetadata,
    ) -> Result<(), Status> {
        self.record_call(RecordedCall {
            operation,
            request: request.cloned(),
            image_request: None,
            target: target.map(str::to_owned),
            bearer: metadata.bearer.expose_secret().to_owned(),
            deadline: metadata.deadline,
        })
    }

    fn record_call(&self, call: RecordedCall) -> Result<(), Status> {
        let mut script = self.lock();
        let operation = call.operation;
        script.calls.push(call);

        match script.failures.get(operation) {
            Some(status) => Err(status.clone()),
            None => Ok(()),
        }
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn exhausted(operation: &str) -> Status {
    Status::internal(format!("no scripted result left for {operation}"))
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn submit_blocking(&self, request: &ChatRequest, metadata: &CallMetadata) -> Result<RawResponse, Status> {
        self.record("submit_blocking", Some(request), None, metadata)?;
        self.simulate_latency().await;
        self.lock()
            .blocking
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("submit_blocking")))
    }

    async fn submit_streaming(
        &self,
        request: &ChatRequest,
        metadata: &CallMetadata,
    ) -> Result<RawChunkStream, Status> {
        self.record("submit_streaming", Some(request), None, metadata)?;
        let scripted = self
            .lock()
            .streams
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("submit_streaming")))?;

        let stream: RawChunkStream = match scripted {
            ScriptedStream::Finite(items) => Box::pin(stream::iter(items)),
            ScriptedStream::Hanging(items) => Box::pin(stream::iter(items).chain(stream::pending())),
        };
        Ok(stream)
    }

    async fn start_deferred(&self, request: &ChatRequest, metadata: &CallMetadata) -> Result<String, Status> {
        self.record("start_deferred", Some(request), None, metadata)?;
        self.simulate_latency().await;
        self.lock()
            .deferred_starts
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("start_deferred")))
    }

    async fn poll_deferred(&self, request_id: &str, metadata: &CallMetadata) -> Result<RawDeferredStatus, Status> {
        self.record("poll_deferred", None, Some(request_id), metadata)?;
        self.simulate_latency().await;
        let mut script = self.lock();
        let next = if script.polls.len() > 1 {
            script.polls.pop_front()
        } else {
            script.polls.front().cloned()
        };
        next.unwrap_or_else(|| Err(exhausted("poll_deferred")))
    }

    async fn fetch_stored(&self, response_id: &str, metadata: &CallMetadata) -> Result<RawResponse, Status> {
        self.record("fetch_stored", None, Some(response_id), metadata)?;
        self.lock()
            .stored
            .get(response_id)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("response {response_id} not found")))
    }

    async fn delete_stored(&self, response_id: &str, metadata: &CallMetadata) -> Result<(), Status> {
        self.record("delete_stored", None, Some(response_id), metadata)?;
        self.lock()
            .stored
            .remove(response_id)
            .map(|_| ())
            .ok_or_else(|| Status::not_found(format!("response {response_id} not found")))
    }

    async fn list_language_models(&self, metadata: &CallMetadata) -> Result<Vec<RawLanguageModel>, Status> {
        self.record("list_language_models", None, None, metadata)?;
        Ok(self.lock().models.clone())
    }

    async fn get_language_model(&self, name: &str, metadata: &CallMetadata) -> Result<RawLanguageModel, Status> {
        self.record("get_language_model", None, Some(name), metadata)?;
        self.lock()
            .models
            .iter()
            .find(|model| model.name == name || model.aliases.iter().any(|alias| alias == name))
            .cloned()
            .ok_or_else(|| Status::not_found(format!("model {name} not found")))
    }

    /// Splits on spaces, keeping each space with the word before it
    async fn tokenize(&self, model: &str, text: &str, metadata: &CallMetadata) -> Result<Vec<RawToken>, Status> {
        self.record("tokenize", None, Some(model), metadata)?;
        self.simulate_latency().await;
        Ok(text
            .split_inclusive(' ')
            .zip(1..)
            .map(|(piece, token_id)| RawToken {
                token_id,
                string_token: piece.to_owned(),
            })
            .collect())
    }

    async fn api_key_info(&self, metadata: &CallMetadata) -> Result<RawApiKeyInfo, Status> {
        self.record("api_key_info", None, None, metadata)?;
        self.lock()
            .key_info
            .clone()
            .ok_or_else(|| Status::unauthenticated("unknown api key"))
    }

    async fn list_embedding_models(&self, metadata: &CallMetadata) -> Result<Vec<RawEmbeddingModel>, Status> {
        self.record("list_embedding_models", None, None, metadata)?;
        Ok(self.lock().embedding_models.clone())
    }

    async fn get_embedding_model(&self, name: &str, metadata: &CallMetadata) -> Result<RawEmbeddingModel, Status> {
        self.record("get_embedding_model", None, Some(name), metadata)?;
        self.lock()
            .embedding_models
            .iter()
            .find(|model| model.name == name || model.aliases.iter().any(|alias| alias == name))
            .cloned()
            .ok_or_else(|| Status::not_found(format!("embedding model {name} not found")))
    }

    async fn list_image_models(&self, metadata: &CallMetadata) -> Result<Vec<RawImageModel>, Status> {
        self.record("list_image_models", None, None, metadata)?;
        Ok(self.lock().image_models.clone())
    }

    async fn get_image_model(&self, name: &str, metadata: &CallMetadata) -> Result<RawImageModel, Status> {
        self.record("get_image_model", None, Some(name), metadata)?;
        self.lock()
            .image_models
            .iter()
            .find(|model| model.name == name || model.aliases.iter().any(|alias| alias == name))
            .cloned()
            .ok_or_else(|| Status::not_found(format!("image model {name} not found")))
    }

    async fn generate_image(
        &self,
        request: &GenerateImageRequest,
        metadata: &CallMetadata,
    ) -> Result<RawImageResponse, Status> {
        self.record_call(RecordedCall {
            operation: "generate_image",
            request: None,
            image_request: Some(request.clone()),
            target: None,
            bearer: metadata.bearer.expose_secret().to_owned(),
            deadline: metadata.deadline,
        })?;
        self.simulate_latency().await;
        self.lock()
            .images
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("generate_image")))
    }
}
