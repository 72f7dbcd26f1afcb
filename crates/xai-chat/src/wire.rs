//! Raw values exchanged with the chat service
//!
//! These mirror the service schema one-to-one. Every field is defaulted so a
//! sparse payload never fails to decode; normalization into the public types
//! happens in the response assembler.

use serde::{Deserialize, Serialize};

/// Tool declaration as sent on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Caller-executed function
    Function(FunctionSpec),
    /// Server-side web search
    WebSearch {},
    /// Server-side X search
    XSearch {},
    /// Server-side sandboxed code execution
    CodeExecution {},
    /// Server-side document collection search
    CollectionsSearch {
        /// Collections to search
        collection_ids: Vec<String>,
    },
    /// Server-side attachment search
    AttachmentSearch {
        /// Maximum number of files to search
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
    /// Remote MCP server
    Mcp {
        /// Label identifying the server
        server_label: String,
        /// Server URL
        server_url: String,
    },
}

/// Function declaration payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Function name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for the parameters, encoded as JSON text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parameters: String,
    /// Strict schema adherence
    #[serde(default)]
    pub strict: bool,
}

/// Terminal response to a blocking completion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawResponse {
    pub id: String,
    pub outputs: Vec<RawOutput>,
    /// Creation time in Unix seconds
    pub created: Option<i64>,
    pub model: String,
    pub system_fingerprint: String,
    pub usage: Option<RawUsage>,
    pub citations: Vec<String>,
}

/// One output of a blocking response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOutput {
    pub index: u32,
    pub finish_reason: RawFinishReason,
    pub message: Option<RawMessage>,
}

/// Assistant message inside a blocking output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMessage {
    pub content: String,
    pub reasoning_content: String,
    pub tool_calls: Vec<RawToolCall>,
}

/// One streamed fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChunk {
    pub id: String,
    pub outputs: Vec<RawOutputChunk>,
    pub created: Option<i64>,
    pub model: String,
    pub system_fingerprint: String,
    pub usage: Option<RawUsage>,
    pub citations: Vec<String>,
}

/// One output of a streamed fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOutputChunk {
    pub index: u32,
    pub finish_reason: RawFinishReason,
    pub delta: Option<RawDelta>,
}

/// Incremental content inside a streamed output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDelta {
    pub content: String,
    pub reasoning_content: String,
    pub tool_calls: Vec<RawToolCall>,
}

/// Tool invocation record, complete or partial
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RawToolCallKind,
    pub status: RawToolCallStatus,
    pub error_message: Option<String>,
    pub function: Option<RawFunctionCall>,
}

/// Function name and argument text of a tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Declared kind tag of a tool invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawToolCallKind {
    #[default]
    Invalid,
    ClientSideTool,
    WebSearchTool,
    XSearchTool,
    CodeExecutionTool,
    CollectionsSearchTool,
    McpTool,
    AttachmentSearchTool,
    #[serde(other)]
    Unrecognized,
}

/// Execution status of a tool invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawToolCallStatus {
    #[default]
    InProgress,
    Completed,
    Incomplete,
    Failed,
    #[serde(other)]
    Unrecognized,
}

/// Why generation stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawFinishReason {
    #[default]
    Invalid,
    Stop,
    MaxLen,
    MaxContext,
    ToolCalls,
    TimeLimit,
    #[serde(other)]
    Unrecognized,
}

/// Token accounting snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub reasoning_tokens: u32,
    pub cached_prompt_text_tokens: u32,
    pub prompt_text_tokens: u32,
    pub prompt_image_tokens: u32,
}

/// Result of polling a deferred completion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDeferredStatus {
    pub status: RawDeferredState,
    pub response: Option<RawResponse>,
}

/// Service-side deferred completion state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawDeferredState {
    #[default]
    Invalid,
    Pending,
    Done,
    Expired,
    #[serde(other)]
    Unrecognized,
}

/// Catalog entry for a language model
///
/// Prices are fixed-point: hundredths of a cent per million tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLanguageModel {
    pub name: String,
    pub aliases: Vec<String>,
    pub version: String,
    pub input_modalities: Vec<RawModality>,
    pub output_modalities: Vec<RawModality>,
    pub prompt_text_token_price: i64,
    pub prompt_image_token_price: i64,
    pub cached_prompt_token_price: i64,
    pub completion_text_token_price: i64,
    pub search_price: i64,
    pub created: Option<i64>,
    pub max_prompt_length: u32,
    pub system_fingerprint: String,
}

/// Input or output modality of a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawModality {
    #[default]
    Invalid,
    Text,
    Image,
    Embedding,
    #[serde(other)]
    Unrecognized,
}

/// Catalog entry for an embedding model; prices as in [`RawLanguageModel`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEmbeddingModel {
    pub name: String,
    pub aliases: Vec<String>,
    pub version: String,
    pub input_modalities: Vec<RawModality>,
    pub output_modalities: Vec<RawModality>,
    pub prompt_text_token_price: i64,
    pub prompt_image_token_price: i64,
    pub created: Option<i64>,
    pub system_fingerprint: String,
}

/// Catalog entry for an image generation model
///
/// `image_price` is fixed-point: hundredths of a cent per generated image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawImageModel {
    pub name: String,
    pub aliases: Vec<String>,
    pub version: String,
    pub input_modalities: Vec<RawModality>,
    pub output_modalities: Vec<RawModality>,
    pub max_prompt_length: u32,
    pub created: Option<i64>,
    pub image_price: i64,
}

/// One token produced by a model's tokenizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawToken {
    pub token_id: u32,
    pub string_token: String,
}

/// Metadata of the API key a call was made with
///
/// Times are seconds since the Unix epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawApiKeyInfo {
    pub redacted_api_key: String,
    pub api_key_id: String,
    pub name: String,
    pub user_id: String,
    pub team_id: String,
    pub acls: Vec<String>,
    pub disabled: bool,
    pub api_key_blocked: bool,
    pub team_blocked: bool,
    pub create_time: Option<i64>,
    pub modify_time: Option<i64>,
    pub modified_by: String,
}

/// One generated image; exactly one of `url` and `base64` is normally set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGeneratedImage {
    pub url: String,
    pub base64: String,
    pub respect_moderation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawImageResponse {
    pub images: Vec<RawGeneratedImage>,
    pub model: String,
}
