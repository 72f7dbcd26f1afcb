//! Request model and fluent builder
//!
//! [`RequestBuilder`] accumulates a conversation and its sampling knobs;
//! [`RequestBuilder::build`] turns that state into an immutable
//! [`ChatRequest`] ready for the transport. Building is pure: the same state
//! always yields the same request, and the default model is substituted only
//! at build time.

use serde::Serialize;

use crate::types::{ContentPart, Message, ToolChoice, ToolDescriptor};
use crate::wire;

/// How much reasoning a reasoning model should spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
}

/// Output format constraint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text
    #[default]
    Text,
    /// A JSON object
    JsonObject,
}

/// Extra data channels the service may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeOption {
    /// Encrypted web search tool output
    WebSearchCallOutput,
    /// Encrypted X search tool output
    XSearchCallOutput,
    /// Code execution tool output
    CodeExecutionCallOutput,
    /// Citations inline in the content
    InlineCitations,
    /// Stream chunks that carry no user-visible content
    VerboseStreaming,
}

/// Immutable request handed to the transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    pub logprobs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<wire::Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<ReasoningEffort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    /// Must be re-asserted on every turn of a server-side chain
    pub store_messages: bool,
    /// Chains to server-stored context; only new turns should be sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
    pub use_encrypted_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<IncludeOption>,
}

/// Fluent accumulator for a [`ChatRequest`]
///
/// Setters overwrite; message calls append in call order. Nothing is
/// validated here, e.g. a full history alongside `previous_response_id` is
/// passed through untouched.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    messages: Vec<Message>,
    model: Option<String>,
    user: String,
    max_tokens: Option<u32>,
    seed: Option<i32>,
    stop: Vec<String>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    top_logprobs: Option<u32>,
    tools: Vec<ToolDescriptor>,
    tool_choice: Option<ToolChoice>,
    response_format: Option<ResponseFormat>,
    frequency_penalty: Option<f32>,
    presence_penalty: Option<f32>,
    reasoning_effort: Option<ReasoningEffort>,
    parallel_tool_calls: Option<bool>,
    store_messages: bool,
    previous_response_id: Option<String>,
    use_encrypted_content: bool,
    max_turns: Option<u32>,
    include: Vec<IncludeOption>,
}

impl RequestBuilder {
    /// Empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary message
    #[must_use]
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Append a system message
    #[must_use]
    pub fn system(self, text: impl Into<String>) -> Self {
        self.message(Message::system(text))
    }

    /// Append a developer instruction
    #[must_use]
    pub fn developer(self, text: impl Into<String>) -> Self {
        self.message(Message::developer(text))
    }

    /// Append a user message
    #[must_use]
    pub fn user(self, text: impl Into<String>) -> Self {
        self.message(Message::user(text))
    }

    /// Append a user message with text followed by an image
    #[must_use]
    pub fn user_with_image(self, text: impl Into<String>, image_url: impl Into<String>) -> Self {
        self.message(Message::user_parts(vec![
            ContentPart::text(text),
            ContentPart::image_url(image_url),
        ]))
    }

    /// Append an assistant message
    #[must_use]
    pub fn assistant(self, text: impl Into<String>) -> Self {
        self.message(Message::assistant(text))
    }

    /// Append the result of a client-side tool call
    #[must_use]
    pub fn tool_result(self, tool_call_id: impl Into<String>, result: impl Into<String>) -> Self {
        self.message(Message::tool_result(tool_call_id, result))
    }

    /// Model to use; when unset the client's default applies
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Opaque end-user identifier
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: i32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Stop sequences, replacing any set earlier
    #[must_use]
    pub fn with_stop<I, S>(mut self, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = sequences.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub const fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Request log probabilities for the `top` most likely tokens
    #[must_use]
    pub const fn with_logprobs(mut self, top: u32) -> Self {
        self.top_logprobs = Some(top);
        self
    }

    #[must_use]
    pub const fn with_frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    #[must_use]
    pub const fn with_presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Declare a tool
    #[must_use]
    pub fn add_tool(mut self, tool: impl Into<ToolDescriptor>) -> Self {
        self.tools.push(tool.into());
        self
    }

    /// Declare several tools
    #[must_use]
    pub fn add_tools(mut self, tools: impl IntoIterator<Item = ToolDescriptor>) -> Self {
        self.tools.extend(tools);
        self
    }

    #[must_use]
    pub const fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    #[must_use]
    pub const fn with_parallel_tool_calls(mut self, enabled: bool) -> Self {
        self.parallel_tool_calls = Some(enabled);
        self
    }

    /// Upper bound on agentic tool-calling turns
    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    #[must_use]
    pub const fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    #[must_use]
    pub const fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    /// Store this turn server-side so a later turn can chain to it
    #[must_use]
    pub const fn with_store_messages(mut self, store: bool) -> Self {
        self.store_messages = store;
        self
    }

    /// Continue from a stored response instead of resending history
    #[must_use]
    pub fn with_previous_response_id(mut self, id: impl Into<String>) -> Self {
        self.previous_response_id = Some(id.into());
        self
    }

    /// Return encrypted reasoning so it survives chained turns
    #[must_use]
    pub const fn with_encrypted_content(mut self, enabled: bool) -> Self {
        self.use_encrypted_content = enabled;
        self
    }

    /// Ask for an extra data channel; repeated options are sent once
    #[must_use]
    pub fn include(mut self, option: IncludeOption) -> Self {
        if !self.include.contains(&option) {
            self.include.push(option);
        }
        self
    }

    /// Messages accumulated so far, in conversation order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Tools declared so far
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Produce the request, substituting `default_model` when none was set
    pub fn build(&self, default_model: &str) -> ChatRequest {
        ChatRequest {
            messages: self.messages.clone(),
            model: self
                .model
                .clone()
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| default_model.to_owned()),
            user: self.user.clone(),
            max_tokens: self.max_tokens,
            seed: self.seed,
            stop: self.stop.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            logprobs: self.top_logprobs.is_some(),
            top_logprobs: self.top_logprobs,
            tools: self.tools.iter().map(ToolDescriptor::to_wire).collect(),
            tool_choice: self.tool_choice,
            response_format: self.response_format,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            reasoning_effort: self.reasoning_effort,
            parallel_tool_calls: self.parallel_tool_calls,
            store_messages: self.store_messages,
            previous_response_id: self.previous_response_id.clone(),
            use_encrypted_content: self.use_encrypted_content,
            max_turns: self.max_turns,
            include: self.include.clone(),
        }
    }
}
