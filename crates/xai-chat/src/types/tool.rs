//! Tool declarations, tool calls and their classification

use serde::{Deserialize, Serialize};

use crate::wire::{self, RawToolCall, RawToolCallKind, RawToolCallStatus};

/// Tool the model may use, declared on a request
#[derive(Debug, Clone, PartialEq)]
pub enum ToolDescriptor {
    /// Function the caller executes
    Function(FunctionTool),
    /// Web search run by the service
    WebSearch,
    /// X search run by the service
    XSearch,
    /// Sandboxed code execution run by the service
    CodeExecution,
    /// Search over uploaded document collections
    CollectionsSearch {
        /// Collections to search
        collection_ids: Vec<String>,
    },
    /// Search over request attachments
    AttachmentSearch {
        /// Maximum number of files to search
        limit: Option<u32>,
    },
    /// Tools exposed by a remote MCP server
    Mcp {
        /// Label identifying the server
        server_label: String,
        /// Server URL
        server_url: String,
    },
}

impl ToolDescriptor {
    /// Collection search over the given collections
    pub fn collections_search<I, S>(collection_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::CollectionsSearch {
            collection_ids: collection_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// MCP server tool
    pub fn mcp(server_label: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self::Mcp {
            server_label: server_label.into(),
            server_url: server_url.into(),
        }
    }

    /// Function payload, when this is a function tool
    pub const fn as_function(&self) -> Option<&FunctionTool> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Wire form of this declaration
    pub fn to_wire(&self) -> wire::Tool {
        match self {
            Self::Function(function) => wire::Tool::Function(function.to_wire()),
            Self::WebSearch => wire::Tool::WebSearch {},
            Self::XSearch => wire::Tool::XSearch {},
            Self::CodeExecution => wire::Tool::CodeExecution {},
            Self::CollectionsSearch { collection_ids } => wire::Tool::CollectionsSearch {
                collection_ids: collection_ids.clone(),
            },
            Self::AttachmentSearch { limit } => wire::Tool::AttachmentSearch { limit: *limit },
            Self::Mcp {
                server_label,
                server_url,
            } => wire::Tool::Mcp {
                server_label: server_label.clone(),
                server_url: server_url.clone(),
            },
        }
    }
}

impl From<FunctionTool> for ToolDescriptor {
    fn from(function: FunctionTool) -> Self {
        Self::Function(function)
    }
}

/// Caller-executed function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTool {
    /// Function name, matched exactly against tool calls
    pub name: String,
    /// What the function does
    pub description: String,
    /// JSON Schema of the parameters
    pub parameters: Option<serde_json::Value>,
    /// Strict schema adherence
    pub strict: bool,
}

impl FunctionTool {
    /// Function with no parameter schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: None,
            strict: false,
        }
    }

    /// Set the parameter schema
    #[must_use]
    pub fn with_parameters(mut self, schema: serde_json::Value) -> Self {
        self.parameters = Some(schema);
        self
    }

    /// Request strict schema adherence
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn to_wire(&self) -> wire::FunctionSpec {
        wire::FunctionSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self
                .parameters
                .as_ref()
                .map(serde_json::Value::to_string)
                .unwrap_or_default(),
            strict: self.strict,
        }
    }
}

/// How the model may select tools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Model decides
    #[default]
    Auto,
    /// Model must not call tools
    None,
    /// Model must call at least one tool
    Required,
}

/// Who executes a tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallType {
    /// The caller must execute it and send back a result
    ClientSide,
    /// The service already executed it
    ServerSide,
}

impl ToolCallType {
    /// Classify a declared kind tag; unrecognized kinds are the caller's
    pub const fn classify(kind: RawToolCallKind) -> Self {
        match kind {
            RawToolCallKind::WebSearchTool
            | RawToolCallKind::XSearchTool
            | RawToolCallKind::CodeExecutionTool
            | RawToolCallKind::CollectionsSearchTool
            | RawToolCallKind::McpTool
            | RawToolCallKind::AttachmentSearchTool => Self::ServerSide,
            RawToolCallKind::ClientSideTool | RawToolCallKind::Invalid | RawToolCallKind::Unrecognized => {
                Self::ClientSide
            }
        }
    }
}

/// Execution status of a tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallStatus {
    /// Observed but not finished
    Pending,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
}

impl ToolCallStatus {
    pub(crate) const fn from_raw(status: RawToolCallStatus) -> Self {
        match status {
            RawToolCallStatus::Completed => Self::Completed,
            RawToolCallStatus::Failed => Self::Failed,
            RawToolCallStatus::InProgress | RawToolCallStatus::Incomplete | RawToolCallStatus::Unrecognized => {
                Self::Pending
            }
        }
    }
}

/// Function name and JSON argument text of a tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

/// Tool call made by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallInfo {
    /// Call identifier; tool results reference it
    pub id: String,
    /// Who executes the call
    pub call_type: ToolCallType,
    /// Current status
    pub status: ToolCallStatus,
    /// Failure description, when the call failed
    pub error_message: Option<String>,
    /// Invoked function
    pub function: Option<FunctionCall>,
}

impl ToolCallInfo {
    /// Whether the caller must execute this call
    pub fn is_client_side(&self) -> bool {
        self.call_type == ToolCallType::ClientSide
    }

    /// Whether the service already executed this call
    pub fn is_server_side(&self) -> bool {
        self.call_type == ToolCallType::ServerSide
    }

    /// Name of the invoked function, if any
    pub fn function_name(&self) -> Option<&str> {
        self.function.as_ref().map(|function| function.name.as_str())
    }
}

impl From<&RawToolCall> for ToolCallInfo {
    fn from(raw: &RawToolCall) -> Self {
        Self {
            id: raw.id.clone(),
            call_type: ToolCallType::classify(raw.kind),
            status: ToolCallStatus::from_raw(raw.status),
            error_message: raw.error_message.clone(),
            function: raw.function.as_ref().map(|function| FunctionCall {
                name: function.name.clone(),
                arguments: function.arguments.clone(),
            }),
        }
    }
}

/// Whether `call` invokes one of the caller's own function tools
///
/// Matching is by exact function name; non-function tools never match.
pub fn is_client_side_tool(call: &ToolCallInfo, registered: &[ToolDescriptor]) -> bool {
    let Some(name) = call.function_name() else {
        return false;
    };

    registered
        .iter()
        .filter_map(ToolDescriptor::as_function)
        .any(|function| function.name == name)
}
