//! Conversation messages and their content parts

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// Developer instruction
    Developer,
    /// User message
    User,
    /// Assistant response
    Assistant,
    /// Tool result
    Tool,
}

/// Individual part within a message; order is significant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content block
    Text {
        /// The text string
        text: String,
    },
    /// Image reference
    ImageUrl {
        /// URL or base64 data URI for the image
        url: String,
    },
}

impl ContentPart {
    /// Text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Image reference part
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl { url: url.into() }
    }
}

/// Message in a conversation
///
/// Fields are private so that every `tool` message carries the id of the
/// call it answers, and no other message carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedMessage")]
pub struct Message {
    role: Role,
    content: Vec<ContentPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Deserialize)]
struct UncheckedMessage {
    role: Role,
    content: Vec<ContentPart>,
    #[serde(default)]
    tool_call_id: Option<String>,
}

impl TryFrom<UncheckedMessage> for Message {
    type Error = Error;

    fn try_from(raw: UncheckedMessage) -> Result<Self> {
        match (raw.role, raw.tool_call_id) {
            (Role::Tool, Some(id)) => Ok(Self::tool_result_with_parts(id, raw.content)),
            (Role::Tool, None) => Err(missing_call_id()),
            (role, Some(_)) => Err(Error::new(
                ErrorKind::InvalidRequest,
                format!("only tool messages carry a tool call id, not {role:?}"),
            )),
            (role, None) => Self::with_parts(role, raw.content),
        }
    }
}

fn missing_call_id() -> Error {
    Error::new(ErrorKind::InvalidRequest, "tool messages must name the tool call they answer")
}

impl Message {
    /// System instruction
    pub fn system(text: impl Into<String>) -> Self {
        Self::plain(Role::System, vec![ContentPart::text(text)])
    }

    /// Developer instruction
    pub fn developer(text: impl Into<String>) -> Self {
        Self::plain(Role::Developer, vec![ContentPart::text(text)])
    }

    /// User message with a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self::plain(Role::User, vec![ContentPart::text(text)])
    }

    /// Assistant turn with a single text part
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, vec![ContentPart::text(text)])
    }

    /// Tool result answering `tool_call_id`
    pub fn tool_result(tool_call_id: impl Into<String>, result: impl Into<String>) -> Self {
        Self::tool_result_with_parts(tool_call_id, vec![ContentPart::text(result)])
    }

    /// Tool result made of explicit parts
    pub fn tool_result_with_parts(tool_call_id: impl Into<String>, content: Vec<ContentPart>) -> Self {
        Self {
            role: Role::Tool,
            content,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// User message made of explicit parts
    pub const fn user_parts(content: Vec<ContentPart>) -> Self {
        Self::plain(Role::User, content)
    }

    /// Message built from explicit parts
    ///
    /// Tool messages need the call id they answer; build them with
    /// [`Message::tool_result_with_parts`] instead.
    pub fn with_parts(role: Role, content: Vec<ContentPart>) -> Result<Self> {
        if role == Role::Tool {
            return Err(missing_call_id());
        }
        Ok(Self::plain(role, content))
    }

    const fn plain(role: Role, content: Vec<ContentPart>) -> Self {
        Self {
            role,
            content,
            tool_call_id: None,
        }
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    /// Ordered content parts
    pub fn content(&self) -> &[ContentPart] {
        &self.content
    }

    /// Id of the tool call this message answers; set on every `tool` message
    pub fn tool_call_id(&self) -> Option<&str> {
        self.tool_call_id.as_deref()
    }

    /// Concatenated text of all text parts, in order
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::ImageUrl { .. } => None,
            })
            .collect()
    }
}
