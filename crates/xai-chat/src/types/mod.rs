//! Normalized value types exposed to callers

mod account;
mod catalog;
mod deferred;
mod image;
mod message;
mod response;
mod token;
mod tool;

pub use account::{ApiKeyInfo, ApiKeyStatus};
pub use catalog::{EmbeddingModel, ImageModel, LanguageModel, Modality, Pricing};
pub use deferred::{DeferredCompletion, DeferredStatus};
pub use image::{GeneratedImage, ImageResponse};
pub use message::{ContentPart, Message, Role};
pub use response::{ChatChunk, ChatResponse, FinishReason, Usage};
pub use token::{Token, Tokenization};
pub use tool::{
    FunctionCall, FunctionTool, ToolCallInfo, ToolCallStatus, ToolCallType, ToolChoice, ToolDescriptor,
    is_client_side_tool,
};
