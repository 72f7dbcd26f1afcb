//! Raw service payloads for scripting the mock transport

use xai_chat::wire::{
    RawApiKeyInfo, RawChunk, RawDeferredState, RawDeferredStatus, RawDelta, RawEmbeddingModel, RawFinishReason,
    RawFunctionCall, RawGeneratedImage, RawImageModel, RawImageResponse, RawLanguageModel, RawMessage, RawModality,
    RawOutput, RawOutputChunk, RawResponse, RawToolCall, RawToolCallKind, RawToolCallStatus, RawUsage,
};

pub const MODEL: &str = "grok-4-1-fast-reasoning";

/// Blocking response carrying `content`, finished with `stop`
pub fn response(id: &str, content: &str) -> RawResponse {
    RawResponse {
        id: id.to_owned(),
        outputs: vec![RawOutput {
            index: 0,
            finish_reason: RawFinishReason::Stop,
            message: Some(RawMessage {
                content: content.to_owned(),
                ..RawMessage::default()
            }),
        }],
        created: Some(1_700_000_000),
        model: MODEL.to_owned(),
        usage: Some(usage(12, 5)),
        ..RawResponse::default()
    }
}

/// Blocking response asking for `tool_calls`
pub fn tool_response(id: &str, tool_calls: Vec<RawToolCall>) -> RawResponse {
    RawResponse {
        id: id.to_owned(),
        outputs: vec![RawOutput {
            index: 0,
            finish_reason: RawFinishReason::ToolCalls,
            message: Some(RawMessage {
                tool_calls,
                ..RawMessage::default()
            }),
        }],
        model: MODEL.to_owned(),
        ..RawResponse::default()
    }
}

pub fn usage(prompt: u32, completion: u32) -> RawUsage {
    RawUsage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: prompt + completion,
        ..RawUsage::default()
    }
}

/// Fragment carrying a text delta
pub fn text_chunk(id: &str, delta: &str) -> RawChunk {
    chunk(
        id,
        RawDelta {
            content: delta.to_owned(),
            ..RawDelta::default()
        },
    )
}

/// Fragment carrying tool call deltas
pub fn tool_chunk(id: &str, tool_calls: Vec<RawToolCall>) -> RawChunk {
    chunk(
        id,
        RawDelta {
            tool_calls,
            ..RawDelta::default()
        },
    )
}

/// Final fragment with a finish reason and usage
pub fn final_chunk(id: &str, reason: RawFinishReason, usage: RawUsage) -> RawChunk {
    RawChunk {
        id: id.to_owned(),
        outputs: vec![RawOutputChunk {
            index: 0,
            finish_reason: reason,
            delta: None,
        }],
        model: MODEL.to_owned(),
        usage: Some(usage),
        ..RawChunk::default()
    }
}

fn chunk(id: &str, delta: RawDelta) -> RawChunk {
    RawChunk {
        id: id.to_owned(),
        outputs: vec![RawOutputChunk {
            index: 0,
            finish_reason: RawFinishReason::Invalid,
            delta: Some(delta),
        }],
        model: MODEL.to_owned(),
        ..RawChunk::default()
    }
}

/// Client-side function call record
pub fn function_call(id: &str, name: &str, arguments: &str, status: RawToolCallStatus) -> RawToolCall {
    RawToolCall {
        id: id.to_owned(),
        kind: RawToolCallKind::ClientSideTool,
        status,
        error_message: None,
        function: Some(RawFunctionCall {
            name: name.to_owned(),
            arguments: arguments.to_owned(),
        }),
    }
}

/// Server-side tool call record
pub fn server_call(id: &str, kind: RawToolCallKind, name: &str) -> RawToolCall {
    RawToolCall {
        kind,
        status: RawToolCallStatus::Completed,
        ..function_call(id, name, "{}", RawToolCallStatus::Completed)
    }
}

pub fn pending() -> RawDeferredStatus {
    RawDeferredStatus {
        status: RawDeferredState::Pending,
        response: None,
    }
}

pub fn done(response: RawResponse) -> RawDeferredStatus {
    RawDeferredStatus {
        status: RawDeferredState::Done,
        response: Some(response),
    }
}

pub fn expired() -> RawDeferredStatus {
    RawDeferredStatus {
        status: RawDeferredState::Expired,
        response: None,
    }
}

/// Catalog entry with text and image input and fixed-point prices
pub fn model(name: &str, aliases: &[&str], input_price: i64, output_price: i64) -> RawLanguageModel {
    RawLanguageModel {
        name: name.to_owned(),
        aliases: aliases.iter().map(|alias| (*alias).to_owned()).collect(),
        version: "1.0.0".to_owned(),
        input_modalities: vec![RawModality::Text, RawModality::Image],
        output_modalities: vec![RawModality::Text],
        prompt_text_token_price: input_price,
        completion_text_token_price: output_price,
        max_prompt_length: 131_072,
        created: Some(1_700_000_000),
        ..RawLanguageModel::default()
    }
}

pub fn embedding_model(name: &str, text_price: i64, image_price: i64) -> RawEmbeddingModel {
    RawEmbeddingModel {
        name: name.to_owned(),
        version: "1.0.0".to_owned(),
        input_modalities: vec![RawModality::Text, RawModality::Image],
        output_modalities: vec![RawModality::Embedding],
        prompt_text_token_price: text_price,
        prompt_image_token_price: image_price,
        created: Some(1_700_000_000),
        ..RawEmbeddingModel::default()
    }
}

/// Image model whose `image_price` is hundredths of a cent per image
pub fn image_model(name: &str, aliases: &[&str], image_price: i64) -> RawImageModel {
    RawImageModel {
        name: name.to_owned(),
        aliases: aliases.iter().map(|alias| (*alias).to_owned()).collect(),
        version: "1.0.0".to_owned(),
        input_modalities: vec![RawModality::Text],
        output_modalities: vec![RawModality::Image],
        max_prompt_length: 1024,
        image_price,
        ..RawImageModel::default()
    }
}

/// Active key named `name` holding `acls`
pub fn key_info(name: &str, acls: &[&str]) -> RawApiKeyInfo {
    RawApiKeyInfo {
        redacted_api_key: "xai-...3456".to_owned(),
        api_key_id: "key_1".to_owned(),
        name: name.to_owned(),
        user_id: "user_1".to_owned(),
        team_id: "team_1".to_owned(),
        acls: acls.iter().map(|acl| (*acl).to_owned()).collect(),
        create_time: Some(1_700_000_000),
        ..RawApiKeyInfo::default()
    }
}

/// Response carrying one hosted image per URL
pub fn image_response(model: &str, urls: &[&str]) -> RawImageResponse {
    RawImageResponse {
        images: urls
            .iter()
            .map(|url| RawGeneratedImage {
                url: (*url).to_owned(),
                respect_moderation: true,
                ..RawGeneratedImage::default()
            })
            .collect(),
        model: model.to_owned(),
    }
}
