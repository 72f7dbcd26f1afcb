//! Chat client core for the xAI Grok service
//!
//! Builds multi-turn requests, assembles blocking and streamed responses
//! (reconciling partial tool calls across fragments), tracks deferred
//! completions through bounded polling, and translates transport failures
//! into a retry-aware [`ErrorKind`] taxonomy. Tokenization, API-key
//! metadata, the model catalogs and image generation ride on the same
//! client. The RPC layer itself is an external collaborator behind
//! [`ChatTransport`].

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;
mod context;
mod convert;
mod credentials;
pub mod deferred;
pub mod error;
mod image;
mod reconcile;
mod request;
mod stream;
mod transport;
pub mod types;
pub mod wire;

pub use client::ChatClient;
pub use context::{CallContext, CallMetadata};
pub use convert::{EXPIRED_REASON, UNRECOGNIZED_REASON};
pub use credentials::{CredentialSource, StaticApiKey};
pub use error::{Error, ErrorKind, Result, translate};
pub use image::{GenerateImageRequest, ImageAspectRatio, ImageFormat, ImageRequest, ImageResolution};
pub use reconcile::ToolCallTracker;
pub use request::{ChatRequest, IncludeOption, ReasoningEffort, RequestBuilder, ResponseFormat};
pub use stream::{ChunkStream, ResponseAccumulator};
pub use transport::{ChatTransport, RawChunkStream};
pub use types::*;
pub use xai_config::ClientConfig;
