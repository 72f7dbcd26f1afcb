//! Generated images

use crate::wire::{RawGeneratedImage, RawImageResponse};

/// One generated image, delivered either as a URL or inline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: Option<String>,
    pub base64: Option<String>,
    /// Whether the image passed the service's moderation
    pub respect_moderation: bool,
}

impl From<RawGeneratedImage> for GeneratedImage {
    fn from(raw: RawGeneratedImage) -> Self {
        Self {
            url: Some(raw.url).filter(|url| !url.is_empty()),
            base64: Some(raw.base64).filter(|data| !data.is_empty()),
            respect_moderation: raw.respect_moderation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResponse {
    pub images: Vec<GeneratedImage>,
    /// Model that produced the images
    pub model: String,
}

impl From<RawImageResponse> for ImageResponse {
    fn from(raw: RawImageResponse) -> Self {
        Self {
            images: raw.images.into_iter().map(GeneratedImage::from).collect(),
            model: raw.model,
        }
    }
}
