//! Image generation requests
//!
//! [`ImageRequest`] mirrors [`crate::RequestBuilder`]: setters accumulate
//! state and [`ImageRequest::build`] produces the immutable
//! [`GenerateImageRequest`] handed to the transport, substituting the
//! client's default image model only at build time.

use serde::Serialize;

/// How generated images are delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// Hosted URL
    #[default]
    Url,
    /// Inline base64 data
    Base64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ImageAspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "3:4")]
    Portrait3x4,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ImageResolution {
    #[default]
    #[serde(rename = "1k")]
    OneK,
    #[serde(rename = "2k")]
    TwoK,
}

/// Immutable image request handed to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub model: String,
    /// Number of images; the service picks when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    pub format: ImageFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<ImageAspectRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ImageResolution>,
    /// Source image to edit, as a URL or data URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Fluent accumulator for a [`GenerateImageRequest`]
#[derive(Debug, Clone, Default)]
pub struct ImageRequest {
    prompt: String,
    model: Option<String>,
    count: Option<u32>,
    user: String,
    format: ImageFormat,
    aspect_ratio: Option<ImageAspectRatio>,
    resolution: Option<ImageResolution>,
    input_image: Option<String>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Model to use; when unset the client's default image model applies
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub const fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Opaque end-user identifier
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub const fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub const fn with_aspect_ratio(mut self, aspect_ratio: ImageAspectRatio) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    #[must_use]
    pub const fn with_resolution(mut self, resolution: ImageResolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Edit an existing image instead of starting from scratch
    #[must_use]
    pub fn with_input_image(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.input_image = (!url.is_empty()).then_some(url);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Produce the request, substituting `default_model` when none was set
    pub fn build(&self, default_model: &str) -> GenerateImageRequest {
        GenerateImageRequest {
            prompt: self.prompt.clone(),
            model: self
                .model
                .clone()
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| default_model.to_owned()),
            n: self.count,
            user: self.user.clone(),
            format: self.format,
            aspect_ratio: self.aspect_ratio,
            resolution: self.resolution,
            image_url: self.input_image.clone(),
        }
    }
}
