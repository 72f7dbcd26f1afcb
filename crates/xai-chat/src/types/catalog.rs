//! Model catalog entries and their pricing

use jiff::Timestamp;

use crate::wire::{RawEmbeddingModel, RawImageModel, RawLanguageModel, RawModality};

/// Catalog prices are hundredths of a cent per million tokens
const PRICE_SCALE: f64 = 10_000.0;

const TOKENS_PER_UNIT: f64 = 1_000_000.0;

/// Input or output modality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Text,
    Image,
    Embedding,
}

impl Modality {
    const fn from_raw(raw: RawModality) -> Option<Self> {
        match raw {
            RawModality::Text => Some(Self::Text),
            RawModality::Image => Some(Self::Image),
            RawModality::Embedding => Some(Self::Embedding),
            RawModality::Invalid | RawModality::Unrecognized => None,
        }
    }
}

/// Price in currency units per million tokens
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pricing {
    pub per_million_tokens: f64,
}

impl Pricing {
    /// Scale a fixed-point catalog price
    #[allow(clippy::cast_precision_loss)]
    pub fn from_fixed_point(raw: i64) -> Self {
        Self {
            per_million_tokens: raw as f64 / PRICE_SCALE,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn cost_of(self, tokens: u64) -> f64 {
        tokens as f64 * self.per_million_tokens / TOKENS_PER_UNIT
    }
}

/// Language model offered by the service
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageModel {
    /// Name used in requests
    pub name: String,
    /// Alternative names
    pub aliases: Vec<String>,
    pub version: String,
    pub input_modalities: Vec<Modality>,
    pub output_modalities: Vec<Modality>,
    /// Context window in tokens
    pub max_prompt_length: u32,
    pub created_at: Option<Timestamp>,
    pub system_fingerprint: String,
    pub prompt_text_pricing: Pricing,
    pub prompt_image_pricing: Pricing,
    pub cached_prompt_pricing: Pricing,
    pub completion_pricing: Pricing,
    pub search_pricing: Pricing,
}

impl LanguageModel {
    /// Whether the model accepts image input
    pub fn supports_images(&self) -> bool {
        self.input_modalities.contains(&Modality::Image)
    }

    /// Estimated cost of a request in currency units
    pub fn calculate_cost(&self, input_tokens: u64, output_tokens: u64, cached_tokens: u64) -> f64 {
        self.prompt_text_pricing.cost_of(input_tokens)
            + self.completion_pricing.cost_of(output_tokens)
            + self.cached_prompt_pricing.cost_of(cached_tokens)
    }
}

impl From<RawLanguageModel> for LanguageModel {
    fn from(raw: RawLanguageModel) -> Self {
        Self {
            name: raw.name,
            aliases: raw.aliases,
            version: raw.version,
            input_modalities: modalities(raw.input_modalities),
            output_modalities: modalities(raw.output_modalities),
            max_prompt_length: raw.max_prompt_length,
            created_at: timestamp(raw.created),
            system_fingerprint: raw.system_fingerprint,
            prompt_text_pricing: Pricing::from_fixed_point(raw.prompt_text_token_price),
            prompt_image_pricing: Pricing::from_fixed_point(raw.prompt_image_token_price),
            cached_prompt_pricing: Pricing::from_fixed_point(raw.cached_prompt_token_price),
            completion_pricing: Pricing::from_fixed_point(raw.completion_text_token_price),
            search_pricing: Pricing::from_fixed_point(raw.search_price),
        }
    }
}

/// Embedding model offered by the service
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingModel {
    pub name: String,
    pub aliases: Vec<String>,
    pub version: String,
    pub input_modalities: Vec<Modality>,
    pub output_modalities: Vec<Modality>,
    pub created_at: Option<Timestamp>,
    pub system_fingerprint: String,
    pub prompt_text_pricing: Pricing,
    pub prompt_image_pricing: Pricing,
}

impl From<RawEmbeddingModel> for EmbeddingModel {
    fn from(raw: RawEmbeddingModel) -> Self {
        Self {
            name: raw.name,
            aliases: raw.aliases,
            version: raw.version,
            input_modalities: modalities(raw.input_modalities),
            output_modalities: modalities(raw.output_modalities),
            created_at: timestamp(raw.created),
            system_fingerprint: raw.system_fingerprint,
            prompt_text_pricing: Pricing::from_fixed_point(raw.prompt_text_token_price),
            prompt_image_pricing: Pricing::from_fixed_point(raw.prompt_image_token_price),
        }
    }
}

/// Image generation model offered by the service
#[derive(Debug, Clone, PartialEq)]
pub struct ImageModel {
    pub name: String,
    pub aliases: Vec<String>,
    pub version: String,
    pub input_modalities: Vec<Modality>,
    pub output_modalities: Vec<Modality>,
    /// Longest accepted prompt
    pub max_prompt_length: u32,
    pub created_at: Option<Timestamp>,
    /// Price of one generated image in currency units
    pub price_per_image: f64,
}

impl From<RawImageModel> for ImageModel {
    #[allow(clippy::cast_precision_loss)]
    fn from(raw: RawImageModel) -> Self {
        Self {
            name: raw.name,
            aliases: raw.aliases,
            version: raw.version,
            input_modalities: modalities(raw.input_modalities),
            output_modalities: modalities(raw.output_modalities),
            max_prompt_length: raw.max_prompt_length,
            created_at: timestamp(raw.created),
            price_per_image: raw.image_price as f64 / PRICE_SCALE,
        }
    }
}

fn modalities(raw: Vec<RawModality>) -> Vec<Modality> {
    raw.into_iter().filter_map(Modality::from_raw).collect()
}

fn timestamp(seconds: Option<i64>) -> Option<Timestamp> {
    seconds.and_then(|secs| Timestamp::from_second(secs).ok())
}
