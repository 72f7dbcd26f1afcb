//! Tokenizer output

use crate::wire::RawToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: u32,
    /// Text the token stands for
    pub text: String,
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        Self {
            id: raw.token_id,
            text: raw.string_token,
        }
    }
}

/// Text split by a model's tokenizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenization {
    /// Model whose tokenizer was used
    pub model: String,
    pub tokens: Vec<Token>,
}

impl Tokenization {
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// Concatenated token text
    pub fn text(&self) -> String {
        self.tokens.iter().map(|token| token.text.as_str()).collect()
    }
}
