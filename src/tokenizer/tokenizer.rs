use std::collections::HashSet;

use crate::config::TokenizerConfig;

/// Text tokenizer: case-folding and alphanumeric word splitting.
///
/// Deterministic and pure; indexing and query tokenization must go through
/// the same instance so both sides agree on token boundaries.
#[derive(Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Tokenize text into a vector of terms.
    ///
    /// A term is a maximal run of alphanumeric characters; everything else
    /// separates. Empty segments and over-long tokens are dropped.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|segment| !segment.is_empty())
            .filter(|segment| segment.len() <= self.config.max_token_length)
            .map(|segment| {
                if self.config.lowercase {
                    segment.to_lowercase()
                } else {
                    segment.to_string()
                }
            })
            .collect()
    }

    /// Unique terms from text, for index membership
    pub fn unique_terms(&self, text: &str) -> HashSet<String> {
        self.tokenize(text).into_iter().collect()
    }
}
