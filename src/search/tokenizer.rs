use super::types::QueryVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whitespace tokenizer with a configurable normalization policy.
///
/// The partition builder and every shard must use the same policy, otherwise
/// query tokens never meet the indexed tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tokenizer {
    pub lowercase: bool,
    /// Tokens shorter than this (in chars, after trimming) are discarded.
    pub min_token_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            lowercase: true,
            min_token_len: 1,
        }
    }
}

impl Tokenizer {
    /// Normalizes a single whitespace-delimited word, or `None` if nothing survives.
    pub fn normalize(&self, word: &str) -> Option<String> {
        let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
        if trimmed.is_empty() || trimmed.chars().count() < self.min_token_len {
            return None;
        }
        if self.lowercase {
            Some(trimmed.to_lowercase())
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter_map(|word| self.normalize(word))
            .collect()
    }

    pub fn query_vector(&self, query: &str) -> QueryVector {
        QueryVector::from_tokens(self.tokenize(query))
    }

    /// Term frequencies of a document body, as stored in posting lists.
    pub fn term_frequencies(&self, text: &str) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for token in self.tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }
}
