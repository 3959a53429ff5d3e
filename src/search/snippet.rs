use super::tokenizer::Tokenizer;
use super::types::QueryVector;
use serde::{Deserialize, Serialize};

const ELLIPSIS: &str = "...";

/// Snippet window policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    /// Number of words in the excerpt.
    pub window_words: usize,
    /// Words of context kept before the first match.
    pub lead_words: usize,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            window_words: 30,
            lead_words: 5,
        }
    }
}

/// Picks an excerpt of `text` around the first word matching a query token.
///
/// First match wins. Without any match the excerpt is the prefix of the text.
/// Words are re-joined with single spaces and truncated edges are marked with `...`.
pub fn make_snippet(
    text: &str,
    query: &QueryVector,
    tokenizer: &Tokenizer,
    config: &SnippetConfig,
) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || config.window_words == 0 {
        return String::new();
    }

    let first_match = words.iter().position(|word| {
        tokenizer
            .normalize(word)
            .is_some_and(|token| query.contains(&token))
    });

    let start = match first_match {
        Some(pos) => {
            // Slide the window left when the match sits near the end of the text.
            let latest_start = words.len().saturating_sub(config.window_words);
            pos.saturating_sub(config.lead_words).min(latest_start)
        }
        None => 0,
    };
    let end = (start + config.window_words).min(words.len());

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
        snippet.push(' ');
    }
    snippet.push_str(&words[start..end].join(" "));
    if end < words.len() {
        snippet.push(' ');
        snippet.push_str(ELLIPSIS);
    }
    snippet
}
