//! Pluggable tokenizer and term filter.
//!
//! Indexing and querying share the same two-stage pipeline: a [`Tokenizer`]
//! splits raw text into tokens, then a [`Filter`] maps each token to a term
//! (or drops it by returning an empty string). Both stages are trait
//! objects so embedders can swap in stemming, CJK segmentation, or stopword
//! removal without touching the trie/BM25 core.

use std::sync::Arc;

/// Splits a string into an ordered sequence of tokens.
///
/// Implementations must be deterministic and referentially transparent with
/// respect to a single index instance.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Maps a token to a term, or to the empty string to drop it.
pub trait Filter: Send + Sync {
    fn filter(&self, token: &str) -> String;
}

/// Default tokenizer: trim leading/trailing whitespace, split on any
/// maximal run of whitespace (spaces, tabs, line feeds).
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Default filter: lowercase all code units, then strip leading and
/// trailing runs of non-word characters (letters, digits, underscore are
/// "word" characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFilter;

impl Filter for DefaultFilter {
    fn filter(&self, token: &str) -> String {
        let lowered = token.to_lowercase();
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let start = lowered.find(is_word);
        let Some(start) = start else {
            return String::new();
        };
        let end = lowered.rfind(is_word).map(|i| {
            // byte index of the last word char plus its UTF-8 width
            let ch = lowered[i..].chars().next().unwrap();
            i + ch.len_utf8()
        }).unwrap_or(start);
        lowered[start..end].to_string()
    }
}

pub fn default_tokenizer() -> Arc<dyn Tokenizer> {
    Arc::new(WhitespaceTokenizer)
}

pub fn default_filter() -> Arc<dyn Filter> {
    Arc::new(DefaultFilter)
}

/// Tokenizes then filters `text`, discarding tokens the filter drops.
pub fn terms_of(tokenizer: &dyn Tokenizer, filter: &dyn Filter, text: &str) -> Vec<String> {
    tokenizer
        .tokenize(text)
        .iter()
        .map(|tok| filter.filter(tok))
        .filter(|term| !term.is_empty())
        .collect()
}
