//! docdex: a lightweight, in-memory, dynamic full-text search core.
//!
//! A character-trie inverted index with prefix expansion and Okapi BM25
//! ranking, built around three pieces:
//!
//! - [`index::DocumentIndex`]: the public insert/remove/vacuum/search API.
//! - [`config::IndexConfig`]: field list, boosts, BM25 constants, and the
//!   pluggable [`tokenize::Tokenizer`]/[`tokenize::Filter`] pipeline.
//! - [`snapshot`]: serializing/restoring an index's persisted state.
//!
//! The index is single-threaded: there is no internal locking, and a
//! search mutates the trie (it opportunistically prunes postings for
//! removed documents as it walks them). Wrap a [`index::DocumentIndex`] in
//! your own synchronization if it needs to be shared across threads.

pub mod config;
pub mod error;
pub mod index;
pub mod snapshot;
pub mod tokenize;

pub use config::{Bm25Config, FieldConfig, IndexConfig};
pub use error::{FtsError, Result};
pub use index::{DocumentIndex, SearchHit};
pub use tokenize::{DefaultFilter, Filter, Tokenizer, WhitespaceTokenizer};
