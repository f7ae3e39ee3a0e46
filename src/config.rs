//! Index configuration: field list, BM25 constants, pluggable tokenizer/filter.
//!
//! A [`FieldConfig`] per indexed field (name, boost, accessor) and a
//! [`Bm25Config`] for the `k1`/`b` constants. Both carry `Default` impls so
//! callers can override only what they need.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tokenize::{default_filter, default_tokenizer, Filter, Tokenizer};

/// Term-frequency saturation (`k1`) and length-normalization (`b`) constants.
///
/// Defaults match the commonly cited Okapi BM25 reference values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Config {
    /// Term-frequency saturation parameter (typically 1.2-2.0).
    pub k1: f64,

    /// Length-normalization parameter (typically 0.75).
    pub b: f64,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

impl Bm25Config {
    pub fn new(k1: f64, b: f64) -> Self {
        Self { k1, b }
    }
}

/// One text field participating in the index.
///
/// `accessor` extracts the field's text from a document of type `D`;
/// returning `None` excludes the field for that document.
#[derive(Clone)]
pub struct FieldConfig<D> {
    pub name: String,
    pub boost: f64,
    pub accessor: Arc<dyn Fn(&D) -> Option<String> + Send + Sync>,
}

impl<D> FieldConfig<D> {
    pub fn new(name: impl Into<String>, accessor: impl Fn(&D) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            boost: 1.0,
            accessor: Arc::new(accessor),
        }
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }
}

impl<D> std::fmt::Debug for FieldConfig<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldConfig")
            .field("name", &self.name)
            .field("boost", &self.boost)
            .finish_non_exhaustive()
    }
}

/// Top-level index configuration: the fixed field list plus the pluggable
/// tokenizer/filter and BM25 constants.
pub struct IndexConfig<D> {
    pub fields: Vec<FieldConfig<D>>,
    pub tokenizer: Arc<dyn Tokenizer>,
    pub filter: Arc<dyn Filter>,
    pub bm25: Bm25Config,
}

impl<D> IndexConfig<D> {
    /// Start a configuration with the default whitespace tokenizer and
    /// lowercase/trim filter, no fields yet.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            tokenizer: default_tokenizer(),
            filter: default_filter(),
            bm25: Bm25Config::default(),
        }
    }

    pub fn with_field(mut self, field: FieldConfig<D>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_bm25(mut self, bm25: Bm25Config) -> Self {
        self.bm25 = bm25;
        self
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl<D> Default for IndexConfig<D> {
    fn default() -> Self {
        Self::new()
    }
}
