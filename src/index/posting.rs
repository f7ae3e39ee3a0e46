//! Posting records attached to trie nodes.

use serde::{Deserialize, Serialize};

/// One document's occurrence of the term stored at a trie node.
///
/// `doc` is an index into the owning [`crate::index::document::DocumentRegistry`]
/// arena rather than a pointer/`Rc` back-reference. `term_frequency[i]` is
/// the number of times the term appeared in field `i` of that document; at
/// least one entry is always positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub doc: u32,
    pub term_frequency: Vec<u32>,
}

impl Posting {
    pub fn new(doc: u32, term_frequency: Vec<u32>) -> Self {
        Self { doc, term_frequency }
    }
}
