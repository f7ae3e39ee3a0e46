//! `DocumentIndex`: ties the trie, document registry, and query engine
//! into the public insert/remove/vacuum/search API.

use std::hash::Hash;

use ahash::AHashMap;
use tracing::{debug, instrument};

use crate::config::IndexConfig;
use crate::error::{FtsError, Result};
use crate::index::document::DocumentRegistry;
use crate::index::posting::Posting;
use crate::index::query::{self, SearchHit};
use crate::index::trie::Trie;
use crate::tokenize::terms_of;

/// A dynamic, in-memory full-text index over documents of type `D` keyed by
/// `K`.
pub struct DocumentIndex<D, K> {
    config: IndexConfig<D>,
    trie: Trie,
    registry: DocumentRegistry<K>,
}

impl<D, K: Eq + Hash + Clone> DocumentIndex<D, K> {
    /// Builds an index from a configuration. Fails if no fields were
    /// configured.
    pub fn new(config: IndexConfig<D>) -> Result<Self> {
        if config.fields.is_empty() {
            return Err(FtsError::Configuration("index must have at least one field".into()));
        }
        let num_fields = config.fields.len();
        Ok(Self { config, trie: Trie::new(), registry: DocumentRegistry::new(num_fields) })
    }

    pub fn field_count(&self) -> usize {
        self.config.fields.len()
    }

    pub fn live_doc_count(&self) -> u64 {
        self.registry.live_count()
    }

    /// Indexes `document` under `key`.
    ///
    /// Re-inserting a key that is still live is a configuration error
    /// rather than a silent overwrite, so stale postings from an old
    /// version of the document never linger in the trie unnoticed. Callers
    /// that want replace semantics call `remove` then `insert`.
    #[instrument(level = "debug", skip(self, key, document))]
    pub fn insert(&mut self, key: K, document: &D) -> Result<()> {
        if self.registry.is_live(&key) {
            return Err(FtsError::Configuration("document key is already live".into()));
        }

        let num_fields = self.config.fields.len();
        let mut field_lengths = vec![0u32; num_fields];
        // term -> per-field occurrence counts, accumulated across all fields
        let mut term_counts: AHashMap<String, Vec<u32>> = AHashMap::new();

        for (i, field) in self.config.fields.iter().enumerate() {
            let Some(text) = (field.accessor)(document) else {
                // Absent field contributes length 0, but the new document
                // still joins the live set, so every field's avgLen
                // denominator must shift — not just the ones this document
                // touched. See DESIGN.md's note on this invariant.
                self.registry.account_for_field_insert(i, 0);
                field_lengths[i] = 0;
                continue;
            };

            let terms = terms_of(self.config.tokenizer.as_ref(), self.config.filter.as_ref(), &text);
            let filtered_len = terms.len() as u32;

            self.registry.account_for_field_insert(i, filtered_len);
            field_lengths[i] = filtered_len;

            for term in terms {
                let counts = term_counts.entry(term).or_insert_with(|| vec![0u32; num_fields]);
                counts[i] += 1;
            }
        }

        let doc_idx = self.registry.register(key, field_lengths);

        for (term, per_field_counts) in term_counts {
            let node = self.trie.insert_path(&term);
            self.trie.attach_posting(node, Posting::new(doc_idx, per_field_counts));
        }

        debug!("document indexed");
        Ok(())
    }

    /// Logically removes `key`. No-op if `key` is not live.
    #[instrument(level = "debug", skip(self, key))]
    pub fn remove(&mut self, key: &K) {
        if self.registry.mark_removed(key).is_some() {
            debug!("document removed");
        }
    }

    /// Physically reclaims postings of removed documents and prunes empty
    /// trie subtrees.
    #[instrument(level = "debug", skip(self))]
    pub fn vacuum(&mut self) {
        let stats = self.trie.vacuum(&self.registry);
        debug!(postings_pruned = stats.postings_pruned, nodes_pruned = stats.nodes_pruned, "vacuum complete");
    }

    /// Tokenizes and filters `query`, expands each query term over the
    /// trie, scores with BM25, and returns results sorted by descending
    /// score. Returns an empty vector for an empty index or a query with
    /// no surviving terms.
    #[instrument(level = "debug", skip(self, query))]
    pub fn search(&mut self, query: &str) -> Vec<SearchHit<K>> {
        let terms = terms_of(self.config.tokenizer.as_ref(), self.config.filter.as_ref(), query);
        if terms.is_empty() {
            return Vec::new();
        }
        let boosts: Vec<f64> = self.config.fields.iter().map(|f| f.boost).collect();
        query::run(&mut self.trie, &self.registry, &boosts, self.config.bm25, &terms)
    }

    /// Every stored term having `prefix` as a prefix.
    pub fn expand(&self, prefix: &str) -> Vec<String> {
        self.trie.expand(prefix)
    }

    pub(crate) fn trie(&self) -> &Trie {
        &self.trie
    }

    pub(crate) fn registry(&self) -> &DocumentRegistry<K> {
        &self.registry
    }

    pub(crate) fn config(&self) -> &IndexConfig<D> {
        &self.config
    }

    /// Reassembles an index from its three parts, used when restoring from
    /// a snapshot — bypasses `insert`'s bookkeeping since the trie/registry
    /// already reflect it.
    pub(crate) fn from_parts(config: IndexConfig<D>, trie: Trie, registry: DocumentRegistry<K>) -> Self {
        Self { config, trie, registry }
    }
}
