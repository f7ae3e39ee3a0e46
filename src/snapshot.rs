//! Serialization boundary.
//!
//! A snapshot persists the document registry, the trie with its postings,
//! per-field descriptors (name, boost), and the BM25 constants. It does
//! *not* persist the tokenizer, filter, or field accessors — those are
//! functions, not data, and the caller re-supplies equivalent ones (via a
//! fresh [`IndexConfig`]) when restoring. Restoring with equivalent
//! tokenizer/filter/accessors reproduces identical query results, since
//! none of the restored state depends on them.

use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{Bm25Config, IndexConfig};
use crate::error::{FtsError, Result};
use crate::index::{DocumentIndex, DocumentRegistry};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldDescriptor {
    name: String,
    boost: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Eq + Hash + Serialize",
    deserialize = "K: Eq + Hash + Deserialize<'de>"
))]
struct IndexSnapshot<K> {
    fields: Vec<FieldDescriptor>,
    bm25: Bm25Config,
    registry: DocumentRegistry<K>,
    trie: crate::index::Trie,
}

#[derive(Debug, Clone, Serialize)]
struct Manifest<'a> {
    fields: &'a [FieldDescriptor],
    bm25: Bm25Config,
    live_documents: u64,
}

impl<D, K> DocumentIndex<D, K>
where
    K: Eq + Hash + Clone + Serialize + DeserializeOwned,
{
    /// A human-readable JSON summary of the persisted state (field names,
    /// boosts, BM25 constants, live document count) — for debugging and
    /// operational inspection, not for restoring the index. Restoring
    /// requires the full [`to_bytes`](Self::to_bytes)/[`from_bytes`](Self::from_bytes) pair.
    pub fn manifest_json(&self) -> Result<String> {
        let fields: Vec<FieldDescriptor> = self
            .config()
            .fields
            .iter()
            .map(|f| FieldDescriptor { name: f.name.clone(), boost: f.boost })
            .collect();
        let manifest = Manifest { fields: &fields, bm25: self.config().bm25, live_documents: self.live_doc_count() };
        serde_json::to_string_pretty(&manifest).map_err(FtsError::from)
    }

    /// Serializes the index's persisted state to `bincode` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let fields = self
            .config()
            .fields
            .iter()
            .map(|f| FieldDescriptor { name: f.name.clone(), boost: f.boost })
            .collect();
        let snapshot = IndexSnapshot {
            fields,
            bm25: self.config().bm25,
            registry: self.registry().clone(),
            trie: self.trie().clone(),
        };
        bincode::serialize(&snapshot).map_err(FtsError::from)
    }

    /// Restores an index from `bytes`, using `config` for the tokenizer,
    /// filter, and field accessors (which a snapshot never carries).
    ///
    /// `config`'s fields must match the snapshot's in count, order, and
    /// name; a mismatch is a configuration error rather than a silent
    /// remap, since a remap could silently swap which accessor feeds which
    /// stored field-length statistics.
    pub fn from_bytes(bytes: &[u8], config: IndexConfig<D>) -> Result<Self> {
        let snapshot: IndexSnapshot<K> = bincode::deserialize(bytes).map_err(FtsError::from)?;

        if snapshot.fields.len() != config.fields.len() {
            return Err(FtsError::Configuration(format!(
                "snapshot has {} fields but config supplies {}",
                snapshot.fields.len(),
                config.fields.len()
            )));
        }
        for (snap_field, cfg_field) in snapshot.fields.iter().zip(config.fields.iter()) {
            if snap_field.name != cfg_field.name {
                return Err(FtsError::Configuration(format!(
                    "snapshot field `{}` does not match config field `{}` at the same position",
                    snap_field.name, cfg_field.name
                )));
            }
        }

        let mut config = config;
        config.bm25 = snapshot.bm25;
        for (cfg_field, snap_field) in config.fields.iter_mut().zip(snapshot.fields.iter()) {
            cfg_field.boost = snap_field.boost;
        }

        Ok(DocumentIndex::from_parts(config, snapshot.trie, snapshot.registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;

    struct Doc {
        body: String,
    }

    fn config() -> IndexConfig<Doc> {
        IndexConfig::new().with_field(FieldConfig::new("body", |d: &Doc| Some(d.body.clone())))
    }

    #[test]
    fn round_trip_preserves_search_results() {
        let mut index: DocumentIndex<Doc, u64> = DocumentIndex::new(config()).unwrap();
        index.insert(1, &Doc { body: "lorem ipsum dolor".into() }).unwrap();
        index.insert(2, &Doc { body: "lorem ipsum".into() }).unwrap();

        let before = index.search("lorem");
        let bytes = index.to_bytes().unwrap();

        let mut restored: DocumentIndex<Doc, u64> = DocumentIndex::from_bytes(&bytes, config()).unwrap();
        let after = restored.search("lorem");

        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.key, a.key);
            assert!((b.score - a.score).abs() < 1e-9);
        }
    }

    #[test]
    fn mismatched_field_count_is_rejected() {
        let mut index: DocumentIndex<Doc, u64> = DocumentIndex::new(config()).unwrap();
        index.insert(1, &Doc { body: "lorem".into() }).unwrap();
        let bytes = index.to_bytes().unwrap();

        let mismatched: IndexConfig<Doc> = IndexConfig::new()
            .with_field(FieldConfig::new("body", |d: &Doc| Some(d.body.clone())))
            .with_field(FieldConfig::new("extra", |_: &Doc| None));

        let restored: Result<DocumentIndex<Doc, u64>> = DocumentIndex::from_bytes(&bytes, mismatched);
        assert!(restored.is_err());
    }

    #[test]
    fn manifest_json_reports_live_document_count() {
        let mut index: DocumentIndex<Doc, u64> = DocumentIndex::new(config()).unwrap();
        index.insert(1, &Doc { body: "lorem".into() }).unwrap();
        index.insert(2, &Doc { body: "ipsum".into() }).unwrap();
        index.remove(&1);

        let manifest = index.manifest_json().unwrap();
        assert!(manifest.contains("\"live_documents\": 1"));
        assert!(manifest.contains("\"body\""));
    }
}
