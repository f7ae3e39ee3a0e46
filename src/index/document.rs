//! Document registry and per-field length statistics.

use std::hash::Hash;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Per-document bookkeeping: the caller's key, a logical-removal flag, and
/// the filtered, non-empty token count contributed by each field at
/// insertion time (0 for an absent or empty field).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDetails<K> {
    pub key: K,
    pub removed: bool,
    pub field_lengths: Vec<u32>,
}

/// Running sum/average of field lengths across live documents.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FieldStats {
    pub sum_len: u64,
    pub avg_len: f64,
}

/// Arena of document details plus the live key -> arena-slot map.
///
/// Removed documents stay in the arena (their postings may still reference
/// them until vacuum) but are dropped from the live map immediately, so
/// `live_count` and the live-key lookup are both O(1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRegistry<K> {
    arena: Vec<DocumentDetails<K>>,
    #[serde(bound(serialize = "K: Eq + Hash + Serialize", deserialize = "K: Eq + Hash + Deserialize<'de>"))]
    live: AHashMap<K, u32>,
    live_count: u64,
    field_stats: Vec<FieldStats>,
}

impl<K> DocumentRegistry<K> {
    pub fn new(num_fields: usize) -> Self {
        Self {
            arena: Vec::new(),
            live: AHashMap::new(),
            live_count: 0,
            field_stats: vec![FieldStats::default(); num_fields],
        }
    }

    pub fn live_count(&self) -> u64 {
        self.live_count
    }

    pub fn field_stats(&self, field: usize) -> FieldStats {
        self.field_stats[field]
    }

    pub fn details(&self, doc: u32) -> &DocumentDetails<K> {
        &self.arena[doc as usize]
    }

    /// Accounts for a field's filtered term count *before* the document is
    /// registered: the average's denominator anticipates the new document.
    /// This ordering is load-bearing, not incidental — callers that batch
    /// updates differently will see a different `avg_len` trajectory.
    pub fn account_for_field_insert(&mut self, field: usize, filtered_len: u32) {
        let anticipated_live = self.live_count + 1;
        let stats = &mut self.field_stats[field];
        stats.sum_len += filtered_len as u64;
        stats.avg_len = stats.sum_len as f64 / anticipated_live.max(1) as f64;
    }
}

impl<K: Eq + Hash + Clone> DocumentRegistry<K> {
    pub fn is_live(&self, key: &K) -> bool {
        self.live.contains_key(key)
    }

    /// Registers a newly-inserted document and returns its arena index.
    pub fn register(&mut self, key: K, field_lengths: Vec<u32>) -> u32 {
        let idx = self.arena.len() as u32;
        self.arena.push(DocumentDetails {
            key: key.clone(),
            removed: false,
            field_lengths,
        });
        self.live.insert(key, idx);
        self.live_count += 1;
        idx
    }

    /// Logically removes a live document. No-op if `key` is not live.
    pub fn mark_removed(&mut self, key: &K) -> Option<u32> {
        let idx = self.live.remove(key)?;
        self.live_count = self.live_count.saturating_sub(1);

        let field_lengths = self.arena[idx as usize].field_lengths.clone();
        self.arena[idx as usize].removed = true;

        // The removed document leaves the live set regardless of which
        // fields it contributed length to, so every field's avgLen
        // denominator shifts — not just the fields with len > 0.
        for (i, &len) in field_lengths.iter().enumerate() {
            let stats = &mut self.field_stats[i];
            if len > 0 {
                stats.sum_len = stats.sum_len.saturating_sub(len as u64);
            }
            stats.avg_len = if self.live_count == 0 {
                0.0
            } else {
                stats.sum_len as f64 / self.live_count as f64
            };
        }

        Some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_stats_anticipate_new_document() {
        let mut reg: DocumentRegistry<u64> = DocumentRegistry::new(1);
        reg.account_for_field_insert(0, 3);
        assert_eq!(reg.field_stats(0).sum_len, 3);
        assert_eq!(reg.field_stats(0).avg_len, 3.0); // denominator = 0 + 1

        let _ = reg.register(1, vec![3]);
        reg.account_for_field_insert(0, 5);
        assert_eq!(reg.field_stats(0).sum_len, 8);
        assert_eq!(reg.field_stats(0).avg_len, 4.0); // denominator = 1 + 1
    }

    #[test]
    fn mark_removed_updates_stats_and_is_idempotent() {
        let mut reg: DocumentRegistry<u64> = DocumentRegistry::new(1);
        reg.account_for_field_insert(0, 4);
        let idx_a = reg.register(1, vec![4]);
        reg.account_for_field_insert(0, 6);
        let _idx_b = reg.register(2, vec![6]);

        assert!(reg.mark_removed(&1).is_some());
        assert!(!reg.is_live(&1));
        assert_eq!(reg.live_count(), 1);
        assert_eq!(reg.field_stats(0).sum_len, 6);
        assert_eq!(reg.field_stats(0).avg_len, 6.0);
        assert!(reg.details(idx_a).removed);

        // removing again is a no-op
        assert!(reg.mark_removed(&1).is_none());
        assert_eq!(reg.live_count(), 1);
    }

    #[test]
    fn avg_len_denominator_shifts_even_for_a_field_the_document_did_not_touch() {
        let mut reg: DocumentRegistry<u64> = DocumentRegistry::new(1);
        reg.account_for_field_insert(0, 2);
        let _a = reg.register(1, vec![2]);
        assert_eq!(reg.field_stats(0).avg_len, 2.0);

        // doc 2 has no content in field 0 at all, but it still joins the
        // live set, so avg_len must be recomputed against live_count == 2.
        reg.account_for_field_insert(0, 0);
        let _b = reg.register(2, vec![0]);
        assert_eq!(reg.field_stats(0).sum_len, 2);
        assert_eq!(reg.field_stats(0).avg_len, 1.0);

        // removing doc 2 (len 0 in field 0) must shift avg_len back too.
        reg.mark_removed(&2);
        assert_eq!(reg.field_stats(0).sum_len, 2);
        assert_eq!(reg.field_stats(0).avg_len, 2.0);
    }

    #[test]
    fn unknown_key_removal_is_a_no_op() {
        let mut reg: DocumentRegistry<u64> = DocumentRegistry::new(1);
        assert!(reg.mark_removed(&42).is_none());
        assert_eq!(reg.live_count(), 0);
    }
}
