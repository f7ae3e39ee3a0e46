//! BM25 query evaluation over prefix expansions.

use std::hash::Hash;

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::config::Bm25Config;
use crate::index::document::DocumentRegistry;
use crate::index::trie::Trie;

/// One scored result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<K> {
    pub key: K,
    pub score: f64,
}

fn expansion_boost(query_term: &str, expansion: &str) -> f64 {
    if expansion == query_term {
        return 1.0;
    }
    let q_len = query_term.chars().count() as f64;
    let e_len = expansion.chars().count() as f64;
    (1.0 + 1.0 / (1.0 + (e_len - q_len))).ln()
}

/// Evaluates `query_terms` against `trie`/`registry` and returns results
/// sorted by descending score. Mutates `trie` via opportunistic cleanup of
/// postings for documents already logically removed.
pub fn run<K: Eq + Hash + Clone>(
    trie: &mut Trie,
    registry: &DocumentRegistry<K>,
    field_boosts: &[f64],
    bm25: Bm25Config,
    query_terms: &[String],
) -> Vec<SearchHit<K>> {
    let mut scores: AHashMap<u32, f64> = AHashMap::new();
    let live_docs = registry.live_count() as f64;

    for q in query_terms {
        let mut visited: AHashSet<u32> = AHashSet::new();
        for expansion in trie.expand(q) {
            let boost_e = expansion_boost(q, &expansion);

            let Some(node) = trie.find_node(&expansion) else {
                continue;
            };
            trie.retain_live_postings(node, registry);
            let Some(postings) = trie.postings(node) else {
                continue;
            };
            let df = postings.len() as f64;
            if df == 0.0 {
                continue;
            }
            let idf = (1.0 + (live_docs - df + 0.5) / (df + 0.5)).ln();

            for posting in postings.iter() {
                let details = registry.details(posting.doc);
                let mut s = 0.0;
                for (field, &tf_raw) in posting.term_frequency.iter().enumerate() {
                    if tf_raw == 0 {
                        continue;
                    }
                    let l = details.field_lengths[field] as f64;
                    let lavg = registry.field_stats(field).avg_len;
                    let norm = (1.0 - bm25.b) + bm25.b * (l / lavg);
                    let tf = ((bm25.k1 + 1.0) * tf_raw as f64) / (bm25.k1 * norm + tf_raw as f64);
                    let field_boost = field_boosts.get(field).copied().unwrap_or(1.0);
                    s += tf * idf * field_boost * boost_e;
                }
                if s <= 0.0 {
                    continue;
                }

                if visited.insert(posting.doc) {
                    *scores.entry(posting.doc).or_insert(0.0) += s;
                } else {
                    let entry = scores.entry(posting.doc).or_insert(0.0);
                    if s > *entry {
                        *entry = s;
                    }
                }
            }
        }
    }

    let mut hits: Vec<SearchHit<K>> = scores
        .into_iter()
        .map(|(doc, score)| SearchHit { key: registry.details(doc).key.clone(), score })
        .collect();
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    debug!(query_terms = query_terms.len(), results = hits.len(), "search complete");
    hits
}
