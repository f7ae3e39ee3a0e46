//! Arena-backed character trie: the inverted index.
//!
//! Nodes live in a flat `Vec` and reference each other by `u32` index
//! rather than through `Rc`/`Box` pointers. Children are kept in a `Vec`
//! ordered by ascending code unit and searched with binary search.

use serde::{Deserialize, Serialize};

use crate::index::document::DocumentRegistry;
use crate::index::posting::Posting;

const ROOT: u32 = 0;

#[derive(Clone, Serialize, Deserialize)]
struct TrieNode {
    code_unit: char,
    /// Arena indices of children, sorted by `code_unit` of the child.
    children: Vec<u32>,
    /// `None` on interior nodes that do not terminate a stored term.
    postings: Option<Vec<Posting>>,
}

impl TrieNode {
    fn leaf(code_unit: char) -> Self {
        Self { code_unit, children: Vec::new(), postings: None }
    }
}

/// Counters reported after a [`Trie::vacuum`] pass, for observability.
#[derive(Debug, Clone, Copy, Default)]
pub struct VacuumStats {
    pub postings_pruned: u64,
    pub nodes_pruned: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        // Sentinel code unit for the root; never matched against input,
        // since char::from(0) only appears in insert_path/find_node paths
        // built from actual query/index text which never contains NUL in
        // the trie's own traversal logic (the root is reached with zero
        // chars consumed, not by matching '\0').
        Self { nodes: vec![TrieNode::leaf('\0')] }
    }

    fn child_position(&self, parent: u32, c: char) -> Result<usize, usize> {
        let children = &self.nodes[parent as usize].children;
        children.binary_search_by(|&child| self.nodes[child as usize].code_unit.cmp(&c))
    }

    /// Descends from the root along `term`'s code units. `find_node("")`
    /// returns the root.
    pub fn find_node(&self, term: &str) -> Option<u32> {
        let mut current = ROOT;
        for c in term.chars() {
            let pos = self.child_position(current, c).ok()?;
            current = self.nodes[current as usize].children[pos];
        }
        Some(current)
    }

    /// Walks/creates nodes so the path for `term` exists, returning the
    /// terminal node's arena index.
    pub fn insert_path(&mut self, term: &str) -> u32 {
        let mut current = ROOT;
        for c in term.chars() {
            current = match self.child_position(current, c) {
                Ok(pos) => self.nodes[current as usize].children[pos],
                Err(pos) => {
                    let new_idx = self.nodes.len() as u32;
                    self.nodes.push(TrieNode::leaf(c));
                    self.nodes[current as usize].children.insert(pos, new_idx);
                    new_idx
                }
            };
        }
        current
    }

    /// Attaches `posting` to the terminal node's posting list in O(1),
    /// creating the list if this is the first posting for the term. Posting
    /// order within a node is not part of the contract.
    pub fn attach_posting(&mut self, node: u32, posting: Posting) {
        self.nodes[node as usize].postings.get_or_insert_with(Vec::new).push(posting);
    }

    pub fn postings(&self, node: u32) -> Option<&[Posting]> {
        self.nodes[node as usize].postings.as_deref()
    }

    /// Evicts postings referencing removed documents from `node`'s list.
    /// Clears the list to `None` when it empties, so a node that no longer
    /// has any live posting stops looking like a stored term to
    /// [`Trie::expand`] — mirrors the emptying check `vacuum_node` does.
    pub fn retain_live_postings<K>(&mut self, node: u32, registry: &DocumentRegistry<K>) {
        let Some(postings) = self.nodes[node as usize].postings.as_mut() else { return };
        postings.retain(|p| !registry.details(p.doc).removed);
        if postings.is_empty() {
            self.nodes[node as usize].postings = None;
        }
    }

    /// Every stored term that has `term` as a prefix (including `term`
    /// itself if it is stored). Order is a stable depth-first order within
    /// this instance — not guaranteed across instances.
    pub fn expand(&self, term: &str) -> Vec<String> {
        let Some(start) = self.find_node(term) else {
            return Vec::new();
        };
        let mut results = Vec::new();
        let mut stack = vec![(start, String::new())];
        while let Some((idx, suffix)) = stack.pop() {
            let node = &self.nodes[idx as usize];
            if node.postings.is_some() {
                results.push(format!("{term}{suffix}"));
            }
            for &child in node.children.iter().rev() {
                let mut child_suffix = suffix.clone();
                child_suffix.push(self.nodes[child as usize].code_unit);
                stack.push((child, child_suffix));
            }
        }
        results
    }

    /// Post-order pass that evicts postings referencing removed documents
    /// and prunes any subtree left with zero live postings and no
    /// descendants. The root is never pruned.
    pub fn vacuum<K>(&mut self, registry: &DocumentRegistry<K>) -> VacuumStats {
        let mut stats = VacuumStats::default();
        self.vacuum_node(ROOT, registry, &mut stats);
        stats
    }

    /// Returns whether `idx`'s subtree is now empty (no postings, no
    /// children) — used by the caller to decide whether to unlink it.
    fn vacuum_node<K>(&mut self, idx: u32, registry: &DocumentRegistry<K>, stats: &mut VacuumStats) -> bool {
        if let Some(postings) = self.nodes[idx as usize].postings.as_mut() {
            let before = postings.len();
            postings.retain(|p| !registry.details(p.doc).removed);
            stats.postings_pruned += (before - postings.len()) as u64;
            if postings.is_empty() {
                self.nodes[idx as usize].postings = None;
            }
        }

        let children = std::mem::take(&mut self.nodes[idx as usize].children);
        let mut kept = Vec::with_capacity(children.len());
        for child in children {
            if self.vacuum_node(child, registry, stats) {
                stats.nodes_pruned += 1;
            } else {
                kept.push(child);
            }
        }
        self.nodes[idx as usize].children = kept;

        self.nodes[idx as usize].postings.is_none() && self.nodes[idx as usize].children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::document::DocumentRegistry;

    fn insert_term(trie: &mut Trie, term: &str, doc: u32) {
        let node = trie.insert_path(term);
        trie.attach_posting(node, Posting::new(doc, vec![1]));
    }

    #[test]
    fn find_node_empty_string_is_root() {
        let trie = Trie::new();
        assert!(trie.find_node("").is_some());
    }

    #[test]
    fn insert_then_find_round_trips() {
        let mut trie = Trie::new();
        insert_term(&mut trie, "term1", 0);
        let node = trie.find_node("term1").unwrap();
        assert_eq!(trie.postings(node).unwrap().len(), 1);
        assert!(trie.find_node("term").is_some());
        assert!(trie.postings(trie.find_node("term").unwrap()).is_none());
    }

    #[test]
    fn prefix_and_superstring_terms_keep_independent_postings() {
        let mut trie = Trie::new();
        insert_term(&mut trie, "term1", 0);
        insert_term(&mut trie, "term11", 1);

        let n_term = trie.find_node("term").unwrap();
        assert!(trie.postings(n_term).is_none());

        let n_term1 = trie.find_node("term1").unwrap();
        assert_eq!(trie.postings(n_term1).unwrap().len(), 1);

        let n_term11 = trie.find_node("term11").unwrap();
        assert_eq!(trie.postings(n_term11).unwrap().len(), 1);
    }

    #[test]
    fn expand_collects_every_term_sharing_the_prefix() {
        let mut trie = Trie::new();
        insert_term(&mut trie, "abc", 0);
        insert_term(&mut trie, "abcde", 0);
        insert_term(&mut trie, "ab", 1);
        insert_term(&mut trie, "de", 1);

        let mut a: Vec<String> = trie.expand("a");
        a.sort();
        assert_eq!(a, vec!["ab", "abc", "abcde"]);

        let mut abc: Vec<String> = trie.expand("abc");
        abc.sort();
        assert_eq!(abc, vec!["abc", "abcde"]);

        assert_eq!(trie.expand("de"), vec!["de"]);
        assert!(trie.expand("zzz").is_empty());
    }

    #[test]
    fn retain_live_postings_clears_an_emptied_node_so_expand_stops_seeing_it() {
        let mut registry: DocumentRegistry<u64> = DocumentRegistry::new(1);
        let doc1 = registry.register(1, vec![1]);

        let mut trie = Trie::new();
        insert_term(&mut trie, "a", doc1);
        registry.mark_removed(&1);

        let node = trie.find_node("a").unwrap();
        trie.retain_live_postings(node, &registry);

        assert!(trie.postings(node).is_none());
        assert!(trie.expand("a").is_empty());
    }

    #[test]
    fn vacuum_prunes_removed_postings_and_empty_subtrees() {
        let mut registry: DocumentRegistry<u64> = DocumentRegistry::new(1);
        let doc1 = registry.register(1, vec![3]);
        let _doc2 = registry.register(2, vec![3]);

        let mut trie = Trie::new();
        insert_term(&mut trie, "a", doc1);
        insert_term(&mut trie, "b", doc1);
        let node_c = trie.insert_path("c");
        trie.attach_posting(node_c, Posting::new(doc1, vec![1]));
        trie.attach_posting(node_c, Posting::new(_doc2, vec![1]));

        registry.mark_removed(&1);
        trie.vacuum(&registry);

        assert!(trie.find_node("a").is_none());
        assert!(trie.find_node("b").is_none());
        let n_c = trie.find_node("c").unwrap();
        assert_eq!(trie.postings(n_c).unwrap().len(), 1);
        assert_eq!(trie.postings(n_c).unwrap()[0].doc, _doc2);
    }
}
