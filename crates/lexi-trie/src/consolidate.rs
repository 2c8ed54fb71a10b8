// Suffix consolidation: merge structurally identical subtrees into shared nodes

use hashbrown::HashMap;

use crate::node::{NodeId, Trie, TrieNode};

/// Merge identical suffix subtrees, turning the trie into a DAG.
///
/// Nodes are visited children-first. Each node is rewritten with its
/// children already replaced by their canonical representatives, then
/// looked up by structure (end flag plus child edges). Two nodes with equal
/// structure accept exactly the same set of suffixes, so one can stand in
/// for the other without changing `has` or enumeration.
///
/// A node's canonical id is always allocated after the ids of all of its
/// children, so a merge can never make a node its own ancestor.
///
/// The input may already be a DAG; the result is the minimal form either way.
pub fn consolidate(trie: &Trie) -> Trie {
    let order = trie.postorder();
    let mut canonical: Vec<Option<NodeId>> = vec![None; trie.arena_len()];
    let mut by_shape: HashMap<TrieNode, NodeId> = HashMap::with_capacity(order.len());
    let mut nodes: Vec<TrieNode> = Vec::with_capacity(order.len());

    for id in order {
        let src = trie.node(id);
        let shape = TrieNode {
            is_end: src.is_end,
            children: src
                .children
                .iter()
                .filter_map(|&(c, child)| canonical[child.index()].map(|n| (c, n)))
                .collect(),
        };
        let target = match by_shape.get(&shape) {
            Some(&existing) if id != NodeId::ROOT => existing,
            _ => {
                let new_id = NodeId::from_index(nodes.len());
                nodes.push(shape.clone());
                by_shape.insert(shape, new_id);
                new_id
            }
        };
        canonical[id.index()] = Some(target);
    }

    // `postorder` ends with the root, so the root was pushed last.
    let consolidated = Trie::from_postorder(nodes, true);
    log::debug!(
        "consolidated trie: {} nodes -> {} nodes",
        trie.count_nodes(),
        consolidated.arena_len()
    );
    consolidated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_words() -> Vec<&'static str> {
        vec![
            "walk", "walked", "walker", "walking", "walks", "talk", "talked", "talker", "talking",
            "talks", "stalk", "stalked",
        ]
    }

    #[test]
    fn preserves_membership_and_count() {
        let trie = Trie::from_words(sample_words());
        let merged = consolidate(&trie);
        for w in sample_words() {
            assert!(merged.has(w), "missing {w}");
        }
        assert!(!merged.has("stalker"));
        assert!(!merged.has("walke"));
        assert_eq!(merged.count_words(), trie.count_words());
        assert_eq!(merged.words(), trie.words());
    }

    #[test]
    fn shares_suffixes() {
        let trie = Trie::from_words(sample_words());
        let merged = consolidate(&trie);
        assert!(merged.count_nodes() < trie.count_nodes());
        // "walk" and "talk" end in the same shared subtree.
        assert_eq!(merged.find("walk"), merged.find("talk"));
    }

    #[test]
    fn all_leaves_collapse_into_one() {
        let trie = Trie::from_words(["a", "b", "c"]);
        let merged = consolidate(&trie);
        assert_eq!(merged.count_nodes(), 2);
        assert_eq!(merged.find("a"), merged.find("c"));
    }

    #[test]
    fn children_point_forward() {
        let merged = consolidate(&Trie::from_words(sample_words()));
        for i in 0..merged.arena_len() {
            for &(_, child) in merged.node(NodeId::from_index(i)).children() {
                assert!(child.index() > i, "edge {i} -> {} points backwards", child.index());
            }
        }
    }

    #[test]
    fn consolidation_is_idempotent() {
        let once = consolidate(&Trie::from_words(sample_words()));
        let twice = consolidate(&once);
        assert_eq!(once.count_nodes(), twice.count_nodes());
        assert_eq!(once.words(), twice.words());
    }

    #[test]
    fn empty_trie() {
        let merged = consolidate(&Trie::new());
        assert_eq!(merged.count_words(), 0);
        assert_eq!(merged.count_nodes(), 1);
    }
}
