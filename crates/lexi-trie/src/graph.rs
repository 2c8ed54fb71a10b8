// Read-only view shared by every trie representation

use crate::node::{NodeId, Trie};

/// Read-only access to a trie-shaped graph.
///
/// Children are addressed by position so that walkers can keep a plain
/// index per stack frame instead of holding borrowed iterators. Positions
/// are in ascending character order.
pub trait TrieGraph {
    type Node: Copy + Eq;

    fn root(&self) -> Self::Node;

    fn is_end(&self, node: Self::Node) -> bool;

    fn child_count(&self, node: Self::Node) -> usize;

    /// The `index`-th child edge. `index` must be below `child_count`.
    fn child_at(&self, node: Self::Node, index: usize) -> (char, Self::Node);

    fn child(&self, node: Self::Node, c: char) -> Option<Self::Node>;

    /// Identity of a node for revisit detection. Nodes with equal keys
    /// accept the same suffixes.
    fn node_key(&self, node: Self::Node) -> usize;

    /// Follow `prefix` from the root.
    fn find(&self, prefix: &str) -> Option<Self::Node> {
        let mut node = self.root();
        for c in prefix.chars() {
            node = self.child(node, c)?;
        }
        Some(node)
    }

    fn has_word(&self, word: &str) -> bool {
        !word.is_empty() && self.find(word).is_some_and(|n| self.is_end(n))
    }
}

impl TrieGraph for Trie {
    type Node = NodeId;

    #[inline]
    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    fn is_end(&self, node: NodeId) -> bool {
        self.node(node).is_end()
    }

    #[inline]
    fn child_count(&self, node: NodeId) -> usize {
        self.node(node).children().len()
    }

    #[inline]
    fn child_at(&self, node: NodeId, index: usize) -> (char, NodeId) {
        self.node(node).children()[index]
    }

    #[inline]
    fn child(&self, node: NodeId, c: char) -> Option<NodeId> {
        self.node(node).child(c)
    }

    #[inline]
    fn node_key(&self, node: NodeId) -> usize {
        node.index()
    }
}
