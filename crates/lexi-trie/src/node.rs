// Arena-backed trie: nodes live in a Vec and refer to each other by index.
//
// After consolidation several parents may point at the same child, so the
// arena holds a DAG rather than a tree. Every traversal that must visit each
// node once tracks visited `NodeId`s instead of paths.

/// Handle to a node in a [`Trie`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root is always the first node of the arena.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }
}

/// A trie node: end-of-word flag plus children sorted by character.
///
/// Equality and hashing are structural (flag and child edges), which is what
/// consolidation keys on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TrieNode {
    pub(crate) is_end: bool,
    pub(crate) children: Vec<(char, NodeId)>,
}

impl TrieNode {
    #[inline]
    pub fn is_end(&self) -> bool {
        self.is_end
    }

    /// Child edges in ascending character order.
    #[inline]
    pub fn children(&self) -> &[(char, NodeId)] {
        &self.children
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, c: char) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&c, |&(k, _)| k)
            .ok()
            .map(|i| self.children[i].1)
    }
}

/// A prefix tree over Unicode code points.
///
/// Words are inserted one at a time; [`consolidate`](crate::consolidate)
/// turns the tree into a suffix-sharing DAG. Inserting into a consolidated
/// trie first expands it back into a tree.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    consolidated: bool,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            consolidated: false,
        }
    }

    /// Build a trie from a word list. Empty words are skipped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for word in words {
            trie.insert(word.as_ref());
        }
        trie
    }

    /// Build an arena from nodes listed children-first, root last.
    ///
    /// Every child reference must point at an earlier entry; the arena is
    /// reversed so the root lands at index 0.
    pub(crate) fn from_postorder(mut nodes: Vec<TrieNode>, consolidated: bool) -> Self {
        if nodes.is_empty() {
            return Self::new();
        }
        let last = nodes.len() - 1;
        for node in &mut nodes {
            for (_, child) in &mut node.children {
                debug_assert!(child.index() <= last);
                *child = NodeId::from_index(last - child.index());
            }
        }
        nodes.reverse();
        Self {
            nodes,
            consolidated,
        }
    }

    /// Add a word. Returns `true` if it was not already present.
    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        if self.consolidated {
            *self = self.expand();
        }
        let mut node = NodeId::ROOT;
        for c in word.chars() {
            node = self.child_or_insert(node, c);
        }
        let target = &mut self.nodes[node.index()];
        let added = !target.is_end;
        target.is_end = true;
        added
    }

    pub(crate) fn child_or_insert(&mut self, parent: NodeId, c: char) -> NodeId {
        let children = &self.nodes[parent.index()].children;
        match children.binary_search_by_key(&c, |&(k, _)| k) {
            Ok(i) => children[i].1,
            Err(i) => {
                let id = NodeId::from_index(self.nodes.len());
                self.nodes.push(TrieNode::default());
                self.nodes[parent.index()].children.insert(i, (c, id));
                id
            }
        }
    }

    /// Point the `c` edge of `parent` at an existing node.
    pub(crate) fn set_child(&mut self, parent: NodeId, c: char, target: NodeId) {
        let children = &mut self.nodes[parent.index()].children;
        match children.binary_search_by_key(&c, |&(k, _)| k) {
            Ok(i) => children[i].1 = target,
            Err(i) => children.insert(i, (c, target)),
        }
    }

    pub(crate) fn set_end(&mut self, node: NodeId) {
        self.nodes[node.index()].is_end = true;
    }

    pub fn has(&self, word: &str) -> bool {
        !word.is_empty() && self.find(word).is_some_and(|n| self.node(n).is_end)
    }

    /// Follow `prefix` from the root; `None` if the path does not exist.
    pub fn find(&self, prefix: &str) -> Option<NodeId> {
        let mut node = NodeId::ROOT;
        for c in prefix.chars() {
            node = self.node(node).child(c)?;
        }
        Some(node)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Whether suffix subtrees are shared (the arena is a DAG).
    pub fn is_consolidated(&self) -> bool {
        self.consolidated
    }

    /// Number of slots in the arena, reachable or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Distinct nodes reachable from the root, counting shared nodes once.
    pub fn count_nodes(&self) -> usize {
        self.postorder().len()
    }

    /// Number of words in the trie. Shared subtrees are counted once per
    /// path that reaches them.
    pub fn count_words(&self) -> usize {
        let mut counts = vec![0usize; self.nodes.len()];
        for id in self.postorder() {
            let node = self.node(id);
            counts[id.index()] = usize::from(node.is_end)
                + node
                    .children
                    .iter()
                    .map(|&(_, c)| counts[c.index()])
                    .sum::<usize>();
        }
        counts[NodeId::ROOT.index()]
    }

    /// Every word, in lexicographic code-point order.
    pub fn words(&self) -> Vec<String> {
        crate::walker::Words::new(self).collect()
    }

    /// Reachable nodes ordered so that every node comes after all of its
    /// children. Each node appears once.
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = vec![(NodeId::ROOT, 0)];
        visited[NodeId::ROOT.index()] = true;

        while let Some(top) = stack.last_mut() {
            let (id, next) = *top;
            let children = &self.node(id).children;
            if next < children.len() {
                top.1 += 1;
                let child = children[next].1;
                if !visited[child.index()] {
                    visited[child.index()] = true;
                    stack.push((child, 0));
                }
            } else {
                order.push(id);
                stack.pop();
            }
        }
        order
    }

    /// Copy the reachable graph into a fresh tree with no shared nodes.
    fn expand(&self) -> Trie {
        let mut tree = Trie::new();
        tree.nodes[0].is_end = self.node(NodeId::ROOT).is_end;
        let mut stack = vec![(NodeId::ROOT, NodeId::ROOT)];
        while let Some((src, dst)) = stack.pop() {
            for &(c, child) in &self.node(src).children {
                let copy = tree.child_or_insert(dst, c);
                tree.nodes[copy.index()].is_end = self.node(child).is_end;
                stack.push((child, copy));
            }
        }
        log::debug!(
            "expanded consolidated trie: {} nodes -> {} nodes",
            self.nodes.len(),
            tree.nodes.len()
        );
        tree
    }
}
