// Pull-based depth-first trie walker with caller-controlled pruning.
//
// The walker keeps an explicit stack of (node, next child position) frames
// and the characters of the current path. Each call to `next(go_deeper)`
// yields the next node in pre-order. `go_deeper` applies to the node
// returned by the previous call: `false` skips its whole subtree.

use crate::graph::TrieGraph;

/// How the walker treats end-of-word nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompoundMethod {
    /// Words never continue past their end.
    #[default]
    None,
    /// After a word, continue from the root behind a `' '` separator.
    SeparateWords,
    /// After a word, continue from the root behind a `'+'` separator.
    JoinWords,
}

impl CompoundMethod {
    pub fn separator(self) -> Option<char> {
        match self {
            CompoundMethod::None => None,
            CompoundMethod::SeparateWords => Some(' '),
            CompoundMethod::JoinWords => Some('+'),
        }
    }
}

/// One node visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStep<'w, N> {
    /// Characters from the root to this node.
    pub text: &'w str,
    /// The last character of `text`.
    pub ch: char,
    pub node: N,
    /// Number of characters in `text`.
    pub depth: usize,
    pub is_end: bool,
}

struct Frame<N> {
    node: N,
    /// Next position to try; `child_count` stands for the compound edge.
    next: usize,
    /// 0 visits hinted children, 1 visits the rest.
    pass: u8,
}

/// Depth-first, pre-order, lexicographic walker over any [`TrieGraph`].
///
/// Each walker is a fresh traversal; create another one to restart.
pub struct Walker<'g, G: TrieGraph> {
    graph: &'g G,
    stack: Vec<Frame<G::Node>>,
    text: String,
    last: Option<G::Node>,
    compound: CompoundMethod,
    hint: Vec<char>,
}

impl<'g, G: TrieGraph> Walker<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self::from_node(graph, graph.root())
    }

    /// Walk the subtree below `node`; yielded text is relative to it.
    pub fn from_node(graph: &'g G, node: G::Node) -> Self {
        Self {
            graph,
            stack: vec![Frame {
                node,
                next: 0,
                pass: 1,
            }],
            text: String::new(),
            last: None,
            compound: CompoundMethod::None,
            hint: Vec::new(),
        }
    }

    /// Continue from the root after end-of-word nodes.
    pub fn with_compound(mut self, method: CompoundMethod) -> Self {
        self.compound = method;
        self
    }

    /// Visit children whose character occurs in `hint` before the others.
    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = hint.chars().collect();
        self.hint.sort_unstable();
        self.hint.dedup();
        if !self.hint.is_empty() {
            for frame in &mut self.stack {
                frame.pass = 0;
            }
        }
        self
    }

    /// Advance to the next node.
    ///
    /// `go_deeper` decides whether the children of the node returned by the
    /// previous call are visited. It is ignored on the first call.
    pub fn next(&mut self, go_deeper: bool) -> Option<WalkStep<'_, G::Node>> {
        if let Some(node) = self.last.take() {
            if go_deeper && self.can_descend(node) {
                let pass = if self.hint.is_empty() { 1 } else { 0 };
                self.stack.push(Frame {
                    node,
                    next: 0,
                    pass,
                });
            } else {
                self.text.pop();
            }
        }

        loop {
            let depth = self.stack.len();
            let top = self.stack.last_mut()?;
            let child_count = self.graph.child_count(top.node);

            if top.next < child_count {
                let (c, child) = self.graph.child_at(top.node, top.next);
                top.next += 1;
                if top.pass == 0 && self.hint.binary_search(&c).is_err() {
                    continue;
                }
                if top.pass == 1 && !self.hint.is_empty() && self.hint.binary_search(&c).is_ok()
                {
                    continue;
                }
                return Some(self.visit(c, child, depth));
            }

            if top.pass == 0 {
                top.pass = 1;
                top.next = 0;
                continue;
            }

            if top.next == child_count && depth > 1 && self.graph.is_end(top.node) {
                if let Some(sep) = self.compound.separator() {
                    top.next += 1;
                    let root = self.graph.root();
                    return Some(self.visit(sep, root, depth));
                }
            }

            self.stack.pop();
            if !self.stack.is_empty() {
                self.text.pop();
            }
        }
    }

    fn visit(&mut self, c: char, node: G::Node, depth: usize) -> WalkStep<'_, G::Node> {
        self.text.push(c);
        self.last = Some(node);
        WalkStep {
            text: &self.text,
            ch: c,
            node,
            depth,
            is_end: self.graph.is_end(node),
        }
    }

    /// Refuse to re-enter a node already on the current word's path. The
    /// root reached through a compound separator starts a new word.
    fn can_descend(&self, node: G::Node) -> bool {
        let root = self.graph.root();
        let compound_edge =
            self.compound != CompoundMethod::None && node != root && self.graph.is_end(node);
        if self.graph.child_count(node) == 0 && !compound_edge {
            return false;
        }
        if node == root && self.compound != CompoundMethod::None {
            return true;
        }
        let key = self.graph.node_key(node);
        for frame in self.stack.iter().rev() {
            if self.graph.node_key(frame.node) == key {
                return false;
            }
            if frame.node == root {
                break;
            }
        }
        true
    }

    /// Depth of the node returned by the last call.
    pub fn depth(&self) -> usize {
        self.text.chars().count()
    }
}

/// Iterator over every word reachable from a graph's root.
pub struct Words<'g, G: TrieGraph> {
    walker: Walker<'g, G>,
}

impl<'g, G: TrieGraph> Words<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self {
            walker: Walker::new(graph),
        }
    }
}

impl<G: TrieGraph> Iterator for Words<'_, G> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let step = self.walker.next(true)?;
            if step.is_end {
                return Some(step.text.to_string());
            }
        }
    }
}
