// Generic trie mapping words to values

/// A prefix tree that stores one value per word.
///
/// Unlike [`Trie`](crate::Trie) this is never consolidated: values make
/// structurally equal subtrees distinct.
#[derive(Debug, Clone)]
pub struct GTrie<V> {
    nodes: Vec<GNode<V>>,
    len: usize,
}

#[derive(Debug, Clone)]
struct GNode<V> {
    value: Option<V>,
    children: Vec<(char, u32)>,
}

impl<V> GNode<V> {
    fn new() -> Self {
        Self {
            value: None,
            children: Vec::new(),
        }
    }

    fn child(&self, c: char) -> Option<usize> {
        self.children
            .binary_search_by_key(&c, |&(k, _)| k)
            .ok()
            .map(|i| self.children[i].1 as usize)
    }
}

impl<V> Default for GTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> GTrie<V> {
    pub fn new() -> Self {
        Self {
            nodes: vec![GNode::new()],
            len: 0,
        }
    }

    /// Store `value` under `word`, returning the previous value.
    pub fn insert(&mut self, word: &str, value: V) -> Option<V> {
        let mut node = 0;
        for c in word.chars() {
            let children = &self.nodes[node].children;
            node = match children.binary_search_by_key(&c, |&(k, _)| k) {
                Ok(i) => children[i].1 as usize,
                Err(i) => {
                    let id = self.nodes.len();
                    self.nodes.push(GNode::new());
                    self.nodes[node].children.insert(i, (c, id as u32));
                    id
                }
            };
        }
        let previous = self.nodes[node].value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    pub fn get(&self, word: &str) -> Option<&V> {
        self.find(word).and_then(|n| self.nodes[n].value.as_ref())
    }

    pub fn get_mut(&mut self, word: &str) -> Option<&mut V> {
        let node = self.find(word)?;
        self.nodes[node].value.as_mut()
    }

    pub fn has(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// Whether any stored word starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.find(prefix).is_some()
    }

    fn find(&self, prefix: &str) -> Option<usize> {
        let mut node = 0;
        for c in prefix.chars() {
            node = self.nodes[node].child(c)?;
        }
        Some(node)
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every `(word, value)` pair in lexicographic code-point order.
    pub fn entries(&self) -> Vec<(String, &V)> {
        let mut out = Vec::with_capacity(self.len);
        let mut text = String::new();
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        if let Some(v) = &self.nodes[0].value {
            out.push((String::new(), v));
        }
        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            let children = &self.nodes[node].children;
            if next < children.len() {
                top.1 += 1;
                let (c, child) = children[next];
                text.push(c);
                if let Some(v) = &self.nodes[child as usize].value {
                    out.push((text.clone(), v));
                }
                stack.push((child as usize, 0));
            } else {
                stack.pop();
                text.pop();
            }
        }
        out
    }
}
