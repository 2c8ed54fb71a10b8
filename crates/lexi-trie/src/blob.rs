// Flat record-array trie for compact, read-only lookups

use std::collections::VecDeque;

use bytemuck::{Pod, Zeroable};
use hashbrown::HashMap;

use crate::TrieError;
use crate::format::{self, HEADER_SIZE};
use crate::graph::TrieGraph;
use crate::node::{NodeId, Trie, TrieNode};

const END_OF_WORD: u32 = 0x8000_0000;
const LEN_MASK: u32 = 0x7FFF_FFFF;

/// One edge of the blob (12 bytes).
///
/// - `ch`: the edge character as a Unicode scalar value
/// - `run`: index of the first record of the target node's children
/// - `len_flags`: child count in bits 0-30, end-of-word in bit 31
///
/// Record 0 describes the root; its `ch` is unused.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BlobRecord {
    pub ch: u32,
    pub run: u32,
    pub len_flags: u32,
}

impl BlobRecord {
    fn new(ch: char, run: u32, len: usize, is_end: bool) -> Self {
        let flag = if is_end { END_OF_WORD } else { 0 };
        Self {
            ch: ch as u32,
            run,
            len_flags: (len as u32 & LEN_MASK) | flag,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        (self.len_flags & LEN_MASK) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.len_flags & END_OF_WORD != 0
    }

    #[inline]
    pub fn char(&self) -> char {
        char::from_u32(self.ch).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Identity of the target node: its children run plus its end flag.
    #[inline]
    fn key(&self) -> usize {
        ((self.run as usize) << 1) | usize::from(self.is_end())
    }
}

/// A trie flattened into one contiguous array of [`BlobRecord`]s.
///
/// The children of a node are a sorted run of records; shared suffixes
/// share runs. The blob is immutable once built and can be shared freely
/// between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieBlob {
    records: Vec<BlobRecord>,
}

impl TrieBlob {
    /// Linearize a trie. Shared nodes are written once.
    pub fn from_trie(trie: &Trie) -> Self {
        let order = trie.postorder();
        let edges: usize = order.iter().map(|&id| trie.node(id).children().len()).sum();
        Self::from_graph_with_capacity(trie, edges + 1)
    }

    /// Linearize any trie graph, breadth first.
    pub fn from_graph<G: TrieGraph>(graph: &G) -> Self {
        Self::from_graph_with_capacity(graph, 1)
    }

    fn from_graph_with_capacity<G: TrieGraph>(graph: &G, capacity: usize) -> Self {
        let mut records = Vec::with_capacity(capacity);
        records.push(BlobRecord::zeroed());
        let mut runs: HashMap<usize, u32> = HashMap::new();
        let mut queue: VecDeque<(G::Node, u32)> = VecDeque::new();

        let root = graph.root();
        let root_run = assign_run(graph, root, &mut records, &mut runs, &mut queue);
        records[0] = BlobRecord::new('\0', root_run, graph.child_count(root), graph.is_end(root));

        while let Some((node, run)) = queue.pop_front() {
            for i in 0..graph.child_count(node) {
                let (c, child) = graph.child_at(node, i);
                let child_run = assign_run(graph, child, &mut records, &mut runs, &mut queue);
                records[run as usize + i] = BlobRecord::new(
                    c,
                    child_run,
                    graph.child_count(child),
                    graph.is_end(child),
                );
            }
        }

        Self { records }
    }

    /// Rebuild an arena trie that shares the same nodes the blob shares.
    pub fn to_trie(&self) -> Trie {
        let mut built: HashMap<usize, NodeId> = HashMap::new();
        let mut nodes: Vec<TrieNode> = Vec::new();
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];

        while let Some(top) = stack.last_mut() {
            let (index, next) = *top;
            let rec = self.records[index];
            if next < rec.len() {
                top.1 += 1;
                let child = rec.run as usize + next;
                if !built.contains_key(&self.records[child].key()) {
                    stack.push((child, 0));
                }
                continue;
            }
            let children = self
                .run(rec)
                .iter()
                .filter_map(|c| built.get(&c.key()).map(|&id| (c.char(), id)))
                .collect();
            let id = NodeId::from_index(nodes.len());
            nodes.push(TrieNode {
                is_end: rec.is_end(),
                children,
            });
            if index != 0 {
                built.insert(rec.key(), id);
            }
            stack.pop();
        }

        Trie::from_postorder(nodes, true)
    }

    /// Serialize to the binary container format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(HEADER_SIZE + size_of_val(self.records.as_slice()));
        data.extend_from_slice(&format::write_header(self.records.len() as u32));
        data.extend_from_slice(bytemuck::cast_slice(&self.records));
        data
    }

    /// Load and validate a blob written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(data: &[u8]) -> Result<Self, TrieError> {
        let header = format::parse_header(data)?;
        let count = header.record_count as usize;
        let size = size_of::<BlobRecord>();
        let expected = HEADER_SIZE + count * size;
        if data.len() < expected {
            return Err(TrieError::TooShort {
                expected,
                actual: data.len(),
            });
        }
        if count == 0 {
            return Err(TrieError::Alignment);
        }

        // Copy into an aligned Vec
        let mut records = vec![BlobRecord::zeroed(); count];
        bytemuck::cast_slice_mut::<BlobRecord, u8>(&mut records)
            .copy_from_slice(&data[HEADER_SIZE..expected]);

        let blob = Self { records };
        blob.validate()?;
        Ok(blob)
    }

    /// Check that every run is in bounds and sorted, every character is a
    /// valid scalar value, a run always has the same length, and no node
    /// can reach itself.
    fn validate(&self) -> Result<(), TrieError> {
        let total = self.records.len();
        // Node identity is the run start, so each start has one length.
        let mut run_lens: Vec<Option<usize>> = vec![None; total + 1];
        for (index, rec) in self.records.iter().enumerate() {
            if rec.run as usize + rec.len() > total || (rec.len() > 0 && rec.run == 0) {
                return Err(TrieError::DanglingRecord { index });
            }
            if rec.len() > 0 {
                let known = &mut run_lens[rec.run as usize];
                match *known {
                    Some(len) if len != rec.len() => {
                        return Err(TrieError::RunLengthMismatch { index });
                    }
                    Some(_) => {}
                    None => *known = Some(rec.len()),
                }
            }
            if index > 0 && char::from_u32(rec.ch).is_none() {
                return Err(TrieError::DanglingRecord { index });
            }
            let run = self.run(*rec);
            if run.windows(2).any(|w| w[0].ch >= w[1].ch) {
                return Err(TrieError::DanglingRecord { index });
            }
        }

        // Iterative three-colour DFS over runs.
        let mut state = vec![0u8; total + 1];
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        while let Some(top) = stack.last_mut() {
            let (index, next) = *top;
            let rec = self.records[index];
            let run = rec.run as usize;
            if next == 0 && rec.len() > 0 {
                state[run] = 1;
            }
            if next < rec.len() {
                top.1 += 1;
                let child = run + next;
                let child_rec = self.records[child];
                if child_rec.len() > 0 {
                    match state[child_rec.run as usize] {
                        0 => stack.push((child, 0)),
                        1 => return Err(TrieError::CyclicRecord { index: child }),
                        _ => {}
                    }
                }
                continue;
            }
            if rec.len() > 0 {
                state[run] = 2;
            }
            stack.pop();
        }
        Ok(())
    }

    fn run(&self, rec: BlobRecord) -> &[BlobRecord] {
        let start = rec.run as usize;
        &self.records[start..start + rec.len()]
    }

    /// All records, root first.
    pub fn records(&self) -> &[BlobRecord] {
        &self.records
    }

    /// Number of records (edges plus the root record).
    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn has(&self, word: &str) -> bool {
        self.has_word(word)
    }

    pub fn count_words(&self) -> usize {
        let mut memo: HashMap<usize, usize> = HashMap::new();
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        let mut root_count = 0;
        while let Some(top) = stack.last_mut() {
            let (index, next) = *top;
            let rec = self.records[index];
            if next < rec.len() {
                top.1 += 1;
                let child = rec.run as usize + next;
                if !memo.contains_key(&self.records[child].key()) {
                    stack.push((child, 0));
                }
                continue;
            }
            let below: usize = self
                .run(rec)
                .iter()
                .map(|c| memo.get(&c.key()).copied().unwrap_or(0))
                .sum();
            let count = usize::from(rec.is_end()) + below;
            if index == 0 {
                root_count = count;
            } else {
                memo.insert(rec.key(), count);
            }
            stack.pop();
        }
        root_count
    }

    pub fn words(&self) -> Vec<String> {
        crate::walker::Words::new(self).collect()
    }
}

/// Reserve a children run for `node` on first sight; leaves get run 0.
fn assign_run<G: TrieGraph>(
    graph: &G,
    node: G::Node,
    records: &mut Vec<BlobRecord>,
    runs: &mut HashMap<usize, u32>,
    queue: &mut VecDeque<(G::Node, u32)>,
) -> u32 {
    let count = graph.child_count(node);
    if count == 0 {
        return 0;
    }
    let key = graph.node_key(node);
    if let Some(&run) = runs.get(&key) {
        return run;
    }
    let run = records.len() as u32;
    records.resize(records.len() + count, BlobRecord::zeroed());
    runs.insert(key, run);
    queue.push_back((node, run));
    run
}

impl TrieGraph for TrieBlob {
    /// Index of the record whose target is this node.
    type Node = u32;

    #[inline]
    fn root(&self) -> u32 {
        0
    }

    #[inline]
    fn is_end(&self, node: u32) -> bool {
        self.records[node as usize].is_end()
    }

    #[inline]
    fn child_count(&self, node: u32) -> usize {
        self.records[node as usize].len()
    }

    #[inline]
    fn child_at(&self, node: u32, index: usize) -> (char, u32) {
        let child = self.records[node as usize].run + index as u32;
        (self.records[child as usize].char(), child)
    }

    fn child(&self, node: u32, c: char) -> Option<u32> {
        let rec = self.records[node as usize];
        let run = self.run(rec);
        run.binary_search_by_key(&(c as u32), |r| r.ch)
            .ok()
            .map(|i| rec.run + i as u32)
    }

    #[inline]
    fn node_key(&self, node: u32) -> usize {
        if node == 0 {
            // The root record has no parent edge; keep it apart from every
            // other node key.
            return usize::MAX;
        }
        self.records[node as usize].key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate;

    fn words() -> Vec<&'static str> {
        vec![
            "one", "two", "three", "four", "walk", "walking", "walked", "talk", "talking",
            "talked", "café", "😀",
        ]
    }

    fn blob() -> TrieBlob {
        TrieBlob::from_trie(&consolidate(&Trie::from_words(words())))
    }

    #[test]
    fn has_matches_source() {
        let blob = blob();
        for w in words() {
            assert!(blob.has(w), "missing {w}");
        }
        assert!(!blob.has("walks"));
        assert!(!blob.has("tw"));
        assert!(!blob.has(""));
    }

    #[test]
    fn count_words_matches_source() {
        assert_eq!(blob().count_words(), words().len());
    }

    #[test]
    fn words_are_sorted() {
        let mut expected: Vec<String> = words().iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(blob().words(), expected);
    }

    #[test]
    fn shared_suffixes_share_runs() {
        let shared = blob();
        let plain = TrieBlob::from_trie(&Trie::from_words(words()));
        assert!(shared.size() < plain.size());
    }

    #[test]
    fn to_trie_round_trip() {
        let trie = blob().to_trie();
        assert!(trie.is_consolidated());
        assert_eq!(trie.count_words(), words().len());
        for w in words() {
            assert!(trie.has(w));
        }
    }

    #[test]
    fn bytes_round_trip() {
        let original = blob();
        let restored = TrieBlob::from_bytes(&original.to_bytes()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn empty_trie_blob() {
        let blob = TrieBlob::from_trie(&Trie::new());
        assert_eq!(blob.size(), 1);
        assert_eq!(blob.count_words(), 0);
        let restored = TrieBlob::from_bytes(&blob.to_bytes()).unwrap();
        assert!(restored.words().is_empty());
    }

    #[test]
    fn reject_dangling_run() {
        let mut data = blob().to_bytes();
        // Root record run field points far outside the table.
        data[HEADER_SIZE + 4..HEADER_SIZE + 8].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            TrieBlob::from_bytes(&data),
            Err(TrieError::DanglingRecord { index: 0 })
        ));
    }

    #[test]
    fn reject_truncated_table() {
        let data = blob().to_bytes();
        let cut = &data[..data.len() - 5];
        assert!(matches!(
            TrieBlob::from_bytes(cut),
            Err(TrieError::TooShort { .. })
        ));
    }

    #[test]
    fn reject_cycle() {
        // root -> 'a' -> (children run 1, which is the 'a' record itself)
        let records = [
            BlobRecord::new('\0', 1, 1, false),
            BlobRecord::new('a', 1, 1, true),
        ];
        let mut data = format::write_header(2).to_vec();
        data.extend_from_slice(bytemuck::cast_slice(&records));
        assert!(matches!(
            TrieBlob::from_bytes(&data),
            Err(TrieError::CyclicRecord { .. })
        ));
    }

    #[test]
    fn reject_run_shared_under_different_lengths() {
        // 'a' sees one child of run 3, 'b' and 'd' see two; 'd' sits inside
        // that run, so the longer view loops back on itself.
        let records = [
            BlobRecord::new('\0', 1, 2, false),
            BlobRecord::new('a', 3, 1, false),
            BlobRecord::new('b', 3, 2, false),
            BlobRecord::new('c', 0, 0, true),
            BlobRecord::new('d', 3, 2, false),
        ];
        let mut data = format::write_header(5).to_vec();
        data.extend_from_slice(bytemuck::cast_slice(&records));
        assert!(matches!(
            TrieBlob::from_bytes(&data),
            Err(TrieError::RunLengthMismatch { index: 2 })
        ));
    }
}
