// TrieXv4: the V3 token stream with a reference index and line breaks
// placed to keep diffs between dictionary revisions small.
//
// Data section:
//   [ i0, i1, ... ]   reference index: node numbers, most referenced first
//   @<i>[;]           the edge just written points at node `index[i]`
//   #<n>[;]           the edge just written points at node `n`
//   /* ab */          comment naming the one or two letter prefix that the
//                     following line continues
//
// In base 10 the `;` after a reference is left out; any non-digit ends it.
// A new line starts at every one or two letter prefix and after 50 words.
// The reader accepts every V3 stream.

use crate::TrieError;
use crate::consolidate::consolidate;
use crate::io::v3::{Dialect, Writer, read_stream};
use crate::io::{Header, to_radix, write_header};
use crate::node::{NodeId, Trie};

/// Index entries per line of the reference table.
const INDEX_PER_LINE: usize = 20;

/// Pre-order numbers of the nodes that have children, and how often a
/// node is reached again after being written.
struct Census {
    numbers: Vec<Option<usize>>,
    refs: Vec<usize>,
}

fn census(trie: &Trie) -> Census {
    let mut numbers = vec![None; trie.arena_len()];
    let mut refs = vec![0; trie.arena_len()];
    numbers[NodeId::ROOT.index()] = Some(0);
    let mut next_number = 1;
    let mut stack: Vec<(NodeId, usize)> = vec![(NodeId::ROOT, 0)];

    while let Some(top) = stack.last_mut() {
        let (id, next) = *top;
        let children = trie.node(id).children();
        if next == children.len() {
            stack.pop();
            continue;
        }
        top.1 += 1;
        let (_, child) = children[next];
        if trie.node(child).is_leaf() {
            continue;
        }
        if numbers[child.index()].is_some() {
            refs[child.index()] += 1;
            continue;
        }
        numbers[child.index()] = Some(next_number);
        next_number += 1;
        stack.push((child, 0));
    }
    Census { numbers, refs }
}

fn digits(n: usize, base: u32) -> usize {
    to_radix(n, base).len()
}

/// Referenced nodes worth an index entry, as `(arena index, node number)`.
///
/// Candidates are taken most referenced first (ties by node number); one
/// is kept when its references shrink by more than the entry costs.
fn reference_index(census: &Census, base: u32) -> Vec<(usize, usize)> {
    let mut candidates: Vec<(usize, usize, usize)> = census
        .numbers
        .iter()
        .zip(&census.refs)
        .enumerate()
        .filter_map(|(arena, (number, &refs))| {
            number.filter(|_| refs > 0).map(|n| (arena, n, refs))
        })
        .collect();
    candidates.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));

    let mut index = Vec::new();
    for (arena, number, refs) in candidates {
        let slot = digits(index.len(), base);
        let absolute = digits(number, base);
        if absolute > slot && refs * (absolute - slot) > slot + 1 {
            index.push((arena, number));
        }
    }
    index
}

fn write_index(out: &mut String, index: &[(usize, usize)], base: u32) {
    out.push_str("[\n");
    for row in index.chunks(INDEX_PER_LINE) {
        let entries: Vec<String> = row.iter().map(|&(_, n)| to_radix(n, base)).collect();
        out.push_str(&entries.join(","));
        out.push_str(",\n");
    }
    out.push_str("]\n");
}

pub(crate) fn serialize(trie: &Trie, base: u32, comment: &str) -> String {
    let mut header = String::new();
    write_header(&mut header, 4, base, comment, true);
    if trie.count_words() == 0 {
        return header;
    }

    let trie = consolidate(trie);
    let census = census(&trie);
    let index = reference_index(&census, base);
    let mut slots = vec![None; trie.arena_len()];
    for (slot, &(arena, _)) in index.iter().enumerate() {
        slots[arena] = Some(slot);
    }
    write_index(&mut header, &index, base);

    let mut w = Writer::new(header, base, Dialect::V4);
    let mut written = vec![false; trie.arena_len()];
    let mut prefix: Vec<char> = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = vec![(NodeId::ROOT, 0)];

    while let Some(top) = stack.last_mut() {
        let (id, next) = *top;
        let children = trie.node(id).children();
        if next < children.len() {
            top.1 += 1;
            let (c, child) = children[next];
            let number = census.numbers[child.index()];
            if let Some(n) = number.filter(|_| written[child.index()]) {
                w.letter(c);
                w.reference(n, slots[child.index()]);
                continue;
            }
            let depth = stack.len();
            prefix.truncate(depth - 1);
            prefix.push(c);
            if depth <= 2 && number.is_some() {
                w.comment(&prefix);
            }
            w.letter(c);
            written[child.index()] = true;
            stack.push((child, 0));
            continue;
        }
        stack.pop();
        if stack.is_empty() {
            break;
        }
        if trie.node(id).is_end() {
            w.end_of_word();
        }
        w.back();
        // Close the line of every one or two letter prefix.
        if stack.len() <= 2 {
            w.eol = true;
        }
    }
    w.finish()
}

pub(crate) fn import(lines: &[&str], header: &Header, source_name: &str) -> Result<Trie, TrieError> {
    read_stream(lines, header, source_name, Dialect::V4)
}
