// TrieXv1: one line per distinct node, children first, root last.
//
// A line is an optional `*` (end of word) followed by comma-separated
// `<char><ref>` pairs, where `ref` is the line number of the child node
// (empty for line 0). Characters that are part of the syntax are escaped
// with a backslash. Line breaks cannot be written.

use crate::TrieError;
use crate::consolidate::consolidate;
use crate::io::{Header, parse_ref, to_radix, write_header};
use crate::node::{NodeId, Trie, TrieNode};

const EOW: char = '*';
const ESCAPE: char = '\\';

fn needs_escape(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | ',' | ':' | '{' | '}' | '*' | '#')
}

pub(crate) fn serialize(trie: &Trie, base: u32, comment: &str) -> Result<String, TrieError> {
    let mut out = String::new();
    write_header(&mut out, 1, base, comment, false);
    if trie.count_words() == 0 {
        return Ok(out);
    }

    let trie = consolidate(trie);
    let order = trie.postorder();
    let mut line_of = vec![0usize; trie.arena_len()];
    for (line, &id) in order.iter().enumerate() {
        line_of[id.index()] = line;
        let node = trie.node(id);
        if node.is_end() {
            out.push(EOW);
        }
        for (i, &(c, child)) in node.children().iter().enumerate() {
            if c == '\n' || c == '\r' {
                return Err(TrieError::Unrepresentable(c));
            }
            if i > 0 {
                out.push(',');
            }
            if needs_escape(c) {
                out.push(ESCAPE);
            }
            out.push(c);
            let r = line_of[child.index()];
            if r != 0 {
                out.push_str(&to_radix(r, base));
            }
        }
        out.push('\n');
    }
    Ok(out)
}

pub(crate) fn import(lines: &[&str], header: &Header, source_name: &str) -> Result<Trie, TrieError> {
    let mut nodes: Vec<TrieNode> = Vec::new();
    for (i, line) in lines.iter().enumerate().skip(header.data_start) {
        if line.is_empty() {
            continue;
        }
        let node = decode_line(line, nodes.len(), header.base, source_name, i + 1)?;
        nodes.push(node);
    }
    if let Some(root) = nodes.last_mut() {
        root.is_end = false;
    }
    Ok(consolidate(&Trie::from_postorder(nodes, false)))
}

fn decode_line(
    line: &str,
    index: usize,
    base: u32,
    source_name: &str,
    line_no: usize,
) -> Result<TrieNode, TrieError> {
    let parse_error = |message: &str| TrieError::Parse {
        source_name: source_name.to_string(),
        line: line_no,
        message: message.to_string(),
    };

    let mut chars = line.chars().peekable();
    let is_end = chars.next_if_eq(&EOW).is_some();
    let mut children: Vec<(char, NodeId)> = Vec::new();

    while let Some(first) = chars.next() {
        let letter = if first == ESCAPE {
            chars.next().ok_or_else(|| parse_error("dangling escape"))?
        } else {
            first
        };
        let mut digits = String::new();
        while let Some(c) = chars.next_if(|&c| c != ',') {
            digits.push(c);
        }
        chars.next_if_eq(&',');

        let r = if digits.is_empty() {
            0
        } else {
            parse_ref(&digits, base, source_name, line_no)?
        };
        if r >= index {
            return Err(TrieError::Cycle {
                source_name: source_name.to_string(),
                line: line_no,
            });
        }
        children.push((letter, NodeId::from_index(r)));
    }

    children.sort_by_key(|&(c, _)| c);
    if children.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(parse_error("duplicate child character"));
    }
    Ok(TrieNode { is_end, children })
}
