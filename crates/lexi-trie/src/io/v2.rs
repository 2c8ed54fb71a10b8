// TrieXv2: one line per distinct (letter, node) pair, children first.
//
// A line is the node's own letter, an optional `*` (end of word) and the
// comma-separated line numbers of its children. The root line uses `^` as
// its letter and comes last.

use hashbrown::HashMap;

use crate::TrieError;
use crate::consolidate::consolidate;
use crate::io::{Header, parse_ref, to_radix, write_header};
use crate::node::{NodeId, Trie, TrieNode};

const EOW: char = '*';
const ROOT_LETTER: char = '^';

pub(crate) fn serialize(trie: &Trie, base: u32, comment: &str) -> Result<String, TrieError> {
    let mut out = String::new();
    write_header(&mut out, 2, base, comment, true);
    if trie.count_words() == 0 {
        return Ok(out);
    }

    let trie = consolidate(trie);
    let mut line_of: HashMap<(char, NodeId), usize> = HashMap::new();
    let mut stack: Vec<(char, NodeId, usize)> = vec![(ROOT_LETTER, NodeId::ROOT, 0)];

    while let Some(top) = stack.last_mut() {
        let (letter, id, next) = *top;
        let children = trie.node(id).children();
        if next < children.len() {
            top.2 += 1;
            let (c, child) = children[next];
            if !line_of.contains_key(&(c, child)) {
                stack.push((c, child, 0));
            }
            continue;
        }
        stack.pop();

        if letter == '\n' || letter == '\r' {
            return Err(TrieError::Unrepresentable(letter));
        }
        let mut refs: Vec<usize> = children.iter().filter_map(|e| line_of.get(e).copied()).collect();
        refs.sort_unstable();

        out.push(letter);
        if trie.node(id).is_end() {
            out.push(EOW);
        }
        let refs: Vec<String> = refs.iter().map(|&r| to_radix(r, base)).collect();
        out.push_str(&refs.join(","));
        out.push('\n');
        line_of.insert((letter, id), line_of.len());
    }
    Ok(out)
}

pub(crate) fn import(lines: &[&str], header: &Header, source_name: &str) -> Result<Trie, TrieError> {
    let mut letters: Vec<char> = Vec::new();
    let mut nodes: Vec<TrieNode> = Vec::new();

    for (i, line) in lines.iter().enumerate().skip(header.data_start) {
        let line_no = i + 1;
        let mut chars = line.chars();
        let Some(letter) = chars.next() else {
            continue;
        };
        let rest = chars.as_str();
        let (is_end, refs) = match rest.strip_prefix(EOW) {
            Some(refs) => (true, refs),
            None => (false, rest),
        };

        let mut children = Vec::new();
        for digits in refs.split(',').filter(|r| !r.is_empty()) {
            let r = parse_ref(digits, header.base, source_name, line_no)?;
            if r >= nodes.len() {
                return Err(TrieError::Cycle {
                    source_name: source_name.to_string(),
                    line: line_no,
                });
            }
            children.push((letters[r], NodeId::from_index(r)));
        }
        children.sort_by_key(|&(c, _)| c);
        if children.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(TrieError::Parse {
                source_name: source_name.to_string(),
                line: line_no,
                message: "duplicate child character".to_string(),
            });
        }

        letters.push(letter);
        nodes.push(TrieNode { is_end, children });
    }
    if let Some(root) = nodes.last_mut() {
        root.is_end = false;
    }
    Ok(consolidate(&Trie::from_postorder(nodes, false)))
}

#[cfg(test)]
mod tests {
    use crate::io::import_trie;

    use super::*;

    fn data_lines(text: &str) -> Vec<&str> {
        text.lines().skip_while(|l| *l != "__DATA__").skip(1).collect()
    }

    #[test]
    fn lines_carry_their_own_letter() {
        let text = serialize(&Trie::from_words(["ab", "b"]), 10, "").unwrap();
        // 0: 'b' leaf, 1: 'a' with child 0, 2: root with children 0 and 1
        assert_eq!(data_lines(&text), vec!["b*", "a0", "^0,1"]);
    }

    #[test]
    fn same_subtree_under_different_letters_is_written_twice() {
        let text = serialize(&Trie::from_words(["a", "b"]), 10, "").unwrap();
        assert_eq!(data_lines(&text), vec!["a*", "b*", "^0,1"]);
    }

    #[test]
    fn syntax_letters_need_no_escape() {
        let trie = Trie::from_words(["**", "*,", "^"]);
        let text = serialize(&trie, 16, "").unwrap();
        let imported = import_trie(&text, "t").unwrap();
        assert_eq!(imported.words(), trie.words());
    }

    #[test]
    fn newline_in_word_is_unrepresentable() {
        let trie = Trie::from_words(["a\nb"]);
        assert!(matches!(
            serialize(&trie, 10, ""),
            Err(TrieError::Unrepresentable('\n'))
        ));
    }

    #[test]
    fn forward_reference_is_a_cycle() {
        let text = "TrieXv2\nbase=10\n__DATA__\na*\n^0,3\n";
        assert!(matches!(
            import_trie(text, "cyc.trie"),
            Err(TrieError::Cycle { line: 5, .. })
        ));
    }

    #[test]
    fn duplicate_letters_are_rejected() {
        let text = "TrieXv2\nbase=10\n__DATA__\na*\na*\n^0,1\n";
        assert!(matches!(
            import_trie(text, "dup.trie"),
            Err(TrieError::Parse { line: 6, .. })
        ));
    }
}
