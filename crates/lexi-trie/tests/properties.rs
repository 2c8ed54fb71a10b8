// Property tests: every representation accepts the same word set.
//
// Run: cargo test -p lexi-trie --test properties

use std::collections::BTreeSet;

use lexi_trie::io::{ExportOptions, FormatVersion, import_trie, serialize_trie};
use lexi_trie::{Trie, TrieBlob, TrieError, TrieGraph, Walker, consolidate};
use proptest::prelude::*;

/// Letters, digits, every character the text formats give a meaning to,
/// whitespace, control and astral characters.
fn word_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-eA-C0-9 *,^#$<;:\\\\\\[\\]{}_\t\u{1}é😀]{1,8}", 0..40)
}

/// Like `word_set`, with line breaks inside words.
fn word_set_with_breaks() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-c *\\\\\n\r]{1,6}", 1..20)
}

fn sorted(words: &BTreeSet<String>) -> Vec<String> {
    // BTreeSet<String> orders by bytes, which matches code-point order.
    words.iter().cloned().collect()
}

proptest! {
    #[test]
    fn consolidation_preserves_words(words in word_set()) {
        let trie = Trie::from_words(&words);
        let merged = consolidate(&trie);
        prop_assert!(merged.is_consolidated());
        prop_assert_eq!(merged.count_words(), words.len());
        prop_assert_eq!(merged.words(), sorted(&words));
        prop_assert!(merged.count_nodes() <= trie.count_nodes());
        for w in &words {
            prop_assert!(merged.has(w));
        }
    }

    #[test]
    fn consolidation_is_idempotent(words in word_set()) {
        let once = consolidate(&Trie::from_words(&words));
        let twice = consolidate(&once);
        prop_assert_eq!(once.count_nodes(), twice.count_nodes());
    }

    #[test]
    fn text_formats_round_trip(
        words in word_set(),
        version in prop_oneof![
            Just(FormatVersion::V1),
            Just(FormatVersion::V2),
            Just(FormatVersion::V3),
            Just(FormatVersion::V4),
        ],
        base in 2u32..40,
    ) {
        let trie = Trie::from_words(&words);
        let options = ExportOptions { version, base, comment: String::new() };
        let text = serialize_trie(&trie, &options).unwrap();
        let imported = import_trie(&text, "prop.trie").unwrap();
        prop_assert_eq!(imported.words(), sorted(&words));
        prop_assert_eq!(serialize_trie(&imported, &options).unwrap(), text);
    }

    #[test]
    fn line_breaks_survive_only_escaping_formats(words in word_set_with_breaks()) {
        let trie = Trie::from_words(&words);
        let has_break = words.iter().any(|w| w.contains(['\n', '\r']));
        for version in [FormatVersion::V1, FormatVersion::V2] {
            let options = ExportOptions { version, ..ExportOptions::default() };
            match serialize_trie(&trie, &options) {
                Err(TrieError::Unrepresentable(c)) => {
                    prop_assert!(has_break);
                    prop_assert!(c == '\n' || c == '\r');
                }
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
                Ok(text) => {
                    prop_assert!(!has_break);
                    prop_assert_eq!(import_trie(&text, "prop.trie").unwrap().words(), sorted(&words));
                }
            }
        }
        for version in [FormatVersion::V3, FormatVersion::V4] {
            let options = ExportOptions { version, ..ExportOptions::default() };
            let text = serialize_trie(&trie, &options).unwrap();
            prop_assert_eq!(import_trie(&text, "prop.trie").unwrap().words(), sorted(&words));
        }
    }

    #[test]
    fn blob_round_trip(words in word_set()) {
        let trie = Trie::from_words(&words);
        let blob = TrieBlob::from_trie(&trie);
        let decoded = TrieBlob::from_bytes(&blob.to_bytes()).unwrap();
        prop_assert_eq!(decoded.count_words(), words.len());
        prop_assert_eq!(decoded.words(), sorted(&words));
        prop_assert_eq!(decoded.to_trie().words(), sorted(&words));
        for w in &words {
            prop_assert!(decoded.has(w));
            prop_assert!(TrieGraph::has_word(&decoded, w));
        }
    }

    #[test]
    fn pruned_walk_visits_only_allowed_prefixes(words in word_set(), limit in 1usize..4) {
        let trie = consolidate(&Trie::from_words(&words));
        let mut walker = Walker::new(&trie);
        let mut seen = BTreeSet::new();
        let mut go_deeper = true;
        while let Some(step) = walker.next(go_deeper) {
            prop_assert!(step.depth <= limit);
            seen.insert(step.text.to_string());
            go_deeper = step.depth < limit;
        }
        let expected: BTreeSet<String> = words
            .iter()
            .flat_map(|w| {
                let chars: Vec<char> = w.chars().collect();
                (1..=chars.len().min(limit)).map(move |n| chars[..n].iter().collect::<String>())
            })
            .collect();
        prop_assert_eq!(seen, expected);
    }
}
