// Property tests: distances and the soundness of trie search pruning.
//
// Run: cargo test -p lexi-suggest --test properties

use std::collections::BTreeSet;

use lexi_suggest::{
    BASE_COST, EditWalk, FeatureSearch, SuggestOptions, SuggestionCostMapDef, WeightMap,
    feature_score, levenshtein, select_nearest_words, weighted_distance,
};
use lexi_trie::{Trie, consolidate};
use proptest::prelude::*;

fn short_word() -> impl Strategy<Value = String> {
    "[a-dé]{0,7}"
}

fn word_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-d]{1,7}", 1..30)
}

/// Rules of every kind: multi-character, anchored, penalised and swaps.
fn sample_weights() -> WeightMap {
    let mut map = WeightMap::from_defs(&[
        SuggestionCostMapDef {
            map: "(ab)c|d(cc)".into(),
            replace: Some(30),
            penalty: Some(4),
            ..SuggestionCostMapDef::default()
        },
        SuggestionCostMapDef {
            map: "ab".into(),
            swap: Some(20),
            ins_del: Some(60),
            ..SuggestionCostMapDef::default()
        },
        SuggestionCostMapDef {
            map: "$(d$)|^(^a)".into(),
            replace: Some(15),
            ..SuggestionCostMapDef::default()
        },
        SuggestionCostMapDef {
            map: "(dd)".into(),
            ins_del: Some(35),
            ..SuggestionCostMapDef::default()
        },
    ]);
    map.add_adjustment("double-c", "cc", 9).unwrap();
    map
}

#[test]
fn levenshtein_fixed_cases() {
    assert_eq!(levenshtein("abc", "abc"), 0);
    assert_eq!(levenshtein("abc", ""), 3);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
}

proptest! {
    #[test]
    fn levenshtein_is_symmetric(a in short_word(), b in short_word()) {
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
    }

    #[test]
    fn levenshtein_identity_and_bounds(a in short_word(), b in short_word()) {
        prop_assert_eq!(levenshtein(&a, &a), 0);
        let d = levenshtein(&a, &b);
        let (la, lb) = (a.chars().count(), b.chars().count());
        prop_assert!(d >= la.abs_diff(lb));
        prop_assert!(d <= la.max(lb));
    }

    #[test]
    fn weighted_distance_without_map_is_bounded_by_levenshtein(a in short_word(), b in short_word()) {
        let map = WeightMap::new();
        let weighted = weighted_distance(&a, &b, &map, BASE_COST);
        prop_assert!(weighted <= levenshtein(&a, &b) as u32 * BASE_COST);
    }

    #[test]
    fn nearest_words_are_sorted_and_within_limit(
        word in short_word(),
        words in prop::collection::vec(short_word(), 0..20),
        max_edits in 0usize..4,
    ) {
        let found = select_nearest_words(&word, &words, 5, max_edits);
        prop_assert!(found.len() <= 5);
        prop_assert!(found.iter().all(|w| w.distance <= max_edits));
        let ordered = found
            .windows(2)
            .all(|p| (p[0].distance, &p[0].word) <= (p[1].distance, &p[1].word));
        prop_assert!(ordered);
    }

    #[test]
    fn feature_search_misses_nothing(
        words in word_set(),
        query in "[a-d]{1,6}",
        min_score in -6i32..12,
    ) {
        let trie = consolidate(&Trie::from_words(&words));
        let mut search = FeatureSearch::new(&trie, &query);
        let mut found = BTreeSet::new();
        while let Some(hit) = search.next(min_score) {
            prop_assert_eq!(hit.score, feature_score(&query, &hit.word));
            found.insert(hit.word);
        }
        let expected: BTreeSet<String> = words
            .iter()
            .filter(|w| feature_score(&query, w) >= min_score)
            .cloned()
            .collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn edit_walk_misses_nothing_within_limit(words in word_set(), query in "[a-d]{1,6}") {
        let trie = Trie::from_words(&words);
        let options = SuggestOptions { ignore_case: false, ..SuggestOptions::default() };
        let mut walk = EditWalk::new(&trie, &query, &options);
        let limit = walk.cost_limit();
        let mut found = std::collections::BTreeMap::new();
        while let Some(hit) = walk.next(u32::MAX) {
            prop_assert!(hit.cost <= limit);
            found.insert(hit.word, hit.cost);
        }
        for w in &words {
            let plain = levenshtein(&query, w) as u32 * BASE_COST;
            if plain <= limit {
                let cost = found.get(w).copied();
                prop_assert!(cost.is_some_and(|c| c <= plain), "{} missing or too costly", w);
            }
        }
    }

    #[test]
    fn weighted_edit_walk_misses_nothing_within_limit(words in word_set(), query in "[a-d]{1,6}") {
        let weights = sample_weights();
        let trie = consolidate(&Trie::from_words(&words));
        let options = SuggestOptions { ignore_case: false, ..SuggestOptions::default() };
        let mut walk = EditWalk::new(&trie, &query, &options).with_weights(&weights);
        let limit = walk.cost_limit();
        let mut found = std::collections::BTreeMap::new();
        while let Some(hit) = walk.next(u32::MAX) {
            prop_assert!(hit.cost <= limit);
            found.insert(hit.word, hit.cost);
        }
        for w in &words {
            let weighted = weighted_distance(&query, w, &weights, BASE_COST);
            if weighted <= limit {
                let cost = found.get(w).copied();
                prop_assert!(cost.is_some_and(|c| c <= weighted), "{} missing or too costly", w);
            }
        }
    }
}
