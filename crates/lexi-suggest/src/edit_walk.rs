// Edit-distance search over a trie graph
//
// One dynamic-programming row is kept per depth of the current walk path.
// Both sides are wrapped as `^word$` so weighted rules can anchor to either
// end: row 1 holds the `^`, and the `$` row is only computed when a path
// ends a word. Row `d` holds, for every prefix of the input, the cheapest
// cost of turning it into the first `d` characters of the path. A subtree
// is only entered while some cell it can still build on is within the
// cost limit, so the walker's go-deeper flag prunes every branch that can
// no longer match.

use std::time::Instant;

use lexi_core::case::normalize_ignore_case;
use lexi_core::suggestion::SuggestionResult;
use lexi_trie::{CompoundMethod, TrieGraph, Walker};

use crate::SuggestOptions;
use crate::collector::{BASE_COST, SuggestionGenerator};
use crate::weights::{TrieCost, WeightMap};

/// Cost of exchanging two adjacent letters.
pub const SWAP_COST: u32 = 75;

/// Cost of a substitution that only changes case or accents.
pub const CASE_COST: u32 = 1;

/// Inserting a word separator is marginally cheaper than a letter.
const SEPARATOR_INSERT_COST: u32 = BASE_COST - 1;

const WORD_START: char = '^';
const WORD_END: char = '$';

/// Weighted edits that consume the input up to one position.
#[derive(Default)]
struct Edges<'m> {
    /// `(start, cost)` of deleting `word[start..end]`.
    deletions: Vec<(usize, u32)>,
    /// `word[start..end]` and what it may be replaced with.
    replacements: Vec<(usize, &'m TrieCost)>,
    /// `(start, swapped text, cost)`.
    swaps: Vec<(usize, Vec<char>, u32)>,
}

/// Per-character costs for one input word.
struct RowCosts<'m> {
    word: Vec<char>,
    folded: Vec<String>,
    weights: Option<&'m WeightMap>,
    /// Indexed by the input position an edit ends at. Empty without weights.
    edges: Vec<Edges<'m>>,
    /// Most path characters a single edit can span.
    span: usize,
    ignore_case: bool,
}

impl<'m> RowCosts<'m> {
    fn new(word: &str, ignore_case: bool) -> Self {
        let word: Vec<char> = std::iter::once(WORD_START)
            .chain(word.chars())
            .chain(std::iter::once(WORD_END))
            .collect();
        let folded = word
            .iter()
            .map(|c| normalize_ignore_case(&c.to_string()))
            .collect();
        Self {
            word,
            folded,
            weights: None,
            edges: Vec::new(),
            span: 1,
            ignore_case,
        }
    }

    fn set_weights(&mut self, map: &'m WeightMap) {
        let mut edges: Vec<Edges<'m>> = (0..=self.word.len()).map(|_| Edges::default()).collect();
        let mut span = map.longest_insertion();
        for start in 0..self.word.len() {
            for (end, cost) in map.deletions_from(&self.word, start) {
                edges[end].deletions.push((start, cost));
            }
            for (end, right) in map.replacements_from(&self.word, start) {
                span = span.max(right.depth());
                edges[end].replacements.push((start, right));
            }
            for (end, swapped, cost) in map.swaps_from(&self.word, start) {
                span = span.max(swapped.len());
                edges[end].swaps.push((start, swapped, cost));
            }
        }
        self.weights = Some(map);
        self.edges = edges;
        self.span = span.max(1);
    }

    fn substitute(&self, i: usize, w: char, w_folded: &str) -> u32 {
        if self.word[i] == w {
            0
        } else if self.ignore_case && self.folded[i] == w_folded {
            CASE_COST
        } else {
            BASE_COST
        }
    }

    /// Cost of the path character `w` appearing where the word has none.
    fn insert(&self, w: char) -> u32 {
        if w == ' ' || w == '+' {
            SEPARATOR_INSERT_COST
        } else {
            BASE_COST
        }
    }

    /// The row before any path character.
    fn first_row(&self) -> Vec<u32> {
        let mut row: Vec<u32> = vec![0];
        for i in 1..=self.word.len() {
            let mut best = row[i - 1].saturating_add(BASE_COST);
            if let Some(edges) = self.edges.get(i) {
                for &(start, c) in &edges.deletions {
                    best = best.min(row[start].saturating_add(c));
                }
            }
            row.push(best);
        }
        row
    }

    /// The row for the last character of `path`, given the rows for every
    /// shorter prefix of it, and the lowest cost any deeper row can still
    /// reach from here.
    fn next_row(&self, rows: &[Vec<u32>], path: &[char]) -> (Vec<u32>, u32) {
        let n = self.word.len();
        let d = rows.len();
        let w = path[d - 1];
        let prev = &rows[d - 1];
        let w_folded = if self.ignore_case {
            normalize_ignore_case(&w.to_string())
        } else {
            String::new()
        };
        let ins = self.insert(w);
        let insertions: Vec<(usize, u32)> = match self.weights {
            Some(map) => (d.saturating_sub(self.span)..d)
                .filter_map(|d0| map.insertion_cost(&path[d0..d]).map(|c| (d0, c)))
                .collect(),
            None => Vec::new(),
        };

        let mut row: Vec<u32> = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let mut best = prev[i].saturating_add(ins);
            if i > 0 {
                let x = self.word[i - 1];
                best = best.min(prev[i - 1].saturating_add(self.substitute(i - 1, w, &w_folded)));
                best = best.min(row[i - 1].saturating_add(BASE_COST));
                if d >= 2 && i >= 2 {
                    let last = path[d - 2];
                    if w != last && w == self.word[i - 2] && last == x {
                        best = best.min(rows[d - 2][i - 2].saturating_add(SWAP_COST));
                    }
                }
            }
            for &(d0, c) in &insertions {
                best = best.min(rows[d0][i].saturating_add(c));
            }
            if let Some(edges) = self.edges.get(i) {
                for &(start, c) in &edges.deletions {
                    best = best.min(row[start].saturating_add(c));
                }
                for &(start, right) in &edges.replacements {
                    for d0 in d.saturating_sub(self.span)..d {
                        if let Some(c) = right.total(&path[d0..d]) {
                            best = best.min(rows[d0][start].saturating_add(c));
                        }
                    }
                }
                for (start, swapped, c) in &edges.swaps {
                    let len = swapped.len();
                    if len <= d && path[d - len..] == swapped[..] {
                        best = best.min(rows[d - len][*start].saturating_add(*c));
                    }
                }
            }
            row.push(best);
        }

        // A swap finishing on the next character skips this row.
        let swap_reach = (2..=n)
            .filter(|&i| self.word[i - 1] == w && self.word[i - 2] != w)
            .map(|i| prev[i - 2].saturating_add(SWAP_COST))
            .min()
            .unwrap_or(u32::MAX);
        let mut reach = row.iter().copied().min().unwrap_or(u32::MAX).min(swap_reach);
        // Weighted edits spanning several path characters build on older rows.
        for older in &rows[(d + 1).saturating_sub(self.span)..d] {
            reach = reach.min(older.iter().copied().min().unwrap_or(u32::MAX));
        }
        (row, reach)
    }

    /// Cost of `path` as a complete word spelled `text`.
    fn end_cost(&self, rows: &[Vec<u32>], path: &mut Vec<char>, text: &str) -> u32 {
        path.push(WORD_END);
        let (row, _) = self.next_row(rows, path);
        path.pop();
        let cost = row[row.len() - 1];
        match self.weights {
            Some(map) => cost.saturating_add(map.calc_adjustment(text)),
            None => cost,
        }
    }
}

/// A resumable edit-distance search for one word over a trie graph.
///
/// Each call to [`next`](Self::next) continues the walk and returns the next
/// word within the cost limit. The limit can only be tightened.
pub struct EditWalk<'g, 'm, G: TrieGraph> {
    walker: Walker<'g, G>,
    costs: RowCosts<'m>,
    rows: Vec<Vec<u32>>,
    /// `^` followed by the characters of the current walk path.
    path: Vec<char>,
    cost_limit: u32,
    /// Lowest cost reachable below the last node returned by the walker.
    pending_min: Option<u32>,
    deadline: Option<Instant>,
    done: bool,
}

impl<'g, 'm, G: TrieGraph> EditWalk<'g, 'm, G> {
    pub fn new(graph: &'g G, word: &str, options: &SuggestOptions) -> Self {
        let letters = u32::try_from(word.chars().count()).unwrap_or(u32::MAX);
        let half_word = letters.saturating_mul(BASE_COST) / 2;
        let changes = u32::try_from(options.num_changes).unwrap_or(u32::MAX);
        let cost_limit = half_word.min(changes.saturating_mul(BASE_COST));
        let walker = Walker::new(graph)
            .with_compound(options.compound_method)
            .with_hint(word);
        let mut walk = Self {
            walker,
            costs: RowCosts::new(word, options.ignore_case),
            rows: Vec::new(),
            path: Vec::new(),
            cost_limit,
            pending_min: None,
            deadline: None,
            done: false,
        };
        walk.reset_rows();
        walk
    }

    /// Price edits with `weights`: single and multi-character replacements,
    /// insertions, deletions and swaps with their penalties, and the
    /// adjustments of each found word.
    pub fn with_weights(mut self, weights: &'m WeightMap) -> Self {
        self.costs.set_weights(weights);
        self.reset_rows();
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cost_limit(&self) -> u32 {
        self.cost_limit
    }

    fn reset_rows(&mut self) {
        self.rows = vec![self.costs.first_row()];
        self.path = vec![WORD_START];
        let (row, _) = self.costs.next_row(&self.rows, &self.path);
        self.rows.push(row);
    }

    /// The next word costing at most `max_cost` (and the current limit).
    pub fn next(&mut self, max_cost: u32) -> Option<SuggestionResult> {
        self.cost_limit = self.cost_limit.min(max_cost);
        while !self.done {
            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                log::debug!("edit walk stopped at its deadline");
                self.done = true;
                break;
            }
            let limit = self.cost_limit;
            let go_deeper = self.pending_min.is_none_or(|m| m <= limit);
            let Some(step) = self.walker.next(go_deeper) else {
                self.done = true;
                break;
            };

            let d = step.depth;
            self.rows.truncate(d + 1);
            self.path.truncate(d);
            self.path.push(step.ch);
            let (row, reach) = self.costs.next_row(&self.rows, &self.path);
            self.rows.push(row);
            self.pending_min = Some(reach);

            if step.is_end {
                let cost = self.costs.end_cost(&self.rows, &mut self.path, step.text);
                if cost <= limit {
                    return Some(SuggestionResult::new(step.text, cost));
                }
            }
        }
        None
    }
}

impl<G: TrieGraph> SuggestionGenerator for EditWalk<'_, '_, G> {
    fn next_suggestion(&mut self, max_cost: u32) -> Option<SuggestionResult> {
        self.next(max_cost)
    }

    fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }
}

/// Whether walks started with `method` can produce compound words.
pub fn compounds(method: CompoundMethod) -> bool {
    method.separator().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::SuggestionCostMapDef;
    use lexi_trie::{Trie, consolidate};

    fn all<G: TrieGraph>(walk: &mut EditWalk<'_, '_, G>) -> Vec<(String, u32)> {
        let mut out = Vec::new();
        while let Some(r) = walk.next(u32::MAX) {
            out.push((r.word, r.cost));
        }
        out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    fn options() -> SuggestOptions {
        SuggestOptions::default()
    }

    #[test]
    fn finds_words_within_limit() {
        let trie = consolidate(&Trie::from_words(["walk", "walked", "talk", "tall", "chalk", "xylophone"]));
        let mut walk = EditWalk::new(&trie, "walk", &options());
        assert_eq!(walk.cost_limit(), 200);
        let found = all(&mut walk);
        assert_eq!(found[0], ("walk".to_string(), 0));
        assert_eq!(found[1], ("talk".to_string(), 100));
        assert!(found.iter().all(|(_, c)| *c <= 200));
        assert!(found.iter().any(|(w, _)| w == "walked"));
        assert!(!found.iter().any(|(w, _)| w == "xylophone"));
    }

    #[test]
    fn swap_is_cheaper_than_two_edits() {
        let trie = Trie::from_words(["form"]);
        let found = all(&mut EditWalk::new(&trie, "from", &options()));
        assert_eq!(found, vec![("form".to_string(), SWAP_COST)]);
    }

    #[test]
    fn case_and_accent_changes_are_nearly_free() {
        let trie = Trie::from_words(["Café"]);
        let found = all(&mut EditWalk::new(&trie, "cafe", &options()));
        assert_eq!(found, vec![("Café".to_string(), 2)]);

        let strict = SuggestOptions {
            ignore_case: false,
            ..options()
        };
        let found = all(&mut EditWalk::new(&trie, "cafe", &strict));
        assert_eq!(found, vec![("Café".to_string(), 200)]);
    }

    #[test]
    fn weights_lower_substitutions() {
        let trie = Trie::from_words(["bet"]);
        let map = WeightMap::from_defs(&[SuggestionCostMapDef {
            map: "ae".into(),
            replace: Some(25),
            ..SuggestionCostMapDef::default()
        }]);
        let mut walk = EditWalk::new(&trie, "bat", &options()).with_weights(&map);
        assert_eq!(all(&mut walk), vec![("bet".to_string(), 25)]);
    }

    fn map(defs: &[(&str, SuggestionCostMapDef)]) -> WeightMap {
        let defs: Vec<SuggestionCostMapDef> = defs
            .iter()
            .map(|(m, d)| SuggestionCostMapDef {
                map: m.to_string(),
                ..d.clone()
            })
            .collect();
        WeightMap::from_defs(&defs)
    }

    #[test]
    fn multi_char_replacements_are_walked() {
        let trie = consolidate(&Trie::from_words(["phone", "bone"]));
        let weights = map(&[("(ph)f", SuggestionCostMapDef { replace: Some(10), ..Default::default() })]);
        let mut walk = EditWalk::new(&trie, "fone", &options()).with_weights(&weights);
        let found = all(&mut walk);
        assert_eq!(found, vec![("phone".to_string(), 10), ("bone".to_string(), 100)]);
        assert_eq!(found[0].1, crate::weighted_distance("fone", "phone", &weights, BASE_COST));
    }

    #[test]
    fn anchored_rules_apply_at_word_ends_only() {
        let trie = Trie::from_words(["walks", "swalk"]);
        let weights = map(&[("$(s$)", SuggestionCostMapDef { replace: Some(20), ..Default::default() })]);
        let mut walk = EditWalk::new(&trie, "walk", &options()).with_weights(&weights);
        assert_eq!(
            all(&mut walk),
            vec![("walks".to_string(), 20), ("swalk".to_string(), 100)]
        );
    }

    #[test]
    fn penalties_and_adjustments_are_charged() {
        let mut weights = map(&[(
            "ae",
            SuggestionCostMapDef {
                replace: Some(10),
                penalty: Some(5),
                ..Default::default()
            },
        )]);
        weights.add_adjustment("double-e", "ee", 7).unwrap();

        let trie = Trie::from_words(["bet"]);
        let mut walk = EditWalk::new(&trie, "bat", &options()).with_weights(&weights);
        assert_eq!(all(&mut walk), vec![("bet".to_string(), 15)]);

        let trie = Trie::from_words(["beet"]);
        let mut walk = EditWalk::new(&trie, "beat", &options()).with_weights(&weights);
        assert_eq!(all(&mut walk), vec![("beet".to_string(), 22)]);
    }

    #[test]
    fn weighted_swaps_undercut_plain_swaps() {
        let trie = Trie::from_words(["receive"]);
        let weights = map(&[("ei", SuggestionCostMapDef { swap: Some(25), ..Default::default() })]);
        let mut walk = EditWalk::new(&trie, "recieve", &options()).with_weights(&weights);
        assert_eq!(all(&mut walk), vec![("receive".to_string(), 25)]);
    }

    #[test]
    fn tighter_limit_prunes_remaining_search() {
        let trie = Trie::from_words(["aaaa", "aaab", "aabb"]);
        let mut walk = EditWalk::new(&trie, "aaaa", &options());
        let first = walk.next(u32::MAX).map(|r| (r.word, r.cost));
        assert_eq!(first, Some(("aaaa".to_string(), 0)));
        assert_eq!(walk.next(0), None);
        assert_eq!(walk.cost_limit(), 0);
    }

    #[test]
    fn compound_words_cost_a_separator() {
        let trie = Trie::from_words(["run", "time"]);
        let opts = SuggestOptions {
            compound_method: CompoundMethod::JoinWords,
            ..options()
        };
        let found = all(&mut EditWalk::new(&trie, "runtime", &opts));
        assert_eq!(found[0], ("run+time".to_string(), SEPARATOR_INSERT_COST));
        assert!(compounds(opts.compound_method));
    }

    #[test]
    fn expired_deadline_yields_nothing() {
        let trie = Trie::from_words(["walk"]);
        let mut walk = EditWalk::new(&trie, "walk", &options()).with_deadline(Instant::now());
        assert_eq!(walk.next(u32::MAX), None);
    }

    #[test]
    fn empty_word_only_matches_short_words() {
        let trie = Trie::from_words(["a", "ab"]);
        let found = all(&mut EditWalk::new(&trie, "", &options()));
        assert!(found.is_empty());
    }
}
