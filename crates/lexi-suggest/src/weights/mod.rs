// Weighted edit-cost maps
//
// A `WeightMap` holds three tries of costs built from map definitions:
//
//   ins_del   substring -> cost of inserting or deleting it
//   replace   substring -> substring -> cost of replacing one with the other
//   swap      substring -> substring -> cost of swapping the two when adjacent
//
// Costs are minimised and penalties maximised when definitions overlap.
// Positions handed to the `calc_*` functions index into `^word$`, so map
// entries can anchor to the start or end of a word.

pub mod hunspell;
pub mod info;
pub mod parse;

use hashbrown::HashMap;
use regex::Regex;
use serde::Deserialize;

use crate::SuggestError;

pub use hunspell::map_hunspell_information;
pub use info::{CharacterSet, CharacterSetCosts, DictionaryInformation, HunspellInformation, PatternAdjustment};
pub use parse::{
    EditCosts, calc_first_character_replace, parse_accents, parse_alphabet, split_map_substrings,
};

/// One weighted-map definition, as found in dictionary configuration.
///
/// `map` lists sets of interchangeable items separated by `|`; a multi-char
/// item is wrapped in parentheses, e.g. `"aeiou|(ph)f"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCostMapDef {
    pub map: String,
    #[serde(default)]
    pub replace: Option<u32>,
    #[serde(default)]
    pub ins_del: Option<u32>,
    #[serde(default)]
    pub swap: Option<u32>,
    #[serde(default)]
    pub penalty: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A cost node: the cost (and penalty) of the path leading here.
#[derive(Debug, Clone, Default)]
pub struct TrieCost {
    c: Option<u32>,
    p: Option<u32>,
    n: HashMap<char, TrieCost>,
}

/// A trie of left-hand substrings, each holding a [`TrieCost`] of
/// right-hand substrings.
#[derive(Debug, Clone, Default)]
pub struct TrieTrieCost {
    n: HashMap<char, TrieTrieCost>,
    t: Option<TrieCost>,
}

/// A penalty added once per match of `regex` in a candidate word.
#[derive(Debug, Clone)]
pub struct PenaltyAdjustment {
    pub id: String,
    pub regex: Regex,
    pub penalty: u32,
}

/// An alignment point between two strings during weighted distance search.
///
/// `a` and `b` are the full character sequences; `ai` and `bi` are offsets
/// into them. `c` is the accumulated cost and `p` the accumulated penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostPosition<'s> {
    pub a: &'s [char],
    pub ai: usize,
    pub b: &'s [char],
    pub bi: usize,
    pub c: u32,
    pub p: u32,
}

/// Substitution, insertion/deletion and swap cost tables.
#[derive(Debug, Clone, Default)]
pub struct WeightMap {
    ins_del: TrieCost,
    replace: TrieTrieCost,
    swap: TrieTrieCost,
    adjustments: Vec<PenaltyAdjustment>,
}

fn lowest(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn highest(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Characters that separate compounded words; all map to `'+'`.
fn normalize_map(map: &str) -> String {
    map.chars()
        .map(|c| match c {
            '∙' | '•' | '・' | '●' => '+',
            c => c,
        })
        .collect()
}

/// Split a map into its `|`-separated sets, dropping empty ones.
pub(crate) fn split_map(map: &str) -> Vec<Vec<String>> {
    map.split('|')
        .map(split_map_substrings)
        .filter(|set| !set.is_empty())
        .collect()
}

impl TrieCost {
    fn add(&mut self, s: &[char], cost: u32, penalty: Option<u32>) {
        if s.is_empty() {
            return;
        }
        let mut t = self;
        for &c in s {
            t = t.n.entry(c).or_default();
        }
        t.c = lowest(t.c, Some(cost));
        t.p = highest(t.p, penalty);
    }

    /// Every prefix of `s[i..]` that carries a cost, as `(end, cost, penalty)`.
    fn prefixes(&self, s: &[char], i: usize) -> Vec<(usize, u32, u32)> {
        let mut out = Vec::new();
        let mut t = self;
        for (end, c) in s.iter().enumerate().skip(i) {
            let Some(next) = t.n.get(c) else {
                break;
            };
            if let Some(cost) = next.c {
                out.push((end + 1, cost, next.p.unwrap_or(0)));
            }
            t = next;
        }
        out
    }

    fn get(&self, s: &[char]) -> Option<&TrieCost> {
        let mut t = self;
        for c in s {
            t = t.n.get(c)?;
        }
        Some(t)
    }

    /// Cost plus penalty of exactly `s`, if it is an entry.
    pub(crate) fn total(&self, s: &[char]) -> Option<u32> {
        let t = self.get(s)?;
        t.c.map(|c| c + t.p.unwrap_or(0))
    }

    /// Length of the longest entry.
    pub(crate) fn depth(&self) -> usize {
        self.n.values().map(|t| t.depth() + 1).max().unwrap_or(0)
    }
}

impl TrieTrieCost {
    fn add(&mut self, left: &[char], right: &[char], cost: u32, penalty: Option<u32>) {
        let mut t = self;
        for &c in left {
            t = t.n.entry(c).or_default();
        }
        t.t.get_or_insert_with(TrieCost::default)
            .add(right, cost, penalty);
    }

    /// Every prefix of `s[i..]` that has right-hand costs, as `(end, costs)`.
    fn prefixes(&self, s: &[char], i: usize) -> Vec<(usize, &TrieCost)> {
        let mut out = Vec::new();
        let mut t = self;
        for (end, c) in s.iter().enumerate().skip(i) {
            let Some(next) = t.n.get(c) else {
                break;
            };
            if let Some(costs) = &next.t {
                out.push((end + 1, costs));
            }
            t = next;
        }
        out
    }
}

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from definitions.
    pub fn from_defs<'d>(defs: impl IntoIterator<Item = &'d SuggestionCostMapDef>) -> Self {
        let mut map = Self::new();
        map.add_defs(defs);
        map
    }

    pub fn is_empty(&self) -> bool {
        self.ins_del.n.is_empty()
            && self.replace.n.is_empty()
            && self.swap.n.is_empty()
            && self.adjustments.is_empty()
    }

    pub fn add_defs<'d>(&mut self, defs: impl IntoIterator<Item = &'d SuggestionCostMapDef>) {
        for def in defs {
            self.add_def(def);
        }
    }

    pub fn add_def(&mut self, def: &SuggestionCostMapDef) {
        let map = normalize_map(&def.map);
        for set in split_map(&map) {
            let set: Vec<Vec<char>> = set.iter().map(|s| s.chars().collect()).collect();
            if let Some(cost) = def.ins_del {
                for s in &set {
                    self.ins_del.add(s, cost, def.penalty);
                }
            }
            for (trie, cost) in [(&mut self.replace, def.replace), (&mut self.swap, def.swap)] {
                let Some(cost) = cost else {
                    continue;
                };
                for left in &set {
                    for right in &set {
                        if left != right {
                            trie.add(left, right, cost, def.penalty);
                        }
                    }
                }
            }
        }
    }

    /// Register a penalty adjustment; an adjustment with the same id is
    /// replaced.
    pub fn add_adjustment(&mut self, id: &str, pattern: &str, penalty: u32) -> Result<(), SuggestError> {
        let regex = Regex::new(pattern).map_err(|e| SuggestError::InvalidPattern {
            id: id.to_string(),
            message: e.to_string(),
        })?;
        let adjustment = PenaltyAdjustment {
            id: id.to_string(),
            regex,
            penalty,
        };
        match self.adjustments.iter_mut().find(|a| a.id == id) {
            Some(existing) => *existing = adjustment,
            None => self.adjustments.push(adjustment),
        }
        Ok(())
    }

    /// Positions reachable by deleting a weighted substring of `a` or
    /// inserting one of `b`.
    pub fn calc_ins_del_costs<'s>(&self, pos: CostPosition<'s>) -> Vec<CostPosition<'s>> {
        let mut out = Vec::new();
        for (ai, c, p) in self.ins_del.prefixes(pos.a, pos.ai) {
            out.push(CostPosition {
                ai,
                c: pos.c + c,
                p: pos.p + p,
                ..pos
            });
        }
        for (bi, c, p) in self.ins_del.prefixes(pos.b, pos.bi) {
            out.push(CostPosition {
                bi,
                c: pos.c + c,
                p: pos.p + p,
                ..pos
            });
        }
        out
    }

    /// Positions reachable by replacing a substring starting at `ai` with
    /// one starting at `bi`.
    pub fn calc_replace_costs<'s>(&self, pos: CostPosition<'s>) -> Vec<CostPosition<'s>> {
        let mut out = Vec::new();
        for (ai, costs) in self.replace.prefixes(pos.a, pos.ai) {
            for (bi, c, p) in costs.prefixes(pos.b, pos.bi) {
                out.push(CostPosition {
                    ai,
                    bi,
                    c: pos.c + c,
                    p: pos.p + p,
                    ..pos
                });
            }
        }
        out
    }

    /// Positions reachable by swapping two adjacent substrings of `a` so
    /// that they match `b`.
    pub fn calc_swap_costs<'s>(&self, pos: CostPosition<'s>) -> Vec<CostPosition<'s>> {
        let mut out = Vec::new();
        let (a, b) = (pos.a, pos.b);
        for (mid, costs) in self.swap.prefixes(a, pos.ai) {
            for (end, c, p) in costs.prefixes(a, mid) {
                let swapped = a[mid..end].iter().chain(&a[pos.ai..mid]);
                let len = end - pos.ai;
                if pos.bi + len <= b.len() && swapped.eq(&b[pos.bi..pos.bi + len]) {
                    out.push(CostPosition {
                        ai: pos.ai + len,
                        bi: pos.bi + len,
                        c: pos.c + c,
                        p: pos.p + p,
                        ..pos
                    });
                }
            }
        }
        out
    }

    /// Sum of adjustment penalties for every pattern match in `word`.
    pub fn calc_adjustment(&self, word: &str) -> u32 {
        self.adjustments
            .iter()
            .map(|adj| {
                let matches = u32::try_from(adj.regex.find_iter(word).count()).unwrap_or(u32::MAX);
                adj.penalty.saturating_mul(matches)
            })
            .fold(0u32, u32::saturating_add)
    }

    /// Weighted deletions of a substring of `a` starting at `i`, as
    /// `(end, cost + penalty)`.
    pub(crate) fn deletions_from(&self, a: &[char], i: usize) -> Vec<(usize, u32)> {
        self.ins_del
            .prefixes(a, i)
            .into_iter()
            .map(|(end, c, p)| (end, c + p))
            .collect()
    }

    /// Cost plus penalty of inserting exactly `s`.
    pub(crate) fn insertion_cost(&self, s: &[char]) -> Option<u32> {
        self.ins_del.total(s)
    }

    pub(crate) fn longest_insertion(&self) -> usize {
        self.ins_del.depth()
    }

    /// Substrings of `a` starting at `i` that have replacements, as
    /// `(end, replacements)`.
    pub(crate) fn replacements_from(&self, a: &[char], i: usize) -> Vec<(usize, &TrieCost)> {
        self.replace.prefixes(a, i)
    }

    /// Weighted swaps of two adjacent substrings of `a` starting at `i`, as
    /// `(end, swapped text, cost + penalty)`.
    pub(crate) fn swaps_from(&self, a: &[char], i: usize) -> Vec<(usize, Vec<char>, u32)> {
        let mut out = Vec::new();
        for (mid, costs) in self.swap.prefixes(a, i) {
            for (end, c, p) in costs.prefixes(a, mid) {
                let swapped = a[mid..end].iter().chain(&a[i..mid]).copied().collect();
                out.push((end, swapped, c + p));
            }
        }
        out
    }

    /// The cost of replacing `a` with `b` as whole map items, if defined.
    pub fn lookup_replace_cost(&self, a: &str, b: &str) -> Option<u32> {
        let mut t = &self.replace;
        for c in a.chars() {
            t = t.n.get(&c)?;
        }
        let right: Vec<char> = b.chars().collect();
        t.t.as_ref()?.get(&right)?.c
    }

    /// The cost of inserting or deleting `s` as a whole map item, if defined.
    pub fn lookup_ins_del_cost(&self, s: &str) -> Option<u32> {
        let s: Vec<char> = s.chars().collect();
        self.ins_del.get(&s)?.c
    }
}
