// Suggestion collection: cost budget, deduplication, ranking and timeout

use std::time::{Duration, Instant};

use hashbrown::HashMap;
use lexi_core::suggestion::{SuggestionResult, compare_results};

use crate::SuggestOptions;

/// Cost of one ordinary edit.
pub const BASE_COST: u32 = 100;

/// Extra cost for a suggested word of each length: very short words are
/// rarely what was meant.
const WORD_LENGTH_COST: [u32; 5] = [0, 50, 25, 5, 0];

/// Extra cost for each additional word in a compound suggestion.
const EXTRA_WORD_COST: u32 = 5;

/// The collector's initial budget: a bit over half an edit per letter of
/// the input, capped by the change limit.
fn initial_max_cost(word: &str, change_limit: usize) -> u32 {
    let letters = u32::try_from(word.chars().count()).unwrap_or(u32::MAX);
    let scaled = letters.saturating_mul(BASE_COST).saturating_mul(103) / 200;
    let changes = u32::try_from(change_limit).unwrap_or(u32::MAX);
    scaled.min(changes.saturating_mul(BASE_COST))
}

/// A source of suggestions that can be driven by a collector.
///
/// `max_cost` is the collector's current budget; results above it are
/// discarded anyway, so a generator uses it to prune its search.
pub trait SuggestionGenerator {
    fn next_suggestion(&mut self, max_cost: u32) -> Option<SuggestionResult>;

    /// Stop searching once `deadline` passes.
    fn set_deadline(&mut self, _deadline: Instant) {}
}

type FilterFn<'f> = Box<dyn Fn(&str, u32) -> bool + 'f>;

/// Accumulates suggestions for one word, keeping the best
/// `num_suggestions` (plus ties) and tightening its cost budget as better
/// candidates arrive.
pub struct SuggestionCollector<'f> {
    word: String,
    num_suggestions: usize,
    change_limit: usize,
    include_ties: bool,
    ignore_case: bool,
    max_cost: u32,
    time_remaining: Duration,
    filter: Option<FilterFn<'f>>,
    found: HashMap<String, SuggestionResult>,
}

impl<'f> SuggestionCollector<'f> {
    pub fn new(word: &str, options: &SuggestOptions) -> Self {
        Self {
            word: word.to_string(),
            num_suggestions: options.num_suggestions,
            change_limit: options.num_changes,
            include_ties: options.include_ties,
            ignore_case: options.ignore_case,
            max_cost: initial_max_cost(word, options.num_changes),
            time_remaining: options.timeout,
            filter: None,
            found: HashMap::new(),
        }
    }

    /// Only accept suggestions for which `filter(word, cost)` holds.
    pub fn with_filter(mut self, filter: impl Fn(&str, u32) -> bool + 'f) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn max_cost(&self) -> u32 {
        self.max_cost
    }

    pub fn max_num_suggestions(&self) -> usize {
        self.num_suggestions
    }

    pub fn change_limit(&self) -> usize {
        self.change_limit
    }

    pub fn includes_ties(&self) -> bool {
        self.include_ties
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Offer one suggestion. Returns the (possibly lowered) budget.
    pub fn add(&mut self, suggestion: SuggestionResult) -> u32 {
        let cost = suggestion.cost + adjustment_cost(&suggestion.word);
        if cost > self.max_cost {
            return self.max_cost;
        }
        if let Some(filter) = &self.filter {
            if !filter(&suggestion.word, cost) {
                return self.max_cost;
            }
        }
        match self.found.get_mut(&suggestion.word) {
            Some(known) => {
                known.cost = known.cost.min(cost);
                known.is_preferred |= suggestion.is_preferred;
            }
            None => {
                let word = suggestion.word.clone();
                self.found.insert(word, SuggestionResult { cost, ..suggestion });
                if cost < self.max_cost && self.found.len() > self.num_suggestions {
                    self.drop_max();
                }
            }
        }
        self.max_cost
    }

    /// Lower the budget to the cost of the last suggestion that still fits
    /// and forget everything above it.
    fn drop_max(&mut self) {
        if self.found.len() < 2 || self.num_suggestions == 0 {
            self.found.clear();
            return;
        }
        let sorted = self.sorted();
        self.max_cost = sorted[self.num_suggestions - 1].cost;
        let max_cost = self.max_cost;
        self.found.retain(|_, s| s.cost <= max_cost);
    }

    /// Drive `src` until it is exhausted or the time budget runs out.
    ///
    /// The time budget is shared by all calls on this collector.
    pub fn collect(&mut self, src: &mut dyn SuggestionGenerator) {
        let start = Instant::now();
        let deadline = start + self.time_remaining;
        src.set_deadline(deadline);
        while let Some(suggestion) = src.next_suggestion(self.max_cost) {
            self.add(suggestion);
            if Instant::now() >= deadline {
                log::debug!("suggestion collection for {:?} timed out", self.word);
                break;
            }
        }
        self.time_remaining = self.time_remaining.saturating_sub(start.elapsed());
    }

    fn sorted(&self) -> Vec<SuggestionResult> {
        let mut sorted: Vec<SuggestionResult> = self.found.values().cloned().collect();
        sorted.sort_by(compare_results);
        sorted
    }

    /// The ranked suggestions. Suggestions tied with the last one are kept
    /// when ties are included.
    pub fn suggestions(&self) -> Vec<SuggestionResult> {
        let mut sorted = self.sorted();
        if !self.include_ties && sorted.len() > self.num_suggestions {
            sorted.truncate(self.num_suggestions);
        }
        sorted
    }
}

/// Extra cost for short words and for each word boundary in a compound.
pub fn adjustment_cost(word: &str) -> u32 {
    let mut words = 0u32;
    let mut cost = 0;
    for part in word.split([' ', '+']) {
        words += 1;
        cost += WORD_LENGTH_COST
            .get(part.chars().count())
            .copied()
            .unwrap_or(0);
    }
    cost + (words - 1) * EXTRA_WORD_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(num_suggestions: usize) -> SuggestOptions {
        SuggestOptions {
            num_suggestions,
            include_ties: false,
            ..SuggestOptions::default()
        }
    }

    /// Replays a fixed list, recording every budget it is handed.
    struct Replay {
        results: std::vec::IntoIter<SuggestionResult>,
        budgets: Vec<u32>,
    }

    impl SuggestionGenerator for Replay {
        fn next_suggestion(&mut self, max_cost: u32) -> Option<SuggestionResult> {
            self.budgets.push(max_cost);
            self.results.next()
        }
    }

    #[test]
    fn initial_budget() {
        assert_eq!(initial_max_cost("joyfully", 5), 412);
        assert_eq!(initial_max_cost("joy", 5), 154);
        assert_eq!(initial_max_cost("extraordinarily", 5), 500);
        assert_eq!(initial_max_cost(&"a".repeat(500_000), 5), 500);
        assert_eq!(initial_max_cost(&"a".repeat(500_000), usize::MAX), u32::MAX / 200);
    }

    #[test]
    fn adjustment_for_length_and_compounds() {
        assert_eq!(adjustment_cost("joyful"), 0);
        assert_eq!(adjustment_cost("joy"), 5);
        assert_eq!(adjustment_cost("a"), 50);
        assert_eq!(adjustment_cost("joy full"), 10);
        assert_eq!(adjustment_cost("run+time"), 10);
        assert_eq!(adjustment_cost("shoe+string"), 5);
    }

    #[test]
    fn filter_rejects_words() {
        let mut collector =
            SuggestionCollector::new("joyfully", &options(3)).with_filter(|w, _| w != "joyfully");
        collector.add(SuggestionResult::new("joyfully", 100));
        collector.add(SuggestionResult::new("joyful", 100));
        assert_eq!(collector.suggestions().len(), 1);
    }

    #[test]
    fn duplicates_keep_lowest_cost() {
        let mut collector = SuggestionCollector::new("joyfully", &options(3));
        collector.add(SuggestionResult::new("joyful", 100));
        collector.add(SuggestionResult::new("joyful", 75));
        assert_eq!(collector.suggestions().len(), 1);
        assert_eq!(collector.suggestions()[0].cost, 75);
        for (w, c) in [("joyfuller", 200), ("joyfullest", 300), ("joyfulness", 340), ("joyful", 85)] {
            collector.add(SuggestionResult::new(w, c));
        }
        let found = collector.suggestions();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].cost, 75);
    }

    #[test]
    fn preferred_flag_survives_merging() {
        let mut collector = SuggestionCollector::new("lion", &options(3));
        collector.add(SuggestionResult::preferred("tiger", 1));
        collector.add(SuggestionResult::new("tiger", 100));
        assert_eq!(
            collector.suggestions(),
            vec![SuggestionResult::preferred("tiger", 1)]
        );
    }

    #[test]
    fn collect_tightens_budget() {
        let results = vec![
            SuggestionResult::new("joyfuller", 200),
            SuggestionResult::new("joyfullest", 300),
            SuggestionResult::new("joy", 500),
            SuggestionResult::new("joyfulness", 340),
            SuggestionResult::new("joyfuller", 200),
            SuggestionResult::new("joy full", 285),
            SuggestionResult::new("joyful", 85),
        ];
        let mut src = Replay {
            results: results.into_iter(),
            budgets: Vec::new(),
        };
        let mut collector =
            SuggestionCollector::new("joyfully", &options(3)).with_filter(|w, _| w != "joyfully");
        collector.collect(&mut src);

        let found = collector.suggestions();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].cost, 85);
        // "joy full" costs 295 once the word boundary is charged.
        assert_eq!(src.budgets, vec![412, 412, 412, 412, 412, 412, 300, 295]);
    }

    #[test]
    fn ties_are_kept_when_requested() {
        let opts = SuggestOptions {
            num_suggestions: 1,
            include_ties: true,
            ..SuggestOptions::default()
        };
        let mut collector = SuggestionCollector::new("word", &opts);
        collector.add(SuggestionResult::new("work", 100));
        collector.add(SuggestionResult::new("wore", 100));
        assert_eq!(collector.suggestions().len(), 2);
    }

    #[test]
    fn zero_suggestions_keeps_nothing() {
        let mut collector = SuggestionCollector::new("word", &options(0));
        collector.add(SuggestionResult::new("work", 100));
        assert!(collector.suggestions().is_empty());
    }

    #[test]
    fn exhausted_time_budget_stops_early() {
        let opts = SuggestOptions {
            timeout: Duration::ZERO,
            ..SuggestOptions::default()
        };
        let mut src = Replay {
            results: vec![SuggestionResult::new("a1", 0), SuggestionResult::new("a2", 0)].into_iter(),
            budgets: Vec::new(),
        };
        let mut collector = SuggestionCollector::new("ab", &opts);
        collector.collect(&mut src);
        assert!(collector.suggestions().len() <= 1);
    }
}
