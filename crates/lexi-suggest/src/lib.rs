//! Spelling suggestions for the lexi spell checker.
//!
//! Two families of search live here. [`levenshtein`] and
//! [`select_nearest_words`] rank a fixed candidate list. The trie searches
//! ([`EditWalk`] and [`FeatureSearch`]) crawl a dictionary graph with the
//! walker's go-deeper flag and prune every subtree that cannot beat the
//! current bound. Both are resumable: each call hands in a tighter bound.
//!
//! # Architecture
//!
//! - [`distance`] -- Levenshtein distance and nearest-word ranking
//! - [`weights`] -- `WeightMap` cost model, alphabet and Hunspell parsing
//! - [`astar`] -- Weighted edit distance under a `WeightMap`
//! - [`collector`] -- Budget, ranking and timeout for suggestion sources
//! - [`edit_walk`] -- Edit-distance walk over a trie graph
//! - [`features`] -- Best-first bag-of-features search

pub mod astar;
pub mod collector;
pub mod distance;
pub mod edit_walk;
pub mod features;
pub mod weights;

use std::time::Duration;

use lexi_core::suggestion::SuggestionResult;
use lexi_trie::{CompoundMethod, TrieGraph};

pub use astar::{Segment, WeightedDistance, weighted_distance, weighted_distance_ex};
pub use collector::{BASE_COST, SuggestionCollector, SuggestionGenerator, adjustment_cost};
pub use distance::{WordDistance, levenshtein, select_nearest_words};
pub use edit_walk::EditWalk;
pub use features::{FeatureSearch, ScoredWord, best_by_features, feature_score};
pub use weights::{DictionaryInformation, EditCosts, SuggestionCostMapDef, WeightMap};

/// Errors from suggestion setup. Running out of time is not an error.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("number of suggestions must not be negative, got {0}")]
    InvalidSuggestionCount(i64),
    #[error("invalid adjustment pattern {id:?}: {message}")]
    InvalidPattern { id: String, message: String },
}

/// Options for one suggestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestOptions {
    /// Suggestions to return, not counting ties.
    pub num_suggestions: usize,
    /// Maximum number of edits in a suggestion.
    pub num_changes: usize,
    /// Treat case and accent changes as nearly free.
    pub ignore_case: bool,
    pub compound_method: CompoundMethod,
    /// Time budget for the whole search.
    pub timeout: Duration,
    /// Keep suggestions tied with the last one.
    pub include_ties: bool,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            num_suggestions: 8,
            num_changes: 5,
            ignore_case: true,
            compound_method: CompoundMethod::None,
            timeout: Duration::from_millis(1000),
            include_ties: true,
        }
    }
}

impl SuggestOptions {
    /// Default options asking for `count` suggestions.
    pub fn with_count(count: i64) -> Result<Self, SuggestError> {
        let num_suggestions =
            usize::try_from(count).map_err(|_| SuggestError::InvalidSuggestionCount(count))?;
        Ok(Self {
            num_suggestions,
            ..Self::default()
        })
    }
}

/// Ranked suggestions for `word` from the words of `graph`.
///
/// Candidates come from an edit-distance walk, priced by `weights` when
/// given.
pub fn suggest<G: TrieGraph>(
    graph: &G,
    word: &str,
    options: &SuggestOptions,
    weights: Option<&WeightMap>,
) -> Vec<SuggestionResult> {
    let mut collector = SuggestionCollector::new(word, options);
    let mut walk = EditWalk::new(graph, word, options);
    if let Some(map) = weights {
        walk = walk.with_weights(map);
    }
    collector.collect(&mut walk);
    let results = collector.suggestions();
    log::debug!("{} suggestions for {:?}", results.len(), word);
    results
}
