// Memoizing wrapper around a dictionary for one checking session

use lexi_core::cache::{CacheStats, SecondChanceCache};
use lexi_core::suggestion::SuggestionResult;
use lexi_suggest::SuggestOptions;
use serde::Serialize;

use crate::dictionary::{SearchOptions, SpellingDictionary};

/// Cache sizing for [`CachingDictionary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Capacity of each cache's hot generation.
    pub max_l0_size: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { max_l0_size: 1000 }
    }
}

/// Counters for every cached operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachingDictionaryStats {
    pub has: CacheStats,
    pub is_no_suggest_word: CacheStats,
    pub is_forbidden: CacheStats,
    pub get_preferred_suggestions: CacheStats,
}

/// Wraps a dictionary with per-operation caches keyed by the word.
///
/// Lookups take `&mut self`: one instance belongs to one session.
pub struct CachingDictionary<'d> {
    dict: &'d dyn SpellingDictionary,
    options: SearchOptions,
    has: SecondChanceCache<String, bool>,
    no_suggest: SecondChanceCache<String, bool>,
    forbidden: SecondChanceCache<String, bool>,
    preferred: SecondChanceCache<String, Vec<SuggestionResult>>,
}

impl<'d> CachingDictionary<'d> {
    pub fn new(dict: &'d dyn SpellingDictionary, options: SearchOptions) -> Self {
        Self::with_cache_options(dict, options, CacheOptions::default())
    }

    pub fn with_cache_options(
        dict: &'d dyn SpellingDictionary,
        options: SearchOptions,
        cache: CacheOptions,
    ) -> Self {
        Self {
            dict,
            options,
            has: SecondChanceCache::new(cache.max_l0_size),
            no_suggest: SecondChanceCache::new(cache.max_l0_size),
            forbidden: SecondChanceCache::new(cache.max_l0_size),
            preferred: SecondChanceCache::new(cache.max_l0_size),
        }
    }

    pub fn dictionary(&self) -> &'d dyn SpellingDictionary {
        self.dict
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn has(&mut self, word: &str) -> bool {
        let (dict, options) = (self.dict, self.options);
        *self
            .has
            .get_or_insert_with(word.to_string(), |w| dict.has(w, &options))
    }

    pub fn is_no_suggest_word(&mut self, word: &str) -> bool {
        let (dict, options) = (self.dict, self.options);
        *self
            .no_suggest
            .get_or_insert_with(word.to_string(), |w| dict.is_no_suggest_word(w, &options))
    }

    /// Case and accents count when checking for forbidden words.
    pub fn is_forbidden(&mut self, word: &str) -> bool {
        let dict = self.dict;
        *self
            .forbidden
            .get_or_insert_with(word.to_string(), |w| dict.is_forbidden(w, false))
    }

    pub fn get_preferred_suggestions(&mut self, word: &str) -> Vec<SuggestionResult> {
        let dict = self.dict;
        self.preferred
            .get_or_insert_with(word.to_string(), |w| dict.get_preferred_suggestions(w))
            .clone()
    }

    /// Suggestions are not cached.
    pub fn suggest(&self, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult> {
        self.dict.suggest(word, options)
    }

    pub fn stats(&self) -> CachingDictionaryStats {
        CachingDictionaryStats {
            has: self.has.stats(),
            is_no_suggest_word: self.no_suggest.stats(),
            is_forbidden: self.forbidden.stats(),
            get_preferred_suggestions: self.preferred.stats(),
        }
    }

    /// Forget every cached answer and reset the counters.
    pub fn clear(&mut self) {
        self.has.clear();
        self.no_suggest.clear();
        self.forbidden.clear();
        self.preferred.clear();
    }
}
