// The dictionary interface shared by every word source

use lexi_core::suggestion::SuggestionResult;
use lexi_suggest::{SuggestOptions, SuggestionCollector};

use crate::DictError;

/// Word-list prefix marking a forbidden word.
pub const FORBIDDEN_PREFIX: char = '!';

/// Word-list prefix marking a case- and accent-insensitive form.
pub const CASE_INSENSITIVE_PREFIX: char = '~';

/// Whether a stored entry carries a forbidden or case-insensitive marker
/// in any of its compound parts.
pub fn is_marked(word: &str) -> bool {
    word.split([' ', '+'])
        .any(|part| part.starts_with([FORBIDDEN_PREFIX, CASE_INSENSITIVE_PREFIX]))
}

/// Options for membership lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Accept case and accent variants of the word.
    pub ignore_case: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { ignore_case: true }
    }
}

/// Detailed lookup result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindResult {
    /// The stored form that matched.
    pub found: String,
    pub forbidden: bool,
    pub no_suggest: bool,
}

/// A source of words that can answer membership and suggestion queries.
///
/// Dictionaries are immutable once built and may be shared between threads.
pub trait SpellingDictionary: Send + Sync {
    fn name(&self) -> &str;

    /// Where the words came from, for diagnostics.
    fn source(&self) -> &str;

    /// Number of entries.
    fn size(&self) -> usize;

    fn is_case_sensitive(&self) -> bool {
        false
    }

    /// Whether `is_no_suggest_word` can ever be true.
    fn contains_no_suggest_words(&self) -> bool {
        false
    }

    fn has(&self, word: &str, options: &SearchOptions) -> bool;

    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult>;

    fn is_forbidden(&self, word: &str, ignore_case: bool) -> bool;

    fn is_no_suggest_word(&self, word: &str, options: &SearchOptions) -> bool;

    /// Feed candidate suggestions for the collector's word.
    fn gen_suggestions(&self, _collector: &mut SuggestionCollector<'_>, _options: &SuggestOptions) {}

    /// Ranked suggestions for `word`.
    fn suggest(&self, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult> {
        let mut collector = SuggestionCollector::new(word, options);
        self.gen_suggestions(&mut collector, options);
        collector.suggestions()
    }

    /// Explicit replacements configured for `word`.
    fn get_preferred_suggestions(&self, _word: &str) -> Vec<SuggestionResult> {
        Vec::new()
    }

    /// Errors collected while loading.
    fn errors(&self) -> Vec<&DictError> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_entries() {
        assert!(is_marked("!pear"));
        assert!(is_marked("~apple"));
        assert!(is_marked("run+~time"));
        assert!(!is_marked("apple"));
        assert!(!is_marked("wow!"));
    }
}
