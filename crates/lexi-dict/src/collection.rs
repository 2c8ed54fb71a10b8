// Several dictionaries answering as one

use std::sync::Arc;

use hashbrown::HashSet;
use lexi_core::suggestion::SuggestionResult;
use lexi_suggest::{SuggestOptions, SuggestionCollector};

use crate::DictError;
use crate::dictionary::{CASE_INSENSITIVE_PREFIX, FindResult, SearchOptions, SpellingDictionary};

/// A union of dictionaries.
///
/// A word is known if any member knows it, and forbidden if any member
/// forbids it (unless a member marks it as a no-suggest word).
pub struct Collection {
    name: String,
    source: String,
    dictionaries: Vec<Arc<dyn SpellingDictionary>>,
}

impl Collection {
    /// Members are kept largest first.
    pub fn new(name: impl Into<String>, mut dictionaries: Vec<Arc<dyn SpellingDictionary>>) -> Self {
        dictionaries.sort_by_key(|d| std::cmp::Reverse(d.size()));
        let source = dictionaries
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            name: name.into(),
            source,
            dictionaries,
        }
    }

    pub fn dictionaries(&self) -> &[Arc<dyn SpellingDictionary>] {
        &self.dictionaries
    }

    fn forbidden_in_any(&self, word: &str, ignore_case: bool) -> bool {
        self.dictionaries
            .iter()
            .any(|d| d.is_forbidden(word, ignore_case))
    }
}

impl SpellingDictionary for Collection {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        self.dictionaries.iter().map(|d| d.size()).sum()
    }

    fn is_case_sensitive(&self) -> bool {
        self.dictionaries.iter().any(|d| d.is_case_sensitive())
    }

    fn contains_no_suggest_words(&self) -> bool {
        self.dictionaries
            .iter()
            .any(|d| d.contains_no_suggest_words())
    }

    fn has(&self, word: &str, options: &SearchOptions) -> bool {
        self.dictionaries.iter().any(|d| d.has(word, options))
    }

    /// The first member's spelling of `word`, flagged across all members.
    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult> {
        let found = self.dictionaries.iter().find_map(|d| d.find(word, options))?;
        Some(FindResult {
            forbidden: self.is_forbidden(word, false),
            no_suggest: self.is_no_suggest_word(word, options),
            ..found
        })
    }

    fn is_forbidden(&self, word: &str, ignore_case: bool) -> bool {
        let options = SearchOptions { ignore_case };
        self.forbidden_in_any(word, ignore_case) && !self.is_no_suggest_word(word, &options)
    }

    fn is_no_suggest_word(&self, word: &str, options: &SearchOptions) -> bool {
        self.contains_no_suggest_words()
            && self
                .dictionaries
                .iter()
                .any(|d| d.is_no_suggest_word(word, options))
    }

    fn gen_suggestions(&self, collector: &mut SuggestionCollector<'_>, options: &SuggestOptions) {
        for d in &self.dictionaries {
            d.gen_suggestions(collector, options);
        }
    }

    fn suggest(&self, word: &str, options: &SuggestOptions) -> Vec<SuggestionResult> {
        let search = SearchOptions {
            ignore_case: options.ignore_case,
        };
        let ignore_case = options.ignore_case;
        let filter = |w: &str, _cost: u32| {
            (ignore_case || !w.starts_with(CASE_INSENSITIVE_PREFIX))
                && !self.is_forbidden(w, false)
                && !self.is_no_suggest_word(w, &search)
        };
        let mut collector = SuggestionCollector::new(word, options).with_filter(filter);
        self.gen_suggestions(&mut collector, options);
        collector.suggestions()
    }

    /// Preferred suggestions of every member, first occurrence of each word.
    fn get_preferred_suggestions(&self, word: &str) -> Vec<SuggestionResult> {
        let mut seen = HashSet::new();
        self.dictionaries
            .iter()
            .flat_map(|d| d.get_preferred_suggestions(word))
            .filter(|s| seen.insert(s.word.clone()))
            .collect()
    }

    fn errors(&self) -> Vec<&DictError> {
        self.dictionaries.iter().flat_map(|d| d.errors()).collect()
    }
}

// ---------------------------------------------------------------------------
// Failed loads
// ---------------------------------------------------------------------------

/// Stands in for a dictionary that failed to load.
///
/// It knows no words and reports its error through `errors()`, so the rest
/// of a collection keeps working.
pub struct ErrorDictionary {
    name: String,
    source: String,
    error: DictError,
}

impl ErrorDictionary {
    pub fn new(name: impl Into<String>, source: impl Into<String>, error: DictError) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            error,
        }
    }

    pub fn error(&self) -> &DictError {
        &self.error
    }
}

impl SpellingDictionary for ErrorDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        0
    }

    fn has(&self, _word: &str, _options: &SearchOptions) -> bool {
        false
    }

    fn find(&self, _word: &str, _options: &SearchOptions) -> Option<FindResult> {
        None
    }

    fn is_forbidden(&self, _word: &str, _ignore_case: bool) -> bool {
        false
    }

    fn is_no_suggest_word(&self, _word: &str, _options: &SearchOptions) -> bool {
        false
    }

    fn errors(&self) -> Vec<&DictError> {
        vec![&self.error]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie_dict::{DictionaryOptions, TrieDictionary};
    use crate::word_sets::{IgnoreWordsDictionary, SuggestDictionary};

    fn words(name: &str, list: &[&str]) -> Arc<dyn SpellingDictionary> {
        shared(TrieDictionary::from_words(
            name,
            "inline",
            list,
            DictionaryOptions::default(),
        ))
    }

    fn shared(d: impl SpellingDictionary + 'static) -> Arc<dyn SpellingDictionary> {
        Arc::new(d)
    }

    fn sample() -> Collection {
        Collection::new(
            "sample",
            vec![
                words("fruit", &["apple", "banana", "pear"]),
                words("flags", &["!pear"]),
                shared(SuggestDictionary::new("sugs", "inline", ["red:green", "up:down"])),
            ],
        )
    }

    #[test]
    fn forbidden_wins_over_allowed() {
        let c = sample();
        let opts = SearchOptions::default();
        assert!(c.has("apple", &opts));
        assert!(c.has("pear", &opts));
        assert!(c.is_forbidden("pear", false));
        assert!(!c.is_forbidden("apple", false));
        assert!(!c.has("cherry", &opts));
    }

    #[test]
    fn find_reports_flags_from_every_member() {
        let c = sample();
        let opts = SearchOptions::default();
        let pear = c.find("pear", &opts).unwrap();
        assert_eq!(pear.found, "pear");
        assert!(pear.forbidden);
        assert!(!pear.no_suggest);
        assert!(!c.find("apple", &opts).unwrap().forbidden);
        assert_eq!(c.find("cherry", &opts), None);

        let c = Collection::new(
            "c",
            vec![
                words("words", &["todo", "done"]),
                shared(IgnoreWordsDictionary::new("ignore", "inline", ["todo"])),
            ],
        );
        assert!(c.find("todo", &opts).unwrap().no_suggest);
        assert!(!c.find("done", &opts).unwrap().no_suggest);
    }

    #[test]
    fn members_sorted_by_size() {
        let c = sample();
        let sizes: Vec<usize> = c.dictionaries().iter().map(|d| d.size()).collect();
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(c.size(), sizes.iter().sum::<usize>());
        assert_eq!(c.source(), "fruit, sugs, flags");
    }

    #[test]
    fn suggestions_merge_members_and_skip_forbidden() {
        let c = sample();
        let found = c.suggest("peat", &SuggestOptions::default());
        assert!(!found.iter().any(|s| s.word == "pear"));

        let found = c.suggest("red", &SuggestOptions::default());
        assert!(found.iter().any(|s| s.word == "green"));
    }

    #[test]
    fn no_suggest_members_lift_forbidden() {
        let c = Collection::new(
            "c",
            vec![
                words("flags", &["!todo"]),
                shared(IgnoreWordsDictionary::new("ignore", "inline", ["todo"])),
            ],
        );
        assert!(!c.is_forbidden("todo", false));
        assert!(c.is_no_suggest_word("todo", &SearchOptions::default()));
    }

    #[test]
    fn preferred_suggestions_are_unique() {
        let c = Collection::new(
            "c",
            vec![
                shared(SuggestDictionary::new("a", "inline", ["lion:tiger"])),
                shared(SuggestDictionary::new("b", "inline", ["lion:tiger"])),
            ],
        );
        assert_eq!(
            c.get_preferred_suggestions("lion"),
            vec![SuggestionResult::preferred("tiger", 1)]
        );
    }

    #[test]
    fn errors_are_collected() {
        let missing = DictError::MissingSource {
            name: "broken".into(),
        };
        let c = Collection::new(
            "c",
            vec![
                words("fruit", &["apple"]),
                shared(ErrorDictionary::new("broken", "nowhere", missing)),
            ],
        );
        assert_eq!(c.errors().len(), 1);
        assert!(c.has("apple", &SearchOptions::default()));
    }
}
