// Dictionary backed by a consolidated trie
//
// Entries are stored verbatim. A forbidden word is stored as `!word`, and
// every plain word also gets a `~` entry holding its lower-case,
// accent-free form so that case-insensitive lookups are a single lookup.

use std::time::Instant;

use lexi_core::case::{CaseType, apply_case, detect_case, normalize_ignore_case, to_lower};
use lexi_core::suggestion::SuggestionResult;
use lexi_suggest::{EditWalk, SuggestOptions, SuggestionCollector, SuggestionGenerator, WeightMap};
use lexi_trie::{CompoundMethod, Trie, consolidate};

use crate::dictionary::{
    CASE_INSENSITIVE_PREFIX, FORBIDDEN_PREFIX, FindResult, SearchOptions, SpellingDictionary,
    is_marked,
};

/// How a word list is interpreted.
#[derive(Debug, Clone, Default)]
pub struct DictionaryOptions {
    /// Distinguish `Apple` from `apple` unless a lookup ignores case.
    pub case_sensitive: bool,
    /// Words are accepted but never suggested.
    pub no_suggest: bool,
    /// Let suggestions join dictionary words with `+`.
    pub use_compounds: bool,
    pub weights: Option<WeightMap>,
}

/// The trie entries for one word-list line.
fn stored_entries(word: &str) -> Vec<String> {
    if word.starts_with([FORBIDDEN_PREFIX, CASE_INSENSITIVE_PREFIX]) {
        return vec![word.to_string()];
    }
    let folded = normalize_ignore_case(word);
    if folded == word {
        vec![word.to_string()]
    } else {
        vec![word.to_string(), format!("{CASE_INSENSITIVE_PREFIX}{folded}")]
    }
}

fn push_unique(forms: &mut Vec<String>, form: String) {
    if !forms.contains(&form) {
        forms.push(form);
    }
}

pub struct TrieDictionary {
    name: String,
    source: String,
    trie: Trie,
    size: usize,
    options: DictionaryOptions,
}

impl TrieDictionary {
    /// Build from word-list entries. `!word` entries are forbidden, `~word`
    /// entries only match when case is ignored.
    pub fn from_words<I, S>(
        name: impl Into<String>,
        source: impl Into<String>,
        words: I,
        options: DictionaryOptions,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Trie::new();
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            for entry in stored_entries(word) {
                trie.insert(&entry);
            }
        }
        Self::from_trie(name, source, trie, options)
    }

    /// Wrap an existing trie, consolidating it if needed.
    pub fn from_trie(
        name: impl Into<String>,
        source: impl Into<String>,
        trie: Trie,
        options: DictionaryOptions,
    ) -> Self {
        let trie = if trie.is_consolidated() {
            trie
        } else {
            consolidate(&trie)
        };
        let name = name.into();
        let size = trie.count_words();
        log::debug!(
            "dictionary {name}: {size} entries, {} nodes",
            trie.count_nodes()
        );
        Self {
            name,
            source: source.into(),
            trie,
            size,
            options,
        }
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Every stored entry, markers included, in lexicographic order.
    pub fn words(&self) -> Vec<String> {
        self.trie.words()
    }

    fn search_forms(&self, word: &str, ignore_case: bool) -> Vec<String> {
        let mut forms = vec![word.to_string()];
        let lower = to_lower(word);
        if self.options.case_sensitive && !ignore_case && detect_case(word) == CaseType::AllUpper {
            // HOUSE may be written for House.
            push_unique(&mut forms, apply_case(&lower, CaseType::FirstUpper));
        }
        push_unique(&mut forms, lower);
        if ignore_case || !self.options.case_sensitive {
            let folded = normalize_ignore_case(word);
            push_unique(&mut forms, format!("{CASE_INSENSITIVE_PREFIX}{folded}"));
        }
        forms
    }

    fn lookup(&self, word: &str, ignore_case: bool) -> Option<String> {
        if word.is_empty() || word.starts_with([FORBIDDEN_PREFIX, CASE_INSENSITIVE_PREFIX]) {
            return None;
        }
        self.search_forms(word, ignore_case)
            .into_iter()
            .find(|form| self.trie.has(form))
    }

    fn compound_method(&self, options: &SuggestOptions) -> CompoundMethod {
        if self.options.use_compounds {
            CompoundMethod::JoinWords
        } else {
            options.compound_method
        }
    }
}

impl SpellingDictionary for TrieDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        self.size
    }

    fn is_case_sensitive(&self) -> bool {
        self.options.case_sensitive
    }

    fn contains_no_suggest_words(&self) -> bool {
        self.options.no_suggest
    }

    fn has(&self, word: &str, options: &SearchOptions) -> bool {
        self.lookup(word, options.ignore_case).is_some()
    }

    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult> {
        let forbidden = self.is_forbidden(word, false);
        match self.lookup(word, options.ignore_case) {
            Some(found) => Some(FindResult {
                found,
                forbidden,
                no_suggest: self.options.no_suggest,
            }),
            None if forbidden => Some(FindResult {
                found: word.to_string(),
                forbidden,
                no_suggest: false,
            }),
            None => None,
        }
    }

    fn is_forbidden(&self, word: &str, ignore_case: bool) -> bool {
        if self.trie.has(&format!("{FORBIDDEN_PREFIX}{word}")) {
            return true;
        }
        ignore_case && self.trie.has(&format!("{FORBIDDEN_PREFIX}{}", to_lower(word)))
    }

    fn is_no_suggest_word(&self, word: &str, options: &SearchOptions) -> bool {
        self.options.no_suggest && self.has(word, options)
    }

    fn gen_suggestions(&self, collector: &mut SuggestionCollector<'_>, options: &SuggestOptions) {
        if self.options.no_suggest {
            return;
        }
        let opts = SuggestOptions {
            compound_method: self.compound_method(options),
            ..options.clone()
        };
        let word = collector.word().to_string();
        let mut forms = vec![word.clone()];
        push_unique(&mut forms, to_lower(&word));
        for form in &forms {
            let mut walk = EditWalk::new(&self.trie, form, &opts);
            if let Some(weights) = &self.options.weights {
                walk = walk.with_weights(weights);
            }
            collector.collect(&mut PlainWords(walk));
        }
    }
}

/// Hides marker entries from a suggestion source.
struct PlainWords<G>(G);

impl<G: SuggestionGenerator> SuggestionGenerator for PlainWords<G> {
    fn next_suggestion(&mut self, max_cost: u32) -> Option<SuggestionResult> {
        loop {
            let found = self.0.next_suggestion(max_cost)?;
            if !is_marked(&found.word) {
                return Some(found);
            }
        }
    }

    fn set_deadline(&mut self, deadline: Instant) {
        self.0.set_deadline(deadline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(words: &[&str], case_sensitive: bool) -> TrieDictionary {
        let options = DictionaryOptions {
            case_sensitive,
            ..DictionaryOptions::default()
        };
        TrieDictionary::from_words("test", "inline", words, options)
    }

    const STRICT: SearchOptions = SearchOptions { ignore_case: false };
    const LOOSE: SearchOptions = SearchOptions { ignore_case: true };

    #[test]
    fn stored_forms() {
        assert_eq!(stored_entries("apple"), vec!["apple"]);
        assert_eq!(stored_entries("Café"), vec!["Café", "~cafe"]);
        assert_eq!(stored_entries("!pear"), vec!["!pear"]);
    }

    #[test]
    fn case_insensitive_dictionary() {
        let d = dict(&["Paris", "café", "apple"], false);
        assert!(d.has("apple", &STRICT));
        assert!(d.has("Apple", &STRICT));
        assert!(d.has("APPLE", &STRICT));
        assert!(d.has("paris", &STRICT));
        assert!(d.has("cafe", &STRICT));
        assert!(!d.has("pear", &LOOSE));
        assert_eq!(d.size(), 5);
    }

    #[test]
    fn case_sensitive_dictionary() {
        let d = dict(&["Paris", "café", "house"], true);
        assert!(d.has("Paris", &STRICT));
        assert!(d.has("PARIS", &STRICT));
        assert!(!d.has("paris", &STRICT));
        assert!(d.has("paris", &LOOSE));
        assert!(d.has("HOUSE", &STRICT));
        assert!(!d.has("cafe", &STRICT));
        assert!(d.has("cafe", &LOOSE));
    }

    #[test]
    fn forbidden_entries() {
        let d = dict(&["apple", "!pear", "!Grape"], false);
        assert!(d.is_forbidden("pear", false));
        assert!(!d.has("pear", &LOOSE));
        assert!(!d.has("!pear", &LOOSE));
        assert!(!d.is_forbidden("grape", false));
        assert!(d.is_forbidden("Grape", false));
        let found = d.find("pear", &LOOSE).unwrap();
        assert!(found.forbidden);
        assert_eq!(d.find("apple", &LOOSE).unwrap().found, "apple");
        assert_eq!(d.find("kiwi", &LOOSE), None);
    }

    #[test]
    fn explicit_case_insensitive_entries() {
        let d = dict(&["~error"], true);
        assert!(!d.has("error", &STRICT));
        assert!(d.has("Error", &LOOSE));
    }

    #[test]
    fn suggestions_skip_marked_entries() {
        let d = dict(&["apple", "apply", "!appla", "Ample"], false);
        let found = d.suggest("appel", &SuggestOptions::default());
        let words: Vec<&str> = found.iter().map(|r| r.word.as_str()).collect();
        assert!(words.contains(&"apple"));
        assert!(!words.iter().any(|w| is_marked(w)));
    }

    #[test]
    fn weighted_maps_price_suggestions() {
        let weights = WeightMap::from_defs(&[lexi_suggest::SuggestionCostMapDef {
            map: "(ph)f".into(),
            replace: Some(10),
            ..Default::default()
        }]);
        let options = DictionaryOptions {
            weights: Some(weights),
            ..DictionaryOptions::default()
        };
        let d = TrieDictionary::from_words("phonics", "inline", ["phone", "bone"], options);
        let found = d.suggest("fone", &SuggestOptions::default());
        let ranked: Vec<(&str, u32)> = found.iter().map(|r| (r.word.as_str(), r.cost)).collect();
        assert_eq!(ranked, vec![("phone", 10), ("bone", 100)]);
    }

    #[test]
    fn no_suggest_dictionary() {
        let options = DictionaryOptions {
            no_suggest: true,
            ..DictionaryOptions::default()
        };
        let d = TrieDictionary::from_words("ignored", "inline", ["todo"], options);
        assert!(d.is_no_suggest_word("todo", &LOOSE));
        assert!(d.suggest("tod", &SuggestOptions::default()).is_empty());
        assert!(d.find("todo", &LOOSE).unwrap().no_suggest);
    }
}
