// Set-backed dictionaries: forbidden words, ignored words, suggestion maps
//
// Suggestion map entries are written `word:suggestion` or `word->suggestion`;
// several suggestions are separated by commas. An entry with a single
// suggestion is preferred (safe to apply automatically).

use hashbrown::{HashMap, HashSet};
use lexi_core::case::{normalize_ignore_case, to_lower};
use lexi_core::suggestion::SuggestionResult;
use lexi_suggest::{SuggestOptions, SuggestionCollector};

use crate::dictionary::{
    CASE_INSENSITIVE_PREFIX, FORBIDDEN_PREFIX, FindResult, SearchOptions, SpellingDictionary,
};

/// Words mapped to their replacements.
#[derive(Debug, Clone, Default)]
pub struct TyposDef {
    entries: HashMap<String, Vec<String>>,
}

impl TyposDef {
    /// Parse `word`, `word:a,b` and `word->a` lines. Blank lines and `#`
    /// comments are skipped.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: HashMap<String, Vec<String>> = HashMap::new();
        for line in lines {
            let Some((word, suggestions)) = parse_entry(line.as_ref()) else {
                continue;
            };
            let slot = entries.entry(word).or_default();
            for s in suggestions {
                if !slot.contains(&s) {
                    slot.push(s);
                }
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Replacements for `word`, falling back to its lower-case form.
    pub fn lookup(&self, word: &str) -> Option<&[String]> {
        self.entries
            .get(word)
            .or_else(|| self.entries.get(&to_lower(word)))
            .map(Vec::as_slice)
    }

    /// Every replacement word.
    pub fn all_suggestions(&self) -> HashSet<String> {
        self.entries.values().flatten().cloned().collect()
    }

    /// Replacements for `word` as ranked results.
    pub fn results(&self, word: &str) -> Vec<SuggestionResult> {
        match self.lookup(word) {
            Some([only]) => vec![SuggestionResult::preferred(only.clone(), 1)],
            Some(many) => many
                .iter()
                .enumerate()
                .map(|(i, s)| SuggestionResult::new(s.clone(), i as u32 + 1))
                .collect(),
            None => Vec::new(),
        }
    }
}

fn parse_entry(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (word, rest) = match line.split_once("->") {
        Some(pair) => pair,
        None => line.split_once(':').unwrap_or((line, "")),
    };
    let word = word.trim().trim_start_matches(FORBIDDEN_PREFIX);
    if word.is_empty() {
        return None;
    }
    let suggestions = rest
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    Some((word.to_string(), suggestions))
}

// ---------------------------------------------------------------------------
// Forbidden words
// ---------------------------------------------------------------------------

/// A list of words that must not be used, optionally with replacements.
///
/// It never "has" a word; it only answers `is_forbidden`.
pub struct FlagWordsDictionary {
    name: String,
    source: String,
    typos: TyposDef,
    folded: HashSet<String>,
}

impl FlagWordsDictionary {
    pub fn new<I, S>(name: impl Into<String>, source: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let typos = TyposDef::parse(lines);
        let folded = typos.entries.keys().map(|w| normalize_ignore_case(w)).collect();
        Self {
            name: name.into(),
            source: source.into(),
            typos,
            folded,
        }
    }
}

impl SpellingDictionary for FlagWordsDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        self.typos.len()
    }

    fn is_case_sensitive(&self) -> bool {
        true
    }

    fn has(&self, _word: &str, _options: &SearchOptions) -> bool {
        false
    }

    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult> {
        self.is_forbidden(word, options.ignore_case).then(|| FindResult {
            found: word.to_string(),
            forbidden: true,
            no_suggest: false,
        })
    }

    fn is_forbidden(&self, word: &str, ignore_case: bool) -> bool {
        self.typos.lookup(word).is_some()
            || (ignore_case && self.folded.contains(&normalize_ignore_case(word)))
    }

    fn is_no_suggest_word(&self, _word: &str, _options: &SearchOptions) -> bool {
        false
    }

    fn gen_suggestions(&self, collector: &mut SuggestionCollector<'_>, _options: &SuggestOptions) {
        for result in self.typos.results(collector.word()) {
            collector.add(result);
        }
    }

    fn get_preferred_suggestions(&self, word: &str) -> Vec<SuggestionResult> {
        self.typos.results(word)
    }
}

// ---------------------------------------------------------------------------
// Ignored words
// ---------------------------------------------------------------------------

/// Words that are accepted but never suggested.
///
/// A `~word` entry is only accepted when case is ignored.
pub struct IgnoreWordsDictionary {
    name: String,
    source: String,
    words: HashSet<String>,
    non_strict: HashSet<String>,
}

impl IgnoreWordsDictionary {
    pub fn new<I, S>(name: impl Into<String>, source: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        let non_strict = words
            .iter()
            .filter_map(|w| w.strip_prefix(CASE_INSENSITIVE_PREFIX))
            .map(normalize_ignore_case)
            .collect();
        Self {
            name: name.into(),
            source: source.into(),
            words,
            non_strict,
        }
    }

    fn matched(&self, word: &str, ignore_case: bool) -> Option<String> {
        if self.words.contains(word) {
            return Some(word.to_string());
        }
        let lower = to_lower(word);
        if self.words.contains(&lower) {
            return Some(lower);
        }
        let folded = normalize_ignore_case(word);
        (ignore_case && self.non_strict.contains(&folded))
            .then(|| format!("{CASE_INSENSITIVE_PREFIX}{folded}"))
    }
}

impl SpellingDictionary for IgnoreWordsDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        self.words.len()
    }

    fn is_case_sensitive(&self) -> bool {
        true
    }

    fn contains_no_suggest_words(&self) -> bool {
        true
    }

    fn has(&self, word: &str, options: &SearchOptions) -> bool {
        self.matched(word, options.ignore_case).is_some()
    }

    fn find(&self, word: &str, options: &SearchOptions) -> Option<FindResult> {
        self.matched(word, options.ignore_case).map(|found| FindResult {
            found,
            forbidden: false,
            no_suggest: true,
        })
    }

    fn is_forbidden(&self, _word: &str, _ignore_case: bool) -> bool {
        false
    }

    fn is_no_suggest_word(&self, word: &str, options: &SearchOptions) -> bool {
        self.has(word, options)
    }
}

// ---------------------------------------------------------------------------
// Suggestion maps
// ---------------------------------------------------------------------------

/// Explicit `word:replacement` mappings.
pub struct SuggestDictionary {
    name: String,
    source: String,
    typos: TyposDef,
    suggestions: HashSet<String>,
    suggestions_folded: HashSet<String>,
}

impl SuggestDictionary {
    pub fn new<I, S>(name: impl Into<String>, source: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let typos = TyposDef::parse(lines);
        let suggestions = typos.all_suggestions();
        let suggestions_folded = suggestions.iter().map(|s| normalize_ignore_case(s)).collect();
        Self {
            name: name.into(),
            source: source.into(),
            typos,
            suggestions,
            suggestions_folded,
        }
    }

    /// Whether `word` appears as a replacement.
    pub fn is_suggested_word(&self, word: &str, ignore_case: bool) -> bool {
        self.suggestions.contains(word)
            || (ignore_case && self.suggestions_folded.contains(&normalize_ignore_case(word)))
    }
}

impl SpellingDictionary for SuggestDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn size(&self) -> usize {
        self.typos.len()
    }

    fn is_case_sensitive(&self) -> bool {
        true
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

    fn gen_suggestions(&self, collector: &mut SuggestionCollector<'_>, _options: &SuggestOptions) {
        for result in self.typos.results(collector.word()) {
            collector.add(result);
        }
    }

    fn suggest(&self, word: &str, _options: &SuggestOptions) -> Vec<SuggestionResult> {
        self.typos.results(word)
    }

    fn get_preferred_suggestions(&self, word: &str) -> Vec<SuggestionResult> {
        self.typos.results(word)
    }
}
