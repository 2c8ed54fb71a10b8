// Suggestion result type shared by the search engine and dictionaries

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A ranked replacement candidate for a misspelled word.
///
/// Lower `cost` is better. `is_preferred` marks a suggestion that came from
/// an explicit `word:replacement` mapping and is safe to apply automatically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResult {
    pub word: String,
    pub cost: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_preferred: bool,
}

impl SuggestionResult {
    pub fn new(word: impl Into<String>, cost: u32) -> Self {
        Self {
            word: word.into(),
            cost,
            is_preferred: false,
        }
    }

    pub fn preferred(word: impl Into<String>, cost: u32) -> Self {
        Self {
            word: word.into(),
            cost,
            is_preferred: true,
        }
    }
}

/// Ranking order: cost, then word length in characters, then the word itself.
pub fn compare_results(a: &SuggestionResult, b: &SuggestionResult) -> Ordering {
    a.cost
        .cmp(&b.cost)
        .then_with(|| a.word.chars().count().cmp(&b.word.chars().count()))
        .then_with(|| a.word.cmp(&b.word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_prefers_cost_then_length() {
        let mut results = vec![
            SuggestionResult::new("apples", 100),
            SuggestionResult::new("ample", 100),
            SuggestionResult::new("apply", 50),
            SuggestionResult::new("amble", 100),
        ];
        results.sort_by(compare_results);
        let words: Vec<_> = results.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, ["apply", "amble", "ample", "apples"]);
    }

    #[test]
    fn preferred_flag_serializes_only_when_set() {
        let plain = serde_json::to_string(&SuggestionResult::new("a", 1));
        let preferred = serde_json::to_string(&SuggestionResult::preferred("b", 1));
        assert_eq!(plain.unwrap(), r#"{"word":"a","cost":1}"#);
        assert_eq!(
            preferred.unwrap(),
            r#"{"word":"b","cost":1,"isPreferred":true}"#
        );
    }
}
