// Text validation against a dictionary

use lexi_core::suggestion::SuggestionResult;
use lexi_core::text::{split_code_identifier, split_words};
use serde::Serialize;

use crate::caching::CachingDictionary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Shorter words are not checked unless they are forbidden.
    pub min_word_length: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { min_word_length: 4 }
    }
}

/// A word that is unknown or forbidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub text: String,
    /// Byte offset of the word in the checked text.
    pub offset: usize,
    /// The word is forbidden rather than merely unknown.
    pub is_flagged: bool,
    /// Configured replacements for the word.
    pub suggestions_ex: Vec<SuggestionResult>,
}

/// Check every word of `text`, in order of appearance.
///
/// An unknown identifier such as `parseHtmlTable` is accepted when each of
/// its camelCase or snake_case parts is.
pub fn validate_text(
    text: &str,
    dict: &mut CachingDictionary<'_>,
    options: &ValidationOptions,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for span in split_words(text) {
        let word = span.text;
        if let Some(issue) = check_word(word, span.offset, dict, options) {
            let parts = split_code_identifier(word);
            if issue.is_flagged || parts.len() < 2 {
                issues.push(issue);
                continue;
            }
            let mut from = 0;
            for part in parts {
                let at = word[from..].find(part.as_str()).map_or(from, |i| from + i);
                from = at + part.len();
                issues.extend(check_word(&part, span.offset + at, dict, options));
            }
        }
    }
    issues
}

fn check_word(
    word: &str,
    offset: usize,
    dict: &mut CachingDictionary<'_>,
    options: &ValidationOptions,
) -> Option<ValidationIssue> {
    let is_flagged = dict.is_forbidden(word) && !dict.is_no_suggest_word(word);
    if !is_flagged {
        if word.chars().count() < options.min_word_length {
            return None;
        }
        if dict.has(word) || dict.is_no_suggest_word(word) {
            return None;
        }
    }
    Some(ValidationIssue {
        text: word.to_string(),
        offset,
        is_flagged,
        suggestions_ex: dict.get_preferred_suggestions(word),
    })
}
