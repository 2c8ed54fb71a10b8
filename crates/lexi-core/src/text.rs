// Splitting text and identifiers into words

use crate::character::{is_lower, is_upper, is_word_char};

/// A word found in a larger text, with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan<'a> {
    pub text: &'a str,
    pub offset: usize,
}

/// Split text into runs of word characters.
///
/// Leading and trailing apostrophes are trimmed from each run so that
/// quoted words are reported without their quotes.
pub fn split_words(text: &str) -> Vec<WordSpan<'_>> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (is_word_char(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                push_trimmed(&mut spans, text, s, i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push_trimmed(&mut spans, text, s, text.len());
    }
    spans
}

fn push_trimmed<'a>(spans: &mut Vec<WordSpan<'a>>, text: &'a str, start: usize, end: usize) {
    let raw = &text[start..end];
    let is_quote = |c: char| c == '\'' || c == '\u{2019}';
    let trimmed_front = raw.trim_start_matches(is_quote);
    let lead = raw.len() - trimmed_front.len();
    let word = trimmed_front.trim_end_matches(is_quote);
    if !word.is_empty() {
        spans.push(WordSpan {
            text: word,
            offset: start + lead,
        });
    }
}

/// Split a code identifier on `_`, `-`, digits and camelCase boundaries.
///
/// `HTMLParser` splits as `HTML`, `Parser`; `snake_case_name` as `snake`,
/// `case`, `name`.
pub fn split_code_identifier(identifier: &str) -> Vec<String> {
    let mut parts = Vec::new();
    for segment in identifier.split(|c: char| !c.is_alphabetic()) {
        if segment.is_empty() {
            continue;
        }
        split_camel_case(segment, &mut parts);
    }
    parts
}

fn split_camel_case(segment: &str, parts: &mut Vec<String>) {
    let chars: Vec<char> = segment.chars().collect();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && is_upper(c) {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|&n| is_lower(n));
            if is_lower(prev) || (is_upper(prev) && next_is_lower) {
                parts.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<(&str, usize)> {
        split_words(text)
            .into_iter()
            .map(|w| (w.text, w.offset))
            .collect()
    }

    #[test]
    fn split_simple_sentence() {
        assert_eq!(
            words("The lion, the tiger."),
            vec![("The", 0), ("lion", 4), ("the", 10), ("tiger", 14)]
        );
    }

    #[test]
    fn split_keeps_contractions() {
        assert_eq!(words("don't 'quoted'"), vec![("don't", 0), ("quoted", 7)]);
    }

    #[test]
    fn split_reports_byte_offsets() {
        assert_eq!(words("café au"), vec![("café", 0), ("au", 6)]);
    }

    #[test]
    fn split_empty_text() {
        assert!(split_words("").is_empty());
        assert!(split_words(" ,. ").is_empty());
    }

    #[test]
    fn identifier_camel_case() {
        assert_eq!(split_code_identifier("camelCaseWord"), vec!["camel", "Case", "Word"]);
        assert_eq!(split_code_identifier("HTMLParser"), vec!["HTML", "Parser"]);
    }

    #[test]
    fn identifier_snake_and_digits() {
        assert_eq!(split_code_identifier("snake_case2name"), vec!["snake", "case", "name"]);
        assert_eq!(split_code_identifier("__"), Vec::<String>::new());
    }
}
