// Case type detection and case/accent normalisation of whole words

use crate::character::{is_lower, is_upper, simple_lower, simple_upper, strip_accent};

/// Classification of character casing within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseType {
    /// No letters found in the word (only digits, punctuation, etc.).
    NoLetters,
    /// All letters are lowercase: "apple".
    AllLower,
    /// First letter is uppercase, rest are lowercase: "Apple".
    FirstUpper,
    /// Mixed case that does not fit other patterns: "iPhone".
    Complex,
    /// All letters are uppercase: "APPLE".
    AllUpper,
}

/// Detect the case pattern of a word.
///
/// Non-letter characters (digits, punctuation) are ignored when
/// determining the case pattern.
pub fn detect_case(word: &str) -> CaseType {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return CaseType::NoLetters;
    };

    let mut first_uc = false;
    let mut rest_lc = true;
    let mut all_uc = true;
    let mut no_letters = true;

    if is_upper(first) {
        first_uc = true;
        no_letters = false;
    }
    if is_lower(first) {
        all_uc = false;
        no_letters = false;
    }

    for c in chars {
        if is_upper(c) {
            no_letters = false;
            rest_lc = false;
        }
        if is_lower(c) {
            all_uc = false;
            no_letters = false;
        }
    }

    if no_letters {
        return CaseType::NoLetters;
    }
    if all_uc {
        return CaseType::AllUpper;
    }
    if !rest_lc {
        return CaseType::Complex;
    }
    if first_uc {
        CaseType::FirstUpper
    } else {
        CaseType::AllLower
    }
}

/// Apply a case pattern to a word.
///
/// `NoLetters` and `Complex` leave the word unchanged.
pub fn apply_case(word: &str, case_type: CaseType) -> String {
    match case_type {
        CaseType::NoLetters | CaseType::Complex => word.to_string(),
        CaseType::AllLower => word.chars().map(simple_lower).collect(),
        CaseType::AllUpper => word.chars().map(simple_upper).collect(),
        CaseType::FirstUpper => {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => std::iter::once(simple_upper(first))
                    .chain(chars.map(simple_lower))
                    .collect(),
                None => String::new(),
            }
        }
    }
}

/// Lowercase a word with the full Unicode mapping.
pub fn to_lower(word: &str) -> String {
    word.to_lowercase()
}

/// Remove precomposed accents and drop combining marks.
pub fn strip_accents(word: &str) -> String {
    word.chars()
        .filter(|&c| !crate::character::is_combining_mark(c))
        .map(strip_accent)
        .collect()
}

/// Lowercase and strip accents: the form used for case-insensitive lookup.
pub fn normalize_ignore_case(word: &str) -> String {
    strip_accents(&to_lower(word))
}

/// Whether the word contains any uppercase letter.
pub fn has_upper(word: &str) -> bool {
    word.chars().any(is_upper)
}

/// The distinct case forms of a word: itself, lowercase, and uppercase,
/// in that order.
pub fn case_forms(word: &str) -> Vec<String> {
    let mut forms = vec![word.to_string()];
    for form in [word.to_lowercase(), word.to_uppercase()] {
        if !forms.contains(&form) {
            forms.push(form);
        }
    }
    forms
}
