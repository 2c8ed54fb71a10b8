// Character classification, case mapping and accent folding

// ---------------------------------------------------------------------------
// Accent folding table
// ---------------------------------------------------------------------------

/// Base letters paired with their precomposed accented forms (Latin-1 and
/// Latin Extended-A). Lookup is linear; the table is small enough that a
/// map would only add start-up cost.
const ACCENT_GROUPS: &[(char, &str)] = &[
    ('a', "àáâãäåāăą"),
    ('A', "ÀÁÂÃÄÅĀĂĄ"),
    ('c', "çćĉċč"),
    ('C', "ÇĆĈĊČ"),
    ('d', "ď"),
    ('D', "Ď"),
    ('e', "èéêëēĕėęě"),
    ('E', "ÈÉÊËĒĔĖĘĚ"),
    ('g', "ĝğġģ"),
    ('G', "ĜĞĠĢ"),
    ('h', "ĥ"),
    ('H', "Ĥ"),
    ('i', "ìíîïĩīĭį"),
    ('I', "ÌÍÎÏĨĪĬĮİ"),
    ('j', "ĵ"),
    ('J', "Ĵ"),
    ('k', "ķ"),
    ('K', "Ķ"),
    ('l', "ĺļľ"),
    ('L', "ĹĻĽ"),
    ('n', "ñńņňŉ"),
    ('N', "ÑŃŅŇ"),
    ('o', "òóôõöøōŏő"),
    ('O', "ÒÓÔÕÖØŌŎŐ"),
    ('r', "ŕŗř"),
    ('R', "ŔŖŘ"),
    ('s', "śŝşš"),
    ('S', "ŚŜŞŠ"),
    ('t', "ţťŧ"),
    ('T', "ŢŤŦ"),
    ('u', "ùúûüũūŭůűų"),
    ('U', "ÙÚÛÜŨŪŬŮŰŲ"),
    ('w', "ŵ"),
    ('W', "Ŵ"),
    ('y', "ýÿŷ"),
    ('Y', "ÝŶŸ"),
    ('z', "źżž"),
    ('Z', "ŹŻŽ"),
];

/// Combining diacritical marks block (U+0300..U+036F).
pub fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Return the unaccented base letter for `c`, or `c` itself when it carries
/// no known accent.
pub fn strip_accent(c: char) -> char {
    if c.is_ascii() {
        return c;
    }
    ACCENT_GROUPS
        .iter()
        .find(|(_, forms)| forms.contains(c))
        .map(|&(base, _)| base)
        .unwrap_or(c)
}

/// Whether `c` is a precomposed accented letter from the folding table.
pub fn has_accent(c: char) -> bool {
    strip_accent(c) != c
}

/// All accent forms of `c`, including its base letter, in table order.
///
/// For a letter outside the table the result is just `[c]`.
pub fn accent_forms(c: char) -> Vec<char> {
    let base = strip_accent(c);
    match ACCENT_GROUPS.iter().find(|&&(b, _)| b == base) {
        Some(&(b, forms)) => std::iter::once(b).chain(forms.chars()).collect(),
        None => vec![c],
    }
}

// ---------------------------------------------------------------------------
// Case mapping
//
// `char::to_lowercase` may expand to several characters; the simple
// one-to-one mapping only takes the first one.
// ---------------------------------------------------------------------------

/// Convert a character to its simple lowercase equivalent.
pub fn simple_lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Convert a character to its simple uppercase equivalent.
pub fn simple_upper(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

/// Check whether a character is an uppercase letter.
pub fn is_upper(c: char) -> bool {
    c != simple_lower(c)
}

/// Check whether a character is a lowercase letter.
pub fn is_lower(c: char) -> bool {
    c != simple_upper(c)
}

/// Characters that may appear inside a word: letters, digits, combining
/// marks and the apostrophes used in contractions.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_combining_mark(c) || c == '\'' || c == '\u{2019}'
}

/// Compare two strings for equality, ignoring character case.
pub fn equals_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .map(simple_lower)
        .eq(b.chars().map(simple_lower))
}
