// Map-string parsing and alphabet-derived cost definitions

use lexi_core::case::case_forms;
use lexi_core::character::{is_combining_mark, strip_accent};
use serde::Deserialize;

use super::SuggestionCostMapDef;

/// Default operation costs used when deriving maps from dictionary
/// metadata. One ordinary edit costs `base_cost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditCosts {
    pub base_cost: u32,
    pub swap_cost: u32,
    pub duplicate_letter_cost: u32,
    /// Extra charge for changing the first letter of a word.
    pub first_letter_penalty: u32,
    pub non_alphabet_costs: u32,
    pub accent_costs: u32,
    pub caps_costs: u32,
    pub try_char_cost: u32,
    pub keyboard_cost: u32,
    pub map_cost: u32,
    pub replace_costs: u32,
    pub io_convert_cost: u32,
}

impl Default for EditCosts {
    fn default() -> Self {
        Self {
            base_cost: 100,
            swap_cost: 75,
            duplicate_letter_cost: 80,
            first_letter_penalty: 4,
            non_alphabet_costs: 110,
            accent_costs: 1,
            caps_costs: 1,
            try_char_cost: 100,
            keyboard_cost: 99,
            map_cost: 25,
            replace_costs: 75,
            io_convert_cost: 30,
        }
    }
}

/// Split one map set into its items: single characters, or the contents
/// of a `( )` group.
///
/// `"a(bc)d"` gives `["a", "bc", "d"]`. An unterminated group is dropped.
pub fn split_map_substrings(map: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut group: Option<String> = None;
    for c in map.chars() {
        match (&mut group, c) {
            (Some(seq), ')') => {
                out.push(std::mem::take(seq));
                group = None;
            }
            (Some(seq), c) => seq.push(c),
            (None, '(') => group = Some(String::new()),
            (None, c) => out.push(c.to_string()),
        }
    }
    out
}

/// Bring items back together: `["a", "bc"]` gives `"a(bc)"`.
pub(crate) fn join_letters<S: AsRef<str>>(letters: &[S]) -> String {
    letters
        .iter()
        .map(|s| {
            let s = s.as_ref();
            if s.chars().count() > 1 {
                format!("({s})")
            } else {
                s.to_string()
            }
        })
        .collect()
}

/// Expand `a-z` style ranges. A `-` at either end is literal.
pub(crate) fn expand_character_set(characters: &str) -> Vec<char> {
    let chars: Vec<char> = characters.chars().collect();
    let mut out: Vec<char> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len() && chars[i + 1] == '-' {
            let (lo, hi) = (chars[i], chars[i + 2]);
            for c in lo..=hi {
                if !out.contains(&c) {
                    out.push(c);
                }
            }
            i += 3;
            continue;
        }
        if !out.contains(&chars[i]) {
            out.push(chars[i]);
        }
        i += 1;
    }
    out
}

fn sorted_unique(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items.dedup();
    items
}

/// Cost definitions for an alphabet: replacing, inserting, deleting or
/// swapping any of its letters, changing their case, and changing their
/// accents.
pub fn parse_alphabet(
    characters: &str,
    cost: u32,
    penalty: Option<u32>,
    edit_costs: &EditCosts,
) -> Vec<SuggestionCostMapDef> {
    let letters = expand_character_set(characters);
    let forms: Vec<String> = letters
        .iter()
        .flat_map(|&c| case_forms(&c.to_string()))
        .collect();
    let alphabet = join_letters(&sorted_unique(forms));

    let mut defs = vec![SuggestionCostMapDef {
        map: alphabet.clone(),
        replace: Some(cost),
        ins_del: Some(cost),
        swap: Some(cost),
        penalty,
        ..SuggestionCostMapDef::default()
    }];
    defs.push(parse_alphabet_caps(&letters, edit_costs));
    defs.extend(calc_costs_for_accented_letters(&alphabet, edit_costs));
    defs
}

fn parse_alphabet_caps(letters: &[char], edit_costs: &EditCosts) -> SuggestionCostMapDef {
    let caps: Vec<String> = letters
        .iter()
        .map(|&c| join_letters(&sorted_unique(case_forms(&c.to_string()))))
        .collect();
    SuggestionCostMapDef {
        map: caps.join("|"),
        replace: Some(edit_costs.caps_costs),
        ..SuggestionCostMapDef::default()
    }
}

/// Pair every accented letter of `alphabet` with its unaccented form;
/// changing the accent costs `accent_costs`.
fn calc_costs_for_accented_letters(alphabet: &str, edit_costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    let mut groups: Vec<String> = Vec::new();
    for item in split_map_substrings(alphabet) {
        for form in case_forms(&item) {
            let stripped: String = form.chars().map(strip_accent).collect();
            if stripped == form {
                continue;
            }
            let joined = join_letters(&sorted_unique(vec![form, stripped]));
            if !groups.contains(&joined) {
                groups.push(joined);
            }
        }
    }
    (!groups.is_empty()).then(|| SuggestionCostMapDef {
        map: groups.join("|"),
        replace: Some(edit_costs.accent_costs),
        ..SuggestionCostMapDef::default()
    })
}

/// Cost definition for stray combining marks, which may be inserted,
/// deleted or replaced for `cost`.
pub fn parse_accents(characters: &str, cost: u32, penalty: Option<u32>) -> Option<SuggestionCostMapDef> {
    let marks: Vec<String> = expand_character_set(characters)
        .into_iter()
        .filter(|&c| is_combining_mark(c))
        .map(String::from)
        .collect();
    (!marks.is_empty()).then(|| SuggestionCostMapDef {
        map: join_letters(&marks),
        replace: Some(cost),
        ins_del: Some(cost),
        penalty,
        ..SuggestionCostMapDef::default()
    })
}

/// Replacing the first letter of a word is slightly cheaper than a plain
/// edit, paid back through a penalty so it only wins ties.
pub fn calc_first_character_replace(characters: &str, cost: u32, edit_costs: &EditCosts) -> SuggestionCostMapDef {
    let mut items: Vec<String> = expand_character_set(characters)
        .into_iter()
        .map(|c| format!("(^{c})"))
        .collect();
    items.sort();
    items.dedup();
    let penalty = edit_costs.first_letter_penalty;
    SuggestionCostMapDef {
        map: items.concat() + "(^)",
        replace: Some(cost.saturating_sub(penalty)),
        penalty: Some(penalty * 2),
        ..SuggestionCostMapDef::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substrings_and_groups() {
        assert_eq!(split_map_substrings("a(bc)d"), vec!["a", "bc", "d"]);
        assert_eq!(split_map_substrings("(^a)(^)"), vec!["^a", "^"]);
        assert_eq!(split_map_substrings("ab(c"), vec!["a", "b"]);
        assert!(split_map_substrings("").is_empty());
    }

    #[test]
    fn join_wraps_multi_char_items() {
        assert_eq!(join_letters(&["a", "bc", "d"]), "a(bc)d");
    }

    #[test]
    fn ranges_expand() {
        assert_eq!(expand_character_set("a-e"), vec!['a', 'b', 'c', 'd', 'e']);
        assert_eq!(expand_character_set("-ab-"), vec!['-', 'a', 'b']);
        assert_eq!(expand_character_set("a-cb"), vec!['a', 'b', 'c']);
    }

    #[test]
    fn alphabet_defs() {
        let costs = EditCosts::default();
        let defs = parse_alphabet("a-c", 100, None, &costs);
        assert_eq!(defs[0].map, "ABCabc");
        assert_eq!(defs[0].ins_del, Some(100));
        assert_eq!(defs[1].map, "Aa|Bb|Cc");
        assert_eq!(defs[1].replace, Some(1));
        assert_eq!(defs.len(), 2);
    }

    #[test]
    fn alphabet_with_accents_adds_accent_def() {
        let costs = EditCosts::default();
        let defs = parse_alphabet("eé", 100, Some(5), &costs);
        assert_eq!(defs[0].map, "EeÉé");
        assert_eq!(defs[0].penalty, Some(5));
        assert_eq!(defs[1].map, "Ee|Éé");
        assert_eq!(defs[2].map, "EÉ|eé");
        assert_eq!(defs[2].replace, Some(costs.accent_costs));
    }

    #[test]
    fn accents_keep_only_combining_marks() {
        let def = parse_accents("\u{0300}-\u{0302}x", 1, None).unwrap();
        assert_eq!(def.map, "\u{0300}\u{0301}\u{0302}");
        assert_eq!(def.ins_del, Some(1));
        assert!(parse_accents("abc", 1, None).is_none());
    }

    #[test]
    fn first_character_replace() {
        let def = calc_first_character_replace("cab", 100, &EditCosts::default());
        assert_eq!(def.map, "(^a)(^b)(^c)(^)");
        assert_eq!(def.replace, Some(96));
        assert_eq!(def.penalty, Some(8));
    }

    #[test]
    fn edit_costs_fill_defaults() {
        let costs: EditCosts = serde_json::from_str(r#"{"mapCost": 10}"#).unwrap();
        assert_eq!(costs.map_cost, 10);
        assert_eq!(costs.base_cost, 100);
    }
}
