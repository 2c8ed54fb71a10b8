// Cost definitions derived from Hunspell affix-file suggestion directives
//
// Recognised directives: TRY, NO-TRY, MAP, KEY, REP, ICONV and OCONV.
// Table headers such as `REP 12` carry no data and are skipped.

use lexi_core::case::case_forms;
use lexi_core::character::strip_accent;

use super::parse::{EditCosts, join_letters, split_map_substrings};
use super::SuggestionCostMapDef;

const SUPPORTED: &[&str] = &["MAP", "KEY", "TRY", "NO-TRY", "ICONV", "OCONV", "REP"];

/// One directive line split into keyword and arguments.
struct Directive<'a> {
    keyword: &'a str,
    args: Vec<&'a str>,
}

impl<'a> Directive<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let line = line.split('#').next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        let keyword = parts.next()?;
        if !SUPPORTED.contains(&keyword) {
            return None;
        }
        let args: Vec<&str> = parts.collect();
        let is_table_header = keyword != "NO-TRY"
            && args.len() == 1
            && args[0].chars().all(|c| c.is_ascii_digit());
        if args.is_empty() || is_table_header {
            return None;
        }
        Some(Self { keyword, args })
    }

    /// The single argument of a `keyword value` line.
    fn value(&self, keyword: &str) -> Option<&'a str> {
        (self.keyword == keyword && self.args.len() == 1).then(|| self.args[0])
    }
}

type Operation = fn(&Directive<'_>, &EditCosts) -> Option<SuggestionCostMapDef>;

const OPERATIONS: &[Operation] = &[
    aff_key,
    aff_key_caps,
    aff_map,
    aff_map_accents,
    aff_map_caps,
    aff_no_try,
    aff_rep_conv,
    aff_try,
    aff_try_accents,
    aff_try_caps,
    aff_try_first_character_replace,
];

/// Translate the suggestion directives of an affix file into cost
/// definitions, in line order.
pub fn map_hunspell_information(aff: &str, costs: &EditCosts) -> Vec<SuggestionCostMapDef> {
    aff.lines()
        .filter_map(Directive::parse)
        .flat_map(|directive| {
            OPERATIONS
                .iter()
                .filter_map(|op| op(&directive, costs))
                .collect::<Vec<_>>()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

fn aff_map(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    let map = d.value("MAP")?;
    Some(SuggestionCostMapDef {
        map: map.to_string(),
        replace: Some(costs.map_cost),
        swap: Some(costs.map_cost),
        ..SuggestionCostMapDef::default()
    })
}

fn aff_try(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    let map = d.value("TRY")?;
    let cost = costs.try_char_cost;
    Some(SuggestionCostMapDef {
        map: map.to_string(),
        replace: Some(cost),
        ins_del: Some(cost),
        swap: Some(cost),
        ..SuggestionCostMapDef::default()
    })
}

fn aff_try_first_character_replace(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    let letters = d.value("TRY")?;
    let map: String = split_map_substrings(letters)
        .iter()
        .map(|c| format!("(^{c})"))
        .collect();
    Some(SuggestionCostMapDef {
        map,
        replace: Some(costs.try_char_cost.saturating_sub(costs.first_letter_penalty)),
        penalty: Some(costs.first_letter_penalty),
        ..SuggestionCostMapDef::default()
    })
}

/// Characters that are not part of the alphabet: cheap to drop, but words
/// that need them are penalised.
fn aff_no_try(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    let map = d.value("NO-TRY")?;
    Some(SuggestionCostMapDef {
        map: map.to_string(),
        ins_del: Some(costs.non_alphabet_costs.saturating_sub(costs.try_char_cost)),
        penalty: Some(costs.non_alphabet_costs + costs.try_char_cost),
        ..SuggestionCostMapDef::default()
    })
}

/// `REP from into`, `ICONV from into` and `OCONV from into`. An `into` of
/// `0` means the empty string; anchors on `from` carry over to `into`.
fn aff_rep_conv(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    let cost = match d.keyword {
        "REP" => costs.replace_costs,
        "ICONV" | "OCONV" => costs.io_convert_cost,
        _ => return None,
    };
    let &[from, into] = d.args.as_slice() else {
        return None;
    };
    let mut into = if into == "0" { String::new() } else { into.to_string() };
    if from.starts_with('^') && !into.starts_with('^') {
        into.insert(0, '^');
    }
    if from.ends_with('$') && !into.ends_with('$') {
        into.push('$');
    }
    Some(SuggestionCostMapDef {
        map: format!("({from})({into})"),
        replace: Some(cost),
        ..SuggestionCostMapDef::default()
    })
}

/// Neighbouring keys on each keyboard row, in both cases.
fn aff_key(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    let keyboard = d.value("KEY")?;
    let keys = split_map_substrings(keyboard);
    let pairs: Vec<String> = keys
        .windows(2)
        .filter(|w| w[0] != "|" && w[1] != "|")
        .map(|w| join_letters(w))
        .collect();
    let upper = pairs.iter().map(|p| p.to_uppercase());
    let map = unique(pairs.iter().cloned().chain(upper)).join("|");
    Some(SuggestionCostMapDef {
        map,
        replace: Some(costs.keyboard_cost),
        swap: Some(costs.keyboard_cost),
        ..SuggestionCostMapDef::default()
    })
}

fn aff_key_caps(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    parse_caps(d.value("KEY")?, costs)
}

fn aff_map_caps(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    parse_caps(d.value("MAP")?, costs)
}

fn aff_try_caps(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    parse_caps(d.value("TRY")?, costs)
}

fn aff_map_accents(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    parse_accent_pairs(d.value("MAP")?, costs)
}

fn aff_try_accents(d: &Directive<'_>, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    parse_accent_pairs(d.value("TRY")?, costs)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn unique(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Case forms, closed under a second round so that `ß` also yields `ss`.
fn all_case_forms(s: &str) -> Vec<String> {
    let first = case_forms(s);
    unique(first.iter().flat_map(|f| case_forms(f)).filter(|f| !f.is_empty()))
}

fn letters(value: &str) -> Vec<String> {
    split_map_substrings(value)
        .into_iter()
        .filter(|s| s != "|")
        .collect()
}

fn parse_caps(value: &str, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    let items = letters(value);
    let with_cases = items
        .iter()
        .map(|s| all_case_forms(s))
        .filter(|forms| forms.len() > 1)
        .map(|forms| join_letters(&forms));
    let map = unique(with_cases).join("|");
    (!map.is_empty()).then(|| SuggestionCostMapDef {
        map,
        replace: Some(costs.caps_costs),
        ..SuggestionCostMapDef::default()
    })
}

fn parse_accent_pairs(value: &str, costs: &EditCosts) -> Option<SuggestionCostMapDef> {
    let items = letters(value);
    let pairs = items.iter().flat_map(|s| {
        all_case_forms(s)
            .into_iter()
            .filter_map(|form| {
                let stripped: String = form.chars().map(strip_accent).collect();
                (stripped != form).then(|| join_letters(&[form, stripped]))
            })
            .collect::<Vec<_>>()
    });
    let map = unique(pairs).join("|");
    (!map.is_empty()).then(|| SuggestionCostMapDef {
        map,
        replace: Some(costs.accent_costs),
        ..SuggestionCostMapDef::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::WeightMap;

    fn one(line: &str, op: Operation) -> Option<SuggestionCostMapDef> {
        let d = Directive::parse(line)?;
        op(&d, &EditCosts::default())
    }

    fn def(map: &str, replace: Option<u32>, ins_del: Option<u32>, swap: Option<u32>, penalty: Option<u32>) -> SuggestionCostMapDef {
        SuggestionCostMapDef {
            map: map.to_string(),
            replace,
            ins_del,
            swap,
            penalty,
            description: None,
        }
    }

    #[test]
    fn map_directive() {
        assert_eq!(
            one("MAP aàâäAÀÂÄ", aff_map),
            Some(def("aàâäAÀÂÄ", Some(25), None, Some(25), None))
        );
        assert_eq!(one("MAP ß(ss)", aff_map).map(|d| d.map), Some("ß(ss)".to_string()));
        assert_eq!(one("TRY abc", aff_map), None);
        assert_eq!(one("MAP 3", aff_map), None);
    }

    #[test]
    fn try_directive() {
        assert_eq!(
            one("TRY abc", aff_try),
            Some(def("abc", Some(100), Some(100), Some(100), None))
        );
        assert_eq!(
            one("TRY abc", aff_try_first_character_replace),
            Some(def("(^a)(^b)(^c)", Some(96), None, None, Some(4)))
        );
        assert_eq!(one("NO-TRY abc", aff_try), None);
    }

    #[test]
    fn no_try_directive() {
        assert_eq!(
            one("NO-TRY abc", aff_no_try),
            Some(def("abc", None, Some(10), None, Some(210)))
        );
        let costs = EditCosts {
            try_char_cost: 90,
            ..EditCosts::default()
        };
        let d = Directive::parse("NO-TRY abc").unwrap();
        assert_eq!(aff_no_try(&d, &costs), Some(def("abc", None, Some(20), None, Some(200))));
    }

    #[test]
    fn rep_and_conversions() {
        let cases = [
            ("REP o oo", Some(("(o)(oo)", 75))),
            ("REP ^a A", Some(("(^a)(^A)", 75))),
            ("REP $ en$", Some(("($)(en$)", 75))),
            ("REP ^af$ aff", Some(("(^af$)(^aff$)", 75))),
            ("REP ß ss", Some(("(ß)(ss)", 75))),
            ("REP ß 0", Some(("(ß)()", 75))),
            ("REP 25", None),
            ("ICONV 25", None),
            ("ICONV áá aa", Some(("(áá)(aa)", 30))),
            ("OCONV ss ß", Some(("(ss)(ß)", 30))),
        ];
        for (line, expected) in cases {
            let found = one(line, aff_rep_conv).map(|d| (d.map, d.replace.unwrap_or(0)));
            let expected = expected.map(|(m, c)| (m.to_string(), c));
            assert_eq!(found, expected, "{line}");
        }
    }

    #[test]
    fn keyboard_rows() {
        let found = one("KEY qwer|a|asdf", aff_key).unwrap();
        assert_eq!(found.map, "qw|we|er|as|sd|df|QW|WE|ER|AS|SD|DF");
        assert_eq!(found.replace, Some(99));
        assert_eq!(found.swap, Some(99));
        let caps = one("KEY qwer|a", aff_key_caps).unwrap();
        assert_eq!(caps.map, "qQ|wW|eE|rR|aA");
        assert_eq!(caps.replace, Some(1));
    }

    #[test]
    fn caps_include_multi_char_forms() {
        let caps = one("MAP ß(ss)", aff_map_caps).unwrap();
        assert_eq!(caps.map, "ß(SS)(ss)|(ss)(SS)");
        assert!(one("MAP 123", aff_map_caps).is_none());
    }

    #[test]
    fn accents_pair_with_base_letters() {
        let accents = one("MAP aàâäAÀÂÄ", aff_map_accents).unwrap();
        assert_eq!(accents.map, "àa|ÀA|âa|ÂA|äa|ÄA");
        assert_eq!(accents.replace, Some(1));
        assert!(one("TRY abc", aff_try_accents).is_none());
    }

    #[test]
    fn whole_file() {
        let aff = "
# comment
TRY abc   # trailing comment

MAP 2
MAP eéè
REP ^ß ss
NO-TRY -0123
KEY qwe|asd
SFX A Y 1
";
        let defs = map_hunspell_information(aff, &EditCosts::default());
        let maps: Vec<&str> = defs.iter().map(|d| d.map.as_str()).collect();
        assert_eq!(
            maps,
            vec![
                "abc",
                "aA|bB|cC",
                "(^a)(^b)(^c)",
                "eéè",
                "ée|ÉE|èe|ÈE",
                "eE|éÉ|èÈ",
                "(^ß)(^ss)",
                "-0123",
                "qw|we|as|sd|QW|WE|AS|SD",
                "qQ|wW|eE|aA|sS|dD",
            ]
        );

        let weights = WeightMap::from_defs(&defs);
        assert_eq!(weights.lookup_replace_cost("é", "e"), Some(1));
        assert_eq!(weights.lookup_replace_cost("è", "é"), Some(25));
        assert_eq!(weights.lookup_replace_cost("^ß", "^ss"), Some(75));
        assert_eq!(weights.lookup_ins_del_cost("-"), Some(10));
    }
}
