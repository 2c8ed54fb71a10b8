// Dictionary information: the per-language settings a weight map is built from

use serde::Deserialize;

use super::hunspell::map_hunspell_information;
use super::parse::{EditCosts, calc_first_character_replace, parse_accents, parse_alphabet};
use super::{SuggestionCostMapDef, WeightMap};
use crate::SuggestError;

/// Letters and the cost of using them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSetCosts {
    pub characters: String,
    pub cost: u32,
    #[serde(default)]
    pub penalty: Option<u32>,
}

/// Either a bare character set or a list of sets with their own costs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CharacterSet {
    Plain(String),
    Costs(Vec<CharacterSetCosts>),
}

impl CharacterSet {
    fn with_default_cost(&self, cost: u32) -> Vec<CharacterSetCosts> {
        match self {
            CharacterSet::Plain(characters) => vec![CharacterSetCosts {
                characters: characters.clone(),
                cost,
                penalty: None,
            }],
            CharacterSet::Costs(sets) => sets.clone(),
        }
    }
}

/// A penalty applied once per regular-expression match in a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAdjustment {
    pub id: String,
    pub regexp: String,
    pub penalty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HunspellInformation {
    /// The content of a Hunspell `.aff` file.
    pub aff: String,
    #[serde(default)]
    pub costs: Option<EditCosts>,
}

/// Language settings attached to a dictionary definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionaryInformation {
    pub locale: Option<String>,
    /// Defaults to `a-zA-Z` when absent.
    pub alphabet: Option<CharacterSet>,
    /// Combining marks. Defaults to `\u{0300}-\u{0341}`.
    pub accents: Option<CharacterSet>,
    pub costs: EditCosts,
    pub suggestion_edit_costs: Vec<SuggestionCostMapDef>,
    pub hunspell_information: Option<HunspellInformation>,
    pub adjustments: Vec<PatternAdjustment>,
    /// Characters ignored when comparing words.
    pub ignore: Option<String>,
}

const DEFAULT_ALPHABET: &str = "a-zA-Z";
const DEFAULT_ACCENTS: &str = "\u{0300}-\u{0341}";

impl DictionaryInformation {
    /// Every cost definition implied by these settings.
    pub fn to_cost_defs(&self) -> Vec<SuggestionCostMapDef> {
        let costs = &self.costs;
        let alphabet = self
            .alphabet
            .clone()
            .unwrap_or_else(|| CharacterSet::Plain(DEFAULT_ALPHABET.to_string()))
            .with_default_cost(costs.base_cost);
        let accents = self
            .accents
            .clone()
            .unwrap_or_else(|| CharacterSet::Plain(DEFAULT_ACCENTS.to_string()))
            .with_default_cost(costs.accent_costs);

        let mut defs: Vec<SuggestionCostMapDef> = Vec::new();
        for set in &alphabet {
            defs.extend(parse_alphabet(&set.characters, set.cost, set.penalty, costs));
            defs.push(calc_first_character_replace(&set.characters, set.cost, costs));
        }
        defs.extend(
            accents
                .iter()
                .filter_map(|set| parse_accents(&set.characters, set.cost, set.penalty)),
        );
        if let Some(ignore) = &self.ignore {
            defs.push(SuggestionCostMapDef {
                map: ignore.clone(),
                ins_del: Some(1),
                ..SuggestionCostMapDef::default()
            });
        }
        if let Some(hunspell) = &self.hunspell_information {
            let hun_costs = hunspell.costs.unwrap_or(*costs);
            defs.extend(map_hunspell_information(&hunspell.aff, &hun_costs));
        }
        defs.extend(self.suggestion_edit_costs.iter().cloned());
        defs
    }

    /// Build the weight map, including pattern adjustments.
    pub fn to_weight_map(&self) -> Result<WeightMap, SuggestError> {
        let mut map = WeightMap::from_defs(&self.to_cost_defs());
        for adj in &self.adjustments {
            map.add_adjustment(&adj.id, &adj.regexp, adj.penalty)?;
        }
        log::debug!(
            "built weight map: {} adjustments, locale {:?}",
            self.adjustments.len(),
            self.locale
        );
        Ok(map)
    }
}
