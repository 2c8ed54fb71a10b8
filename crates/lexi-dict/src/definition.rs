// Dictionary definitions as read from settings files

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lexi_core::text::split_code_identifier;
use lexi_suggest::{DictionaryInformation, SuggestionCostMapDef, WeightMap};
use lexi_trie::Trie;
use serde::{Deserialize, Serialize};

use crate::DictError;
use crate::dictionary::{CASE_INSENSITIVE_PREFIX, FORBIDDEN_PREFIX, SpellingDictionary};
use crate::trie_dict::{DictionaryOptions, TrieDictionary};
use crate::word_sets::{FlagWordsDictionary, SuggestDictionary};

/// How the lines of a word-list source are split into words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DictionaryType {
    /// One entry per line, taken verbatim.
    #[default]
    S,
    /// Entries separated by whitespace.
    W,
    /// Code identifiers, split on camelCase and snake_case boundaries.
    C,
}

/// Split word-list text into entries. `#` starts a comment.
pub fn parse_word_list(text: &str, dict_type: DictionaryType) -> Vec<String> {
    let mut words = Vec::new();
    for line in text.lines() {
        let line = match line.find('#') {
            Some(at) => &line[..at],
            None => line,
        };
        match dict_type {
            DictionaryType::S => {
                let word = line.trim();
                if !word.is_empty() {
                    words.push(word.to_string());
                }
            }
            DictionaryType::W => words.extend(line.split_whitespace().map(str::to_string)),
            DictionaryType::C => {
                for token in line.split_whitespace() {
                    if token.starts_with([FORBIDDEN_PREFIX, CASE_INSENSITIVE_PREFIX]) {
                        words.push(token.to_string());
                    } else {
                        words.extend(split_code_identifier(token));
                    }
                }
            }
        }
    }
    words
}

/// One dictionary source.
///
/// The role flags pick the kind of dictionary built: `forbidden` yields a
/// flag-word list, `suggest` a suggestion map, and anything else a
/// trie-backed word list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionaryDefinition {
    pub name: String,
    /// Word list or serialized trie, relative to the settings file.
    pub path: Option<PathBuf>,
    /// Inline entries, used when there is no path.
    pub words: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub dict_type: DictionaryType,
    pub case_sensitive: bool,
    pub no_suggest: bool,
    pub forbidden: bool,
    pub suggest: bool,
    pub use_compounds: bool,
    pub dictionary_information: Option<DictionaryInformation>,
    pub suggestion_edit_costs: Vec<SuggestionCostMapDef>,
    pub description: Option<String>,
}

impl DictionaryDefinition {
    /// A plain word-list definition with inline entries.
    pub fn inline<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            words: Some(words.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Cost model for suggestions, if the definition configures one.
    pub fn weight_map(&self) -> Result<Option<WeightMap>, DictError> {
        let mut map = match &self.dictionary_information {
            Some(info) => info.to_weight_map()?,
            None if self.suggestion_edit_costs.is_empty() => return Ok(None),
            None => WeightMap::new(),
        };
        map.add_defs(&self.suggestion_edit_costs);
        Ok(Some(map))
    }

    pub fn dictionary_options(&self) -> Result<DictionaryOptions, DictError> {
        Ok(DictionaryOptions {
            case_sensitive: self.case_sensitive,
            no_suggest: self.no_suggest,
            use_compounds: self.use_compounds,
            weights: self.weight_map()?,
        })
    }

    /// Build the dictionary from already split entries.
    pub fn build_from_words(
        &self,
        source: &str,
        words: &[String],
    ) -> Result<Arc<dyn SpellingDictionary>, DictError> {
        let dict: Arc<dyn SpellingDictionary> = if self.forbidden {
            Arc::new(FlagWordsDictionary::new(&self.name, source, words))
        } else if self.suggest {
            Arc::new(SuggestDictionary::new(&self.name, source, words))
        } else {
            Arc::new(TrieDictionary::from_words(
                &self.name,
                source,
                words,
                self.dictionary_options()?,
            ))
        };
        Ok(dict)
    }

    /// Build the dictionary around an imported trie.
    pub fn build_from_trie(
        &self,
        source: &str,
        trie: Trie,
    ) -> Result<Arc<dyn SpellingDictionary>, DictError> {
        Ok(Arc::new(TrieDictionary::from_trie(
            &self.name,
            source,
            trie,
            self.dictionary_options()?,
        )))
    }
}

/// A settings document: dictionary sources plus inline word lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionarySettings {
    pub dictionaries: Vec<DictionaryDefinition>,
    /// Extra accepted words.
    pub words: Vec<String>,
    /// Forbidden words, optionally `word:replacement`.
    pub flag_words: Vec<String>,
    /// Accepted but never suggested.
    pub ignore_words: Vec<String>,
    /// `word:replacement` suggestion pairs.
    pub suggest_words: Vec<String>,
}

impl DictionarySettings {
    pub fn from_json(json: &str) -> Result<Self, DictError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DictError> {
        let json = std::fs::read_to_string(path).map_err(|source| DictError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::SearchOptions;

    #[test]
    fn word_list_types() {
        let text = "# header\nhello world\n  spaced line  \n\n";
        assert_eq!(
            parse_word_list(text, DictionaryType::S),
            vec!["hello world", "spaced line"]
        );
        assert_eq!(
            parse_word_list(text, DictionaryType::W),
            vec!["hello", "world", "spaced", "line"]
        );
        assert_eq!(
            parse_word_list("parseHTTPRequest snake_case !badWord # x", DictionaryType::C),
            vec!["parse", "HTTP", "Request", "snake", "case", "!badWord"]
        );
    }

    #[test]
    fn definition_from_json() {
        let def: DictionaryDefinition = serde_json::from_str(
            r#"{
                "name": "animals",
                "path": "animals.txt",
                "type": "W",
                "caseSensitive": true,
                "suggestionEditCosts": [{ "map": "ae", "replace": 50 }]
            }"#,
        )
        .unwrap();
        assert_eq!(def.name, "animals");
        assert_eq!(def.path.as_deref(), Some(Path::new("animals.txt")));
        assert_eq!(def.dict_type, DictionaryType::W);
        assert!(def.case_sensitive);
        assert!(!def.forbidden);
        assert!(def.weight_map().unwrap().is_some());
    }

    #[test]
    fn without_costs_there_is_no_weight_map() {
        let def = DictionaryDefinition::inline("plain", ["a"]);
        assert!(def.weight_map().unwrap().is_none());
    }

    #[test]
    fn role_flags_pick_the_dictionary_kind() {
        let words: Vec<String> = vec!["hte:the".into()];
        let def = DictionaryDefinition {
            forbidden: true,
            ..DictionaryDefinition::inline("flags", Vec::<String>::new())
        };
        let d = def.build_from_words("inline", &words).unwrap();
        assert!(d.is_forbidden("hte", false));

        let def = DictionaryDefinition {
            suggest: true,
            ..DictionaryDefinition::inline("sugs", Vec::<String>::new())
        };
        let d = def.build_from_words("inline", &words).unwrap();
        assert_eq!(d.get_preferred_suggestions("hte")[0].word, "the");

        let plain = vec!["the".to_string()];
        let d = DictionaryDefinition::inline("words", Vec::<String>::new())
            .build_from_words("inline", &plain)
            .unwrap();
        assert!(d.has("The", &SearchOptions::default()));
    }

    #[test]
    fn settings_defaults() {
        let s = DictionarySettings::from_json(r#"{ "words": ["alpha"] }"#).unwrap();
        assert!(s.dictionaries.is_empty());
        assert_eq!(s.words, vec!["alpha"]);
        assert!(DictionarySettings::from_json("{ nope").is_err());
    }
}
