// Loading dictionaries from definitions
//
// A source file may be a binary trie blob, a serialized text trie or a
// plain word list; the content decides, not the file name.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;
use lexi_trie::io::{import_trie, is_trie_text};
use lexi_trie::{TrieBlob, format};

use crate::DictError;
use crate::collection::{Collection, ErrorDictionary};
use crate::definition::{DictionaryDefinition, DictionarySettings, DictionaryType, parse_word_list};
use crate::dictionary::SpellingDictionary;
use crate::trie_dict::{DictionaryOptions, TrieDictionary};
use crate::word_sets::{FlagWordsDictionary, IgnoreWordsDictionary, SuggestDictionary};

const INLINE_SOURCE: &str = "inline";

/// Loads dictionaries, reading each `(path, type)` only once.
///
/// The registry is owned by the caller; independent loaders share nothing.
#[derive(Default)]
pub struct DictionaryLoader {
    loaded: HashMap<(PathBuf, DictionaryType), Arc<dyn SpellingDictionary>>,
}

impl DictionaryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one definition. Relative paths are resolved against `base_dir`.
    pub fn try_load(
        &mut self,
        def: &DictionaryDefinition,
        base_dir: &Path,
    ) -> Result<Arc<dyn SpellingDictionary>, DictError> {
        let Some(path) = &def.path else {
            let lines = def.words.as_ref().ok_or_else(|| DictError::MissingSource {
                name: def.name.clone(),
            })?;
            let words = parse_word_list(&lines.join("\n"), def.dict_type);
            return def.build_from_words(INLINE_SOURCE, &words);
        };
        let path = base_dir.join(path);
        let key = (path, def.dict_type);
        if let Some(dict) = self.loaded.get(&key) {
            return Ok(Arc::clone(dict));
        }
        let dict = read_dictionary(def, &key.0)?;
        self.loaded.insert(key, Arc::clone(&dict));
        Ok(dict)
    }

    /// Like [`try_load`](Self::try_load), but a failure yields an
    /// [`ErrorDictionary`] carrying the error.
    pub fn load(
        &mut self,
        def: &DictionaryDefinition,
        base_dir: &Path,
    ) -> Arc<dyn SpellingDictionary> {
        match self.try_load(def, base_dir) {
            Ok(dict) => dict,
            Err(err) => {
                log::warn!("dictionary {:?} failed to load: {err}", def.name);
                let source = match &def.path {
                    Some(path) => base_dir.join(path).display().to_string(),
                    None => INLINE_SOURCE.to_string(),
                };
                Arc::new(ErrorDictionary::new(&def.name, source, err))
            }
        }
    }

    /// Every dictionary of a settings document plus its inline lists, as
    /// one collection.
    pub fn load_settings(&mut self, settings: &DictionarySettings, base_dir: &Path) -> Collection {
        let mut dicts: Vec<Arc<dyn SpellingDictionary>> = settings
            .dictionaries
            .iter()
            .map(|def| self.load(def, base_dir))
            .collect();
        if !settings.words.is_empty() {
            dicts.push(Arc::new(TrieDictionary::from_words(
                "[words]",
                INLINE_SOURCE,
                &settings.words,
                DictionaryOptions::default(),
            )));
        }
        if !settings.flag_words.is_empty() {
            dicts.push(Arc::new(FlagWordsDictionary::new(
                "[flagWords]",
                INLINE_SOURCE,
                &settings.flag_words,
            )));
        }
        if !settings.ignore_words.is_empty() {
            dicts.push(Arc::new(IgnoreWordsDictionary::new(
                "[ignoreWords]",
                INLINE_SOURCE,
                &settings.ignore_words,
            )));
        }
        if !settings.suggest_words.is_empty() {
            dicts.push(Arc::new(SuggestDictionary::new(
                "[suggestWords]",
                INLINE_SOURCE,
                &settings.suggest_words,
            )));
        }
        Collection::new("settings", dicts)
    }

    /// Number of files loaded so far.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Forget loaded files so the next load reads them again.
    pub fn clear(&mut self) {
        self.loaded.clear();
    }
}

fn read_dictionary(
    def: &DictionaryDefinition,
    path: &Path,
) -> Result<Arc<dyn SpellingDictionary>, DictError> {
    let source = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|err| DictError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;
    if format::parse_header(&bytes).is_ok() {
        let trie = TrieBlob::from_bytes(&bytes)?.to_trie();
        return def.build_from_trie(&source, trie);
    }
    let text = String::from_utf8_lossy(&bytes);
    if is_trie_text(&text) {
        let trie = import_trie(&text, &source)?;
        return def.build_from_trie(&source, trie);
    }
    def.build_from_words(&source, &parse_word_list(&text, def.dict_type))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use lexi_trie::Trie;
    use lexi_trie::io::{ExportOptions, serialize_trie};

    use super::*;
    use crate::dictionary::SearchOptions;

    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lexi-loader-{}-{test}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn def(name: &str, path: &str) -> DictionaryDefinition {
        DictionaryDefinition {
            name: name.into(),
            path: Some(path.into()),
            ..DictionaryDefinition::default()
        }
    }

    const LOOSE: SearchOptions = SearchOptions { ignore_case: true };

    #[test]
    fn word_list_is_loaded_once() {
        let dir = scratch_dir("once");
        fs::write(dir.join("words.txt"), "# fruit\napple\nbanana\n").unwrap();
        let mut loader = DictionaryLoader::new();
        let first = loader.try_load(&def("fruit", "words.txt"), &dir).unwrap();
        let again = loader.try_load(&def("fruit", "words.txt"), &dir).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert!(first.has("Apple", &LOOSE));
        assert_eq!(loader.len(), 1);

        let split = DictionaryDefinition {
            dict_type: DictionaryType::W,
            ..def("fruit", "words.txt")
        };
        loader.try_load(&split, &dir).unwrap();
        assert_eq!(loader.len(), 2);
        loader.clear();
        assert!(loader.is_empty());
    }

    #[test]
    fn text_and_binary_tries() {
        let dir = scratch_dir("tries");
        let trie = Trie::from_words(["one", "two", "three"]);
        let text = serialize_trie(&trie, &ExportOptions::default()).unwrap();
        fs::write(dir.join("numbers.trie"), text).unwrap();
        fs::write(dir.join("numbers.blob"), TrieBlob::from_trie(&trie).to_bytes()).unwrap();

        let mut loader = DictionaryLoader::new();
        for file in ["numbers.trie", "numbers.blob"] {
            let dict = loader.try_load(&def("numbers", file), &dir).unwrap();
            assert!(dict.has("three", &LOOSE), "{file}");
            assert!(!dict.has("four", &LOOSE), "{file}");
            assert_eq!(dict.size(), 3, "{file}");
        }
    }

    #[test]
    fn broken_trie_reports_its_source() {
        let dir = scratch_dir("broken");
        fs::write(dir.join("bad.trie"), "TrieXv9\nbase=10\n").unwrap();
        let mut loader = DictionaryLoader::new();
        let err = loader.try_load(&def("bad", "bad.trie"), &dir).err().unwrap();
        assert!(err.to_string().contains("bad.trie"), "{err}");
    }

    #[test]
    fn failures_degrade_to_error_dictionaries() {
        let dir = scratch_dir("missing");
        let mut loader = DictionaryLoader::new();
        let dict = loader.load(&def("gone", "does-not-exist.txt"), &dir);
        assert_eq!(dict.name(), "gone");
        assert!(matches!(dict.errors()[..], [DictError::Io { .. }]));

        let nothing = DictionaryDefinition {
            name: "empty".into(),
            ..DictionaryDefinition::default()
        };
        let dict = loader.load(&nothing, &dir);
        assert!(matches!(dict.errors()[..], [DictError::MissingSource { .. }]));
        assert!(loader.is_empty());
    }

    #[test]
    fn settings_become_one_collection() {
        let dir = scratch_dir("settings");
        fs::write(dir.join("animals.txt"), "lion\ntiger\n").unwrap();
        let settings = DictionarySettings::from_json(
            r#"{
                "dictionaries": [
                    { "name": "animals", "path": "animals.txt" },
                    { "name": "broken", "path": "nope.txt" }
                ],
                "words": ["zebra"],
                "flagWords": ["tigre:tiger"],
                "ignoreWords": ["todo"],
                "suggestWords": ["lyon:lion"]
            }"#,
        )
        .unwrap();
        let c = DictionaryLoader::new().load_settings(&settings, &dir);
        assert!(c.has("lion", &LOOSE));
        assert!(c.has("zebra", &LOOSE));
        assert!(c.has("todo", &LOOSE));
        assert!(c.is_forbidden("tigre", false));
        assert_eq!(c.get_preferred_suggestions("lyon")[0].word, "lion");
        assert_eq!(c.errors().len(), 1);
    }
}
