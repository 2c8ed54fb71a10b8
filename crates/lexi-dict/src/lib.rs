//! Spelling dictionaries for the lexi spell checker.
//!
//! Every word source implements [`SpellingDictionary`]. Word lists become
//! [`TrieDictionary`] values; forbidden, ignored and suggestion-map lists
//! get their own set-backed dictionaries. A [`Collection`] answers for
//! several dictionaries at once, and a [`CachingDictionary`] memoizes the
//! answers for a checking session.
//!
//! # Architecture
//!
//! - [`dictionary`] -- The `SpellingDictionary` trait and word-list markers
//! - [`trie_dict`] -- Dictionary backed by a consolidated trie
//! - [`word_sets`] -- Flag words, ignore words and suggestion maps
//! - [`collection`] -- Union of dictionaries and load-failure placeholders
//! - [`definition`] -- Serde settings: dictionary definitions and inline lists
//! - [`loader`] -- Reads definitions from disk, memoized per file
//! - [`caching`] -- Per-session memoizing wrapper
//! - [`validate`] -- Checks text against a dictionary

pub mod caching;
pub mod collection;
pub mod definition;
pub mod dictionary;
pub mod loader;
pub mod trie_dict;
pub mod validate;
pub mod word_sets;

use std::path::PathBuf;

use lexi_suggest::SuggestError;
use lexi_trie::TrieError;

pub use caching::{CacheOptions, CachingDictionary, CachingDictionaryStats};
pub use collection::{Collection, ErrorDictionary};
pub use definition::{DictionaryDefinition, DictionarySettings, DictionaryType, parse_word_list};
pub use dictionary::{FindResult, SearchOptions, SpellingDictionary};
pub use loader::DictionaryLoader;
pub use trie_dict::{DictionaryOptions, TrieDictionary};
pub use validate::{ValidationIssue, ValidationOptions, validate_text};
pub use word_sets::{FlagWordsDictionary, IgnoreWordsDictionary, SuggestDictionary, TyposDef};

/// Error type for dictionary loading.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Trie(#[from] TrieError),
    #[error(transparent)]
    Suggest(#[from] SuggestError),
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("dictionary {name:?} has neither a path nor inline words")]
    MissingSource { name: String },
}
