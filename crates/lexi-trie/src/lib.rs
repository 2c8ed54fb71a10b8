//! Word tries for the lexi spell checker.
//!
//! A [`Trie`] is built by inserting words, then [consolidated](consolidate)
//! into a DAG that shares identical suffix subtrees. Any consolidated trie
//! can be flattened into a [`TrieBlob`] for compact, read-only lookups, or
//! written to one of the line-oriented text formats in [`io`].
//!
//! # Architecture
//!
//! - [`node`] -- Arena-backed `Trie` with `NodeId` handles
//! - [`gtrie`] -- Generic trie carrying a value per word
//! - [`consolidate`] -- Structural suffix sharing (trie to DAG)
//! - [`graph`] -- The `TrieGraph` trait shared by every representation
//! - [`walker`] -- Pull-based depth-first walker with a go-deeper flag
//! - [`blob`] -- Flat record array representation
//! - [`format`] -- Binary container header for blobs
//! - [`io`] -- Text formats `TrieXv1`, `TrieXv2`, `TrieXv3`, `TrieXv4`

pub mod blob;
pub mod consolidate;
pub mod format;
pub mod graph;
pub mod gtrie;
pub mod io;
pub mod node;
pub mod walker;

pub use blob::TrieBlob;
pub use consolidate::consolidate;
pub use graph::TrieGraph;
pub use gtrie::GTrie;
pub use node::{NodeId, Trie, TrieNode};
pub use walker::{CompoundMethod, Walker, Words};

/// Error type for trie decoding and import.
#[derive(Debug, thiserror::Error)]
pub enum TrieError {
    #[error("{source_name}:{line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },
    #[error("{source_name}: unsupported trie format: {header}")]
    UnsupportedFormat { source_name: String, header: String },
    #[error("{source_name}:{line}: reference creates a cycle")]
    Cycle { source_name: String, line: usize },
    #[error("invalid magic number in trie blob header")]
    InvalidMagic,
    #[error("unsupported trie blob version {0}")]
    UnsupportedVersion(u32),
    #[error("blob too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("blob record {index} points outside the record table")]
    DanglingRecord { index: usize },
    #[error("blob record {index} shares a children run under a different length")]
    RunLengthMismatch { index: usize },
    #[error("blob record {index} creates a cycle")]
    CyclicRecord { index: usize },
    #[error("record table alignment error")]
    Alignment,
    #[error("words containing {0:?} cannot be written in this format")]
    Unrepresentable(char),
}
