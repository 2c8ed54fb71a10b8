//! Shared building blocks for the lexi spell checker.
//!
//! - [`character`] -- Code-point classification, simple case mapping, accent folding
//! - [`case`] -- Whole-word case detection and normalisation
//! - [`text`] -- Splitting prose and code identifiers into words
//! - [`suggestion`] -- The ranked suggestion result type
//! - [`cache`] -- The two-generation `SecondChanceCache`

pub mod cache;
pub mod case;
pub mod character;
pub mod suggestion;
pub mod text;

pub use cache::{CacheStats, SecondChanceCache};
pub use suggestion::SuggestionResult;
