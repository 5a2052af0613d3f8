//! Shared foundational types used across the rainbow-build workspace.
//!
//! This crate provides content hashing for cache keys, the validated
//! [`Language`] identifier, the missing-language policy, and
//! order-preserving deduplication.

#![warn(missing_docs)]

pub mod hash;
pub mod language;

pub use hash::{ContentHash, ContentHasher};
pub use language::{dedup_languages, Language, MissingLanguage, ParseLanguageError};
