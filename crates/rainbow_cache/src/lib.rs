//! On-disk cache of compiled bundles.
//!
//! A compiled bundle is stored as a flat text file at
//! `<cache_root>/<library version>/<key>`, where the key is a content hash of
//! the file set that produced it. A cache root that is not a directory turns
//! caching off without raising errors.

#![warn(missing_docs)]

pub mod error;
pub mod key;
pub mod store;

pub use error::CacheError;
pub use key::cache_key;
pub use store::{BundleCache, CacheEntry};
