//! Cache key computation for assembled file sets.

use std::path::{Path, PathBuf};

use rainbow_common::{ContentHash, ContentHasher};

use crate::error::CacheError;

/// Computes the cache key for an ordered file set.
///
/// Each file contributes its path and its full contents, in order, so a key
/// changes when a language file is edited in place. The key is order
/// sensitive: the same files listed in a different order produce a
/// different key, which only costs a redundant compile.
pub fn cache_key(files: &[PathBuf]) -> Result<ContentHash, CacheError> {
    let mut hasher = ContentHasher::new();
    for path in files {
        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update(&read(path)?);
    }
    Ok(hasher.finish())
}

fn read(path: &Path) -> Result<Vec<u8>, CacheError> {
    std::fs::read(path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
