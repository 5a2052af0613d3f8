//! The bundle cache directory: lookup, store, listing, and clearing.

use std::io::Write;
use std::path::{Path, PathBuf};

use rainbow_common::ContentHash;
use serde::Serialize;

use crate::error::CacheError;

/// A single cached bundle on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    /// Library version directory the entry lives under.
    pub version: String,
    /// Hex cache key (the file name).
    pub key: String,
    /// Size of the stored bundle in bytes.
    pub size: u64,
}

/// Cache of compiled bundles rooted at a directory.
///
/// Entries live at `<root>/<version>/<key>`. If `root` is not an existing
/// directory the cache is disabled: lookups miss and stores are skipped.
/// The root itself is never created here; enabling the cache is the
/// caller's decision.
#[derive(Debug, Clone)]
pub struct BundleCache {
    root: PathBuf,
}

impl BundleCache {
    /// Creates a cache handle for `root`. Does not touch the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `true` if the cache root exists and is a directory.
    pub fn is_enabled(&self) -> bool {
        self.root.is_dir()
    }

    /// Returns the path an entry for `(version, key)` is stored at.
    pub fn entry_path(&self, version: &str, key: &ContentHash) -> PathBuf {
        self.root.join(version).join(key.to_string())
    }

    /// Returns the cached bundle for `(version, key)`, if any.
    ///
    /// A disabled cache, an unusable version, or an unreadable entry are all
    /// misses.
    pub fn lookup(&self, version: &str, key: &ContentHash) -> Option<String> {
        if !self.is_enabled() || !is_plain_component(version) {
            return None;
        }
        let path = self.entry_path(version, key);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "bundle cache hit");
                Some(text)
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "bundle cache miss");
                None
            }
        }
    }

    /// Stores `output` for `(version, key)`, replacing any existing entry.
    ///
    /// The bundle is written to a temporary file in the version directory and
    /// renamed over the entry, so readers never observe a partial file and
    /// concurrent writers resolve to the last rename. Returns `false` without
    /// writing when the cache is disabled.
    pub fn store(
        &self,
        version: &str,
        key: &ContentHash,
        output: &str,
    ) -> Result<bool, CacheError> {
        if !self.is_enabled() {
            tracing::debug!(root = %self.root.display(), "bundle cache disabled; not storing");
            return Ok(false);
        }
        if !is_plain_component(version) {
            return Err(CacheError::InvalidVersion {
                version: version.to_string(),
            });
        }

        let dir = self.root.join(version);
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let path = self.entry_path(version, key);
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;
        let written = tmp.write_all(output.as_bytes()).and_then(|()| tmp.flush());
        written.map_err(|e| CacheError::Io {
            path: tmp.path().to_path_buf(),
            source: e,
        })?;
        tmp.persist(&path).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        tracing::debug!(path = %path.display(), bytes = output.len(), "stored bundle in cache");
        Ok(true)
    }

    /// Lists every entry in the cache, sorted by version then key.
    ///
    /// Files whose names are not cache keys (stray temp files, notes) are
    /// ignored. A disabled cache has no entries.
    pub fn entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        let mut entries = Vec::new();
        if !self.is_enabled() {
            return Ok(entries);
        }

        for version_dir in read_dir(&self.root)? {
            if !version_dir.is_dir() {
                continue;
            }
            let Some(version) = version_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            for path in read_dir(&version_dir)? {
                let Some(key) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if ContentHash::from_hex(key).is_none() || !path.is_file() {
                    continue;
                }
                let size = std::fs::metadata(&path)
                    .map_err(|e| CacheError::Io {
                        path: path.clone(),
                        source: e,
                    })?
                    .len();
                entries.push(CacheEntry {
                    version: version.to_string(),
                    key: key.to_string(),
                    size,
                });
            }
        }

        entries.sort_by(|a, b| (&a.version, &a.key).cmp(&(&b.version, &b.key)));
        Ok(entries)
    }

    /// Deletes cached entries, either all of them or only one version's.
    ///
    /// Emptied version directories are removed too. Returns the number of
    /// entries deleted.
    pub fn clear(&self, version: Option<&str>) -> Result<usize, CacheError> {
        let mut removed = 0;
        for entry in self.entries()? {
            if version.is_some_and(|v| v != entry.version) {
                continue;
            }
            let path = self.root.join(&entry.version).join(&entry.key);
            std::fs::remove_file(&path).map_err(|e| CacheError::Io {
                path: path.clone(),
                source: e,
            })?;
            removed += 1;

            // Only succeeds once the directory is empty.
            let _ = std::fs::remove_dir(self.root.join(&entry.version));
        }
        Ok(removed)
    }
}

/// Returns `true` if `s` is a single, ordinary path component.
fn is_plain_component(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\', '\0'])
}

fn read_dir(dir: &Path) -> Result<Vec<PathBuf>, CacheError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CacheError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CacheError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        paths.push(entry.path());
    }
    Ok(paths)
}
