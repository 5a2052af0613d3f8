//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache operations.
///
/// Reads are fail-safe and never produce these: an unreadable entry is a
/// cache miss. Writes, key computation, and maintenance do propagate them.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The library version cannot be used as a cache directory name.
    #[error("version '{version}' is not usable as a cache directory name")]
    InvalidVersion {
        /// The rejected version string.
        version: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/tmp/cache/1.2/abcd"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache I/O error"));
        assert!(msg.contains("1.2/abcd"));
    }

    #[test]
    fn invalid_version_display() {
        let err = CacheError::InvalidVersion {
            version: "../etc".to_string(),
        };
        assert!(err.to_string().contains("'../etc'"));
    }
}
