//! Error types for bundle and archive builds.

use std::path::PathBuf;
use std::process::ExitStatus;

use rainbow_cache::CacheError;
use rainbow_common::Language;

/// Errors that can occur while building a bundle or archive.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The script directory or compiler is not where the settings say.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A version marker or compiler header could not be parsed.
    #[error("format error: {0}")]
    Format(String),

    /// The external compiler did not produce a usable bundle.
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// A requested language has no definition file and the policy is `Fail`.
    #[error("no definition file for language '{language}' at {path}")]
    MissingLanguage {
        /// The requested language.
        language: Language,
        /// Where its definition file was expected.
        path: PathBuf,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the zip archive failed.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Writing to the bundle cache failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Failures of the external compiler process.
#[derive(Debug, thiserror::Error)]
pub enum CompilationError {
    /// The compiler process could not be started.
    #[error("failed to start compiler `{program}`: {source}")]
    Spawn {
        /// The program that was executed.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Waiting on the compiler process failed.
    #[error("failed to wait for compiler: {0}")]
    Wait(std::io::Error),

    /// The compiler exited unsuccessfully.
    #[error("compiler failed ({status}): {stderr}")]
    Failed {
        /// The compiler's exit status.
        status: ExitStatus,
        /// Everything the compiler wrote to stderr.
        stderr: String,
    },

    /// The compiler exited successfully but printed nothing.
    #[error("compiler produced no output: {stderr}")]
    EmptyOutput {
        /// Everything the compiler wrote to stderr.
        stderr: String,
    },

    /// The compiler ran longer than the configured timeout and was killed.
    #[error("compiler timed out after {secs}s: {stderr}")]
    Timeout {
        /// The timeout that was exceeded, in seconds.
        secs: u64,
        /// What the compiler wrote to stderr before it was killed.
        stderr: String,
    },
}
