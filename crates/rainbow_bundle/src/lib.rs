//! Custom Rainbow bundle assembly.
//!
//! Resolves the core script and the requested language definition files,
//! runs them through an external minifier, rewrites the minifier's header
//! comment, and caches the result. The same file set can instead be packed
//! into a zip archive without minification.

#![warn(missing_docs)]

pub mod archive;
pub mod builder;
pub mod compiler;
pub mod error;
pub mod file_set;
pub mod header;
pub mod paths;
pub mod version;

pub use archive::{build_archive, CORE_ENTRY};
pub use builder::{output_file_name, BuildSettings, Builder, Bundle, CacheStatus};
pub use compiler::{CompilerCommand, CompilerOutput, OPTIMIZATION_FLAGS};
pub use error::{BuildError, CompilationError};
pub use file_set::{assemble_file_set, FileSet};
pub use header::{parse_header, rewrite_header, BundleHeader};
pub use paths::{core_path, discover_languages, path_for_language, verify_paths};
pub use version::{parse_version, read_version};
