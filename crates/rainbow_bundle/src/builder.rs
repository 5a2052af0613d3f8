//! The bundle build pipeline.
//!
//! Ties the pieces together: verify paths, assemble the file set, read the
//! library version, consult the cache, run the compiler on a miss, rewrite
//! the header, and store the result.

use std::io::{Cursor, Seek, Write};
use std::path::PathBuf;

use rainbow_cache::{cache_key, BundleCache};
use rainbow_common::{ContentHash, Language, MissingLanguage};

use crate::archive::build_archive;
use crate::compiler::CompilerCommand;
use crate::error::BuildError;
use crate::file_set::{assemble_file_set, FileSet};
use crate::header::rewrite_header;
use crate::paths::{discover_languages, verify_paths};
use crate::version::read_version;

/// Everything a [`Builder`] needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Directory containing `rainbow.js` and `language/`.
    pub js_dir: PathBuf,
    /// How to run the minifier.
    pub compiler: CompilerCommand,
    /// Cache root; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Missing-language policy for bundles.
    pub bundle_on_missing: MissingLanguage,
    /// Missing-language policy for archives.
    pub archive_on_missing: MissingLanguage,
}

impl BuildSettings {
    /// Settings with no cache and the default policies.
    pub fn new(js_dir: impl Into<PathBuf>, compiler: CompilerCommand) -> Self {
        Self {
            js_dir: js_dir.into(),
            compiler,
            cache_dir: None,
            bundle_on_missing: MissingLanguage::Skip,
            archive_on_missing: MissingLanguage::Fail,
        }
    }
}

/// Where a bundle's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the cache; the compiler did not run.
    Hit,
    /// Compiled and written to the cache.
    Miss,
    /// Compiled; caching is off.
    Disabled,
}

/// A finished bundle.
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Header line followed by the minified body.
    pub text: String,
    /// The files that went into it.
    pub file_set: FileSet,
    /// Library version read from the core script.
    pub version: String,
    /// Cache key of the file set, when caching is enabled.
    pub key: Option<ContentHash>,
    /// Whether the cache was used.
    pub cache: CacheStatus,
}

impl Bundle {
    /// Suggested output file name for this bundle.
    pub fn file_name(&self) -> &'static str {
        output_file_name(&self.file_set.included())
    }
}

/// Returns `rainbow.min.js` for a core-only bundle and
/// `rainbow-custom.min.js` otherwise.
pub fn output_file_name(included: &[Language]) -> &'static str {
    if included.is_empty() {
        "rainbow.min.js"
    } else {
        "rainbow-custom.min.js"
    }
}

/// Builds bundles and archives from a fixed set of [`BuildSettings`].
#[derive(Debug, Clone)]
pub struct Builder {
    settings: BuildSettings,
}

impl Builder {
    /// Creates a builder.
    pub fn new(settings: BuildSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings this builder was created with.
    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Every language with a definition file, sorted by name.
    pub fn available_languages(&self) -> Result<Vec<Language>, BuildError> {
        discover_languages(&self.settings.js_dir)
    }

    /// Builds a minified bundle containing `languages`.
    pub fn bundle(&self, languages: &[Language]) -> Result<Bundle, BuildError> {
        let settings = &self.settings;
        verify_paths(&settings.js_dir, &settings.compiler.compiler)?;

        let file_set =
            assemble_file_set(&settings.js_dir, languages, settings.bundle_on_missing)?;
        let version = read_version(file_set.core())?;
        let paths = file_set.paths();

        let cache = settings
            .cache_dir
            .as_ref()
            .map(BundleCache::new)
            .filter(BundleCache::is_enabled);

        let key = match &cache {
            Some(_) => Some(cache_key(&paths)?),
            None => None,
        };

        if let (Some(cache), Some(key)) = (&cache, &key) {
            if let Some(text) = cache.lookup(&version, key) {
                return Ok(Bundle {
                    text,
                    file_set,
                    version,
                    key: Some(*key),
                    cache: CacheStatus::Hit,
                });
            }
        }

        let output = settings.compiler.invoke(&paths)?;
        let text = rewrite_header(&output.stdout, &file_set.included())?;

        let status = match (&cache, &key) {
            (Some(cache), Some(key)) => {
                if cache.store(&version, key, &text)? {
                    CacheStatus::Miss
                } else {
                    CacheStatus::Disabled
                }
            }
            _ => CacheStatus::Disabled,
        };

        Ok(Bundle {
            text,
            file_set,
            version,
            key,
            cache: status,
        })
    }

    /// Writes a zip archive of the unminified files for `languages` to `sink`.
    pub fn archive<W: Write + Seek>(
        &self,
        languages: &[Language],
        sink: W,
    ) -> Result<W, BuildError> {
        build_archive(
            &self.settings.js_dir,
            &self.settings.compiler.compiler,
            languages,
            self.settings.archive_on_missing,
            sink,
        )
    }

    /// Like [`archive`](Self::archive), collecting the archive in memory.
    pub fn archive_to_vec(&self, languages: &[Language]) -> Result<Vec<u8>, BuildError> {
        Ok(self.archive(languages, Cursor::new(Vec::new()))?.into_inner())
    }
}
