//! Path resolution: turning a parsed configuration into absolute build settings.

use crate::error::ConfigError;
use crate::loader::validate_config;
use crate::types::RainbowConfig;
use rainbow_common::MissingLanguage;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A configuration with every relative path anchored to a base directory.
///
/// This is what the CLI hands to the bundle builder; nothing downstream
/// reads the current working directory.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory containing `rainbow.js` and `language/`.
    pub js_dir: PathBuf,
    /// Compiler executable or `.jar`.
    pub compiler: PathBuf,
    /// Java launcher for `.jar` compilers.
    pub java: String,
    /// Upper bound on a single compiler run.
    pub timeout: Duration,
    /// Extra compiler flags.
    pub extra_args: Vec<String>,
    /// Cache root, if caching is enabled.
    pub cache_dir: Option<PathBuf>,
    /// Directory built bundles are written to.
    pub output_dir: PathBuf,
    /// Missing-language policy for bundles.
    pub bundle_on_missing: MissingLanguage,
    /// Missing-language policy for archives.
    pub archive_on_missing: MissingLanguage,
}

/// Resolves `config` against `base_dir`.
///
/// Absolute paths are kept as-is; relative ones are joined onto `base_dir`.
/// The output directory defaults to the script directory.
pub fn resolve(config: &RainbowConfig, base_dir: &Path) -> Result<ResolvedConfig, ConfigError> {
    validate_config(config)?;

    let anchor = |p: &str| -> PathBuf {
        let path = Path::new(p);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    };

    let js_dir = anchor(&config.paths.js_dir);
    let output_dir = config
        .paths
        .output_dir
        .as_deref()
        .map(&anchor)
        .unwrap_or_else(|| js_dir.clone());

    Ok(ResolvedConfig {
        compiler: anchor(&config.paths.compiler),
        java: config.compiler.java.clone(),
        timeout: Duration::from_secs(config.compiler.timeout_secs),
        extra_args: config.compiler.extra_args.clone(),
        cache_dir: config.paths.cache_dir.as_deref().map(&anchor),
        output_dir,
        js_dir,
        bundle_on_missing: config.bundle.on_missing,
        archive_on_missing: config.archive.on_missing,
    })
}
