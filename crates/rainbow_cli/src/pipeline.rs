//! Shared helpers for CLI commands.
//!
//! Locates and loads `rainbow.toml`, applies command-line overrides, turns
//! the result into [`BuildSettings`] for the bundle builder, and provides
//! the progress and file-writing helpers every subcommand uses.

use std::io::Write;
use std::path::{Path, PathBuf};

use rainbow_bundle::{BuildSettings, Builder, CompilerCommand};
use rainbow_common::Language;
use rainbow_config::{
    load_config, load_config_file, resolve, RainbowConfig, ResolvedConfig, CONFIG_FILE_NAME,
};

use crate::GlobalArgs;

/// A loaded configuration and the directory it was resolved against.
#[derive(Debug)]
pub struct Project {
    /// Directory relative config paths are anchored to.
    pub root: PathBuf,
    /// Fully resolved settings, CLI overrides applied.
    pub config: ResolvedConfig,
}

/// Walks up from `start` looking for the nearest directory containing
/// `rainbow.toml`.
pub fn find_config_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the project configuration for the current directory.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    load_project_from(global, &std::env::current_dir()?)
}

/// Loads the project configuration as seen from `cwd`.
///
/// With `--config`, a file is read directly and a directory is searched for
/// `rainbow.toml`. Without it, the nearest `rainbow.toml` in `cwd` or a parent
/// is used, falling back to built-in defaults anchored at `cwd`.
pub fn load_project_from(
    global: &GlobalArgs,
    cwd: &Path,
) -> Result<Project, Box<dyn std::error::Error>> {
    let (root, config) = match &global.config {
        Some(path) => {
            let path = cwd.join(path);
            if path.is_dir() {
                let config = load_config(&path)?;
                (path, config)
            } else {
                let config = load_config_file(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
                (root, config)
            }
        }
        None => match find_config_dir(cwd) {
            Some(dir) => {
                let config = load_config(&dir)?;
                (dir, config)
            }
            None => (cwd.to_path_buf(), RainbowConfig::default()),
        },
    };

    let mut resolved = resolve(&config, &root)?;
    apply_overrides(&mut resolved, global, cwd);
    tracing::debug!(root = %root.display(), js_dir = %resolved.js_dir.display(), "loaded configuration");
    Ok(Project {
        root,
        config: resolved,
    })
}

/// Applies `--js-dir`, `--compiler`, `--cache-dir`, and `--no-cache`.
///
/// Override paths are relative to `cwd`, not the config directory. An output
/// directory that defaulted to the script directory follows `--js-dir`.
pub fn apply_overrides(config: &mut ResolvedConfig, global: &GlobalArgs, cwd: &Path) {
    if let Some(js_dir) = &global.js_dir {
        let js_dir = cwd.join(js_dir);
        if config.output_dir == config.js_dir {
            config.output_dir = js_dir.clone();
        }
        config.js_dir = js_dir;
    }
    if let Some(compiler) = &global.compiler {
        config.compiler = cwd.join(compiler);
    }
    if let Some(cache_dir) = &global.cache_dir {
        config.cache_dir = Some(cwd.join(cache_dir));
    }
    if global.no_cache {
        config.cache_dir = None;
    }
}

/// Converts resolved configuration into builder settings.
pub fn build_settings(config: &ResolvedConfig) -> BuildSettings {
    let mut compiler = CompilerCommand::new(&config.compiler);
    compiler.java = config.java.clone();
    compiler.extra_args = config.extra_args.clone();
    compiler.timeout = config.timeout;

    let mut settings = BuildSettings::new(&config.js_dir, compiler);
    settings.cache_dir = config.cache_dir.clone();
    settings.bundle_on_missing = config.bundle_on_missing;
    settings.archive_on_missing = config.archive_on_missing;
    settings
}

/// Creates the configured cache root so builds can populate it.
pub fn ensure_cache_dir(config: &ResolvedConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = &config.cache_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("failed to create cache directory {}: {e}", dir.display()))?;
    }
    Ok(())
}

/// Returns `requested`, or every available language with `--all`.
pub fn select_languages(
    builder: &Builder,
    requested: &[Language],
    all: bool,
) -> Result<Vec<Language>, Box<dyn std::error::Error>> {
    if all {
        Ok(builder.available_languages()?)
    } else {
        Ok(requested.to_vec())
    }
}

/// Prints a right-aligned progress line to stderr unless `--quiet`.
pub fn status(global: &GlobalArgs, verb: &str, message: impl std::fmt::Display) {
    if !global.quiet {
        eprintln!("{verb:>12} {message}");
    }
}

/// Writes `contents` to `path` via a temporary file in the same directory.
///
/// Missing parent directories are created. Readers never observe a
/// partially written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    let parent = parent_dir(path);
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|e| format!("failed to write {}: {}", path.display(), e.error))?;
    Ok(())
}

/// Returns the directory `path` lives in, `.` for a bare file name.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
