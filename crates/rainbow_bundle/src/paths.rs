//! Locating the core script, language files, and the compiler.

use std::path::{Path, PathBuf};

use rainbow_common::Language;

use crate::error::BuildError;

/// File name of the core script inside the script directory.
pub const CORE_SCRIPT: &str = "rainbow.js";

/// Subdirectory holding one `<name>.js` file per language.
pub const LANGUAGE_DIR: &str = "language";

/// Returns where the definition file for `language` lives under `base`.
///
/// The file may not exist.
pub fn path_for_language(base: &Path, language: &Language) -> PathBuf {
    base.join(LANGUAGE_DIR).join(language.file_name())
}

/// Returns the path of the core script under `base`.
pub fn core_path(base: &Path) -> PathBuf {
    base.join(CORE_SCRIPT)
}

/// Checks that `base` is a directory and `compiler` is a regular file.
pub fn verify_paths(base: &Path, compiler: &Path) -> Result<(), BuildError> {
    if !base.is_dir() {
        return Err(BuildError::Configuration(format!(
            "directory does not exist at: {}",
            base.display()
        )));
    }
    if !compiler.is_file() {
        return Err(BuildError::Configuration(format!(
            "compiler does not exist at: {}",
            compiler.display()
        )));
    }
    Ok(())
}

/// Lists every language with a definition file under `base`, sorted by name.
///
/// Files whose stem is not a valid [`Language`] are ignored. A missing
/// `language/` directory yields an empty list.
pub fn discover_languages(base: &Path) -> Result<Vec<Language>, BuildError> {
    let dir = base.join(LANGUAGE_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&dir).map_err(|e| BuildError::Io {
        path: dir.clone(),
        source: e,
    })?;

    let mut languages = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::Io {
            path: dir.clone(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("js") {
            continue;
        }
        if let Some(lang) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<Language>().ok())
        {
            languages.push(lang);
        }
    }
    languages.sort();
    Ok(languages)
}
