//! Assembling the ordered list of files that make up a bundle.

use std::path::{Path, PathBuf};

use rainbow_common::{dedup_languages, Language, MissingLanguage};

use crate::error::BuildError;
use crate::paths::{core_path, path_for_language};

/// The files going into one bundle or archive.
///
/// The core script always comes first, followed by each included language
/// file in first-requested order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    core: PathBuf,
    languages: Vec<(Language, PathBuf)>,
    skipped: Vec<Language>,
}

impl FileSet {
    /// Path of the core script.
    pub fn core(&self) -> &Path {
        &self.core
    }

    /// Included languages with their definition file paths, in order.
    pub fn languages(&self) -> &[(Language, PathBuf)] {
        &self.languages
    }

    /// Included languages, in order.
    pub fn included(&self) -> Vec<Language> {
        self.languages.iter().map(|(lang, _)| lang.clone()).collect()
    }

    /// Requested languages left out because their file does not exist.
    pub fn skipped(&self) -> &[Language] {
        &self.skipped
    }

    /// All file paths, core script first.
    pub fn paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.core.clone())
            .chain(self.languages.iter().map(|(_, path)| path.clone()))
            .collect()
    }

    /// Number of files, counting the core script.
    pub fn len(&self) -> usize {
        1 + self.languages.len()
    }

    /// Always `false`: a file set contains at least the core script.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Builds the file set for `requested` languages under `base`.
///
/// Duplicates are removed keeping the first occurrence. A language whose
/// definition file does not exist is dropped under [`MissingLanguage::Skip`]
/// and is an error under [`MissingLanguage::Fail`]. With `Skip` this never
/// fails; asking only for unknown languages degrades to a core-only set.
pub fn assemble_file_set(
    base: &Path,
    requested: &[Language],
    on_missing: MissingLanguage,
) -> Result<FileSet, BuildError> {
    let mut languages = Vec::new();
    let mut skipped = Vec::new();

    for language in dedup_languages(requested.iter().cloned()) {
        let path = path_for_language(base, &language);
        if path.is_file() {
            languages.push((language, path));
            continue;
        }
        match on_missing {
            MissingLanguage::Skip => {
                tracing::debug!(%language, path = %path.display(), "no definition file; skipping language");
                skipped.push(language);
            }
            MissingLanguage::Fail => {
                return Err(BuildError::MissingLanguage { language, path });
            }
        }
    }

    Ok(FileSet {
        core: core_path(base),
        languages,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::LANGUAGE_DIR;

    fn lang(s: &str) -> Language {
        s.parse().unwrap()
    }

    fn langs(names: &[&str]) -> Vec<Language> {
        names.iter().map(|n| lang(n)).collect()
    }

    fn js_dir(languages: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rainbow.js"), "/* core */").unwrap();
        std::fs::create_dir_all(dir.path().join(LANGUAGE_DIR)).unwrap();
        for name in languages {
            std::fs::write(
                dir.path().join(LANGUAGE_DIR).join(format!("{name}.js")),
                format!("// {name}"),
            )
            .unwrap();
        }
        dir
    }

    #[test]
    fn core_first_then_requested_order() {
        let dir = js_dir(&["python", "go", "ruby"]);
        let set = assemble_file_set(dir.path(), &langs(&["ruby", "python"]), MissingLanguage::Skip)
            .unwrap();
        let paths = set.paths();
        assert_eq!(paths[0], dir.path().join("rainbow.js"));
        assert_eq!(paths[1], dir.path().join("language/ruby.js"));
        assert_eq!(paths[2], dir.path().join("language/python.js"));
        assert_eq!(set.included(), langs(&["ruby", "python"]));
    }

    #[test]
    fn duplicates_appear_once() {
        let dir = js_dir(&["python", "go"]);
        let set = assemble_file_set(
            dir.path(),
            &langs(&["go", "python", "go", "python", "go"]),
            MissingLanguage::Skip,
        )
        .unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.included(), langs(&["go", "python"]));
    }

    #[test]
    fn zero_languages_is_core_only() {
        let dir = js_dir(&["python"]);
        let set = assemble_file_set(dir.path(), &[], MissingLanguage::Skip).unwrap();
        assert_eq!(set.paths(), vec![dir.path().join("rainbow.js")]);
        assert!(set.included().is_empty());
        assert!(!set.is_empty());
    }

    #[test]
    fn only_unknown_languages_degrades_to_core() {
        let dir = js_dir(&["python"]);
        let set = assemble_file_set(
            dir.path(),
            &langs(&["cobol", "fortran", "cobol"]),
            MissingLanguage::Skip,
        )
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.skipped(), langs(&["cobol", "fortran"]).as_slice());
    }

    #[test]
    fn skip_keeps_the_found_ones() {
        let dir = js_dir(&["python"]);
        let set = assemble_file_set(dir.path(), &langs(&["python", "go"]), MissingLanguage::Skip)
            .unwrap();
        assert_eq!(set.included(), langs(&["python"]));
        assert_eq!(set.skipped(), langs(&["go"]).as_slice());
    }

    #[test]
    fn fail_names_the_missing_language() {
        let dir = js_dir(&["python"]);
        let err = assemble_file_set(dir.path(), &langs(&["python", "go"]), MissingLanguage::Fail)
            .unwrap_err();
        match err {
            BuildError::MissingLanguage { language, path } => {
                assert_eq!(language, lang("go"));
                assert!(path.ends_with("language/go.js"));
            }
            other => panic!("expected MissingLanguage, got {other:?}"),
        }
    }

    #[test]
    fn directory_named_like_a_language_is_not_a_file() {
        let dir = js_dir(&[]);
        std::fs::create_dir_all(dir.path().join("language/go.js")).unwrap();
        let set = assemble_file_set(dir.path(), &langs(&["go"]), MissingLanguage::Skip).unwrap();
        assert_eq!(set.len(), 1);
    }
}
