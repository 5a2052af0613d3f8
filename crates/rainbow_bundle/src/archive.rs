//! Packing the unminified file set into a zip archive.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use rainbow_common::{Language, MissingLanguage};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::BuildError;
use crate::file_set::assemble_file_set;
use crate::paths::{verify_paths, LANGUAGE_DIR};

/// Archive entry name of the core script.
pub const CORE_ENTRY: &str = "rainbow.js";

/// Writes the core script and each requested language file into a
/// deflate-compressed zip archive on `sink`, returning the sink.
///
/// Paths are verified first, exactly as for a minified build. Entries are
/// `rainbow.js` and `language/<name>.js`. With [`MissingLanguage::Fail`] a
/// missing language file aborts packaging.
pub fn build_archive<W: Write + Seek>(
    base: &Path,
    compiler: &Path,
    languages: &[Language],
    on_missing: MissingLanguage,
    sink: W,
) -> Result<W, BuildError> {
    verify_paths(base, compiler)?;
    let file_set = assemble_file_set(base, languages, on_missing)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(sink);

    add_file(&mut zip, CORE_ENTRY.to_string(), file_set.core(), options)?;
    for (language, path) in file_set.languages() {
        let entry = format!("{LANGUAGE_DIR}/{}", language.file_name());
        add_file(&mut zip, entry, path, options)?;
    }

    tracing::debug!(entries = file_set.len(), "wrote archive");
    Ok(zip.finish()?)
}

fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: String,
    path: &Path,
    options: SimpleFileOptions,
) -> Result<(), BuildError> {
    let io_err = |e| BuildError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::open(path).map_err(io_err)?;
    zip.start_file(entry, options)?;
    std::io::copy(&mut file, zip).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn setup(languages: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rainbow.js"), "/* core */").unwrap();
        std::fs::create_dir_all(dir.path().join(LANGUAGE_DIR)).unwrap();
        for name in languages {
            std::fs::write(
                dir.path().join(LANGUAGE_DIR).join(format!("{name}.js")),
                format!("Rainbow.extend('{name}', []);"),
            )
            .unwrap();
        }
        let compiler = dir.path().join("compiler.jar");
        std::fs::write(&compiler, "").unwrap();
        (dir, compiler)
    }

    fn langs(names: &[&str]) -> Vec<Language> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn archive_layout() {
        let (dir, compiler) = setup(&["python", "go"]);
        let sink = build_archive(
            dir.path(),
            &compiler,
            &langs(&["python", "go", "python"]),
            MissingLanguage::Fail,
            Cursor::new(Vec::new()),
        )
        .unwrap();

        let mut names = entry_names(sink.into_inner());
        names.sort();
        assert_eq!(names, vec!["language/go.js", "language/python.js", "rainbow.js"]);
    }

    #[test]
    fn entries_are_deflated_with_source_content() {
        let (dir, compiler) = setup(&["go"]);
        let sink = build_archive(
            dir.path(),
            &compiler,
            &langs(&["go"]),
            MissingLanguage::Fail,
            Cursor::new(Vec::new()),
        )
        .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(sink.into_inner())).unwrap();
        let mut entry = archive.by_name("language/go.js").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        assert_eq!(text, "Rainbow.extend('go', []);");
    }

    #[test]
    fn missing_language_fails_under_fail_policy() {
        let (dir, compiler) = setup(&["python"]);
        let err = build_archive(
            dir.path(),
            &compiler,
            &langs(&["python", "go"]),
            MissingLanguage::Fail,
            Cursor::new(Vec::new()),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::MissingLanguage { .. }));
    }

    #[test]
    fn missing_language_skipped_under_skip_policy() {
        let (dir, compiler) = setup(&["python"]);
        let sink = build_archive(
            dir.path(),
            &compiler,
            &langs(&["python", "go"]),
            MissingLanguage::Skip,
            Cursor::new(Vec::new()),
        )
        .unwrap();
        let mut names = entry_names(sink.into_inner());
        names.sort();
        assert_eq!(names, vec!["language/python.js", "rainbow.js"]);
    }

    #[test]
    fn missing_compiler_is_a_configuration_error() {
        let (dir, _compiler) = setup(&[]);
        let err = build_archive(
            dir.path(),
            &dir.path().join("absent.jar"),
            &[],
            MissingLanguage::Fail,
            Cursor::new(Vec::new()),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Configuration(_)));
    }

    #[test]
    fn missing_core_script_is_an_io_error() {
        let (dir, compiler) = setup(&[]);
        std::fs::remove_file(dir.path().join("rainbow.js")).unwrap();
        let err = build_archive(
            dir.path(),
            &compiler,
            &[],
            MissingLanguage::Fail,
            Cursor::new(Vec::new()),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }
}
