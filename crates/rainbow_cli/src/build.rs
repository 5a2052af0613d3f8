//! `rainbow-build build`: compile a minified bundle and write it to disk.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rainbow_bundle::{Builder, Bundle, CacheStatus};
use rainbow_common::Language;
use serde::Serialize;

use crate::pipeline::{
    build_settings, ensure_cache_dir, load_project, select_languages, status, write_atomic,
};
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Runs the `rainbow-build build` command.
///
/// Prints progress to stderr, writes the bundle, then prints the manifest of
/// files that went into it to stdout. Returns exit code 0 on success.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    ensure_cache_dir(&project.config)?;
    let builder = Builder::new(build_settings(&project.config));

    let languages = select_languages(&builder, &args.languages, args.all)?;
    status(
        global,
        "Resolving",
        format!(
            "{} language(s) in {}",
            languages.len(),
            project.config.js_dir.display()
        ),
    );
    status(global, "Building", describe(&languages));

    let started = Instant::now();
    let bundle = builder.bundle(&languages)?;
    for language in bundle.file_set.skipped() {
        status(global, "Skipping", format!("{language} (no definition file)"));
    }
    let (verb, message) = outcome(&bundle, started.elapsed());
    status(global, verb, message);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| project.config.output_dir.join(bundle.file_name()));
    write_atomic(&output, bundle.text.as_bytes())?;
    status(global, "Writing", output.display());

    println!("{}", render_manifest(&bundle, &output, args.format)?);
    Ok(0)
}

fn describe(languages: &[Language]) -> String {
    if languages.is_empty() {
        "rainbow (core only)".to_string()
    } else {
        let names: Vec<&str> = languages.iter().map(Language::as_str).collect();
        format!("rainbow with {}", names.join(", "))
    }
}

/// Progress line reporting how the bundle was produced.
fn outcome(bundle: &Bundle, elapsed: Duration) -> (&'static str, String) {
    match (bundle.cache, &bundle.key) {
        (CacheStatus::Hit, Some(key)) => ("Cached", format!("v{} {key}", bundle.version)),
        _ => (
            "Compiled",
            format!(
                "v{} from {} file(s) in {:.2}s",
                bundle.version,
                bundle.file_set.len(),
                elapsed.as_secs_f64()
            ),
        ),
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    version: &'a str,
    output: PathBuf,
    files: Vec<PathBuf>,
    included: Vec<Language>,
    skipped: &'a [Language],
    cache: &'static str,
    key: Option<String>,
    bytes: usize,
}

fn cache_label(status: CacheStatus) -> &'static str {
    match status {
        CacheStatus::Hit => "hit",
        CacheStatus::Miss => "miss",
        CacheStatus::Disabled => "disabled",
    }
}

/// Renders the build manifest: one input path per line, or a JSON object.
fn render_manifest(
    bundle: &Bundle,
    output: &Path,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => {
            let lines: Vec<String> = bundle
                .file_set
                .paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            Ok(lines.join("\n"))
        }
        ReportFormat::Json => {
            let manifest = Manifest {
                version: &bundle.version,
                output: output.to_path_buf(),
                files: bundle.file_set.paths(),
                included: bundle.file_set.included(),
                skipped: bundle.file_set.skipped(),
                cache: cache_label(bundle.cache),
                key: bundle.key.map(|k| k.to_string()),
                bytes: bundle.text.len(),
            };
            serde_json::to_string_pretty(&manifest)
        }
    }
}
