//! `rainbow-build zip`: package unminified sources into a zip archive.

use rainbow_bundle::Builder;

use crate::pipeline::{build_settings, load_project, parent_dir, select_languages, status};
use crate::{GlobalArgs, ZipArgs};

/// Runs the `rainbow-build zip` command.
///
/// The archive is assembled in a temporary file next to the destination and
/// renamed into place once complete. Returns exit code 0 on success.
pub fn run(args: &ZipArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let builder = Builder::new(build_settings(&project.config));
    let languages = select_languages(&builder, &args.languages, args.all)?;

    status(
        global,
        "Packaging",
        format!("rainbow.js and {} language(s)", languages.len()),
    );

    let parent = parent_dir(&args.output);
    std::fs::create_dir_all(parent)?;
    let tmp = tempfile::NamedTempFile::new_in(parent)?;
    let tmp = builder.archive(&languages, tmp)?;
    tmp.persist(&args.output)
        .map_err(|e| format!("failed to write {}: {}", args.output.display(), e.error))?;

    status(global, "Writing", args.output.display());
    Ok(0)
}
