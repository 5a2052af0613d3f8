//! `rainbow-build languages`: list the languages that can be bundled.

use rainbow_bundle::Builder;

use crate::pipeline::{build_settings, load_project};
use crate::GlobalArgs;

/// Runs the `rainbow-build languages` command.
///
/// Prints one language identifier per line to stdout, sorted by name.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let builder = Builder::new(build_settings(&project.config));
    for language in builder.available_languages()? {
        println!("{language}");
    }
    Ok(0)
}
