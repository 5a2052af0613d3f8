//! `rainbow-build cache`: inspect and clear the bundle cache.

use rainbow_cache::{BundleCache, CacheEntry};

use crate::pipeline::{load_project, status};
use crate::{CacheCommand, GlobalArgs, ReportFormat};

/// Runs a `rainbow-build cache` subcommand.
pub fn run(cmd: &CacheCommand, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let Some(root) = project.config.cache_dir else {
        return Err("no cache directory configured (set paths.cache_dir or pass --cache-dir)".into());
    };
    let cache = BundleCache::new(root);

    match cmd {
        CacheCommand::List { format } => {
            let entries = cache.entries()?;
            let out = render_entries(&entries, *format)?;
            if !out.is_empty() {
                println!("{out}");
            }
        }
        CacheCommand::Clear { version } => {
            let removed = cache.clear(version.as_deref())?;
            status(
                global,
                "Removed",
                format!(
                    "{removed} cached bundle(s) from {}",
                    cache.root().display()
                ),
            );
        }
    }
    Ok(0)
}

fn render_entries(
    entries: &[CacheEntry],
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(entries
            .iter()
            .map(|e| format!("{:<10} {} {:>9}", e.version, e.key, e.size))
            .collect::<Vec<_>>()
            .join("\n")),
        ReportFormat::Json => serde_json::to_string_pretty(entries),
    }
}
