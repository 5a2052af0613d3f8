//! rainbow-build: the command-line front end for building Rainbow bundles.
//!
//! Provides `rainbow-build build` for minified bundles, `rainbow-build zip`
//! for source archives, `rainbow-build languages` to list what can be
//! bundled, and `rainbow-build cache` to inspect or clear the bundle cache.

#![warn(missing_docs)]

mod archive;
mod build;
mod cache;
mod languages;
mod logging;
mod pipeline;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use rainbow_common::Language;

/// Builds custom Rainbow syntax-highlighter bundles.
#[derive(Parser, Debug)]
#[command(name = "rainbow-build", version, about = "Rainbow bundle builder")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `rainbow.toml` file or the directory containing one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory containing `rainbow.js` and `language/`.
    #[arg(long, global = true)]
    pub js_dir: Option<PathBuf>,

    /// Compiler executable or `.jar`.
    #[arg(long, global = true)]
    pub compiler: Option<PathBuf>,

    /// Root directory of the bundle cache.
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Ignore the bundle cache for this run.
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a minified bundle.
    Build(BuildArgs),
    /// Package unminified sources into a zip archive.
    Zip(ZipArgs),
    /// List the languages that can be bundled.
    Languages,
    /// Inspect or clear the bundle cache.
    #[command(subcommand)]
    Cache(CacheCommand),
}

/// Arguments for the `rainbow-build build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Languages to include, in order.
    #[arg(conflicts_with = "all")]
    pub languages: Vec<Language>,

    /// Include every language found under `language/`.
    #[arg(long)]
    pub all: bool,

    /// Output file (default: `<output_dir>/rainbow[-custom].min.js`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Format of the build manifest printed to stdout.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `rainbow-build zip` subcommand.
#[derive(Parser, Debug)]
pub struct ZipArgs {
    /// Languages to include, in order.
    #[arg(conflicts_with = "all")]
    pub languages: Vec<Language>,

    /// Include every language found under `language/`.
    #[arg(long)]
    pub all: bool,

    /// Archive file to write.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// `rainbow-build cache` subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// List cached bundles.
    List {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Delete cached bundles.
    Clear {
        /// Only delete entries for this library version.
        #[arg(long)]
        version: Option<String>,
    },
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a config file or its directory.
    pub config: Option<PathBuf>,
    /// Overrides `paths.js_dir`.
    pub js_dir: Option<PathBuf>,
    /// Overrides `paths.compiler`.
    pub compiler: Option<PathBuf>,
    /// Overrides `paths.cache_dir`.
    pub cache_dir: Option<PathBuf>,
    /// Disables the cache regardless of configuration.
    pub no_cache: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
        js_dir: cli.js_dir,
        compiler: cli.compiler,
        cache_dir: cli.cache_dir,
        no_cache: cli.no_cache,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Zip(ref args) => archive::run(args, &global),
        Command::Languages => languages::run(&global),
        Command::Cache(ref cmd) => cache::run(cmd, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
