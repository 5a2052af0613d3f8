//! Parsing and validation of `rainbow.toml` build configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`RainbowConfig`], then resolves its relative paths into a
//! [`ResolvedConfig`] ready to drive a build.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve, ResolvedConfig};
pub use types::*;
