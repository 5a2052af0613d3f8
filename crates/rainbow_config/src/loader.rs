//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::RainbowConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "rainbow.toml";

/// Loads and validates a `rainbow.toml` configuration from a directory.
///
/// Reads `<dir>/rainbow.toml`, parses it, and validates it.
pub fn load_config(dir: &Path) -> Result<RainbowConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
///
/// Read and parse errors name the file.
pub fn load_config_file(path: &Path) -> Result<RainbowConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content).map_err(|e| match e {
        ConfigError::ParseError(msg) => {
            ConfigError::ParseError(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Parses and validates a `rainbow.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<RainbowConfig, ConfigError> {
    let config: RainbowConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required values are present and usable.
pub(crate) fn validate_config(config: &RainbowConfig) -> Result<(), ConfigError> {
    if config.paths.js_dir.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "paths.js_dir must not be empty".to_string(),
        ));
    }
    if config.paths.compiler.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "paths.compiler must not be empty".to_string(),
        ));
    }
    if config.compiler.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "compiler.timeout_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rainbow_common::MissingLanguage;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.paths.js_dir, "js");
        assert!(config.compiler.extra_args.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[paths]
js_dir = "public/js"
compiler = "tools/compiler.jar"
cache_dir = ".cache"
output_dir = "dist"

[compiler]
java = "/usr/bin/java"
timeout_secs = 45
extra_args = ["--warning_level", "QUIET"]

[bundle]
on_missing = "fail"

[archive]
on_missing = "skip"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.paths.js_dir, "public/js");
        assert_eq!(config.paths.compiler, "tools/compiler.jar");
        assert_eq!(config.paths.cache_dir.as_deref(), Some(".cache"));
        assert_eq!(config.paths.output_dir.as_deref(), Some("dist"));
        assert_eq!(config.compiler.java, "/usr/bin/java");
        assert_eq!(config.compiler.timeout_secs, 45);
        assert_eq!(config.compiler.extra_args.len(), 2);
        assert_eq!(config.bundle.on_missing, MissingLanguage::Fail);
        assert_eq!(config.archive.on_missing, MissingLanguage::Skip);
    }

    #[test]
    fn empty_js_dir_errors() {
        let toml = r#"
[paths]
js_dir = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_compiler_errors() {
        let toml = r#"
[paths]
compiler = "  "
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_timeout_errors() {
        let toml = r#"
[compiler]
timeout_secs = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn unknown_policy_errors() {
        let toml = r#"
[bundle]
on_missing = "ignore"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/dir/rainbow.toml"));
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn existing_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[paths]\njs_dir = \"src\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.paths.js_dir, "src");
    }

    #[test]
    fn custom_file_name_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(&path, "[compiler]\ntimeout_secs = 5\n").unwrap();
        let config = load_config_file(&path).unwrap();
        assert_eq!(config.compiler.timeout_secs, 5);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[paths\n").unwrap();
        let err = load_config(dir.path()).unwrap_err();
        match err {
            ConfigError::ParseError(msg) => {
                assert!(msg.starts_with(&path.display().to_string()), "msg: {msg}");
            }
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn validation_error_is_not_rewrapped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[paths]\njs_dir = \"\"\n").unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
