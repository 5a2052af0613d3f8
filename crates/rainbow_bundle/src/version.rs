//! Reading the library version from the core script's header comment.

use std::path::Path;

use crate::error::BuildError;

const VERSION_TAG: &str = "@version";

/// Reads the `@version` marker from the core script at `core`.
pub fn read_version(core: &Path) -> Result<String, BuildError> {
    let text = std::fs::read_to_string(core).map_err(|e| BuildError::Io {
        path: core.to_path_buf(),
        source: e,
    })?;
    parse_version(&text).map_err(|e| match e {
        BuildError::Format(msg) => BuildError::Format(format!("{}: {msg}", core.display())),
        other => other,
    })
}

/// Extracts the version from the leading `/* ... */` comment of `source`.
///
/// The marker is the whitespace-delimited token `@version` followed by the
/// value, e.g. ` * @preserve @version 1.2`. The value must start with a digit
/// and contain only ASCII letters, digits, `.`, `-` and `+`, since it doubles
/// as the cache directory name.
pub fn parse_version(source: &str) -> Result<String, BuildError> {
    let comment = source
        .trim_start()
        .strip_prefix("/*")
        .ok_or_else(|| BuildError::Format("core script has no header comment".to_string()))?;
    let comment = comment.split("*/").next().unwrap_or(comment);

    let mut tokens = comment.split_whitespace();
    while let Some(token) = tokens.next() {
        if token != VERSION_TAG {
            continue;
        }
        let value = tokens.next().unwrap_or("");
        if is_version_like(value) {
            return Ok(value.to_string());
        }
        return Err(BuildError::Format(format!(
            "malformed {VERSION_TAG} marker: '{value}'"
        )));
    }

    Err(BuildError::Format(format!(
        "no {VERSION_TAG} marker in header comment"
    )))
}

fn is_version_like(value: &str) -> bool {
    value.starts_with(|c: char| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
}
