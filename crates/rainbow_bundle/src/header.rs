//! Rewriting the minifier's header comment.
//!
//! The minifier reproduces the core script's preserved comment as the first
//! four lines of its output:
//!
//! ```text
//! /*
//!  @version 1.2
//!  @url rainbowco.de
//! */
//! ```
//!
//! That block is replaced with a single line naming the version, the URL,
//! and the languages compiled in.

use rainbow_common::Language;

use crate::error::BuildError;

/// Number of leading lines the minifier's header comment occupies.
pub const HEADER_LINES: usize = 4;

/// Values recovered from the minifier's header comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleHeader {
    /// Library version from line 2.
    pub version: String,
    /// Project URL from line 3.
    pub url: String,
}

impl BundleHeader {
    /// Renders the replacement one-line comment.
    ///
    /// The language list is only appended when at least one language was
    /// compiled in.
    pub fn render(&self, languages: &[Language]) -> String {
        let mut line = format!("/* Rainbow v{} {}", self.version, self.url);
        if !languages.is_empty() {
            let names: Vec<&str> = languages.iter().map(Language::as_str).collect();
            line.push_str(" | included languages: ");
            line.push_str(&names.join(", "));
        }
        line.push_str(" */");
        line
    }
}

/// Parses the version and URL out of raw compiler output.
pub fn parse_header(output: &str) -> Result<BundleHeader, BuildError> {
    let lines: Vec<&str> = output.lines().take(HEADER_LINES).collect();
    if lines.len() < HEADER_LINES {
        return Err(BuildError::Format(format!(
            "compiler output has {} line(s); expected a {HEADER_LINES}-line header comment",
            lines.len()
        )));
    }

    let version = tagged_value(lines[1], "@version", 2)?;
    let url = tagged_value(lines[2], "@url", 3)?;
    Ok(BundleHeader { version, url })
}

/// Replaces the header comment of `output` with one listing `languages`.
///
/// Lines after the header are kept verbatim and joined with `\n`.
pub fn rewrite_header(output: &str, languages: &[Language]) -> Result<String, BuildError> {
    let header = parse_header(output)?;
    let body: Vec<&str> = output.lines().skip(HEADER_LINES).collect();
    Ok(format!("{}\n{}", header.render(languages), body.join("\n")))
}

/// Strips `tag ` from a header line, tolerating a leading `@preserve`.
fn tagged_value(line: &str, tag: &str, line_no: usize) -> Result<String, BuildError> {
    let rest = line.trim_start();
    let rest = rest.strip_prefix("@preserve ").unwrap_or(rest).trim_start();
    let value = rest
        .strip_prefix(tag)
        .filter(|v| v.starts_with(char::is_whitespace))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            BuildError::Format(format!(
                "line {line_no} of compiler output should be '{tag} <value>', found '{}'",
                line.trim()
            ))
        })?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "/*\n @version 1.2\n @url rainbowco.de\n*/\nwindow.Rainbow=function(){};\nvar a=1;";

    fn langs(names: &[&str]) -> Vec<Language> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    #[test]
    fn parse_version_and_url() {
        let header = parse_header(RAW).unwrap();
        assert_eq!(header.version, "1.2");
        assert_eq!(header.url, "rainbowco.de");
    }

    #[test]
    fn rewrite_without_languages() {
        let out = rewrite_header(RAW, &[]).unwrap();
        assert_eq!(
            out,
            "/* Rainbow v1.2 rainbowco.de */\nwindow.Rainbow=function(){};\nvar a=1;"
        );
    }

    #[test]
    fn rewrite_with_languages() {
        let out = rewrite_header(RAW, &langs(&["python", "go"])).unwrap();
        let first = out.lines().next().unwrap();
        assert_eq!(
            first,
            "/* Rainbow v1.2 rainbowco.de | included languages: python, go */"
        );
        assert_eq!(first.matches("python").count(), 1);
        assert_eq!(first.matches("go").count(), 1);
    }

    #[test]
    fn body_lines_are_verbatim() {
        let raw = "/*\n @version 1.2\n @url u\n*/\n  indented;\n\nlast  ";
        let out = rewrite_header(raw, &[]).unwrap();
        let body: Vec<&str> = out.lines().skip(1).collect();
        assert_eq!(body, vec!["  indented;", "", "last  "]);
    }

    #[test]
    fn header_is_replaced_even_with_no_body() {
        let raw = "/*\n @version 1.2\n @url u\n*/";
        assert_eq!(rewrite_header(raw, &[]).unwrap(), "/* Rainbow v1.2 u */\n");
    }

    #[test]
    fn crlf_output() {
        let raw = "/*\r\n @version 1.2\r\n @url rainbowco.de\r\n*/\r\ncode();\r\n";
        let out = rewrite_header(raw, &[]).unwrap();
        assert_eq!(out, "/* Rainbow v1.2 rainbowco.de */\ncode();");
    }

    #[test]
    fn preserve_tag_is_tolerated() {
        let raw = "/*\n @preserve @version 1.2\n @url rainbowco.de\n*/\nx;";
        assert_eq!(parse_header(raw).unwrap().version, "1.2");
    }

    #[test]
    fn too_few_lines() {
        let err = parse_header("/*\n @version 1.2\n*/").unwrap_err();
        assert!(matches!(err, BuildError::Format(_)));
        assert!(err.to_string().contains("3 line(s)"));
    }

    #[test]
    fn missing_version_prefix() {
        let raw = "/*\n version 1.2\n @url rainbowco.de\n*/\nx;";
        let err = parse_header(raw).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn missing_url_prefix() {
        let raw = "/*\n @version 1.2\n rainbowco.de\n*/\nx;";
        let err = parse_header(raw).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn empty_value_is_rejected() {
        let raw = "/*\n @version \n @url rainbowco.de\n*/\nx;";
        assert!(parse_header(raw).is_err());
    }

    #[test]
    fn glued_tag_is_rejected() {
        let raw = "/*\n @versions 1.2\n @url rainbowco.de\n*/\nx;";
        assert!(parse_header(raw).is_err());
    }

    #[test]
    fn minified_code_without_header() {
        let raw = "window.Rainbow=function(){};\nvar a=1;\nvar b=2;\nvar c=3;";
        assert!(parse_header(raw).is_err());
    }
}
