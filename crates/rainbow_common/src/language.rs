//! Language identifiers naming optional syntax definition files.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// The name of a syntax supported by a `language/<name>.js` definition file.
///
/// There is no registry of valid languages: a language is usable when its
/// definition file exists on disk. Parsing only rejects names that could not
/// be a plain file stem inside the `language/` directory.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the definition file name, e.g. `python.js`.
    pub fn file_name(&self) -> String {
        format!("{}.js", self.0)
    }
}

/// Error returned when a string is not a usable language identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid language identifier '{input}': {reason}")]
pub struct ParseLanguageError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: &'static str,
}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let reject = |reason| ParseLanguageError {
            input: s.to_string(),
            reason,
        };
        if s.is_empty() {
            return Err(reject("identifier is empty"));
        }
        if s.starts_with('.') {
            return Err(reject("identifier may not start with '.'"));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
        {
            return Err(reject("only ASCII letters, digits, '-', '_', '+' and '.' are allowed"));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = ParseLanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.0
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Language({})", self.0)
    }
}

/// What to do when a requested language has no definition file on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLanguage {
    /// Leave the language out and carry on.
    #[default]
    Skip,
    /// Stop with an error naming the missing file.
    Fail,
}

/// Removes duplicate languages, keeping the first occurrence of each.
///
/// The relative order of the survivors is the order they were requested in,
/// so the same request always produces the same file set.
pub fn dedup_languages<I>(languages: I) -> Vec<Language>
where
    I: IntoIterator<Item = Language>,
{
    let mut seen = HashSet::new();
    languages
        .into_iter()
        .filter(|lang| seen.insert(lang.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(s: &str) -> Language {
        s.parse().unwrap()
    }

    #[test]
    fn parse_plain_names() {
        for name in ["python", "c", "tsql", "objective-c", "c++", "html5", "go_lang"] {
            assert_eq!(lang(name).as_str(), name);
        }
    }

    #[test]
    fn reject_empty() {
        let err = "".parse::<Language>().unwrap_err();
        assert_eq!(err.reason, "identifier is empty");
    }

    #[test]
    fn reject_path_like() {
        assert!("../rainbow".parse::<Language>().is_err());
        assert!("extra/toggle".parse::<Language>().is_err());
        assert!("a\\b".parse::<Language>().is_err());
        assert!("..".parse::<Language>().is_err());
        assert!(".hidden".parse::<Language>().is_err());
    }

    #[test]
    fn error_display_names_input() {
        let err = "a/b".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("'a/b'"));
    }

    #[test]
    fn file_name_appends_js() {
        assert_eq!(lang("python").file_name(), "python.js");
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let input = ["python", "go", "python", "ruby", "go"].map(lang);
        let out = dedup_languages(input);
        assert_eq!(out, vec![lang("python"), lang("go"), lang("ruby")]);
    }

    #[test]
    fn dedup_empty() {
        assert!(dedup_languages(Vec::new()).is_empty());
    }

    #[test]
    fn missing_language_default_is_skip() {
        assert_eq!(MissingLanguage::default(), MissingLanguage::Skip);
    }

    #[test]
    fn missing_language_serde_lowercase() {
        let json = serde_json::to_string(&MissingLanguage::Fail).unwrap();
        assert_eq!(json, "\"fail\"");
        let back: MissingLanguage = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(back, MissingLanguage::Skip);
    }

    #[test]
    fn serde_as_plain_string() {
        let json = serde_json::to_string(&lang("php")).unwrap();
        assert_eq!(json, "\"php\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lang("php"));
        assert!(serde_json::from_str::<Language>("\"../x\"").is_err());
    }
}
