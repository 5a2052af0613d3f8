//! Configuration types deserialized from `rainbow.toml`.

use rainbow_common::MissingLanguage;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// Default location of the Closure Compiler jar.
pub const DEFAULT_COMPILER: &str = "/usr/local/compiler-latest/compiler.jar";

/// Default bound on a single compiler run, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// The top-level configuration parsed from `rainbow.toml`.
///
/// Every section is optional; a missing file behaves like an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct RainbowConfig {
    /// Filesystem locations (script directory, compiler, cache, output).
    #[serde(default)]
    pub paths: PathsConfig,
    /// How the external compiler is launched.
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Settings for minified bundle builds.
    #[serde(default)]
    pub bundle: BundleConfig,
    /// Settings for zip archive packaging.
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Filesystem locations used by a build.
///
/// Relative paths are interpreted relative to the directory holding
/// `rainbow.toml` (see [`resolve`](crate::resolve)).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory containing `rainbow.js` and the `language/` subdirectory.
    pub js_dir: String,
    /// Path to the compiler executable or `.jar`.
    pub compiler: String,
    /// Root of the bundle cache. Caching is disabled when unset.
    pub cache_dir: Option<String>,
    /// Where built bundles are written. Defaults to `js_dir`.
    pub output_dir: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            js_dir: "js".to_string(),
            compiler: DEFAULT_COMPILER.to_string(),
            cache_dir: None,
            output_dir: None,
        }
    }
}

/// Settings for launching the external compiler.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Java launcher used when the compiler is a `.jar` file.
    pub java: String,
    /// Seconds to wait for the compiler before killing it.
    pub timeout_secs: u64,
    /// Extra flags appended after the fixed optimization flags.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(deserialize_with = "deserialize_string_or_vec")]
    pub extra_args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            extra_args: Vec::new(),
        }
    }
}

/// Settings for minified bundle builds.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Policy for requested languages without a definition file.
    pub on_missing: MissingLanguage,
}

/// Settings for zip archive packaging.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Policy for requested languages without a definition file.
    pub on_missing: MissingLanguage,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            on_missing: MissingLanguage::Fail,
        }
    }
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `extra_args = "--warning_level=QUIET"` as well as
/// `extra_args = ["--warning_level", "QUIET"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
