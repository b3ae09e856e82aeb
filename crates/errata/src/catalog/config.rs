//! Settings for building a template store.

use std::fs;
use std::path::{Path as FsPath, PathBuf};

use bon::Builder;
use serde::Deserialize;

use super::error::LoadError;

/// Top-level catalog namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "errata";

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Immutable settings for a [`TemplateStore`](super::TemplateStore).
///
/// Built once, either in code or from a YAML settings document, and passed
/// to the store at construction. Nothing here is global.
///
/// # Example
///
/// ```
/// use errata::Config;
///
/// let config = Config::builder()
///     .default_locale("pl")
///     .full(true)
///     .build();
///
/// assert_eq!(config.namespace, "errata");
/// assert_eq!(config.default_locale, "pl");
/// assert!(config.hints);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Deserialize)]
#[builder(on(String, into))]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Catalog files loaded after the embedded base pack, in order. Later
    /// files override earlier ones.
    #[builder(default)]
    pub load_paths: Vec<PathBuf>,

    /// Top-level catalog namespace, the first segment of every key.
    #[builder(default = DEFAULT_NAMESPACE.to_string())]
    pub namespace: String,

    /// Locale used when a compilation does not ask for one, and the
    /// fallback when a requested locale has no matching template.
    #[builder(default = DEFAULT_LOCALE.to_string())]
    pub default_locale: String,

    /// Whether hint subtrees are compiled.
    #[builder(default = true)]
    pub hints: bool,

    /// Whether rendered text is prefixed with the rule label.
    #[builder(default)]
    pub full: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

impl Config {
    /// Read settings from a YAML document.
    ///
    /// Missing keys take their defaults; unknown keys are rejected.
    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        Self::parse(content, FsPath::new("<settings>"))
    }

    /// Read settings from a YAML file.
    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &FsPath) -> Result<Self, LoadError> {
        serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(config.load_paths.is_empty());
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.default_locale, DEFAULT_LOCALE);
        assert!(config.hints);
        assert!(!config.full);
    }

    #[test]
    fn yaml_fills_missing_keys_with_defaults() {
        let config = Config::from_yaml_str("default_locale: de\nload_paths: [a.yml, b.yml]\n").unwrap();
        assert_eq!(config.default_locale, "de");
        assert_eq!(config.load_paths, vec![PathBuf::from("a.yml"), PathBuf::from("b.yml")]);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert!(config.hints);
    }

    #[test]
    fn yaml_rejects_unknown_keys() {
        let err = Config::from_yaml_str("colour: blue\n").unwrap_err();
        assert!(matches!(err, LoadError::Yaml { .. }));
    }
}
