//! Catalog file format.
//!
//! A catalog is a YAML document of arbitrarily nested mappings, flattened
//! into dotted keys. A mapping with a `text` key is a leaf carrying
//! metadata:
//!
//! ```yaml
//! errata:
//!   en:
//!     errors:
//!       filled?: "must be filled"
//!       format?:
//!         text: "is in invalid format"
//!         code: 1002
//! ```

use std::collections::BTreeMap;
use std::path::Path as FsPath;

use serde_yaml::Value as Yaml;

use super::error::{LoadError, TemplateError};
use super::template::{Template, parse_template};

/// Key that turns a mapping into a leaf with metadata.
const TEXT_KEY: &str = "text";

/// One resolved catalog value.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// The raw template source.
    pub source: String,
    pub template: Template,
    /// Side-channel values stored next to `text`.
    pub meta: BTreeMap<String, String>,
}

/// Parse catalog `content` into flattened `(key, entry)` pairs, in document
/// order. `path` is only used for error reporting.
pub fn parse_catalog(content: &str, path: &FsPath) -> Result<Vec<(String, CatalogEntry)>, LoadError> {
    let document: Yaml = serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    match document {
        Yaml::Null => {}
        Yaml::Mapping(_) => flatten(&document, "", path, &mut entries)?,
        _ => {
            return Err(LoadError::Catalog {
                path: path.to_path_buf(),
                key: String::new(),
                message: "catalog root must be a mapping".to_string(),
            });
        }
    }
    Ok(entries)
}

fn flatten(
    value: &Yaml,
    prefix: &str,
    path: &FsPath,
    entries: &mut Vec<(String, CatalogEntry)>,
) -> Result<(), LoadError> {
    match value {
        Yaml::Mapping(mapping) if mapping.contains_key(TEXT_KEY) => {
            let mut meta = BTreeMap::new();
            let mut source = String::new();
            for (key, value) in mapping {
                let key = scalar_key(key, prefix, path)?;
                let text = scalar_text(value).ok_or_else(|| invalid(path, prefix, "metadata values must be scalars"))?;
                if key == TEXT_KEY {
                    source = text;
                } else {
                    meta.insert(key, text);
                }
            }
            entries.push((prefix.to_string(), entry(prefix, source, meta, path)?));
        }
        Yaml::Mapping(mapping) => {
            for (key, value) in mapping {
                let key = scalar_key(key, prefix, path)?;
                let nested = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(value, &nested, path, entries)?;
            }
        }
        Yaml::Sequence(_) => return Err(invalid(path, prefix, "sequences are not allowed")),
        Yaml::Null => return Err(invalid(path, prefix, "value is empty")),
        scalar => {
            let source = scalar_text(scalar).ok_or_else(|| invalid(path, prefix, "unsupported value"))?;
            entries.push((prefix.to_string(), entry(prefix, source, BTreeMap::new(), path)?));
        }
    }
    Ok(())
}

fn entry(
    key: &str,
    source: String,
    meta: BTreeMap<String, String>,
    path: &FsPath,
) -> Result<CatalogEntry, LoadError> {
    let template = parse_template(&source).map_err(|e| match e {
        TemplateError::Syntax {
            line,
            column,
            message,
        } => LoadError::Template {
            path: path.to_path_buf(),
            key: key.to_string(),
            line,
            column,
            message,
        },
    })?;
    Ok(CatalogEntry {
        source,
        template,
        meta,
    })
}

fn scalar_key(key: &Yaml, prefix: &str, path: &FsPath) -> Result<String, LoadError> {
    scalar_text(key).ok_or_else(|| invalid(path, prefix, "keys must be scalars"))
}

fn scalar_text(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Null | Yaml::Sequence(_) | Yaml::Mapping(_) | Yaml::Tagged(_) => None,
    }
}

fn invalid(path: &FsPath, key: &str, message: &str) -> LoadError {
    LoadError::Catalog {
        path: path.to_path_buf(),
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<(String, CatalogEntry)> {
        parse_catalog(content, FsPath::new("<test>")).unwrap()
    }

    #[test]
    fn nested_mappings_flatten_to_dotted_keys() {
        let entries = parse(
            r#"
errata:
  en:
    errors:
      filled?: "must be filled"
      size?:
        arg:
          range: "size must be within %{size_left} - %{size_right}"
"#,
        );
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["errata.en.errors.filled?", "errata.en.errors.size?.arg.range"]
        );
        assert_eq!(entries[0].1.source, "must be filled");
    }

    #[test]
    fn text_mapping_is_leaf_with_meta() {
        let entries = parse(
            r#"
errata:
  en:
    errors:
      format?:
        text: "is in invalid format"
        code: 1002
"#,
        );
        assert_eq!(entries.len(), 1);
        let (key, entry) = &entries[0];
        assert_eq!(key, "errata.en.errors.format?");
        assert_eq!(entry.source, "is in invalid format");
        assert_eq!(entry.meta.get("code").map(String::as_str), Some("1002"));
    }

    #[test]
    fn empty_document_has_no_entries() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn sequence_values_are_rejected() {
        let err = parse_catalog("a:\n  - b\n", FsPath::new("x.yml")).unwrap_err();
        assert!(matches!(err, LoadError::Catalog { ref key, .. } if key == "a"));
    }

    #[test]
    fn scalar_root_is_rejected() {
        let err = parse_catalog("just text", FsPath::new("x.yml")).unwrap_err();
        assert!(matches!(err, LoadError::Catalog { .. }));
    }
}
