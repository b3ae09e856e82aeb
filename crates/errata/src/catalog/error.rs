//! Error types for catalog and configuration loading.

use std::io::Error as IoError;
use std::path::PathBuf;

use serde_yaml::Error as YamlError;
use thiserror::Error;

/// An error in a message template's `%{...}` syntax.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
}

/// An error filling a template's placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A placeholder has no value.
    #[error("no value for placeholder '{token}'")]
    MissingValue { token: String },
}

/// Errors that occur while loading message catalogs or settings.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading a catalog or settings file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// The file is not valid YAML.
    #[error("failed to parse '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: YamlError,
    },

    /// The YAML is valid but not a usable catalog.
    #[error("{path}: invalid catalog entry '{key}': {message}")]
    Catalog {
        path: PathBuf,
        key: String,
        message: String,
    },

    /// A catalog value is not a valid message template.
    #[error("{path}: template '{key}' {line}:{column}: {message}")]
    Template {
        path: PathBuf,
        key: String,
        line: usize,
        column: usize,
        message: String,
    },
}
