//! Message catalogs.
//!
//! Catalog files are flattened into dotted keys, their values parsed into
//! `%{name}` templates, and layered in a [`TemplateStore`].

mod config;
mod error;
mod file;
mod store;
mod template;

pub use config::{Config, DEFAULT_LOCALE, DEFAULT_NAMESPACE};
pub use error::{LoadError, RenderError, TemplateError};
pub use file::{CatalogEntry, parse_catalog};
pub use store::{LookupKey, TemplateStore};
pub use template::{Segment, Template, parse_template};
