//! Template storage with layered overrides and a resolved-lookup cache.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path as FsPath;
use std::sync::{PoisonError, RwLock};

use tracing::{debug, trace, warn};

use super::config::Config;
use super::error::LoadError;
use super::file::{CatalogEntry, parse_catalog};
use crate::types::MessageKind;

/// The English base pack, always loaded first.
const BASE_CATALOG: &str = include_str!("../../locales/en.yml");

/// Everything a candidate list depends on.
///
/// Two lookups with equal keys always resolve to the same catalog entry, so
/// the key is safe to cache on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    pub predicate: String,
    pub path: String,
    pub rule: Option<String>,
    pub arg_type: &'static str,
    pub val_type: &'static str,
    pub locale: String,
    pub namespace: Option<String>,
    pub message_type: MessageKind,
    pub negated: bool,
}

/// Holds message templates keyed by dotted catalog keys.
///
/// Catalogs are layered: the embedded base pack, then every configured
/// load path in order, then anything loaded explicitly. A later layer
/// replaces entries with the same key.
///
/// The store is mutated only while loading. Once shared it is read-only
/// apart from the lookup cache, which is behind a lock so one store can
/// serve concurrent compilations.
///
/// # Example
///
/// ```
/// use errata::{Config, TemplateStore};
///
/// let mut store = TemplateStore::new(Config::default()).unwrap();
/// store
///     .load_str("errata:\n  en:\n    errors:\n      filled?: \"cannot be blank\"\n")
///     .unwrap();
///
/// let entry = store.get("errata.en.errors.filled?").unwrap();
/// assert_eq!(entry.source, "cannot be blank");
/// ```
#[derive(Debug)]
pub struct TemplateStore {
    config: Config,
    entries: BTreeMap<String, CatalogEntry>,
    resolved: RwLock<HashMap<LookupKey, Option<String>>>,
}

impl TemplateStore {
    /// Builds a store from the base pack plus every configured load path.
    pub fn new(config: Config) -> Result<Self, LoadError> {
        let load_paths = config.load_paths.clone();
        let mut store = Self::empty(config);
        store.load_layer(BASE_CATALOG, FsPath::new("<base>"))?;
        for path in &load_paths {
            store.load_file(path)?;
        }
        Ok(store)
    }

    /// A store with no templates at all, not even the base pack.
    pub fn empty(config: Config) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
            resolved: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads a catalog file on top of the current entries.
    ///
    /// Returns the number of entries read from the file.
    pub fn load_file(&mut self, path: impl AsRef<FsPath>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_layer(&content, path)
    }

    /// Loads catalog text on top of the current entries.
    pub fn load_str(&mut self, content: &str) -> Result<usize, LoadError> {
        self.load_layer(content, FsPath::new("<string>"))
    }

    fn load_layer(&mut self, content: &str, origin: &FsPath) -> Result<usize, LoadError> {
        let entries = parse_catalog(content, origin)?;
        let count = entries.len();
        for (key, entry) in entries {
            if let Some(previous) = self.entries.get(&key) {
                if !previous.template.tokens().eq(entry.template.tokens()) {
                    warn!(
                        key = %key,
                        origin = %origin.display(),
                        "catalog override changes template placeholders"
                    );
                }
                if previous.meta.is_empty() != entry.meta.is_empty() {
                    warn!(
                        key = %key,
                        origin = %origin.display(),
                        had_meta = !previous.meta.is_empty(),
                        "catalog override changes entry shape"
                    );
                }
            }
            self.entries.insert(key, entry);
        }
        self.clear_cache();
        debug!(origin = %origin.display(), entries = count, "loaded message catalog");
        Ok(count)
    }

    /// Get an entry by its full dotted key.
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Every key, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first candidate that exists, caching the answer by `key`.
    ///
    /// `candidates` is only called on a cache miss.
    pub fn resolve(
        &self,
        key: &LookupKey,
        candidates: impl FnOnce() -> Vec<String>,
    ) -> Option<String> {
        {
            let cache = self.resolved.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cache.get(key) {
                trace!(predicate = %key.predicate, found = hit.is_some(), "template cache hit");
                return hit.clone();
            }
        }

        let found = candidates().into_iter().find(|candidate| self.contains(candidate));
        trace!(predicate = %key.predicate, path = %key.path, found = ?found, "resolved template");
        self.resolved
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), found.clone());
        found
    }

    /// Number of cached lookups.
    pub fn cache_len(&self) -> usize {
        self.resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every cached lookup.
    pub fn clear_cache(&self) {
        self.resolved
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
