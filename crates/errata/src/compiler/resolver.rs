//! Candidate-key cascade over a [`TemplateStore`].

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::trace;

use super::error::{CompileError, compute_suggestions};
use crate::catalog::{CatalogEntry, LookupKey, TemplateStore};
use crate::types::{MessageKind, Path};

/// Word joining disjunction alternatives when the catalog has none.
const FALLBACK_OR: &str = "or";

/// Segments under `errors` that are not predicate names.
const RESERVED_SEGMENTS: &[&str] = &["not", "rules"];

/// Everything about one predicate occurrence that selects a template.
#[derive(Debug, Clone, Copy)]
pub struct LookupContext<'a> {
    pub path: &'a Path,
    pub rule: Option<&'a str>,
    pub negated: bool,
    pub arg_type: &'static str,
    pub val_type: &'static str,
    pub locale: &'a str,
    pub message_type: MessageKind,
}

/// Finds the most specific template for a predicate.
///
/// A namespaced resolver tries keys under its branch namespace first and
/// then falls back to the plain keys the unnamespaced resolver would try.
/// All resolvers built from one store share its lookup cache.
#[derive(Debug, Clone)]
pub struct LookupResolver {
    store: Arc<TemplateStore>,
    namespace: Option<String>,
}

impl LookupResolver {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self {
            store,
            namespace: None,
        }
    }

    /// A resolver over the same store that prefers keys under `namespace`.
    pub fn namespaced(&self, namespace: impl Into<String>) -> Self {
        Self {
            store: Arc::clone(&self.store),
            namespace: Some(namespace.into()),
        }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Every key tried for `predicate`, most specific first.
    pub fn candidates(&self, predicate: &str, ctx: &LookupContext<'_>) -> Vec<String> {
        let default_locale = self.store.config().default_locale.as_str();
        let mut locales = vec![ctx.locale];
        if ctx.locale != default_locale {
            locales.push(default_locale);
        }

        let path = ctx.path.to_lookup_key();
        let mut out = Vec::new();
        for locale in locales {
            if let Some(namespace) = &self.namespace {
                let root = self.errors_root(locale, Some(namespace), ctx.negated);
                push_candidates(&mut out, &root, predicate, &path, ctx);
            }
            let root = self.errors_root(locale, None, ctx.negated);
            push_candidates(&mut out, &root, predicate, &path, ctx);
        }
        out
    }

    fn errors_root(&self, locale: &str, namespace: Option<&str>, negated: bool) -> String {
        let mut root = format!("{}.{locale}.errors", self.store.config().namespace);
        if let Some(namespace) = namespace {
            root.push('.');
            root.push_str(namespace);
        }
        if negated {
            root.push_str(".not");
        }
        root
    }

    /// The first candidate present in the store, with its entry.
    pub fn resolve(&self, predicate: &str, ctx: &LookupContext<'_>) -> Option<(String, &CatalogEntry)> {
        let key = LookupKey {
            predicate: predicate.to_string(),
            path: ctx.path.to_lookup_key(),
            rule: ctx.rule.map(str::to_string),
            arg_type: ctx.arg_type,
            val_type: ctx.val_type,
            locale: ctx.locale.to_string(),
            namespace: self.namespace.clone(),
            message_type: ctx.message_type,
            negated: ctx.negated,
        };
        let found = self.store.resolve(&key, || self.candidates(predicate, ctx))?;
        let entry = self.store.get(&found)?;
        Some((found, entry))
    }

    /// Localized label for a rule, from `<ns>.<locale>.rules.<rule>`.
    pub fn rule_label(&self, rule: &str, locale: &str) -> Option<String> {
        self.locale_entry(locale, &format!("rules.{rule}"))
            .map(|entry| entry.source.clone())
    }

    /// Localized word joining disjunction alternatives.
    pub fn or_word(&self, locale: &str) -> String {
        self.locale_entry(locale, "or")
            .map_or_else(|| FALLBACK_OR.to_string(), |entry| entry.source.clone())
    }

    fn locale_entry(&self, locale: &str, suffix: &str) -> Option<&CatalogEntry> {
        let config = self.store.config();
        self.store
            .get(&format!("{}.{locale}.{suffix}", config.namespace))
            .or_else(|| {
                self.store
                    .get(&format!("{}.{}.{suffix}", config.namespace, config.default_locale))
            })
    }

    /// Predicate names with at least one template in the default locale.
    pub fn known_predicates(&self) -> BTreeSet<&str> {
        let config = self.store.config();
        let prefix = format!("{}.{}.errors.", config.namespace, config.default_locale);
        self.store
            .keys()
            .filter_map(|key| key.strip_prefix(prefix.as_str()))
            .filter_map(|rest| rest.split('.').next())
            .filter(|name| !RESERVED_SEGMENTS.contains(name))
            .collect()
    }

    /// Fails with [`CompileError::UnknownPredicate`] unless `predicate` has
    /// a base template in the default locale.
    ///
    /// Used by exporters that translate predicates into another format
    /// (`target`) and need a message for each one up front.
    pub fn ensure_known(&self, predicate: &str, target: &str) -> Result<(), CompileError> {
        if self.known_predicates().contains(predicate) {
            Ok(())
        } else {
            Err(CompileError::UnknownPredicate {
                predicate: predicate.to_string(),
                target: target.to_string(),
            })
        }
    }

    /// Builds the error reported when no candidate matched.
    pub fn missing_message(&self, predicate: &str, ctx: &LookupContext<'_>) -> CompileError {
        let looked_up = self.candidates(predicate, ctx);
        let known = self.known_predicates();
        let suggestions = compute_suggestions(predicate, known.into_iter());
        trace!(predicate, candidates = looked_up.len(), "no template found");
        CompileError::MissingMessage {
            predicate: predicate.to_string(),
            path: ctx.path.clone(),
            looked_up,
            suggestions,
        }
    }
}

/// Appends the candidates under one `errors` root.
fn push_candidates(out: &mut Vec<String>, root: &str, predicate: &str, path: &str, ctx: &LookupContext<'_>) {
    let arg = ctx.arg_type;
    let val = ctx.val_type;
    let message_type = ctx.message_type.as_str();

    if let Some(rule) = ctx.rule {
        out.push(format!("{root}.rules.{rule}.{predicate}"));
    }
    if !path.is_empty() {
        out.push(format!("{root}.rules.{path}.{predicate}.arg.{arg}"));
        out.push(format!("{root}.rules.{path}.{predicate}"));
    }
    out.push(format!("{root}.{predicate}.{message_type}"));
    if !path.is_empty() {
        out.push(format!("{root}.{predicate}.value.{path}"));
    }
    out.push(format!("{root}.{predicate}.value.{val}.arg.{arg}"));
    out.push(format!("{root}.{predicate}.value.{val}"));
    out.push(format!("{root}.{predicate}.arg.{arg}"));
    out.push(format!("{root}.{predicate}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Config;

    fn resolver(extra: &str) -> LookupResolver {
        let mut store = TemplateStore::empty(Config::default());
        store.load_str(extra).unwrap();
        LookupResolver::new(Arc::new(store))
    }

    fn ctx<'a>(path: &'a Path, locale: &'a str) -> LookupContext<'a> {
        LookupContext {
            path,
            rule: None,
            negated: false,
            arg_type: "default",
            val_type: "default",
            locale,
            message_type: MessageKind::Failure,
        }
    }

    #[test]
    fn candidates_follow_cascade_order() {
        let resolver = resolver("errata:\n  en:\n    or: \"or\"\n");
        let path = Path::from(["age"]);
        let ctx = LookupContext {
            rule: Some("adult"),
            ..ctx(&path, "en")
        };
        assert_eq!(
            resolver.candidates("gt?", &ctx),
            vec![
                "errata.en.errors.rules.adult.gt?",
                "errata.en.errors.rules.age.gt?.arg.default",
                "errata.en.errors.rules.age.gt?",
                "errata.en.errors.gt?.failure",
                "errata.en.errors.gt?.value.age",
                "errata.en.errors.gt?.value.default.arg.default",
                "errata.en.errors.gt?.value.default",
                "errata.en.errors.gt?.arg.default",
                "errata.en.errors.gt?",
            ]
        );
    }

    #[test]
    fn root_path_skips_path_candidates() {
        let resolver = resolver("errata:\n  en:\n    or: \"or\"\n");
        let path = Path::root();
        let candidates = resolver.candidates("filled?", &ctx(&path, "en"));
        assert_eq!(candidates.len(), 5);
        assert!(candidates.iter().all(|c| !c.contains(".rules.")));
    }

    #[test]
    fn other_locale_falls_back_to_default() {
        let resolver = resolver("errata:\n  en:\n    errors:\n      filled?: \"must be filled\"\n");
        let path = Path::from(["name"]);
        let (key, entry) = resolver.resolve("filled?", &ctx(&path, "pl")).unwrap();
        assert_eq!(key, "errata.en.errors.filled?");
        assert_eq!(entry.source, "must be filled");
    }

    #[test]
    fn namespace_candidates_come_first() {
        let resolver = resolver("errata:\n  en:\n    or: \"or\"\n").namespaced("admin");
        let path = Path::root();
        let candidates = resolver.candidates("filled?", &ctx(&path, "en"));
        assert_eq!(candidates[0], "errata.en.errors.admin.filled?.failure");
        assert_eq!(candidates[5], "errata.en.errors.filled?.failure");
    }

    #[test]
    fn or_word_falls_back() {
        assert_eq!(resolver("errata:\n  pl:\n    or: \"lub\"\n").or_word("pl"), "lub");
        assert_eq!(resolver("errata:\n  pl:\n    or: \"lub\"\n").or_word("de"), "or");
    }

    #[test]
    fn ensure_known_checks_base_templates() {
        let resolver = resolver(
            "errata:\n  en:\n    errors:\n      filled?: \"must be filled\"\n      not:\n        nil?: \"x\"\n",
        );
        assert!(resolver.ensure_known("filled?", "json schema").is_ok());
        assert!(matches!(
            resolver.ensure_known("not", "json schema"),
            Err(CompileError::UnknownPredicate { .. })
        ));
    }
}
