//! Recursive compilation of a result tree into messages.

use std::sync::Arc;

use bon::Builder;
use tracing::debug;

use super::error::CompileError;
use super::opts::{VisitState, VisitorOpts};
use super::resolver::{LookupContext, LookupResolver};
use super::tokens::{INPUT_ARG, arg_type, message_tokens, val_type};
use crate::ast::Node;
use crate::catalog::{RenderError, TemplateStore};
use crate::types::{Entry, Message, MessageKind, Outcome, Path, PathSegment, Value};

/// Predicate whose first argument names the key being checked.
pub const KEY_PREDICATE: &str = "key?";

static NIL: Value = Value::Nil;

/// Per-compilation overrides of the store's [`Config`](crate::Config).
///
/// Unset fields fall back to the configured values.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
#[builder(on(String, into))]
pub struct CompileOptions {
    pub locale: Option<String>,
    pub hints: Option<bool>,
    pub full: Option<bool>,
}

/// Messages produced by one compilation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compilation {
    /// Placeable entries in result-tree order.
    pub entries: Vec<Entry>,
    /// Paths whose presence was only checked under a guard.
    pub keys: Vec<Path>,
}

/// Turns result trees into localized messages.
///
/// A compiler is cheap to clone and holds no per-compilation state, so one
/// instance can compile many trees, from several threads if needed.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use errata::{Config, MessageCompiler, Node, TemplateStore};
///
/// let store = Arc::new(TemplateStore::new(Config::default()).unwrap());
/// let compiler = MessageCompiler::new(store);
///
/// let tree = Node::key("email", Node::predicate("filled?", vec![("input", "".into())]));
/// let compiled = compiler.compile(&[tree]).unwrap();
///
/// assert_eq!(compiled.entries.len(), 1);
/// assert_eq!(compiled.entries[0].leaves()[0].text, "must be filled");
/// ```
#[derive(Debug, Clone)]
pub struct MessageCompiler {
    resolver: LookupResolver,
    locale: String,
    hints: bool,
    full: bool,
}

impl MessageCompiler {
    /// A compiler using the store's configured defaults.
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self::with_options(store, &CompileOptions::default())
    }

    pub fn with_options(store: Arc<TemplateStore>, options: &CompileOptions) -> Self {
        let config = store.config();
        let locale = options
            .locale
            .clone()
            .unwrap_or_else(|| config.default_locale.clone());
        let hints = options.hints.unwrap_or(config.hints);
        let full = options.full.unwrap_or(config.full);
        Self {
            resolver: LookupResolver::new(store),
            locale,
            hints,
            full,
        }
    }

    /// A compiler with the same settings that resolves through `resolver`.
    fn with_resolver(&self, resolver: LookupResolver) -> Self {
        Self {
            resolver,
            locale: self.locale.clone(),
            hints: self.hints,
            full: self.full,
        }
    }

    pub fn resolver(&self) -> &LookupResolver {
        &self.resolver
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Compiles every root node in order.
    pub fn compile(&self, nodes: &[Node]) -> Result<Compilation, CompileError> {
        let mut state = VisitState::default();
        let mut entries = Vec::new();
        for node in nodes {
            let outcome = self.visit(node, &VisitorOpts::default(), &mut state)?;
            entries.extend(outcome.into_entries());
        }
        debug!(
            locale = %self.locale,
            roots = nodes.len(),
            entries = entries.len(),
            "compiled messages"
        );
        Ok(Compilation {
            entries,
            keys: state.keys,
        })
    }

    /// Compiles one node under `opts`.
    pub fn visit(&self, node: &Node, opts: &VisitorOpts, state: &mut VisitState) -> Result<Outcome, CompileError> {
        match node {
            Node::Predicate { name, path, args } => self.visit_predicate(name, path, args, opts, state),
            Node::Key { name, child } => self.visit(child, &opts.with_segment(name.clone()), state),
            Node::Set(children) => {
                let outcomes = children
                    .iter()
                    .map(|child| self.visit(child, opts, state))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Outcome::Many(outcomes))
            }
            Node::And(left, right) => {
                let left = self.visit(left, opts, state)?;
                let right = self.visit(right, opts, state)?;
                Ok(match (left.is_empty(), right.is_empty()) {
                    (false, false) => Outcome::Many(vec![left, right]),
                    (false, true) => left,
                    (true, _) => right,
                })
            }
            Node::Or(left, right) => {
                let left = self.visit(left, opts, state)?;
                let right = self.visit(right, opts, state)?;
                Ok(Outcome::or(left, right, &self.resolver.or_word(&self.locale)))
            }
            Node::Not(child) => self.visit(child, &opts.negate(), state),
            Node::Implication {
                antecedent,
                consequent,
            } => {
                self.visit(antecedent, &opts.not_required(), state)?;
                self.visit(consequent, opts, state)
            }
            // Per-element messages arrive as keyed predicates, not here.
            Node::Each(_) => Ok(Outcome::Empty),
            Node::Namespace { name, child } => self
                .with_resolver(self.resolver.namespaced(name.as_str()))
                .visit(child, opts, state),
            Node::Failure { rule, child } => self.visit(child, &opts.with_rule(rule), state),
            Node::Hint(child) => {
                if self.hints {
                    self.visit(child, &opts.as_hint(), state)
                } else {
                    Ok(Outcome::Empty)
                }
            }
        }
    }

    fn visit_predicate(
        &self,
        predicate: &str,
        node_path: &Path,
        args: &[(String, Value)],
        opts: &VisitorOpts,
        state: &mut VisitState,
    ) -> Result<Outcome, CompileError> {
        let mut path = if node_path.is_empty() {
            opts.path.clone()
        } else {
            node_path.clone()
        };

        let input = args
            .iter()
            .find(|(name, _)| name == INPUT_ARG)
            .map_or(&NIL, |(_, value)| value);
        let mut arg_vals: Vec<&Value> = args
            .iter()
            .filter(|(name, _)| name != INPUT_ARG)
            .map(|(_, value)| value)
            .collect();

        if predicate == KEY_PREDICATE && !arg_vals.is_empty() {
            let key = arg_vals.remove(0);
            if let Some(segment) = key_segment(key) {
                path = path.join(segment);
            }
            if !opts.required {
                state.register_key(path);
                return Ok(Outcome::Empty);
            }
        }

        let ctx = LookupContext {
            path: &path,
            rule: opts.rule.as_deref(),
            negated: opts.negated,
            arg_type: arg_type(&arg_vals),
            val_type: val_type(input),
            locale: &self.locale,
            message_type: opts.message_type,
        };

        let Some((key, entry)) = self.resolver.resolve(predicate, &ctx) else {
            if opts.required {
                return Err(self.resolver.missing_message(predicate, &ctx));
            }
            return Ok(Outcome::Empty);
        };

        let mut text = entry
            .template
            .render(&message_tokens(args))
            .map_err(|RenderError::MissingValue { token }| CompileError::MissingToken {
                key: key.clone(),
                token,
                predicate: predicate.to_string(),
            })?;

        let rule = opts.rule.clone();
        let label_name = if self.full {
            rule.as_deref().or_else(|| path.last_key())
        } else {
            None
        };
        if let Some(name) = label_name {
            let label = self
                .resolver
                .rule_label(name, &self.locale)
                .unwrap_or_else(|| name.to_string());
            text = format!("{label} {text}");
        }

        let message = Message::builder()
            .predicate(predicate.to_string())
            .path(path)
            .text(text)
            .args(args.to_vec())
            .input(input.clone())
            .maybe_rule(rule)
            .meta(entry.meta.clone())
            .kind(opts.message_type)
            .build();
        Ok(Outcome::from(message))
    }

    /// Renders a standalone message for `predicate` at `path`.
    ///
    /// Used for messages that do not come from a result tree, such as
    /// unexpected keys.
    pub fn message(&self, predicate: &str, path: &Path, args: Vec<(String, Value)>) -> Result<Message, CompileError> {
        let node = Node::Predicate {
            name: predicate.to_string(),
            path: path.clone(),
            args,
        };
        let outcome = self.visit(&node, &VisitorOpts::default(), &mut VisitState::default())?;
        match outcome.into_entries().pop() {
            Some(Entry::Message(message)) => Ok(message),
            Some(Entry::Or(_)) | None => Err(self.resolver.missing_message(
                predicate,
                &LookupContext {
                    path,
                    rule: None,
                    negated: false,
                    arg_type: "default",
                    val_type: "default",
                    locale: &self.locale,
                    message_type: MessageKind::Failure,
                },
            )),
        }
    }
}

fn key_segment(value: &Value) -> Option<PathSegment> {
    match value {
        Value::String(name) => Some(PathSegment::Key(name.clone())),
        Value::Number(index) => usize::try_from(*index).ok().map(PathSegment::Index),
        Value::Nil
        | Value::Bool(_)
        | Value::Float(_)
        | Value::Range(..)
        | Value::List(_)
        | Value::Data(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Config;
    use crate::types::Disjunction;

    fn compiler() -> MessageCompiler {
        MessageCompiler::new(Arc::new(TemplateStore::new(Config::default()).unwrap()))
    }

    fn texts(compiled: &Compilation) -> Vec<String> {
        compiled
            .entries
            .iter()
            .flat_map(Entry::leaves)
            .map(|m| m.text.clone())
            .collect()
    }

    #[test]
    fn key_predicate_extends_path() {
        let compiled = compiler()
            .compile(&[Node::predicate("key?", vec![("name", "email".into()), ("input", Value::Nil)])])
            .unwrap();
        let message = compiled.entries[0].leaves()[0].clone();
        assert_eq!(message.path, Path::from(["email"]));
        assert_eq!(message.text, "is missing");
    }

    #[test]
    fn guard_keys_are_registered_not_rendered() {
        let tree = Node::implication(
            Node::predicate("key?", vec![("name", "age".into())]),
            Node::key("age", Node::predicate("int?", vec![("input", "x".into())])),
        );
        let compiled = compiler().compile(&[tree]).unwrap();
        assert_eq!(compiled.keys, vec![Path::from(["age"])]);
        assert_eq!(texts(&compiled), vec!["must be an integer"]);
    }

    #[test]
    fn explicit_predicate_path_wins() {
        let node = Node::Predicate {
            name: "filled?".to_string(),
            path: Path::from(["a", "b"]),
            args: vec![],
        };
        let compiled = compiler().compile(&[Node::key("x", node)]).unwrap();
        assert_eq!(compiled.entries[0].path(), &Path::from(["a", "b"]));
    }

    #[test]
    fn negation_uses_not_branch() {
        let tree = Node::key("name", Node::not(Node::predicate("nil?", vec![])));
        let compiled = compiler().compile(&[tree]).unwrap();
        assert_eq!(texts(&compiled), vec!["must not be nil"]);
    }

    #[test]
    fn hints_can_be_disabled() {
        let store = Arc::new(TemplateStore::new(Config::default()).unwrap());
        let options = CompileOptions::builder().hints(false).build();
        let compiler = MessageCompiler::with_options(store, &options);
        let tree = Node::key("age", Node::hint(Node::predicate("gt?", vec![("num", 18.into())])));
        assert!(compiler.compile(&[tree]).unwrap().entries.is_empty());
    }

    #[test]
    fn same_path_or_is_single_path() {
        let tree = Node::key(
            "age",
            Node::or(
                Node::predicate("int?", vec![]),
                Node::predicate("nil?", vec![]),
            ),
        );
        let compiled = compiler().compile(&[tree]).unwrap();
        let Entry::Or(Disjunction::SinglePath(single)) = &compiled.entries[0] else {
            panic!("expected a single-path disjunction");
        };
        assert_eq!(single.text(), "must be an integer or cannot be defined");
    }

    #[test]
    fn each_yields_nothing() {
        let tree = Node::key("tags", Node::each(Node::predicate("str?", vec![])));
        assert!(compiler().compile(&[tree]).unwrap().entries.is_empty());
    }

    #[test]
    fn unknown_predicate_is_an_error() {
        let err = compiler()
            .compile(&[Node::key("name", Node::predicate("filed?", vec![]))])
            .unwrap_err();
        let CompileError::MissingMessage { suggestions, .. } = err else {
            panic!("expected a missing message error");
        };
        assert!(suggestions.contains(&"filled?".to_string()));
    }
}
