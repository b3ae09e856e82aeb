//! Compiled messages for one validation run.

use serde_json::Value as Json;
use tracing::debug;

use crate::ast::Node;
use crate::compiler::{CompileError, INPUT_ARG, MessageCompiler};
use crate::key_map::KeyMap;
use crate::key_validator::KeyValidator;
use crate::message_set::{MessageMap, MessageSet, View};
use crate::types::{Entry, Path, PathSegment, Value};

/// Predicate reported for input keys the schema does not declare.
pub const UNEXPECTED_KEY: &str = "unexpected_key";

/// Messages for one validation run: failures, hints, and keys the schema
/// did not expect.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use errata::{Config, Key, KeyMap, MessageCompiler, Node, Report, TemplateStore};
/// use serde_json::json;
///
/// let store = Arc::new(TemplateStore::new(Config::default()).unwrap());
/// let compiler = MessageCompiler::new(store);
///
/// let tree = Node::key("name", Node::predicate("filled?", vec![("input", "".into())]));
/// let keys = KeyMap::new(vec![Key::field("name"), Key::field("age")]);
/// let input = json!({ "name": "", "nickname": "J" });
///
/// let report = Report::with_key_check(&compiler, &[tree], &input, &keys).unwrap();
/// assert_eq!(
///     serde_json::to_value(report.errors()).unwrap(),
///     json!({ "name": ["must be filled"], "nickname": ["is not allowed"], "age": [] })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Report {
    errors: MessageSet,
    hints: MessageSet,
    messages: MessageSet,
    unexpected_keys: Vec<Path>,
}

impl Report {
    /// Compiles `ast` without checking input keys.
    pub fn new(compiler: &MessageCompiler, ast: &[Node]) -> Result<Self, CompileError> {
        let compiled = compiler.compile(ast)?;
        Ok(Self::from_entries(compiled.entries, &[], Vec::new()))
    }

    /// Compiles `ast` and adds a message for every key of `input` that
    /// `keys` does not declare.
    ///
    /// Every declared leaf outside an array gets an empty placeholder in
    /// non-empty output.
    pub fn with_key_check(
        compiler: &MessageCompiler,
        ast: &[Node],
        input: &Json,
        keys: &KeyMap,
    ) -> Result<Self, CompileError> {
        let mut entries = compiler.compile(ast)?.entries;
        let unexpected_keys = KeyValidator::new(keys).validate(input);
        for path in &unexpected_keys {
            let value = value_at(input, path).cloned().map_or(Value::Nil, Value::from);
            let message = compiler.message(UNEXPECTED_KEY, path, crate::args! { INPUT_ARG => value })?;
            entries.push(Entry::Message(message));
        }
        Ok(Self::from_entries(entries, &keys.leaf_paths(), unexpected_keys))
    }

    fn from_entries(entries: Vec<Entry>, declared: &[Path], unexpected_keys: Vec<Path>) -> Self {
        debug!(
            entries = entries.len(),
            unexpected = unexpected_keys.len(),
            "built report"
        );
        Self {
            errors: MessageSet::with_placeholders(entries.clone(), View::Failures, declared),
            hints: MessageSet::with_placeholders(entries.clone(), View::Hints, declared),
            messages: MessageSet::with_placeholders(entries, View::All, declared),
            unexpected_keys,
        }
    }

    /// True when no failure was reported.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failures, nested by path.
    pub fn errors(&self) -> &MessageMap {
        self.errors.as_map()
    }

    /// Hints, nested by path.
    pub fn hints(&self) -> &MessageMap {
        self.hints.as_map()
    }

    /// Failures with the hints that share their path, nested by path.
    pub fn messages(&self) -> &MessageMap {
        self.messages.as_map()
    }

    /// The underlying set for one view.
    pub fn message_set(&self, view: View) -> &MessageSet {
        match view {
            View::Failures => &self.errors,
            View::Hints => &self.hints,
            View::All => &self.messages,
        }
    }

    /// Input paths the schema did not declare.
    pub fn unexpected_keys(&self) -> &[Path] {
        &self.unexpected_keys
    }
}

fn value_at<'a>(input: &'a Json, path: &Path) -> Option<&'a Json> {
    path.segments()
        .iter()
        .try_fold(input, |value, segment| match segment {
            PathSegment::Key(key) => value.get(key.as_str()),
            PathSegment::Index(index) => value.get(*index),
        })
}
