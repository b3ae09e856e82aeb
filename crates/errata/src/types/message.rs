use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use bon::Builder;

use super::{Path, Value};

/// Predicates that never surface as hints.
///
/// Presence, type and container checks restate what an earlier failure
/// already said, so they are only ever rendered as fired failures.
pub const HINT_EXCLUDED_PREDICATES: &[&str] = &[
    "key?", "nil?", "filled?", "bool?", "str?", "int?", "float?", "decimal?", "date?",
    "date_time?", "time?", "hash?", "array?", "type?", "format?",
];

/// Returns true if `predicate` may never be rendered as a hint.
pub fn is_hint_excluded(predicate: &str) -> bool {
    HINT_EXCLUDED_PREDICATES.contains(&predicate)
}

/// Whether a message reports a fired failure or an informational hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    #[default]
    Failure,
    Hint,
}

impl MessageKind {
    /// The catalog qualifier for this kind (`failure` / `hint`).
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Failure => "failure",
            MessageKind::Hint => "hint",
        }
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A compiled, rendered message for one predicate at one path.
///
/// Messages are immutable once built. A hint has the same shape as a
/// failure; only [`MessageKind`] differs.
///
/// # Example
///
/// ```
/// use errata::{Message, MessageKind, Path};
///
/// let message = Message::builder()
///     .predicate("filled?".to_string())
///     .path(Path::from(["email"]))
///     .text("must be filled".to_string())
///     .build();
///
/// assert_eq!(message.rule_name(), Some("email"));
/// assert_eq!(message.kind, MessageKind::Failure);
/// assert_eq!(message.to_string(), "must be filled");
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Message {
    /// Predicate identifier, e.g. `filled?`.
    pub predicate: String,

    /// Location of the failing value.
    #[builder(default)]
    pub path: Path,

    /// Rendered, localized text.
    pub text: String,

    /// Arguments used during rendering, in evaluator order.
    #[builder(default)]
    pub args: Vec<(String, Value)>,

    /// The validated value, if the evaluator reported one.
    #[builder(default = Value::Nil)]
    pub input: Value,

    /// Explicit rule name, falls back to the last path key.
    pub rule: Option<String>,

    /// Non-text side-channel entries from the catalog (e.g. `code`).
    #[builder(default)]
    pub meta: BTreeMap<String, String>,

    #[builder(default)]
    pub kind: MessageKind,
}

impl Message {
    pub fn is_hint(&self) -> bool {
        self.kind == MessageKind::Hint
    }

    /// The rule name, defaulting to the last symbolic path segment.
    pub fn rule_name(&self) -> Option<&str> {
        self.rule.as_deref().or_else(|| self.path.last_key())
    }

    /// Returns a copy addressed at `path`, keeping everything else.
    pub fn with_path(&self, path: Path) -> Message {
        Message {
            path,
            ..self.clone()
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.text)
    }
}
