//! Per-node visiting state threaded through the result tree.

use crate::types::{MessageKind, Path, PathSegment};

/// Options threaded down the result tree while compiling.
///
/// Each combinator derives the options for its children from its own; the
/// parent's options are never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitorOpts {
    /// Location accumulated from enclosing key nodes.
    pub path: Path,
    /// Rule name from the nearest enclosing failure node.
    pub rule: Option<String>,
    /// Selects the negated template branch.
    pub negated: bool,
    pub message_type: MessageKind,
    /// When false, nothing under this node is rendered: presence checks only
    /// register their path and predicates without a template are skipped.
    pub required: bool,
}

impl Default for VisitorOpts {
    fn default() -> Self {
        Self {
            path: Path::root(),
            rule: None,
            negated: false,
            message_type: MessageKind::Failure,
            required: true,
        }
    }
}

impl VisitorOpts {
    pub fn with_segment(&self, segment: PathSegment) -> Self {
        Self {
            path: self.path.join(segment),
            ..self.clone()
        }
    }

    pub fn with_rule(&self, rule: &str) -> Self {
        Self {
            rule: Some(rule.to_string()),
            ..self.clone()
        }
    }

    pub fn negate(&self) -> Self {
        Self {
            negated: true,
            ..self.clone()
        }
    }

    pub fn as_hint(&self) -> Self {
        Self {
            message_type: MessageKind::Hint,
            ..self.clone()
        }
    }

    pub fn not_required(&self) -> Self {
        Self {
            required: false,
            ..self.clone()
        }
    }
}

/// Side effects collected across one compilation.
#[derive(Debug, Default)]
pub struct VisitState {
    /// Paths whose presence was checked without rendering a message.
    pub keys: Vec<Path>,
}

impl VisitState {
    pub fn register_key(&mut self, path: Path) {
        if !self.keys.contains(&path) {
            self.keys.push(path);
        }
    }
}
