//! The rule-evaluation result tree consumed by the message compiler.
//!
//! These types are produced by the evaluator that decided pass/fail for
//! each predicate. The compiler only reads them.

use crate::types::{Path, PathSegment, Value};

/// One node of a rule-evaluation result.
///
/// Every leaf is a [`Node::Predicate`]; all other variants are structural.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A single failed (or, under [`Node::Hint`], not yet evaluated) check.
    Predicate {
        name: String,
        /// Location reported by the evaluator. When empty, the location is
        /// the one accumulated from enclosing [`Node::Key`] nodes.
        path: Path,
        /// Named arguments, conventionally ending with `input`.
        args: Vec<(String, Value)>,
    },
    /// Descends into one key or index of the input.
    Key { name: PathSegment, child: Box<Node> },
    /// Independent checks at the same location.
    Set(Vec<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Not(Box<Node>),
    /// A guarded rule: the consequent only applies when the antecedent holds.
    Implication {
        antecedent: Box<Node>,
        consequent: Box<Node>,
    },
    /// Per-element rule over a sequence.
    Each(Box<Node>),
    /// A subtree whose messages are looked up in a branch namespace first.
    Namespace { name: String, child: Box<Node> },
    /// Tags the subtree with the rule that produced it.
    Failure { rule: String, child: Box<Node> },
    /// Marks the subtree as informational.
    Hint(Box<Node>),
}

impl Node {
    /// A predicate located by its enclosing keys.
    pub fn predicate(name: impl Into<String>, args: Vec<(&str, Value)>) -> Node {
        Node::Predicate {
            name: name.into(),
            path: Path::root(),
            args: args
                .into_iter()
                .map(|(arg, value)| (arg.to_string(), value))
                .collect(),
        }
    }

    pub fn key(name: impl Into<PathSegment>, child: Node) -> Node {
        Node::Key {
            name: name.into(),
            child: Box::new(child),
        }
    }

    pub fn and(left: Node, right: Node) -> Node {
        Node::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Node, right: Node) -> Node {
        Node::Or(Box::new(left), Box::new(right))
    }

    pub fn not(child: Node) -> Node {
        Node::Not(Box::new(child))
    }

    pub fn implication(antecedent: Node, consequent: Node) -> Node {
        Node::Implication {
            antecedent: Box::new(antecedent),
            consequent: Box::new(consequent),
        }
    }

    pub fn each(child: Node) -> Node {
        Node::Each(Box::new(child))
    }

    pub fn namespace(name: impl Into<String>, child: Node) -> Node {
        Node::Namespace {
            name: name.into(),
            child: Box::new(child),
        }
    }

    pub fn failure(rule: impl Into<String>, child: Node) -> Node {
        Node::Failure {
            rule: rule.into(),
            child: Box::new(child),
        }
    }

    pub fn hint(child: Node) -> Node {
        Node::Hint(Box::new(child))
    }
}
