use std::collections::BTreeSet;

use super::{Disjunction, Entry, Message, MultiPath, Path, SinglePath};

/// The result of visiting one node of the result AST.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Outcome {
    /// Nothing to report.
    #[default]
    Empty,
    /// A single message or disjunction.
    One(Entry),
    /// An ordered list, as produced by conjunctions and sets.
    Many(Vec<Outcome>),
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        match self {
            Outcome::Empty => true,
            Outcome::One(_) => false,
            Outcome::Many(items) => items.iter().all(Outcome::is_empty),
        }
    }

    /// Flattens into placeable entries, preserving order.
    pub fn into_entries(self) -> Vec<Entry> {
        let mut entries = Vec::new();
        self.collect_into(&mut entries);
        entries
    }

    fn collect_into(self, entries: &mut Vec<Entry>) {
        match self {
            Outcome::Empty => {}
            Outcome::One(entry) => entries.push(entry),
            Outcome::Many(items) => {
                for item in items {
                    item.collect_into(entries);
                }
            }
        }
    }

    /// Every leaf message, depth first.
    pub fn leaves(&self) -> Vec<&Message> {
        match self {
            Outcome::Empty => Vec::new(),
            Outcome::One(entry) => entry.leaves(),
            Outcome::Many(items) => items.iter().flat_map(Outcome::leaves).collect(),
        }
    }

    /// Combines the outcomes of both sides of a disjunction.
    ///
    /// Disjunctions nest to the right, so only the outermost one decides the
    /// user-visible grouping: when the right side already fanned out into a
    /// list it is passed through unchanged instead of being wrapped again.
    pub fn or(left: Outcome, right: Outcome, separator: &str) -> Outcome {
        if left.is_empty() {
            return right;
        }
        if right.is_empty() {
            return left;
        }

        let paths: BTreeSet<&Path> = left
            .leaves()
            .into_iter()
            .chain(right.leaves())
            .map(|m| &m.path)
            .collect();

        if paths.len() == 1 {
            let path = paths.into_iter().next().cloned().unwrap_or_default();
            let mut alternatives = left.into_alternatives();
            alternatives.extend(right.into_alternatives());
            return Outcome::One(Entry::Or(Disjunction::SinglePath(SinglePath {
                path,
                alternatives,
                separator: separator.to_string(),
            })));
        }

        if matches!(right, Outcome::Many(_)) {
            return right;
        }

        MultiPath::from_branches(vec![left.into_entries(), right.into_entries()])
            .map_or(Outcome::Empty, |multi| {
                Outcome::One(Entry::Or(Disjunction::MultiPath(multi)))
            })
    }

    /// Splits a same-path outcome into disjunction alternatives.
    ///
    /// A nested single-path disjunction contributes its own alternatives;
    /// anything else is one alternative holding all of its leaves.
    fn into_alternatives(self) -> Vec<Vec<Message>> {
        match self {
            Outcome::One(Entry::Or(Disjunction::SinglePath(single))) => single.alternatives,
            other => vec![other.leaves().into_iter().cloned().collect()],
        }
    }
}

impl From<Message> for Outcome {
    fn from(message: Message) -> Self {
        Outcome::One(Entry::Message(message))
    }
}
