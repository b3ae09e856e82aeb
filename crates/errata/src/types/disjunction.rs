use super::{Message, Path};

/// One placeable item of compiled output: a plain message or a disjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Message(Message),
    Or(Disjunction),
}

impl Entry {
    /// The path this entry is grouped under.
    pub fn path(&self) -> &Path {
        match self {
            Entry::Message(message) => &message.path,
            Entry::Or(Disjunction::SinglePath(single)) => &single.path,
            Entry::Or(Disjunction::MultiPath(multi)) => &multi.path,
        }
    }

    /// All leaf messages, depth first.
    pub fn leaves(&self) -> Vec<&Message> {
        match self {
            Entry::Message(message) => vec![message],
            Entry::Or(Disjunction::SinglePath(single)) => single.alternatives.iter().flatten().collect(),
            Entry::Or(Disjunction::MultiPath(multi)) => multi
                .branches
                .iter()
                .flatten()
                .flat_map(Entry::leaves)
                .collect(),
        }
    }

    /// An entry is a hint when every leaf under it is a hint.
    pub fn is_hint(&self) -> bool {
        self.leaves().iter().all(|message| message.is_hint())
    }

    /// Drops leaves rejected by `keep`, collapsing structure that no longer
    /// has two alternatives.
    pub fn retain(self, keep: &impl Fn(&Message) -> bool) -> Vec<Entry> {
        match self {
            Entry::Message(message) => {
                if keep(&message) {
                    vec![Entry::Message(message)]
                } else {
                    Vec::new()
                }
            }
            Entry::Or(Disjunction::SinglePath(single)) => {
                let SinglePath {
                    path,
                    alternatives,
                    separator,
                } = single;
                let mut alternatives: Vec<Vec<Message>> = alternatives
                    .into_iter()
                    .map(|alternative| alternative.into_iter().filter(|m| keep(m)).collect())
                    .filter(|alternative: &Vec<Message>| !alternative.is_empty())
                    .collect();
                match alternatives.len() {
                    0 => Vec::new(),
                    1 => alternatives
                        .pop()
                        .unwrap_or_default()
                        .into_iter()
                        .map(Entry::Message)
                        .collect(),
                    _ => vec![Entry::Or(Disjunction::SinglePath(SinglePath {
                        path,
                        alternatives,
                        separator,
                    }))],
                }
            }
            Entry::Or(Disjunction::MultiPath(multi)) => {
                let mut branches: Vec<Vec<Entry>> = multi
                    .branches
                    .into_iter()
                    .map(|branch| branch.into_iter().flat_map(|e| e.retain(keep)).collect())
                    .filter(|branch: &Vec<Entry>| !branch.is_empty())
                    .collect();
                match branches.len() {
                    0 => Vec::new(),
                    1 => branches.pop().unwrap_or_default(),
                    _ => MultiPath::from_branches(branches)
                        .map(|multi| Entry::Or(Disjunction::MultiPath(multi)))
                        .into_iter()
                        .collect(),
                }
            }
        }
    }

    /// Re-addresses this entry relative to a prefix of length `len`.
    pub fn strip_prefix(&self, len: usize) -> Entry {
        match self {
            Entry::Message(message) => Entry::Message(message.with_path(message.path.strip_prefix(len))),
            Entry::Or(Disjunction::SinglePath(single)) => Entry::Or(Disjunction::SinglePath(SinglePath {
                path: single.path.strip_prefix(len),
                alternatives: single
                    .alternatives
                    .iter()
                    .map(|alternative| {
                        alternative
                            .iter()
                            .map(|m| m.with_path(m.path.strip_prefix(len)))
                            .collect()
                    })
                    .collect(),
                separator: single.separator.clone(),
            })),
            Entry::Or(Disjunction::MultiPath(multi)) => Entry::Or(Disjunction::MultiPath(MultiPath {
                path: multi.path.strip_prefix(len),
                branches: multi
                    .branches
                    .iter()
                    .map(|branch| branch.iter().map(|e| e.strip_prefix(len)).collect())
                    .collect(),
            })),
        }
    }
}

impl From<Message> for Entry {
    fn from(message: Message) -> Self {
        Entry::Message(message)
    }
}

/// The compiled form of a logical disjunction whose branches both failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Disjunction {
    /// All branches failed at the same path; rendered as one sentence.
    SinglePath(SinglePath),
    /// Branches failed at different paths; rendered as a group of
    /// alternatives under their longest common prefix.
    MultiPath(MultiPath),
}

/// Alternatives at a single path, rendered `"<a> or <b>"`.
///
/// Each alternative is the conjunction of messages one branch produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePath {
    pub path: Path,
    pub alternatives: Vec<Vec<Message>>,
    /// The localized disjunction word.
    pub separator: String,
}

impl SinglePath {
    /// Renders the joined sentence.
    ///
    /// ```
    /// use errata::{Message, Path, SinglePath};
    ///
    /// let msg = |text: &str| {
    ///     Message::builder()
    ///         .predicate("x?".to_string())
    ///         .path(Path::from(["age"]))
    ///         .text(text.to_string())
    ///         .build()
    /// };
    /// let single = SinglePath {
    ///     path: Path::from(["age"]),
    ///     alternatives: vec![vec![msg("must be an integer")], vec![msg("must be nil")]],
    ///     separator: "or".to_string(),
    /// };
    /// assert_eq!(single.text(), "must be an integer or must be nil");
    /// ```
    pub fn text(&self) -> String {
        self.alternatives
            .iter()
            .map(|alternative| {
                alternative
                    .iter()
                    .map(|m| m.text.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect::<Vec<_>>()
            .join(&format!(" {} ", self.separator))
    }
}

/// Alternatives spread across paths, grouped under their common prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPath {
    /// Longest common prefix of every leaf path; the root when the branches
    /// share nothing.
    pub path: Path,
    /// One list of entries per alternative branch.
    pub branches: Vec<Vec<Entry>>,
}

impl MultiPath {
    /// Groups `branches` under their longest common prefix.
    ///
    /// A branch that is itself a single multi-path group at the same prefix
    /// is spliced in rather than nested. Returns `None` when no branch holds
    /// any message.
    pub fn from_branches(branches: Vec<Vec<Entry>>) -> Option<MultiPath> {
        let path = {
            let leaves: Vec<&Message> = branches.iter().flatten().flat_map(Entry::leaves).collect();
            Path::common_prefix_of(leaves.iter().map(|m| &m.path))?
        };

        let mut flattened = Vec::with_capacity(branches.len());
        for branch in branches {
            match <[Entry; 1]>::try_from(branch) {
                Ok([Entry::Or(Disjunction::MultiPath(inner))]) if inner.path == path => {
                    flattened.extend(inner.branches);
                }
                Ok([entry]) => flattened.push(vec![entry]),
                Err(branch) => flattened.push(branch),
            }
        }

        Some(MultiPath {
            path,
            branches: flattened,
        })
    }
}
