//! Grouping compiled messages into a nested map keyed by path.

use std::slice::Iter;

use indexmap::IndexMap;
use indexmap::map::Iter as MapIter;
use serde::{Serialize, Serializer};

use crate::types::{Disjunction, Entry, Message, Path, PathSegment, is_hint_excluded};

/// Key under which a multi-path disjunction lists its alternatives.
pub const OR_KEY: &str = "or";

/// Which messages a [`MessageSet`] renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// Fired failures only.
    #[default]
    Failures,
    /// Hints only.
    Hints,
    /// Failures, each path followed by the hints at that same path.
    All,
}

impl View {
    fn keeps(self, message: &Message) -> bool {
        if message.is_hint() && is_hint_excluded(&message.predicate) {
            return false;
        }
        match self {
            View::Failures => !message.is_hint(),
            View::Hints => message.is_hint(),
            View::All => true,
        }
    }
}

/// A nested map from path segments to rendered messages.
///
/// Keys keep the order in which their paths were first seen. Serializes as
/// a plain map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MessageMap(IndexMap<PathSegment, MessageNode>);

/// Everything placed under one key of a [`MessageMap`].
///
/// Serializes as the list of texts, the nested map, or `[texts, map]` when
/// a location has both. Under [`OR_KEY`] it serializes as the list of
/// alternative maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageNode {
    texts: Vec<String>,
    children: Option<MessageMap>,
    alternatives: Vec<MessageMap>,
}

impl MessageNode {
    /// Messages placed directly at this location.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Messages placed below this location.
    pub fn children(&self) -> Option<&MessageMap> {
        self.children.as_ref()
    }

    /// Alternative groups, for an `or` node.
    pub fn alternatives(&self) -> &[MessageMap] {
        &self.alternatives
    }

    fn children_mut(&mut self) -> &mut MessageMap {
        self.children.get_or_insert_with(MessageMap::default)
    }
}

impl Serialize for MessageNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.alternatives.is_empty() {
            return self.alternatives.serialize(serializer);
        }
        match &self.children {
            None => self.texts.serialize(serializer),
            Some(children) if self.texts.is_empty() => children.serialize(serializer),
            Some(children) => (&self.texts, children).serialize(serializer),
        }
    }
}

impl MessageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, segment: &PathSegment) -> Option<&MessageNode> {
        self.0.get(segment)
    }

    /// The node at `segments`, descending through nested maps.
    pub fn lookup(&self, segments: &[PathSegment]) -> Option<&MessageNode> {
        let (first, rest) = segments.split_first()?;
        let node = self.0.get(first)?;
        if rest.is_empty() {
            Some(node)
        } else {
            node.children.as_ref()?.lookup(rest)
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> MapIter<'_, PathSegment, MessageNode> {
        self.0.iter()
    }

    /// The node a path's own texts go into. Root-level texts live under
    /// the empty key.
    fn node_mut(&mut self, segments: &[PathSegment]) -> &mut MessageNode {
        let (parent, last) = match segments.split_last() {
            Some((last, parent)) => (parent, last.clone()),
            None => (segments, PathSegment::Key(String::new())),
        };
        self.map_mut(parent).0.entry(last).or_default()
    }

    /// The nested map at `segments`, created on demand.
    fn map_mut(&mut self, segments: &[PathSegment]) -> &mut MessageMap {
        match segments.split_first() {
            None => self,
            Some((first, rest)) => self
                .0
                .entry(first.clone())
                .or_default()
                .children_mut()
                .map_mut(rest),
        }
    }

    fn placeholder(&mut self, segments: &[PathSegment]) {
        self.node_mut(segments);
    }

    fn push_text(&mut self, segments: &[PathSegment], text: String) {
        let texts = &mut self.node_mut(segments).texts;
        if !texts.contains(&text) {
            texts.push(text);
        }
    }

    fn push_alternatives(&mut self, segments: &[PathSegment], alternatives: Vec<MessageMap>) {
        let group = self
            .map_mut(segments)
            .0
            .entry(PathSegment::Key(OR_KEY.to_string()))
            .or_default();
        for alternative in alternatives {
            if !group.alternatives.contains(&alternative) {
                group.alternatives.push(alternative);
            }
        }
    }

    fn place(&mut self, entry: &Entry) {
        let segments = entry.path().segments();
        match entry {
            Entry::Message(message) => self.push_text(segments, message.text.clone()),
            Entry::Or(Disjunction::SinglePath(single)) => self.push_text(segments, single.text()),
            Entry::Or(Disjunction::MultiPath(multi)) => {
                let alternatives = multi
                    .branches
                    .iter()
                    .map(|branch| {
                        let rebased: Vec<Entry> = branch
                            .iter()
                            .map(|entry| entry.strip_prefix(multi.path.len()))
                            .collect();
                        build_map(&rebased, &[])
                    })
                    .collect();
                self.push_alternatives(segments, alternatives);
            }
        }
    }
}

impl<'a> IntoIterator for &'a MessageMap {
    type Item = (&'a PathSegment, &'a MessageNode);
    type IntoIter = MapIter<'a, PathSegment, MessageNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Groups `entries` by path, failures before hints at each path.
fn build_map(entries: &[Entry], declared: &[Path]) -> MessageMap {
    let mut map = MessageMap::new();
    if entries.is_empty() {
        return map;
    }

    for entry in entries {
        match entry {
            Entry::Or(Disjunction::MultiPath(multi)) => {
                map.map_mut(multi.path.segments());
            }
            Entry::Message(_) | Entry::Or(Disjunction::SinglePath(_)) => {
                map.placeholder(entry.path().segments());
            }
        }
    }
    for path in declared {
        if map.lookup(path.segments()).is_none() {
            map.placeholder(path.segments());
        }
    }

    let mut groups: IndexMap<&Path, Vec<&Entry>> = IndexMap::new();
    for entry in entries {
        groups.entry(entry.path()).or_default().push(entry);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|entry| entry.is_hint());
        for entry in group.iter() {
            map.place(entry);
        }
    }
    map
}

/// An ordered collection of compiled messages with its nested-map form.
///
/// # Example
///
/// ```
/// use errata::{Entry, Message, MessageSet, Path, View};
///
/// let message = Message::builder()
///     .predicate("filled?".to_string())
///     .path(Path::from(["email"]))
///     .text("must be filled".to_string())
///     .build();
/// let set = MessageSet::new(vec![Entry::Message(message)], View::Failures);
///
/// let json = serde_json::to_value(set.to_map()).unwrap();
/// assert_eq!(json, serde_json::json!({ "email": ["must be filled"] }));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageSet {
    entries: Vec<Entry>,
    view: View,
    map: MessageMap,
}

impl MessageSet {
    pub fn new(entries: Vec<Entry>, view: View) -> Self {
        Self::with_placeholders(entries, view, &[])
    }

    /// Like [`MessageSet::new`], with an empty list at every `declared`
    /// path that has no message of its own.
    ///
    /// Placeholders are only added when the set has at least one message.
    pub fn with_placeholders(entries: Vec<Entry>, view: View, declared: &[Path]) -> Self {
        let mut entries: Vec<Entry> = entries
            .into_iter()
            .flat_map(|entry| entry.retain(&|message: &Message| view.keeps(message)))
            .collect();
        if view == View::All {
            entries = hints_at_failures(entries);
        }
        let map = build_map(&entries, declared);
        Self { entries, view, map }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The node at `path`. `None` when nothing, not even a placeholder,
    /// lives there.
    pub fn get(&self, path: &Path) -> Option<&MessageNode> {
        if path.is_empty() {
            self.map.get(&PathSegment::Key(String::new()))
        } else {
            self.map.lookup(path.segments())
        }
    }

    pub fn as_map(&self) -> &MessageMap {
        &self.map
    }

    pub fn to_map(&self) -> MessageMap {
        self.map.clone()
    }

    pub fn into_map(self) -> MessageMap {
        self.map
    }
}

/// Drops hints whose path has no failure.
fn hints_at_failures(entries: Vec<Entry>) -> Vec<Entry> {
    let failed: Vec<Path> = entries
        .iter()
        .flat_map(Entry::leaves)
        .filter(|message| !message.is_hint())
        .map(|message| message.path.clone())
        .collect();
    entries
        .into_iter()
        .flat_map(|entry| {
            entry.retain(&|message: &Message| !message.is_hint() || failed.contains(&message.path))
        })
        .collect()
}

impl<'a> IntoIterator for &'a MessageSet {
    type Item = &'a Entry;
    type IntoIter = Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
