//! Declared key structure of a schema.

use crate::types::Path;

/// One declared key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A scalar value.
    Field(String),
    /// A nested map with its own keys.
    Map { name: String, members: KeyMap },
    /// A sequence whose elements share `members`.
    Array { name: String, members: KeyMap },
}

impl Key {
    pub fn field(name: impl Into<String>) -> Key {
        Key::Field(name.into())
    }

    pub fn map(name: impl Into<String>, members: KeyMap) -> Key {
        Key::Map {
            name: name.into(),
            members,
        }
    }

    pub fn array(name: impl Into<String>, members: KeyMap) -> Key {
        Key::Array {
            name: name.into(),
            members,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Key::Field(name) | Key::Map { name, .. } | Key::Array { name, .. } => name,
        }
    }
}

/// The keys a schema accepts, in declaration order.
///
/// # Example
///
/// ```
/// use errata::{Key, KeyMap};
///
/// let keys = KeyMap::new(vec![
///     Key::field("name"),
///     Key::array("roles", KeyMap::new(vec![Key::field("name")])),
/// ]);
/// assert_eq!(keys.to_dot_notation(), vec!["name", "roles[].name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap(Vec<Key>);

impl KeyMap {
    pub fn new(keys: Vec<Key>) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every declared leaf in dot notation, array elements written `[]`.
    ///
    /// A map or array without members is itself a leaf.
    pub fn to_dot_notation(&self) -> Vec<String> {
        let mut out = Vec::new();
        for key in &self.0 {
            match key {
                Key::Field(name) => out.push(name.clone()),
                Key::Map { name, members } => extend_dotted(&mut out, name, ".", members),
                Key::Array { name, members } => extend_dotted(&mut out, name, "[].", members),
            }
        }
        out
    }

    /// Declared leaf paths that do not pass through an array.
    ///
    /// These are the locations that get an empty placeholder in compiled
    /// output; element paths depend on the input and are left out.
    pub fn leaf_paths(&self) -> Vec<Path> {
        let mut out = Vec::new();
        self.collect_leaf_paths(&Path::root(), &mut out);
        out
    }

    fn collect_leaf_paths(&self, prefix: &Path, out: &mut Vec<Path>) {
        for key in &self.0 {
            let path = prefix.join(key.name());
            match key {
                Key::Map { members, .. } if !members.is_empty() => members.collect_leaf_paths(&path, out),
                Key::Field(_) | Key::Map { .. } | Key::Array { .. } => out.push(path),
            }
        }
    }
}

fn extend_dotted(out: &mut Vec<String>, name: &str, separator: &str, members: &KeyMap) {
    if members.is_empty() {
        out.push(name.to_string());
    } else {
        out.extend(
            members
                .to_dot_notation()
                .into_iter()
                .map(|member| format!("{name}{separator}{member}")),
        );
    }
}

impl FromIterator<Key> for KeyMap {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
