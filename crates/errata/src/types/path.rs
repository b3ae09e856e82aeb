use std::fmt::{Display, Formatter, Result as FmtResult};
use std::slice::Iter;

use serde::{Serialize, Serializer};

/// One step into nested input data: a symbolic map key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// A map key.
    Key(String),
    /// A zero-based array index.
    Index(usize),
}

impl PathSegment {
    /// Returns the key name, if this segment is symbolic.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    /// Returns the index, if this segment is numeric.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Key(_) => None,
            PathSegment::Index(index) => Some(*index),
        }
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A location inside nested input data.
///
/// Two paths are equal when their segment sequences are equal. The empty
/// path addresses the input root.
///
/// # Example
///
/// ```
/// use errata::{Path, PathSegment};
///
/// let path = Path::from(["roles"]).join(1_usize).join("name");
/// assert_eq!(path.to_string(), "roles[1].name");
/// assert_eq!(path.last(), Some(&PathSegment::Key("name".into())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Returns a new path extended by one segment.
    pub fn join(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// The last symbolic segment, skipping trailing indices.
    pub fn last_key(&self) -> Option<&str> {
        self.0.iter().rev().find_map(PathSegment::as_key)
    }

    /// Returns true if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// The segments after the first `len` ones.
    pub fn strip_prefix(&self, len: usize) -> Path {
        Path(self.0.iter().skip(len).cloned().collect())
    }

    /// The longest common prefix of two paths.
    pub fn common_prefix(&self, other: &Path) -> Path {
        Path(
            self.0
                .iter()
                .zip(&other.0)
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a.clone())
                .collect(),
        )
    }

    /// The longest common prefix of all `paths`, or `None` for an empty input.
    pub fn common_prefix_of<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<Path> {
        paths
            .into_iter()
            .fold(None, |acc: Option<Path>, path| match acc {
                None => Some(path.clone()),
                Some(prefix) => Some(prefix.common_prefix(path)),
            })
    }

    /// Symbolic segments joined with `.`, indices dropped.
    ///
    /// This is the form used to interpolate a path into catalog lookup keys.
    pub fn to_lookup_key(&self) -> String {
        self.0
            .iter()
            .filter_map(PathSegment::as_key)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Dot/bracket notation with every index replaced by `[]`.
    ///
    /// ```
    /// use errata::Path;
    ///
    /// let path = Path::from(["roles"]).join(3_usize).join("name");
    /// assert_eq!(path.to_wildcard_notation(), "roles[].name");
    /// ```
    pub fn to_wildcard_notation(&self) -> String {
        self.render(|_| "[]".to_string())
    }

    fn render(&self, index: impl Fn(usize) -> String) -> String {
        let mut out = String::new();
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(i) => out.push_str(&index(*i)),
            }
        }
        out
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.render(|i| format!("[{i}]")))
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(keys: [&str; N]) -> Self {
        Self(keys.into_iter().map(PathSegment::from).collect())
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_brackets_for_indices() {
        let path = Path::from(["payments"]).join(0_usize).join("amount");
        assert_eq!(path.to_string(), "payments[0].amount");
    }

    #[test]
    fn lookup_key_drops_indices() {
        let path = Path::from(["payments"]).join(0_usize).join("amount");
        assert_eq!(path.to_lookup_key(), "payments.amount");
    }

    #[test]
    fn common_prefix_stops_at_first_difference() {
        let a = Path::from(["user", "email"]);
        let b = Path::from(["user", "nickname"]);
        assert_eq!(a.common_prefix(&b), Path::from(["user"]));
    }

    #[test]
    fn common_prefix_of_disjoint_paths_is_root() {
        let paths = [Path::from(["a"]), Path::from(["b"])];
        assert_eq!(Path::common_prefix_of(&paths), Some(Path::root()));
    }

    #[test]
    fn common_prefix_of_nothing_is_none() {
        assert_eq!(Path::common_prefix_of(&[]), None);
    }

    #[test]
    fn last_key_skips_trailing_index() {
        let path = Path::from(["tags"]).join(2_usize);
        assert_eq!(path.last_key(), Some("tags"));
    }
}
