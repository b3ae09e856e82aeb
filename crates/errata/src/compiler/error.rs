//! Error types for message compilation.

use strsim::levenshtein;
use thiserror::Error;

use crate::types::Path;

/// An error that aborts compiling a result tree.
///
/// These are authoring bugs in a schema or catalog, never problems with the
/// validated data.
#[derive(Debug, Error)]
pub enum CompileError {
    /// No template exists anywhere in the lookup cascade.
    #[error(
        "message for '{predicate}' at '{path}' was not found, looked up: {}{}",
        looked_up.join(", "),
        format_suggestions(suggestions)
    )]
    MissingMessage {
        predicate: String,
        path: Path,
        looked_up: Vec<String>,
        suggestions: Vec<String>,
    },

    /// The template references a placeholder the predicate did not supply.
    #[error("template '{key}' uses %{{{token}}} but predicate '{predicate}' has no such argument")]
    MissingToken {
        key: String,
        token: String,
        predicate: String,
    },

    /// A predicate has no catalog entry at all, so it cannot be exported.
    #[error("unknown predicate '{predicate}' for {target}")]
    UnknownPredicate { predicate: String, target: String },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}

/// Compute typo suggestions using Levenshtein distance.
///
/// - distance <= 1 for names <= 3 chars
/// - distance <= 2 for longer names
/// - at most 3 suggestions, closest first
pub fn compute_suggestions<'a>(name: &str, available: impl Iterator<Item = &'a str>) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, String)> = available
        .filter_map(|candidate| {
            let dist = levenshtein(name, candidate);
            if dist <= max_distance && dist > 0 {
                Some((dist, candidate.to_string()))
            } else {
                None
            }
        })
        .collect();

    suggestions.sort();
    suggestions.dedup();
    suggestions.into_iter().take(3).map(|(_, s)| s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_prefer_closest() {
        let available = ["filled?", "field?", "format?"];
        let suggestions = compute_suggestions("filed?", available.into_iter());
        assert_eq!(suggestions, vec!["filled?", "field?"]);
    }

    #[test]
    fn suggestions_skip_exact_and_distant() {
        let available = ["gt?", "lteq?"];
        assert!(compute_suggestions("gt?", available.into_iter()).is_empty());
    }

    #[test]
    fn missing_message_display_lists_lookups() {
        let err = CompileError::MissingMessage {
            predicate: "filed?".to_string(),
            path: Path::from(["name"]),
            looked_up: vec!["errata.en.errors.filed?".to_string()],
            suggestions: vec!["filled?".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "message for 'filed?' at 'name' was not found, looked up: errata.en.errors.filed?; did you mean: filled??"
        );
    }
}
