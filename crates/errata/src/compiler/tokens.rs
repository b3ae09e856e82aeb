//! Interpolation tokens and lookup types derived from predicate arguments.

use std::collections::HashMap;

use crate::types::Value;

/// Argument name carrying the validated value.
pub const INPUT_ARG: &str = "input";

/// Separator for list-valued arguments.
pub const LIST_SEPARATOR: &str = ", ";

/// Builds the `%{name}` values for a predicate's arguments.
///
/// Lists are joined with [`LIST_SEPARATOR`], ranges become `<name>_left`
/// and `<name>_right`, everything else is displayed as-is.
pub fn message_tokens(args: &[(String, Value)]) -> HashMap<String, String> {
    let mut tokens = HashMap::with_capacity(args.len());
    for (name, value) in args {
        match value {
            Value::List(items) => {
                let joined = items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(LIST_SEPARATOR);
                tokens.insert(name.clone(), joined);
            }
            Value::Range(left, right) => {
                tokens.insert(format!("{name}_left"), left.to_string());
                tokens.insert(format!("{name}_right"), right.to_string());
            }
            other => {
                tokens.insert(name.clone(), other.to_string());
            }
        }
    }
    tokens
}

/// Catalog qualifier for the argument shape: `range` when the only
/// argument is a range.
pub fn arg_type(arg_vals: &[&Value]) -> &'static str {
    match arg_vals {
        [value] if value.is_range() => "range",
        _ => "default",
    }
}

/// Catalog qualifier for the validated value.
pub fn val_type(input: &Value) -> &'static str {
    match input {
        Value::Range(..) => "range",
        Value::String(_) => "string",
        Value::Nil
        | Value::Bool(_)
        | Value::Number(_)
        | Value::Float(_)
        | Value::List(_)
        | Value::Data(_) => "default",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: Vec<(&str, Value)>) -> Vec<(String, Value)> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn ranges_split_into_left_and_right() {
        let tokens = message_tokens(&args(vec![("size", Value::range(2, 5))]));
        assert_eq!(tokens.get("size_left").map(String::as_str), Some("2"));
        assert_eq!(tokens.get("size_right").map(String::as_str), Some("5"));
        assert!(!tokens.contains_key("size"));
    }

    #[test]
    fn lists_are_joined() {
        let tokens = message_tokens(&args(vec![("list", Value::from(vec!["a", "b", "c"]))]));
        assert_eq!(tokens["list"], "a, b, c");
    }

    #[test]
    fn scalars_are_displayed() {
        let tokens = message_tokens(&args(vec![("num", 18.into()), ("input", "x".into())]));
        assert_eq!(tokens["num"], "18");
        assert_eq!(tokens["input"], "x");
    }

    #[test]
    fn arg_type_needs_single_range() {
        let range = Value::range(1, 2);
        let num = Value::from(1);
        assert_eq!(arg_type(&[&range]), "range");
        assert_eq!(arg_type(&[&num]), "default");
        assert_eq!(arg_type(&[&range, &num]), "default");
        assert_eq!(arg_type(&[]), "default");
    }

    #[test]
    fn val_type_by_input() {
        assert_eq!(val_type(&Value::from("abc")), "string");
        assert_eq!(val_type(&Value::range(1, 3)), "range");
        assert_eq!(val_type(&Value::from(3)), "default");
    }
}
