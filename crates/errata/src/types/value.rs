use std::fmt::{Display, Formatter, Result as FmtResult};

use serde_json::Value as Json;

/// A runtime value carried in a predicate's argument list.
///
/// Arguments are what the evaluator checked against (`18` in "must be
/// greater than 18") plus the `input` that was checked. `Value` keeps just
/// enough structure to pick a catalog variant (ranges, strings) and to
/// interpolate the argument into message text.
///
/// # Example
///
/// ```
/// use errata::Value;
///
/// let limit: Value = 18.into();
/// let between = Value::range(1, 5);
///
/// assert_eq!(limit.to_string(), "18");
/// assert!(between.is_range());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or null input.
    Nil,

    Bool(bool),

    /// An integer number.
    Number(i64),

    /// A floating-point number.
    Float(f64),

    /// A string value.
    String(String),

    /// An inclusive range, rendered through `<name>_left`/`<name>_right` tokens.
    Range(Box<Value>, Box<Value>),

    /// A sequence, rendered joined with `", "`.
    List(Vec<Value>),

    /// Structured input data (maps), rendered as JSON.
    Data(Json),
}

impl Value {
    /// Creates an inclusive range value.
    pub fn range(left: impl Into<Value>, right: impl Into<Value>) -> Self {
        Value::Range(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Value::Range(..))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Get this value as a number, if it is one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a string, if it is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Range(left, right) => write!(f, "{left}..{right}"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Data(json) => write!(f, "{json}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Number)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Nil,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => n
                .as_i64()
                .map(Value::Number)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Nil),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            object @ Json::Object(_) => Value::Data(object),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn list_displays_comma_separated() {
        let value = Value::from(vec!["admin", "user"]);
        assert_eq!(value.to_string(), "admin, user");
    }

    #[test]
    fn json_objects_stay_structured() {
        let value = Value::from(json!({"a": 1}));
        assert_eq!(value, Value::Data(json!({"a": 1})));
        assert_eq!(value.to_string(), r#"{"a":1}"#);
    }

    #[test]
    fn json_scalars_convert() {
        assert_eq!(Value::from(json!(3)), Value::Number(3));
        assert_eq!(Value::from(json!("x")), Value::String("x".into()));
        assert_eq!(Value::from(json!(null)), Value::Nil);
    }
}
