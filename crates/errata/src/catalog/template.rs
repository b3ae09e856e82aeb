//! Message template parser using winnow.
//!
//! Catalog values are plain text with `%{name}` placeholders. `%%` escapes a
//! literal percent sign; a `%` not followed by `{` is kept as-is. An
//! unterminated or empty placeholder is a syntax error.

use std::collections::HashMap;

use winnow::combinator::{alt, cut_err, preceded, repeat, terminated};
use winnow::prelude::*;
use winnow::token::{none_of, take_while};

use super::error::{RenderError, TemplateError};

/// A parsed message template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

/// A segment within a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text.
    Literal(String),
    /// A `%{name}` placeholder.
    Token(String),
}

impl Template {
    /// Names of every placeholder, in order of appearance.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Token(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Interpolates `values` into the template.
    ///
    /// Fails on the first placeholder without a value.
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, RenderError> {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Token(name) => {
                    let value = values.get(name).ok_or_else(|| RenderError::MissingValue {
                        token: name.clone(),
                    })?;
                    output.push_str(value);
                }
            }
        }
        Ok(output)
    }
}

/// Parse a template string into segments.
pub fn parse_template(input: &str) -> Result<Template, TemplateError> {
    let mut remaining = input;
    match template(&mut remaining) {
        Ok(t) if remaining.is_empty() => Ok(t),
        Ok(_) => {
            let (line, column) = calculate_position(input, remaining);
            Err(TemplateError::Syntax {
                line,
                column,
                message: format!(
                    "unexpected character: '{}'",
                    remaining.chars().next().unwrap_or('?')
                ),
            })
        }
        Err(e) => {
            let (line, column) = calculate_position(input, remaining);
            Err(TemplateError::Syntax {
                line,
                column,
                message: format!("parse error: {e}"),
            })
        }
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, column)
}

fn template(input: &mut &str) -> ModalResult<Template> {
    let segments: Vec<Segment> = repeat(0.., segment).parse_next(input)?;
    Ok(Template {
        segments: merge_literals(segments),
    })
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            token @ Segment::Token(_) => result.push(token),
        }
    }
    result
}

fn segment(input: &mut &str) -> ModalResult<Segment> {
    alt((escape_sequence, placeholder, literal_char, lone_percent)).parse_next(input)
}

/// `%%` -> `%`
fn escape_sequence(input: &mut &str) -> ModalResult<Segment> {
    "%%".value(Segment::Literal("%".to_string()))
        .parse_next(input)
}

/// `%{name}`
fn placeholder(input: &mut &str) -> ModalResult<Segment> {
    preceded("%{", cut_err(terminated(identifier, '}')))
        .map(|name: &str| Segment::Token(name.to_string()))
        .parse_next(input)
}

fn literal_char(input: &mut &str) -> ModalResult<Segment> {
    none_of(['%'])
        .map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// A `%` that starts neither an escape nor a placeholder.
fn lone_percent(input: &mut &str) -> ModalResult<Segment> {
    '%'.value(Segment::Literal("%".to_string()))
        .parse_next(input)
}

fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn plain_text_is_one_literal() {
        let t = parse_template("must be filled").unwrap();
        assert_eq!(t.segments, vec![Segment::Literal("must be filled".into())]);
    }

    #[test]
    fn placeholders_split_literals() {
        let t = parse_template("size must be within %{size_left} - %{size_right}").unwrap();
        assert_eq!(
            t.segments,
            vec![
                Segment::Literal("size must be within ".into()),
                Segment::Token("size_left".into()),
                Segment::Literal(" - ".into()),
                Segment::Token("size_right".into()),
            ]
        );
        assert_eq!(t.tokens().collect::<Vec<_>>(), vec!["size_left", "size_right"]);
    }

    #[test]
    fn percent_escapes_and_lone_percent() {
        let t = parse_template("100%% sure, 5% off").unwrap();
        assert_eq!(t.segments, vec![Segment::Literal("100% sure, 5% off".into())]);
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = parse_template("bad %{name").unwrap_err();
        let TemplateError::Syntax { line, .. } = err;
        assert_eq!(line, 1);
        assert!(parse_template("empty %{}").is_err());
    }

    #[test]
    fn render_interpolates_values() {
        let t = parse_template("must be greater than %{num}").unwrap();
        let text = t.render(&values(&[("num", "18")])).unwrap();
        assert_eq!(text, "must be greater than 18");
    }

    #[test]
    fn render_reports_missing_token() {
        let t = parse_template("must be one of: %{list}").unwrap();
        assert_eq!(
            t.render(&HashMap::new()),
            Err(RenderError::MissingValue {
                token: "list".to_string()
            })
        );
    }
}
