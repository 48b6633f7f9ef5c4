//! Key patterns with named placeholders.
//!
//! A pattern is literal text mixed with `{name}` placeholders:
//!
//! ```text
//! user/{id}/orders/{order}
//! ```
//!
//! Compiling a pattern turns every placeholder into a non-greedy capture group and
//! anchors the whole expression, so a key matches only when the entire key fits
//! the pattern. Literal text is matched exactly, regex metacharacters included.
//!
//! ## Validation
//!
//! [`Pattern::compile`] rejects:
//!
//! | Pattern | Error |
//! |---------|-------|
//! | `a/{id}/{id}` | [`PatternError::DuplicatePlaceholder`] |
//! | `a/{}` | [`PatternError::EmptyPlaceholder`] |
//! | `a/{x{y}}` | [`PatternError::NestedPlaceholder`] |
//! | `a/{id` or `a/}` | [`PatternError::UnbalancedBrace`] |
//!
//! Braces are reserved for placeholders: a literal `{` or `}` cannot appear in a
//! pattern, so `a}b` and `a/{x}}` are rejected too.
//!
//! ## Ambiguity
//!
//! Placeholders capture as little as possible, left to right. Matching
//! `{a}-{b}` against `x-y-z` yields `a = "x"` and `b = "y-z"`.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use smol_str::SmolStr;
use thiserror::Error;

use crate::context::{KeyContext, KeyParams};

/// Reasons a pattern can fail to compile.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Two placeholders share the same name.
    #[error("placeholder `{{{0}}}` is used more than once")]
    DuplicatePlaceholder(SmolStr),

    /// A placeholder without a name (`{}`), at the given byte offset.
    #[error("empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),

    /// A placeholder name containing an opening brace, at the given byte offset.
    #[error("nested braces in placeholder at byte {0}")]
    NestedPlaceholder(usize),

    /// An opening brace that is never closed, or a closing brace outside a placeholder.
    #[error("unbalanced brace at byte {0}")]
    UnbalancedBrace(usize),

    /// The generated expression was rejected by the regex engine.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder,
}

/// A compiled key pattern.
///
/// Cloning is cheap: the compiled regex is reference counted internally.
#[derive(Clone)]
pub struct Pattern {
    source: SmolStr,
    names: Vec<SmolStr>,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` into a matcher, validating its placeholders.
    ///
    /// ```
    /// use extensor_core::{Pattern, PatternError};
    ///
    /// assert!(Pattern::compile("user/{id}").is_ok());
    /// assert!(matches!(
    ///     Pattern::compile("user/{id}/{id}"),
    ///     Err(PatternError::DuplicatePlaceholder(_))
    /// ));
    /// ```
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let (segments, names) = parse(source)?;

        let mut expr = String::with_capacity(source.len() + 8);
        expr.push_str("(?s)^");
        for segment in segments {
            match segment {
                Segment::Literal(text) => expr.push_str(&regex::escape(text)),
                Segment::Placeholder => expr.push_str("(.*?)"),
            }
        }
        expr.push('$');

        Ok(Self {
            source: SmolStr::new(source),
            names,
            regex: Regex::new(&expr)?,
        })
    }

    /// Returns the pattern text as it was registered.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the placeholder names in the order they appear.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(SmolStr::as_str)
    }

    /// Returns `true` if the whole key matches this pattern.
    #[inline]
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// Matches `key` against the pattern and extracts placeholder values.
    ///
    /// Returns `None` when the key does not match.
    pub fn capture(&self, key: &str) -> Option<KeyContext> {
        let captures = self.regex.captures(key)?;
        let params = self
            .names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let value = captures.get(index + 1).map_or("", |m| m.as_str());
                (name.clone(), SmolStr::new(value))
            })
            .collect::<KeyParams>();
        Some(KeyContext::new(key, params))
    }
}

/// Splits `source` into literal and placeholder segments.
///
/// A placeholder runs from `{` to the next `}`.
fn parse(source: &str) -> Result<(Vec<Segment<'_>>, Vec<SmolStr>), PatternError> {
    let mut segments = Vec::new();
    let mut names: Vec<SmolStr> = Vec::new();
    let mut cursor = 0;

    while let Some(found) = source[cursor..].find(['{', '}']) {
        let open = cursor + found;
        if source.as_bytes()[open] == b'}' {
            return Err(PatternError::UnbalancedBrace(open));
        }

        let close = source[open + 1..]
            .find('}')
            .map(|offset| open + 1 + offset)
            .ok_or(PatternError::UnbalancedBrace(open))?;

        let name = &source[open + 1..close];
        if name.contains('{') {
            return Err(PatternError::NestedPlaceholder(open));
        }
        if name.is_empty() {
            return Err(PatternError::EmptyPlaceholder(open));
        }
        if names.iter().any(|existing| existing == name) {
            return Err(PatternError::DuplicatePlaceholder(SmolStr::new(name)));
        }

        if open > cursor {
            segments.push(Segment::Literal(&source[cursor..open]));
        }
        segments.push(Segment::Placeholder);
        names.push(SmolStr::new(name));
        cursor = close + 1;
    }

    if cursor < source.len() {
        segments.push(Segment::Literal(&source[cursor..]));
    }

    Ok((segments, names))
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("names", &self.names)
            .finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl TryFrom<&str> for Pattern {
    type Error = PatternError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::compile(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_named_parameters() {
        let pattern = Pattern::compile("this/{verb}/a/test/{noun}").unwrap();
        let ctx = pattern.capture("this/is/a/test/sentence").unwrap();

        assert_eq!(ctx.key(), "this/is/a/test/sentence");
        assert_eq!(ctx.param("verb"), Some("is"));
        assert_eq!(ctx.param("noun"), Some("sentence"));
        assert_eq!(ctx.params().len(), 2);
    }

    #[test]
    fn test_literal_pattern_matches_only_itself() {
        let pattern = Pattern::compile("test/pattern").unwrap();

        assert!(pattern.is_match("test/pattern"));
        assert!(!pattern.is_match("test/pattern/extra"));
        assert!(!pattern.is_match("prefix/test/pattern"));
        assert!(pattern.capture("test/pattern").unwrap().params().is_empty());
    }

    #[test]
    fn test_non_matching_key() {
        let pattern = Pattern::compile("user/{id}").unwrap();

        assert!(pattern.capture("order/42").is_none());
        assert!(!pattern.is_match("order/42"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = Pattern::compile("a.b/{id}+(x)").unwrap();

        assert!(pattern.is_match("a.b/7+(x)"));
        assert!(!pattern.is_match("aXb/7+(x)"));
        assert!(!pattern.is_match("a.b/7x"));
    }

    #[test]
    fn test_non_greedy_capture_left_to_right() {
        let pattern = Pattern::compile("{a}-{b}").unwrap();
        let ctx = pattern.capture("x-y-z").unwrap();

        assert_eq!(ctx.param("a"), Some("x"));
        assert_eq!(ctx.param("b"), Some("y-z"));
    }

    #[test]
    fn test_placeholder_may_capture_empty_string() {
        let pattern = Pattern::compile("user/{id}").unwrap();
        let ctx = pattern.capture("user/").unwrap();

        assert_eq!(ctx.param("id"), Some(""));
    }

    #[test]
    fn test_names_outside_regex_identifier_rules() {
        let pattern = Pattern::compile("user/{user-id}/{ключ}").unwrap();
        let ctx = pattern.capture("user/42/значение").unwrap();

        assert_eq!(ctx.param("user-id"), Some("42"));
        assert_eq!(ctx.param("ключ"), Some("значение"));
    }

    #[test]
    fn test_substituted_values_round_trip() {
        let pattern = Pattern::compile("tenant/{tenant}/doc/{doc}/rev/{rev}").unwrap();
        let values = [
            ("acme", "readme.md", "1"),
            ("a b c", "x\ny", "v2.0"),
            ("", "only-doc", ""),
            ("t(1)", "[doc]*", "$rev^"),
        ];

        for (tenant, doc, rev) in values {
            let key = format!("tenant/{tenant}/doc/{doc}/rev/{rev}");
            let ctx = pattern.capture(&key).unwrap();
            assert_eq!(ctx.param("tenant"), Some(tenant), "key {key:?}");
            assert_eq!(ctx.param("doc"), Some(doc), "key {key:?}");
            assert_eq!(ctx.param("rev"), Some(rev), "key {key:?}");
        }
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Pattern::compile("a/{id}/b/{id}").unwrap_err();
        assert!(matches!(err, PatternError::DuplicatePlaceholder(ref name) if name == "id"));
    }

    #[test]
    fn test_rejects_empty_placeholder() {
        let err = Pattern::compile("a/{}/b").unwrap_err();
        assert!(matches!(err, PatternError::EmptyPlaceholder(2)));
    }

    #[test]
    fn test_rejects_nested_braces() {
        let err = Pattern::compile("a/{x{y}}").unwrap_err();
        assert!(matches!(err, PatternError::NestedPlaceholder(2)));
    }

    #[test]
    fn test_rejects_unbalanced_braces() {
        assert!(matches!(
            Pattern::compile("a/{id").unwrap_err(),
            PatternError::UnbalancedBrace(2)
        ));
        assert!(matches!(
            Pattern::compile("a/}").unwrap_err(),
            PatternError::UnbalancedBrace(2)
        ));
        assert!(matches!(
            Pattern::compile("a}b").unwrap_err(),
            PatternError::UnbalancedBrace(1)
        ));
        assert!(matches!(
            Pattern::compile("a/{x}}").unwrap_err(),
            PatternError::UnbalancedBrace(5)
        ));
    }

    #[test]
    fn test_display_and_names() {
        let pattern: Pattern = "orders/{customer}/{order}".parse().unwrap();

        assert_eq!(pattern.to_string(), "orders/{customer}/{order}");
        assert_eq!(pattern.names().collect::<Vec<_>>(), vec!["customer", "order"]);
    }
}
