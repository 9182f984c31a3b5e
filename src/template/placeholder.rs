//! Placeholder substitution for template content.
//!
//! Template files mark substitution points with `{{ key }}` tokens.
//!
//! # Syntax
//!
//! - `{{ key }}` - replaced with the answer for `key`; whitespace inside the
//!   braces is ignored and `key` is made of ASCII letters, digits and `_`
//! - `\{{ key }}` - produces the literal `{{ key }}`; the backslash is dropped
//! - a token whose key has no answer is left exactly as written
//!
//! # Example
//!
//! ```
//! use titan_init::config::Configuration;
//! use titan_init::template::substitute;
//!
//! let scope = Configuration::new("foo", "", "");
//! let out = substitute("Project: {{ name }}, Owner: {{ owner }}", &scope);
//! assert_eq!(out, "Project: foo, Owner: {{ owner }}");
//! ```

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config::Configuration;

/// Matches an optionally escaped `{{ key }}` token.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\\)?\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("token regex is valid")
});

/// A segment of template text.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    /// Text copied through unchanged.
    Literal(&'a str),
    /// A `{{ key }}` token; `raw` is the token exactly as written.
    Placeholder { key: &'a str, raw: &'a str },
    /// A `\{{ key }}` token; `raw` is the token without the backslash.
    Escaped(&'a str),
}

/// Split template text into literal and token segments.
pub fn parse(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in TOKEN_REGEX.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            segments.push(Segment::Literal(&input[last..whole.start()]));
        }

        match (caps.get(1), caps.get(2)) {
            (Some(escape), _) => segments.push(Segment::Escaped(&input[escape.end()..whole.end()])),
            (None, Some(key)) => segments.push(Segment::Placeholder {
                key: key.as_str(),
                raw: whole.as_str(),
            }),
            (None, None) => segments.push(Segment::Literal(whole.as_str())),
        }

        last = whole.end();
    }

    if last < input.len() {
        segments.push(Segment::Literal(&input[last..]));
    }

    segments
}

/// Replace every resolvable token in `content` with its answer from `scope`.
///
/// Never fails: unknown keys are passed through untouched.
pub fn substitute(content: &str, scope: &Configuration) -> String {
    let mut result = String::with_capacity(content.len());

    for segment in parse(content) {
        match segment {
            Segment::Literal(text) => result.push_str(text),
            Segment::Escaped(raw) => result.push_str(raw),
            Segment::Placeholder { key, raw } => match scope.get(key) {
                Some(value) => result.push_str(value),
                None => result.push_str(raw),
            },
        }
    }

    result
}

/// Keys referenced by unescaped tokens in `content`.
pub fn placeholder_keys(content: &str) -> HashSet<&str> {
    parse(content)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Placeholder { key, .. } => Some(key),
            _ => None,
        })
        .collect()
}

/// Check if `content` contains any token, escaped or not.
pub fn has_placeholders(content: &str) -> bool {
    TOKEN_REGEX.is_match(content)
}
