//! Series selector parsing
//!
//! Accepts `metric{label="value", ...}[range] @ {read_hints="..."}` and
//! nothing else. Aggregations and functions are not part of the grammar.

use super::duration::parse_duration_ms;
use super::hints::parse_read_hints;
use crate::proto::{MatchType, ReadHints};
use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// One `label op "value"` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorMatcher {
    pub name: String,
    pub op: MatchType,
    pub value: String,
}

/// A parsed selector
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub metric_name: String,
    pub matchers: Vec<SelectorMatcher>,
    /// Range in milliseconds from `[...]`, if given
    pub range_ms: Option<i64>,
    pub hints: Option<ReadHints>,
    /// Window bounds named by the read hints; they replace the range window
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
}

fn metric_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[a-zA-Z_:][a-zA-Z0-9_:]*").expect("valid metric regex"))
}

fn selector_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([a-zA-Z_:][a-zA-Z0-9_:]*)\s*(?:\{(.*)\})?\s*(?:\[([^\]]*)\])?\s*$")
            .expect("valid selector regex")
    })
}

fn matcher_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*(!=|=~|!~|=)\s*"((?:[^"\\]|\\.)*)"\s*(?:,|$)"#)
            .expect("valid matcher regex")
    })
}

/// Parse a selector string.
pub fn parse_selector(input: &str) -> Result<Selector> {
    let (main, hints) = split_modifier(input);

    if !metric_name_re().is_match(main) {
        return Err(Error::InvalidQuery(
            "metric name not found in query".to_string(),
        ));
    }

    let caps = selector_re().captures(main).ok_or_else(|| {
        Error::InvalidQuery(format!("unexpected input in selector: {}", main.trim()))
    })?;

    let metric_name = caps[1].to_string();
    let matchers = match caps.get(2) {
        Some(block) => parse_matchers(block.as_str())?,
        None => Vec::new(),
    };
    let range_ms = caps
        .get(3)
        .map(|range| parse_duration_ms(range.as_str()))
        .transpose()
        .map_err(|e| match e {
            Error::InvalidQuery(msg) => Error::InvalidQuery(format!("invalid time range: {}", msg)),
            other => other,
        })?;
    let parsed = match hints {
        Some(text) => parse_read_hints(text)?,
        None => None,
    };
    let (hints, start_ms, end_ms) = match parsed {
        Some(parsed) => (Some(parsed.hints), parsed.start_ms, parsed.end_ms),
        None => (None, None, None),
    };

    Ok(Selector {
        metric_name,
        matchers,
        range_ms,
        hints,
        start_ms,
        end_ms,
    })
}

/// Split at the first `@` that is not inside a quoted label value.
fn split_modifier(input: &str) -> (&str, Option<&str>) {
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, c) in input.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '@' if !in_quotes => return (&input[..idx], Some(&input[idx + 1..])),
            _ => {}
        }
    }
    (input, None)
}

/// Parse the inside of a `{...}` block.
///
/// `{}` means no matchers. A block holding only separators is rejected.
fn parse_matchers(block: &str) -> Result<Vec<SelectorMatcher>> {
    if block.is_empty() {
        return Ok(Vec::new());
    }
    if block.chars().all(|c| c == ',' || c.is_whitespace()) {
        return Err(Error::InvalidQuery(
            "empty label matcher block \"{}\" is invalid".to_string(),
        ));
    }

    let mut matchers = Vec::new();
    let mut rest = block;
    while !rest.trim().is_empty() {
        let caps = matcher_re().captures(rest).ok_or_else(|| {
            let clause = rest.split(',').next().unwrap_or(rest).trim();
            Error::InvalidQuery(format!("invalid label matcher: {}", clause))
        })?;

        let op = match &caps[2] {
            "=" => MatchType::Eq,
            "!=" => MatchType::Neq,
            "=~" => MatchType::Re,
            "!~" => MatchType::Nre,
            other => {
                return Err(Error::InvalidQuery(format!(
                    "unsupported operator: {}",
                    other
                )))
            }
        };
        matchers.push(SelectorMatcher {
            name: caps[1].to_string(),
            op,
            value: unescape(&caps[3]),
        });

        rest = &rest[caps[0].len()..];
    }

    Ok(matchers)
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
