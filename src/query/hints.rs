//! `@ {read_hints="start=..,end=.."}` suffix of a selector

use crate::proto::ReadHints;
use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

fn read_hints_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\{\s*read_hints\s*=\s*"([^"]*)"\s*\}$"#).expect("valid read_hints regex")
    })
}

/// Read hints plus the window bounds the block named explicitly
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedHints {
    pub hints: ReadHints,
    /// `start` when given, including `start=0`
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
}

/// Parse the text after `@` into read hints.
///
/// Returns `None` when the block names no recognised key. Entries without
/// `=` and unknown keys are skipped.
pub fn parse_read_hints(input: &str) -> Result<Option<ParsedHints>> {
    let input = input.trim();
    let caps = read_hints_re().captures(input).ok_or_else(|| {
        Error::InvalidQuery(format!(
            "expected {{read_hints=\"...\"}} after '@', got: {}",
            input
        ))
    })?;

    let mut parsed = ParsedHints::default();
    let mut present = false;

    for entry in caps[1].split(',') {
        let Some((key, value)) = entry.trim().split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "start" => {
                let start = parse_hint_int(key, value)?;
                parsed.hints.start_ms = start;
                parsed.start_ms = Some(start);
            }
            "end" => {
                let end = parse_hint_int(key, value)?;
                parsed.hints.end_ms = end;
                parsed.end_ms = Some(end);
            }
            "step" => parsed.hints.step_ms = parse_hint_int(key, value)?,
            "range" => parsed.hints.range_ms = parse_hint_int(key, value)?,
            "func" => parsed.hints.func = value.to_string(),
            "by" => parsed.hints.by = value.eq_ignore_ascii_case("true"),
            "grouping" => parsed.hints.grouping.extend(
                value
                    .split('|')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(String::from),
            ),
            _ => continue,
        }
        present = true;
    }

    Ok(present.then_some(parsed))
}

fn parse_hint_int(key: &str, value: &str) -> Result<i64> {
    value.parse().map_err(|_| {
        Error::InvalidQuery(format!(
            "invalid integer value for {} in read_hints: {}",
            key, value
        ))
    })
}
