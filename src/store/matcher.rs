//! Label matcher evaluation

use crate::proto::{LabelMatcher, MatchType};
use crate::{Error, Result};
use regex::Regex;

/// A label matcher ready to evaluate against label sets
#[derive(Debug, Clone)]
pub enum CompiledMatcher {
    Eq(String, String),
    Neq(String, String),
    Re(String, Regex),
    Nre(String, Regex),
}

impl CompiledMatcher {
    /// Compile a wire matcher. Regexes are anchored at both ends.
    pub fn compile(matcher: &LabelMatcher) -> Result<Self> {
        let match_type = MatchType::try_from(matcher.r#type).map_err(|_| {
            Error::InvalidQuery(format!("unknown matcher type: {}", matcher.r#type))
        })?;
        let name = matcher.name.clone();

        Ok(match match_type {
            MatchType::Eq => CompiledMatcher::Eq(name, matcher.value.clone()),
            MatchType::Neq => CompiledMatcher::Neq(name, matcher.value.clone()),
            MatchType::Re => CompiledMatcher::Re(name, anchored(&matcher.value)?),
            MatchType::Nre => CompiledMatcher::Nre(name, anchored(&matcher.value)?),
        })
    }

    pub fn label_name(&self) -> &str {
        match self {
            CompiledMatcher::Eq(name, _)
            | CompiledMatcher::Neq(name, _)
            | CompiledMatcher::Re(name, _)
            | CompiledMatcher::Nre(name, _) => name,
        }
    }

    /// Evaluate against the value of the matcher's label; a missing label
    /// is the empty string.
    pub fn matches_value(&self, value: Option<&str>) -> bool {
        let value = value.unwrap_or("");
        match self {
            CompiledMatcher::Eq(_, expected) => value == expected,
            CompiledMatcher::Neq(_, expected) => value != expected,
            CompiledMatcher::Re(_, re) => re.is_match(value),
            CompiledMatcher::Nre(_, re) => !re.is_match(value),
        }
    }

    /// Evaluate against a label set sorted by name.
    pub fn matches(&self, labels: &[(String, String)]) -> bool {
        let name = self.label_name();
        let value = labels
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|idx| labels[idx].1.as_str());
        self.matches_value(value)
    }
}

fn anchored(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{})$", pattern))?)
}

/// Compile every matcher of a query; at least one is required.
pub fn compile_all(matchers: &[LabelMatcher]) -> Result<Vec<CompiledMatcher>> {
    if matchers.is_empty() {
        return Err(Error::InvalidQuery(
            "query must contain at least one matcher".to_string(),
        ));
    }
    matchers.iter().map(CompiledMatcher::compile).collect()
}
