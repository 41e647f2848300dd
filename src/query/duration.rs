//! Prometheus-style range durations (`1h30m`, `5m`, `3s`)

use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Window used when a selector carries no range.
pub const DEFAULT_RANGE_MS: i64 = 60 * 60 * 1000;

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$").expect("valid duration regex")
    })
}

/// Parse an `[h][m][s]` duration into milliseconds.
///
/// Units must appear in that order, each at most once. Zero-length
/// durations are rejected.
pub fn parse_duration_ms(input: &str) -> Result<i64> {
    let input = input.trim();
    let caps = duration_re()
        .captures(input)
        .ok_or_else(|| Error::InvalidQuery(format!("invalid duration format: {}", input)))?;

    let mut total_ms: i64 = 0;
    for (idx, unit_ms) in [(1, 3_600_000i64), (2, 60_000), (3, 1_000)] {
        if let Some(part) = caps.get(idx) {
            let amount: i64 = part.as_str().parse().map_err(|_| {
                Error::InvalidQuery(format!("duration component out of range: {}", input))
            })?;
            total_ms = amount
                .checked_mul(unit_ms)
                .and_then(|ms| total_ms.checked_add(ms))
                .ok_or_else(|| Error::InvalidQuery(format!("duration overflows: {}", input)))?;
        }
    }

    if total_ms == 0 {
        return Err(Error::InvalidQuery(format!(
            "duration cannot be zero: {}",
            input
        )));
    }
    Ok(total_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_units() {
        assert_eq!(parse_duration_ms("3s").unwrap(), 3_000);
        assert_eq!(parse_duration_ms("5m").unwrap(), 300_000);
        assert_eq!(parse_duration_ms("2h").unwrap(), 7_200_000);
    }

    #[test]
    fn test_combined_units() {
        assert_eq!(parse_duration_ms("1h30m").unwrap(), 5_400_000);
        assert_eq!(parse_duration_ms("1h1m1s").unwrap(), 3_661_000);
        assert_eq!(parse_duration_ms(" 90s ").unwrap(), 90_000);
    }

    #[test]
    fn test_rejects_zero() {
        assert!(parse_duration_ms("0s").is_err());
        assert!(parse_duration_ms("0h0m").is_err());
        assert!(parse_duration_ms("").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_duration_ms("3d").is_err());
        assert!(parse_duration_ms("s3").is_err());
        assert!(parse_duration_ms("1s1m").is_err());
        assert!(parse_duration_ms("1.5m").is_err());
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(parse_duration_ms("99999999999999999999h").is_err());
        assert!(parse_duration_ms("9223372036854775h").is_err());
    }
}
