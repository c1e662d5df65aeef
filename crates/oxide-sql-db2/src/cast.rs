//! Deciding which columns need `CHAR()` before `UPPER()`.
//!
//! DB2 cannot apply `UPPER()` to date, time or timestamp columns directly, so
//! those are cast with `CHAR()` first. Casting everything is not an option:
//! `CHAR()` over a large CLOB or JSON column fails with SQL0137. Column types
//! are not known at compile time, so the decision is made from the column
//! name.

use regex::Regex;

use crate::error::{Db2Error, Result};

/// Matches column names ending in `_at`, `_date` or `_time`, in any case.
pub const DEFAULT_CHAR_CAST_PATTERN: &str = r"(?i)(_at|_date|_time)$";

/// Name-based rule for casting columns to `CHAR` in case-insensitive matches.
#[derive(Debug, Clone)]
pub struct CharCastPolicy {
    regex: Regex,
}

impl CharCastPolicy {
    /// Builds a policy from a regular expression matched against the full
    /// column reference (`created_at`, `users.created_at`).
    ///
    /// # Errors
    ///
    /// Returns [`Db2Error::InvalidCastPattern`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(|regex| Self { regex })
            .map_err(|source| Db2Error::InvalidCastPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns `true` if the column should be cast with `CHAR()`.
    #[must_use]
    pub fn needs_char_cast(&self, column: &str) -> bool {
        self.regex.is_match(column)
    }
}

impl Default for CharCastPolicy {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_CHAR_CAST_PATTERN).expect("Invalid default char cast regex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_temporal_suffixes() {
        let policy = CharCastPolicy::default();
        assert!(policy.needs_char_cast("created_at"));
        assert!(policy.needs_char_cast("BIRTH_DATE"));
        assert!(policy.needs_char_cast("start_Time"));
        assert!(policy.needs_char_cast("users.updated_at"));
    }

    #[test]
    fn test_default_policy_skips_other_columns() {
        let policy = CharCastPolicy::default();
        assert!(!policy.needs_char_cast("name"));
        assert!(!policy.needs_char_cast("payload"));
        assert!(!policy.needs_char_cast("date_of_birth"));
        assert!(!policy.needs_char_cast("format"));
    }

    #[test]
    fn test_custom_policy() {
        let policy = CharCastPolicy::new(r"(?i)(_at|_ts|^dt_)").unwrap();
        assert!(policy.needs_char_cast("dt_shipped"));
        assert!(policy.needs_char_cast("load_ts"));
        assert!(!policy.needs_char_cast("birth_date"));
        assert_eq!(policy.pattern(), r"(?i)(_at|_ts|^dt_)");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = CharCastPolicy::new("(_at").unwrap_err();
        assert!(matches!(err, Db2Error::InvalidCastPattern { ref pattern, .. } if pattern == "(_at"));
        assert!(err.to_string().starts_with("Invalid char cast pattern '(_at'"));
    }
}
