//! Per-connection grammar settings.

use oxide_sql_core::grammar::generic;
use serde::{Deserialize, Serialize};

use crate::error::{Db2Error, Result};

/// Settings for a [`Db2Grammar`](crate::Db2Grammar).
///
/// A grammar owns its configuration, so one grammar per connection keeps
/// settings from leaking between sessions.
///
/// # Example
///
/// ```rust
/// use oxide_sql_db2::Db2Config;
///
/// let config = Db2Config::from_json(
///     r#"{ "offset_compatibility_mode": false, "table_prefix": "app_" }"#,
/// )
/// .unwrap();
///
/// assert!(!config.offset_compatibility_mode);
/// assert!(config.quote_identifiers);
/// assert_eq!(config.table_prefix, "app_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Db2Config {
    /// `strftime`-style format for timestamp bindings; `None` uses the
    /// generic default.
    pub date_format: Option<String>,
    /// Emulate `OFFSET` with `row_number()` and render limits as
    /// `FETCH FIRST n ROWS ONLY`, for DB2 releases without `LIMIT`/`OFFSET`.
    pub offset_compatibility_mode: bool,
    /// Wrap identifiers in double quotes. When off, identifiers are emitted
    /// bare and DB2 folds them to upper case.
    pub quote_identifiers: bool,
    /// Prefix applied to every table name.
    pub table_prefix: String,
    /// Regex selecting the columns cast with `CHAR()` in `LIKE` comparisons.
    pub char_cast_pattern: Option<String>,
}

impl Default for Db2Config {
    fn default() -> Self {
        Self {
            date_format: None,
            offset_compatibility_mode: true,
            quote_identifiers: true,
            table_prefix: String::new(),
            char_cast_pattern: None,
        }
    }
}

impl Db2Config {
    /// Parses a JSON configuration document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Db2Error::Config`] if the document is malformed or has
    /// unknown keys.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks settings that can only be validated by trying them.
    ///
    /// # Errors
    ///
    /// Returns [`Db2Error::InvalidDateFormat`] if the date format cannot
    /// render a timestamp.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref format) = self.date_format {
            if !generic::is_valid_date_format(format) {
                return Err(Db2Error::InvalidDateFormat(format.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Db2Config::default();
        assert!(config.offset_compatibility_mode);
        assert!(config.quote_identifiers);
        assert!(config.date_format.is_none());
        assert!(config.table_prefix.is_empty());
        assert!(config.char_cast_pattern.is_none());
    }

    #[test]
    fn test_from_json_partial() {
        let config = Db2Config::from_json(r#"{ "date_format": "%Y-%m-%d-%H.%M.%S" }"#).unwrap();
        assert_eq!(config.date_format.as_deref(), Some("%Y-%m-%d-%H.%M.%S"));
        assert!(config.offset_compatibility_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = Db2Config::from_json(r#"{ "offset_mode": true }"#).unwrap_err();
        assert!(matches!(err, Db2Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_date_format() {
        let config = Db2Config {
            date_format: Some(String::from("%Y-%Q")),
            ..Db2Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Db2Error::InvalidDateFormat(ref f)) if f == "%Y-%Q"
        ));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = Db2Config {
            table_prefix: String::from("app_"),
            quote_identifiers: false,
            ..Db2Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Db2Config::from_json(&json).unwrap(), config);
    }
}
