//! Error types for the DB2 grammar.

/// Errors raised while configuring a [`Db2Grammar`](crate::Db2Grammar).
///
/// Compiling SQL never fails; only building a grammar from user-supplied
/// settings can.
#[derive(Debug, thiserror::Error)]
pub enum Db2Error {
    /// The char cast pattern is not a valid regular expression.
    #[error("Invalid char cast pattern '{pattern}': {source}")]
    InvalidCastPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why the regex engine rejected it.
        #[source]
        source: regex::Error,
    },

    /// The date format cannot render a timestamp.
    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),

    /// The configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for DB2 grammar configuration.
pub type Result<T> = std::result::Result<T, Db2Error>;
