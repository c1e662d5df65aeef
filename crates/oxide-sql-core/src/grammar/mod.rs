//! Query grammars.
//!
//! A [`Grammar`] turns a [`Query`] into SQL text. Every method has a default
//! that forwards to the matching free function in [`generic`], handing `self`
//! along so that nested rendering (sub-selects, wrapped identifiers, limit
//! fragments) keeps going through the dialect. A dialect overrides the
//! methods it spells differently and calls into [`generic`] directly for the
//! cases it leaves alone.
//!
//! Predicates are dispatched in one place, [`Grammar::compile_where`]; only
//! the predicate kinds with their own method there can be overridden.

mod components;
pub mod generic;

pub use components::{Component, Components};
pub use generic::GenericGrammar;

use chrono::NaiveDateTime;

use crate::query::{BasicWhere, Column, InWhere, Predicate, Query};
use crate::value::{SqlValue, Value};

/// Dialect-specific SQL compilation.
pub trait Grammar {
    /// Returns the grammar name.
    fn name(&self) -> &'static str;

    /// Prefix applied to every table name.
    fn table_prefix(&self) -> &str {
        ""
    }

    /// `strftime`-style format used for timestamp bindings.
    fn date_format(&self) -> &str {
        generic::DEFAULT_DATE_FORMAT
    }

    /// Quotes a single identifier segment.
    fn wrap_value(&self, segment: &str) -> String {
        generic::wrap_value(segment)
    }

    /// Quotes a possibly dotted or aliased column reference.
    fn wrap(&self, column: &Column) -> String {
        generic::wrap(self, column)
    }

    /// Quotes a table name, applying the table prefix.
    fn wrap_table(&self, table: &str) -> String {
        generic::wrap_table(self, table)
    }

    /// Returns the placeholder for a value, or the raw text of an expression.
    fn parameter(&self, value: &Value) -> String {
        generic::parameter(value)
    }

    /// Compiles a `SELECT` statement.
    ///
    /// Takes the query mutably because a dialect may need to move bindings
    /// between partitions when it relocates SQL text.
    fn compile_select(&self, query: &mut Query) -> String {
        generic::compile_select(self, query)
    }

    /// Compiles an existence check for the query.
    fn compile_exists(&self, query: &Query) -> String {
        generic::compile_exists(self, query)
    }

    /// Compiles a `SAVEPOINT` statement.
    fn compile_savepoint(&self, name: &str) -> String {
        generic::compile_savepoint(name)
    }

    /// Renders every clause of the query into its own fragment.
    fn compile_components(&self, query: &Query) -> Components {
        generic::compile_components(self, query)
    }

    /// Renders one predicate.
    fn compile_where(&self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::Basic(clause) => self.where_basic(clause),
            Predicate::In(clause) => self.where_in(clause),
            Predicate::NotIn(clause) => self.where_not_in(clause),
            Predicate::Null(column) => generic::where_null(self, column),
            Predicate::NotNull(column) => generic::where_not_null(self, column),
            Predicate::Between(clause) => generic::where_between(self, clause),
            Predicate::Column(clause) => generic::where_column(self, clause),
            Predicate::Raw(sql) => sql.sql().to_string(),
            Predicate::Nested(query) => generic::where_nested(self, query),
            Predicate::Exists { query, negated } => generic::where_exists(self, query, *negated),
        }
    }

    /// Renders `column operator value`.
    fn where_basic(&self, clause: &BasicWhere) -> String {
        generic::where_basic(self, clause)
    }

    /// Renders `column in (...)`.
    fn where_in(&self, clause: &InWhere) -> String {
        generic::where_in(self, clause)
    }

    /// Renders `column not in (...)`.
    fn where_not_in(&self, clause: &InWhere) -> String {
        generic::where_not_in(self, clause)
    }

    /// Renders the row-limit fragment.
    fn compile_limit(&self, limit: u64) -> String {
        generic::compile_limit(limit)
    }

    /// Renders the row-offset fragment.
    fn compile_offset(&self, offset: u64) -> String {
        generic::compile_offset(offset)
    }

    /// Formats a timestamp with [`Grammar::date_format`].
    fn format_date(&self, timestamp: &NaiveDateTime) -> String {
        generic::format_date(self, timestamp)
    }

    /// Converts bindings into the form sent to the driver.
    fn prepare_bindings(&self, bindings: Vec<SqlValue>) -> Vec<SqlValue> {
        generic::prepare_bindings(self, bindings)
    }
}
