//! DB2 query grammar.

use oxide_sql_core::grammar::{generic, Component, Components, Grammar};
use oxide_sql_core::query::{BasicWhere, BindingCategory, Column, InValues, InWhere, Query};
use oxide_sql_core::value::{SqlValue, Value};
use tracing::{debug, trace};

use crate::cast::CharCastPolicy;
use crate::config::Db2Config;
use crate::error::{Db2Error, Result};

/// SQL text together with the values for its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// The statement.
    pub sql: String,
    /// Parameter values aligned with the `?` placeholders of `sql`.
    pub bindings: Vec<SqlValue>,
}

/// Grammar for DB2.
///
/// Overrides the generic grammar for case-insensitive `LIKE`, small `IN`
/// lists, identifier quoting, pagination and savepoints; everything else is
/// rendered by [`generic`].
#[derive(Debug, Clone, Default)]
pub struct Db2Grammar {
    config: Db2Config,
    cast_policy: CharCastPolicy,
}

impl Db2Grammar {
    /// Creates a grammar with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grammar from a configuration.
    ///
    /// # Errors
    ///
    /// Fails if the date format or the char cast pattern is invalid.
    pub fn from_config(config: Db2Config) -> Result<Self> {
        config.validate()?;
        let cast_policy = match config.char_cast_pattern.as_deref() {
            Some(pattern) => CharCastPolicy::new(pattern)?,
            None => CharCastPolicy::default(),
        };
        Ok(Self {
            config,
            cast_policy,
        })
    }

    /// Replaces the char cast policy.
    #[must_use]
    pub fn with_cast_policy(mut self, policy: CharCastPolicy) -> Self {
        self.config.char_cast_pattern = Some(policy.pattern().to_string());
        self.cast_policy = policy;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Db2Config {
        &self.config
    }

    /// Returns the char cast policy.
    #[must_use]
    pub const fn cast_policy(&self) -> &CharCastPolicy {
        &self.cast_policy
    }

    /// Sets the format used for timestamp bindings.
    ///
    /// # Errors
    ///
    /// Returns [`Db2Error::InvalidDateFormat`] and keeps the current format
    /// if `format` cannot render a timestamp.
    pub fn set_date_format(&mut self, format: impl Into<String>) -> Result<()> {
        let format = format.into();
        if !generic::is_valid_date_format(&format) {
            return Err(Db2Error::InvalidDateFormat(format));
        }
        debug!(%format, "db2 date format changed");
        self.config.date_format = Some(format);
        Ok(())
    }

    /// Switches between `row_number()` pagination with `FETCH FIRST` and the
    /// generic `limit`/`offset` clauses.
    pub fn set_offset_compatibility_mode(&mut self, enabled: bool) {
        debug!(enabled, "db2 offset compatibility mode changed");
        self.config.offset_compatibility_mode = enabled;
    }

    /// Returns `true` if offsets are emulated with `row_number()`.
    #[must_use]
    pub const fn offset_compatibility_mode(&self) -> bool {
        self.config.offset_compatibility_mode
    }

    /// Compiles a copy of the query and returns the SQL with its prepared
    /// bindings. The caller's query is left untouched.
    #[must_use]
    pub fn to_sql(&self, query: &Query) -> CompiledQuery {
        let mut query = query.clone();
        let sql = self.compile_select(&mut query);
        CompiledQuery {
            sql,
            bindings: self.prepare_bindings(query.bindings()),
        }
    }

    /// Compiles the existence check for the query and returns it with its
    /// prepared bindings. The caller's query is left untouched.
    #[must_use]
    pub fn exists_to_sql(&self, query: &Query) -> CompiledQuery {
        let mut check = Self::exists_query(query);
        let sql = self.compile_select(&mut check);
        CompiledQuery {
            sql,
            bindings: self.prepare_bindings(check.bindings()),
        }
    }

    /// A copy of the query selecting `1 exists` from at most one row. The
    /// replaced select list takes its bindings with it.
    fn exists_query(query: &Query) -> Query {
        let mut check = query.clone();
        check.columns = Some(Vec::new());
        check.set_bindings(BindingCategory::Select, Vec::new());
        check.select_raw("1 exists", Vec::new()).limit(1)
    }

    /// `UPPER(col)`, or `UPPER(CHAR(col))` for columns the cast policy
    /// flags as temporal.
    fn upper_safe_column(&self, name: &str) -> String {
        let wrapped = self.wrap(&Column::named(name));
        if self.cast_policy.needs_char_cast(name) {
            format!("UPPER(CHAR({wrapped}))")
        } else {
            format!("UPPER({wrapped})")
        }
    }

    /// Appends the row number column to a select list.
    ///
    /// `columns` is either `"select "` or a select list ending in `", "`.
    #[must_use]
    pub fn compile_over(orderings: &str, columns: &str) -> String {
        format!("{columns}row_number() over ({orderings}) as row_num")
    }

    /// The `row_num` range for an offset and optional limit.
    #[must_use]
    pub fn compile_row_constraint(offset: u64, limit: Option<u64>) -> String {
        let start = offset.saturating_add(1);
        match limit {
            Some(limit) if limit > 0 => {
                format!("between {start} and {}", offset.saturating_add(limit))
            }
            _ => format!(">= {start}"),
        }
    }

    /// Wraps the numbered query and filters on `row_num`.
    #[must_use]
    pub fn compile_table_expression(sql: &str, constraint: &str) -> String {
        format!("select * from ({sql}) as temp_table where row_num {constraint}")
    }

    /// Rewrites an offset query into a `row_number()` window over a derived
    /// table filtered on the row number.
    ///
    /// `distinct` stays on the inner select, where the unique `row_num`
    /// column defeats it: duplicate rows are numbered and returned.
    fn compile_ansi_offset(
        &self,
        query: &mut Query,
        mut components: Components,
        offset: u64,
    ) -> String {
        debug!(offset, limit = ?query.limit, "emulating offset with row_number()");

        // DB2 rejects row_number() over an empty window.
        let orderings = components
            .remove(Component::Orders)
            .unwrap_or_else(|| String::from("order by 1"));
        components.remove(Component::Limit);

        // A bare `*` cannot share a select list with another column.
        let columns = match (components.get(Component::Columns), query.from.as_deref()) {
            (Some(columns), Some(from)) if columns.ends_with(" *") => {
                let select = columns.trim_end_matches('*');
                let qualifier = generic::split_alias(from).map_or(from, |(_, alias)| alias);
                format!("{select}{}.*, ", self.wrap_table(qualifier))
            }
            (Some(columns), _) if !columns.is_empty() => format!("{columns}, "),
            _ => String::from("select "),
        };
        components.insert(Component::Columns, Self::compile_over(&orderings, &columns));

        // The ordering text now sits in the select list, and so do its
        // placeholders.
        let order_bindings = query.bindings_mut().take(BindingCategory::Order);
        if !order_bindings.is_empty() {
            trace!(count = order_bindings.len(), "relocating order bindings to select");
            query
                .bindings_mut()
                .extend(BindingCategory::Select, order_bindings);
        }

        let constraint = Self::compile_row_constraint(offset, query.limit);
        Self::compile_table_expression(&components.concatenate(), &constraint)
    }
}

impl Grammar for Db2Grammar {
    fn name(&self) -> &'static str {
        "db2"
    }

    fn table_prefix(&self) -> &str {
        &self.config.table_prefix
    }

    fn date_format(&self) -> &str {
        self.config
            .date_format
            .as_deref()
            .unwrap_or(generic::DEFAULT_DATE_FORMAT)
    }

    fn wrap_value(&self, segment: &str) -> String {
        if self.config.quote_identifiers || segment == "*" {
            return generic::wrap_value(segment);
        }
        segment.replace('"', "\"\"")
    }

    fn compile_select(&self, query: &mut Query) -> String {
        if !self.config.offset_compatibility_mode {
            return generic::compile_select(self, query);
        }

        // Unset columns already compile as `select *`.
        let components = self.compile_components(query);

        let offset = query.offset.unwrap_or(0);
        if offset > 0 {
            return self.compile_ansi_offset(query, components, offset);
        }
        components.concatenate()
    }

    fn compile_exists(&self, query: &Query) -> String {
        self.compile_select(&mut Self::exists_query(query))
    }

    fn compile_savepoint(&self, name: &str) -> String {
        format!("SAVEPOINT {name} ON ROLLBACK RETAIN CURSORS")
    }

    fn where_basic(&self, clause: &BasicWhere) -> String {
        let operator = clause.operator.trim().to_uppercase();
        if operator != "LIKE" && operator != "NOT LIKE" {
            return generic::where_basic(self, clause);
        }

        // DB2 LIKE is case-sensitive; compare both sides upper-cased. Raw
        // operands are trusted to carry their own casing.
        let column = match &clause.column {
            Column::Raw(expr) => expr.sql().to_string(),
            Column::Named(name) => self.upper_safe_column(name),
        };
        let value = match &clause.value {
            Value::Raw(expr) => expr.sql().to_string(),
            Value::Literal(_) => format!("UPPER({})", self.parameter(&clause.value)),
        };
        format!("{column} {operator} {value}")
    }

    fn where_in(&self, clause: &InWhere) -> String {
        let InValues::List(values) = &clause.values else {
            return generic::where_in(self, clause);
        };
        match values.as_slice() {
            [] => String::from("0 = 1"),
            [only @ Value::Literal(_)] => {
                format!("{} = {}", self.wrap(&clause.column), self.parameter(only))
            }
            _ => generic::where_in(self, clause),
        }
    }

    fn where_not_in(&self, clause: &InWhere) -> String {
        let InValues::List(values) = &clause.values else {
            return generic::where_not_in(self, clause);
        };
        match values.as_slice() {
            [] => String::from("1 = 1"),
            [only @ Value::Literal(_)] => {
                format!("{} <> {}", self.wrap(&clause.column), self.parameter(only))
            }
            _ => generic::where_not_in(self, clause),
        }
    }

    fn compile_limit(&self, limit: u64) -> String {
        if self.config.offset_compatibility_mode {
            return format!("FETCH FIRST {limit} ROWS ONLY");
        }
        generic::compile_limit(limit)
    }

    fn compile_offset(&self, offset: u64) -> String {
        if self.config.offset_compatibility_mode {
            return String::new();
        }
        generic::compile_offset(offset)
    }
}
