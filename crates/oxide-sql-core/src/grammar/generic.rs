//! Generic ANSI grammar.
//!
//! The free functions here are the default behaviour of every
//! [`Grammar`] method. They take the calling grammar as a parameter so a
//! dialect can reuse one piece while still routing everything nested through
//! its own overrides.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};

use super::{Component, Components, Grammar};
use crate::query::{
    BasicWhere, BetweenWhere, Column, ColumnWhere, Having, InValues, InWhere, Join, Order, Query,
    WhereClause,
};
use crate::value::{SqlValue, Value};

/// Date format used when a grammar does not configure one.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A generic SQL grammar using ANSI SQL standards.
#[derive(Debug, Default, Clone)]
pub struct GenericGrammar {
    table_prefix: String,
}

impl GenericGrammar {
    /// Creates a new generic grammar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table prefix.
    #[must_use]
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }
}

impl Grammar for GenericGrammar {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }
}

/// Splits `name as alias` (case-insensitive `as`).
#[must_use]
pub fn split_alias(value: &str) -> Option<(&str, &str)> {
    // ASCII lowercasing keeps byte offsets intact.
    let idx = value.to_ascii_lowercase().find(" as ")?;
    Some((value[..idx].trim(), value[idx + 4..].trim()))
}

/// Quotes one identifier segment: `*` passes, `"` is doubled.
#[must_use]
pub fn wrap_value(segment: &str) -> String {
    if segment == "*" {
        return String::from(segment);
    }
    format!("\"{}\"", segment.replace('"', "\"\""))
}

/// Quotes a column reference through the grammar's segment quoting.
pub fn wrap<G: Grammar + ?Sized>(grammar: &G, column: &Column) -> String {
    match column {
        Column::Raw(expr) => expr.sql().to_string(),
        Column::Named(name) => wrap_name(grammar, name),
    }
}

fn wrap_name<G: Grammar + ?Sized>(grammar: &G, name: &str) -> String {
    if let Some((name, alias)) = split_alias(name) {
        return format!("{} as {}", wrap_name(grammar, name), grammar.wrap_value(alias));
    }
    match name.rsplit_once('.') {
        Some((table, column)) => {
            format!("{}.{}", grammar.wrap_table(table), grammar.wrap_value(column))
        }
        None => grammar.wrap_value(name),
    }
}

/// Quotes a table name. The prefix lands on the table segment, never on the
/// schema.
pub fn wrap_table<G: Grammar + ?Sized>(grammar: &G, table: &str) -> String {
    if let Some((table, alias)) = split_alias(table) {
        return format!("{} as {}", grammar.wrap_table(table), grammar.wrap_table(alias));
    }
    let prefix = grammar.table_prefix();
    match table.rsplit_once('.') {
        Some((schema, name)) => {
            let schema: Vec<String> = schema.split('.').map(|s| grammar.wrap_value(s)).collect();
            format!(
                "{}.{}",
                schema.join("."),
                grammar.wrap_value(&format!("{prefix}{name}"))
            )
        }
        None => grammar.wrap_value(&format!("{prefix}{table}")),
    }
}

/// `?` for a bound value, the SQL text for a raw one.
#[must_use]
pub fn parameter(value: &Value) -> String {
    match value {
        Value::Literal(_) => String::from("?"),
        Value::Raw(expr) => expr.sql().to_string(),
    }
}

/// Placeholders for a list of values, comma separated.
pub fn parameterize<G: Grammar + ?Sized>(grammar: &G, values: &[Value]) -> String {
    values
        .iter()
        .map(|v| grammar.parameter(v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Quoted column list, comma separated.
pub fn columnize<G: Grammar + ?Sized>(grammar: &G, columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| grammar.wrap(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compiles a nested query with the grammar's own `SELECT` compiler.
pub fn compile_subquery<G: Grammar + ?Sized>(grammar: &G, query: &Query) -> String {
    grammar.compile_select(&mut query.clone())
}

/// Renders every clause the query uses.
pub fn compile_components<G: Grammar + ?Sized>(grammar: &G, query: &Query) -> Components {
    let mut components = Components::new();

    components.insert(Component::Columns, compile_columns(grammar, query));

    if let Some(ref table) = query.from {
        components.insert(Component::From, format!("from {}", grammar.wrap_table(table)));
    }
    if !query.joins.is_empty() {
        components.insert(Component::Joins, compile_joins(grammar, &query.joins));
    }
    if !query.wheres.is_empty() {
        components.insert(Component::Wheres, compile_wheres(grammar, &query.wheres));
    }
    if !query.groups.is_empty() {
        components.insert(
            Component::Groups,
            format!("group by {}", columnize(grammar, &query.groups)),
        );
    }
    if !query.havings.is_empty() {
        components.insert(Component::Havings, compile_havings(grammar, &query.havings));
    }
    if !query.orders.is_empty() {
        components.insert(Component::Orders, compile_orders(grammar, &query.orders));
    }
    if let Some(limit) = query.limit {
        components.insert(Component::Limit, grammar.compile_limit(limit));
    }
    if let Some(offset) = query.offset {
        components.insert(Component::Offset, grammar.compile_offset(offset));
    }

    components
}

/// `select [distinct] ...`; an unset or empty column list selects `*`.
pub fn compile_columns<G: Grammar + ?Sized>(grammar: &G, query: &Query) -> String {
    let select = if query.distinct {
        "select distinct"
    } else {
        "select"
    };
    match query.columns.as_deref() {
        Some(columns) if !columns.is_empty() => {
            format!("{select} {}", columnize(grammar, columns))
        }
        _ => format!("{select} *"),
    }
}

/// Renders all joins.
pub fn compile_joins<G: Grammar + ?Sized>(grammar: &G, joins: &[Join]) -> String {
    joins
        .iter()
        .map(|join| {
            let mut sql = format!("{} join {}", join.kind, grammar.wrap_table(&join.table));
            if !join.on.is_empty() {
                let conditions: Vec<String> = join
                    .on
                    .iter()
                    .map(|c| {
                        format!(
                            "{} {} {}",
                            grammar.wrap(&c.first),
                            c.operator,
                            grammar.wrap(&c.second)
                        )
                    })
                    .collect();
                sql.push_str(" on ");
                sql.push_str(&conditions.join(" and "));
            }
            sql
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `where ...`, or an empty string when there is nothing to render.
pub fn compile_wheres<G: Grammar + ?Sized>(grammar: &G, wheres: &[WhereClause]) -> String {
    let conditions = compile_conditions(grammar, wheres);
    if conditions.is_empty() {
        return String::new();
    }
    format!("where {conditions}")
}

/// Predicates joined by their connectors, without the leading one.
pub fn compile_conditions<G: Grammar + ?Sized>(grammar: &G, wheres: &[WhereClause]) -> String {
    let mut sql = String::new();
    for (i, clause) in wheres.iter().enumerate() {
        if i > 0 {
            let _ = write!(sql, " {} ", clause.boolean);
        }
        sql.push_str(&grammar.compile_where(&clause.predicate));
    }
    sql
}

/// `column operator ?`
pub fn where_basic<G: Grammar + ?Sized>(grammar: &G, clause: &BasicWhere) -> String {
    format!(
        "{} {} {}",
        grammar.wrap(&clause.column),
        clause.operator,
        grammar.parameter(&clause.value)
    )
}

fn membership<G: Grammar + ?Sized>(
    grammar: &G,
    clause: &InWhere,
    keyword: &str,
    when_empty: &str,
) -> String {
    let column = grammar.wrap(&clause.column);
    match &clause.values {
        InValues::List(values) if values.is_empty() => String::from(when_empty),
        InValues::List(values) => {
            format!("{column} {keyword} ({})", parameterize(grammar, values))
        }
        InValues::Subquery(sub) => {
            format!("{column} {keyword} ({})", compile_subquery(grammar, sub))
        }
        InValues::Deferred(build) => {
            format!("{column} {keyword} ({})", compile_subquery(grammar, &build.build()))
        }
    }
}

/// `column in (...)`; an empty list can never match.
pub fn where_in<G: Grammar + ?Sized>(grammar: &G, clause: &InWhere) -> String {
    membership(grammar, clause, "in", "0 = 1")
}

/// `column not in (...)`; an empty list excludes nothing.
pub fn where_not_in<G: Grammar + ?Sized>(grammar: &G, clause: &InWhere) -> String {
    membership(grammar, clause, "not in", "1 = 1")
}

/// `column is null`
pub fn where_null<G: Grammar + ?Sized>(grammar: &G, column: &Column) -> String {
    format!("{} is null", grammar.wrap(column))
}

/// `column is not null`
pub fn where_not_null<G: Grammar + ?Sized>(grammar: &G, column: &Column) -> String {
    format!("{} is not null", grammar.wrap(column))
}

/// `column [not] between ? and ?`
pub fn where_between<G: Grammar + ?Sized>(grammar: &G, clause: &BetweenWhere) -> String {
    let keyword = if clause.negated {
        "not between"
    } else {
        "between"
    };
    format!(
        "{} {keyword} {} and {}",
        grammar.wrap(&clause.column),
        grammar.parameter(&clause.low),
        grammar.parameter(&clause.high)
    )
}

/// `first operator second`
pub fn where_column<G: Grammar + ?Sized>(grammar: &G, clause: &ColumnWhere) -> String {
    format!(
        "{} {} {}",
        grammar.wrap(&clause.first),
        clause.operator,
        grammar.wrap(&clause.second)
    )
}

/// `(...)` around the nested query's predicates.
pub fn where_nested<G: Grammar + ?Sized>(grammar: &G, query: &Query) -> String {
    format!("({})", compile_conditions(grammar, &query.wheres))
}

/// `[not] exists (select ...)`
pub fn where_exists<G: Grammar + ?Sized>(grammar: &G, query: &Query, negated: bool) -> String {
    let keyword = if negated { "not exists" } else { "exists" };
    format!("{keyword} ({})", compile_subquery(grammar, query))
}

/// `having ...`
pub fn compile_havings<G: Grammar + ?Sized>(grammar: &G, havings: &[Having]) -> String {
    let mut sql = String::from("having ");
    for (i, having) in havings.iter().enumerate() {
        if i > 0 {
            let _ = write!(sql, " {} ", having.boolean());
        }
        match having {
            Having::Basic {
                column,
                operator,
                value,
                ..
            } => {
                let _ = write!(
                    sql,
                    "{} {operator} {}",
                    grammar.wrap(column),
                    grammar.parameter(value)
                );
            }
            Having::Raw { sql: raw, .. } => sql.push_str(raw.sql()),
        }
    }
    sql
}

/// `order by ...`
pub fn compile_orders<G: Grammar + ?Sized>(grammar: &G, orders: &[Order]) -> String {
    let items: Vec<String> = orders
        .iter()
        .map(|order| match order {
            Order::Column { column, direction } => {
                format!("{} {direction}", grammar.wrap(column))
            }
            Order::Raw(expr) => expr.sql().to_string(),
        })
        .collect();
    format!("order by {}", items.join(", "))
}

/// `limit n`
#[must_use]
pub fn compile_limit(limit: u64) -> String {
    format!("limit {limit}")
}

/// `offset n`
#[must_use]
pub fn compile_offset(offset: u64) -> String {
    format!("offset {offset}")
}

/// Concatenates the query's components.
pub fn compile_select<G: Grammar + ?Sized>(grammar: &G, query: &Query) -> String {
    grammar.compile_components(query).concatenate()
}

/// `select exists(...) as "exists"`
pub fn compile_exists<G: Grammar + ?Sized>(grammar: &G, query: &Query) -> String {
    format!(
        "select exists({}) as {}",
        compile_subquery(grammar, query),
        grammar.wrap_value("exists")
    )
}

/// `SAVEPOINT name`
#[must_use]
pub fn compile_savepoint(name: &str) -> String {
    format!("SAVEPOINT {name}")
}

/// Returns `true` if `format` renders a timestamp without error.
#[must_use]
pub fn is_valid_date_format(format: &str) -> bool {
    let Some(sample) = NaiveDate::from_ymd_opt(2000, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return false;
    };
    let mut out = String::new();
    write!(out, "{}", sample.format(format)).is_ok()
}

/// Formats a timestamp with the grammar's date format, falling back to
/// [`DEFAULT_DATE_FORMAT`] when the configured one cannot render it.
pub fn format_date<G: Grammar + ?Sized>(grammar: &G, timestamp: &NaiveDateTime) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(grammar.date_format())).is_ok() {
        out
    } else {
        timestamp.format(DEFAULT_DATE_FORMAT).to_string()
    }
}

/// Renders timestamps as text; every other value is passed through.
pub fn prepare_bindings<G: Grammar + ?Sized>(grammar: &G, bindings: Vec<SqlValue>) -> Vec<SqlValue> {
    bindings
        .into_iter()
        .map(|value| match value {
            SqlValue::Timestamp(ts) => SqlValue::Text(grammar.format_date(&ts)),
            other => other,
        })
        .collect()
}
