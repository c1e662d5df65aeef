//! Abstract query description.
//!
//! A [`Query`] records what a `SELECT` asks for without deciding how it is
//! spelled; a [`Grammar`](crate::grammar::Grammar) turns it into SQL.
//! Builder methods record parameter bindings in the partition of the clause
//! that uses them, so the flattened bindings line up with the placeholders of
//! the compiled statement.
//!
//! # Example
//!
//! ```rust
//! use oxide_sql_core::query::{BindingCategory, Query};
//!
//! let query = Query::table("users")
//!     .select(&["id", "name"])
//!     .where_basic("status", "=", "active")
//!     .where_in("role", vec!["admin", "owner"])
//!     .order_by("name")
//!     .limit(10);
//!
//! assert_eq!(query.raw_bindings().get(BindingCategory::Where).len(), 3);
//! ```

mod bindings;
mod clause;

pub use bindings::{BindingCategory, Bindings};
pub use clause::{
    BasicWhere, BetweenWhere, Boolean, Column, ColumnWhere, Direction, Having, InValues, InWhere,
    Join, JoinCondition, JoinKind, Order, Predicate, SubqueryFn, WhereClause,
};

use crate::value::{Expression, SqlValue, ToSqlValue, Value};

/// A structured `SELECT` description.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Emits `select distinct` when set.
    pub distinct: bool,
    /// Selected columns; `None` selects `*`.
    pub columns: Option<Vec<Column>>,
    /// Source table, optionally aliased (`users as u`).
    pub from: Option<String>,
    /// Joined tables.
    pub joins: Vec<Join>,
    /// WHERE predicates.
    pub wheres: Vec<WhereClause>,
    /// GROUP BY columns.
    pub groups: Vec<Column>,
    /// HAVING conditions.
    pub havings: Vec<Having>,
    /// ORDER BY items.
    pub orders: Vec<Order>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Number of rows to skip.
    pub offset: Option<u64>,
    bindings: Bindings,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query against a table.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self::new().from(table)
    }

    /// Sets the source table.
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        self.from = Some(String::from(table));
        self
    }

    /// Adds columns to the select list.
    #[must_use]
    pub fn select(mut self, cols: &[&str]) -> Self {
        self.columns
            .get_or_insert_with(Vec::new)
            .extend(cols.iter().map(|c| Column::named(*c)));
        self
    }

    /// Adds a raw expression to the select list.
    #[must_use]
    pub fn select_raw(
        mut self,
        sql: impl Into<String>,
        bindings: impl IntoIterator<Item = SqlValue>,
    ) -> Self {
        self.columns
            .get_or_insert_with(Vec::new)
            .push(Column::Raw(Expression::new(sql)));
        self.bindings.extend(BindingCategory::Select, bindings);
        self
    }

    /// Selects distinct rows.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds an INNER JOIN on `first operator second`.
    #[must_use]
    pub fn join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join_kind(JoinKind::Inner, table, first, operator, second)
    }

    /// Adds a LEFT JOIN on `first operator second`.
    #[must_use]
    pub fn left_join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join_kind(JoinKind::Left, table, first, operator, second)
    }

    /// Adds a RIGHT JOIN on `first operator second`.
    #[must_use]
    pub fn right_join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join_kind(JoinKind::Right, table, first, operator, second)
    }

    /// Adds a CROSS JOIN.
    #[must_use]
    pub fn cross_join(mut self, table: &str) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Cross,
            table: String::from(table),
            on: Vec::new(),
        });
        self
    }

    fn join_kind(
        mut self,
        kind: JoinKind,
        table: &str,
        first: &str,
        operator: &str,
        second: &str,
    ) -> Self {
        self.joins.push(Join {
            kind,
            table: String::from(table),
            on: vec![JoinCondition {
                first: Column::named(first),
                operator: String::from(operator),
                second: Column::named(second),
            }],
        });
        self
    }

    fn push_where(&mut self, boolean: Boolean, predicate: Predicate) {
        self.wheres.push(WhereClause { boolean, predicate });
    }

    fn bind_value(&mut self, category: BindingCategory, value: &Value) {
        if let Value::Literal(v) = value {
            self.bindings.add(category, v.clone());
        }
    }

    fn basic(
        mut self,
        boolean: Boolean,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Self {
        let value = value.into();
        self.bind_value(BindingCategory::Where, &value);
        self.push_where(
            boolean,
            Predicate::Basic(BasicWhere {
                column: column.into(),
                operator: String::from(operator),
                value,
            }),
        );
        self
    }

    /// Adds `column operator value`.
    #[must_use]
    pub fn where_basic(
        self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.basic(Boolean::And, column, operator, value)
    }

    /// Adds `or column operator value`.
    #[must_use]
    pub fn or_where_basic(
        self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.basic(Boolean::Or, column, operator, value)
    }

    /// Adds `column like pattern`.
    #[must_use]
    pub fn where_like(self, column: impl Into<Column>, pattern: impl Into<Value>) -> Self {
        self.basic(Boolean::And, column, "like", pattern)
    }

    /// Adds `column not like pattern`.
    #[must_use]
    pub fn where_not_like(self, column: impl Into<Column>, pattern: impl Into<Value>) -> Self {
        self.basic(Boolean::And, column, "not like", pattern)
    }

    fn membership(mut self, column: impl Into<Column>, values: InValues, negated: bool) -> Self {
        match &values {
            InValues::List(list) => {
                for value in list {
                    self.bind_value(BindingCategory::Where, value);
                }
            }
            InValues::Subquery(sub) => {
                self.bindings
                    .extend(BindingCategory::Where, sub.bindings.flatten());
            }
            InValues::Deferred(build) => {
                self.bindings
                    .extend(BindingCategory::Where, build.build().bindings.flatten());
            }
        }
        let clause = InWhere {
            column: column.into(),
            values,
        };
        let predicate = if negated {
            Predicate::NotIn(clause)
        } else {
            Predicate::In(clause)
        };
        self.push_where(Boolean::And, predicate);
        self
    }

    /// Adds `column in (values)`.
    #[must_use]
    pub fn where_in<V: Into<Value>>(self, column: impl Into<Column>, values: Vec<V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.membership(column, InValues::List(values), false)
    }

    /// Adds `column not in (values)`.
    #[must_use]
    pub fn where_not_in<V: Into<Value>>(self, column: impl Into<Column>, values: Vec<V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.membership(column, InValues::List(values), true)
    }

    /// Adds `column in (select ...)`.
    #[must_use]
    pub fn where_in_sub(self, column: impl Into<Column>, sub: Self) -> Self {
        self.membership(column, InValues::Subquery(Box::new(sub)), false)
    }

    /// Adds `column not in (select ...)`.
    #[must_use]
    pub fn where_not_in_sub(self, column: impl Into<Column>, sub: Self) -> Self {
        self.membership(column, InValues::Subquery(Box::new(sub)), true)
    }

    /// Adds `column in (select ...)` with the sub-select built by a closure.
    #[must_use]
    pub fn where_in_deferred(
        self,
        column: impl Into<Column>,
        build: impl Fn(Self) -> Self + Send + Sync + 'static,
    ) -> Self {
        self.membership(column, InValues::Deferred(SubqueryFn::new(build)), false)
    }

    /// Adds `column is null`.
    #[must_use]
    pub fn where_null(mut self, column: impl Into<Column>) -> Self {
        self.push_where(Boolean::And, Predicate::Null(column.into()));
        self
    }

    /// Adds `column is not null`.
    #[must_use]
    pub fn where_not_null(mut self, column: impl Into<Column>) -> Self {
        self.push_where(Boolean::And, Predicate::NotNull(column.into()));
        self
    }

    fn between(
        mut self,
        column: impl Into<Column>,
        low: impl Into<Value>,
        high: impl Into<Value>,
        negated: bool,
    ) -> Self {
        let (low, high) = (low.into(), high.into());
        self.bind_value(BindingCategory::Where, &low);
        self.bind_value(BindingCategory::Where, &high);
        self.push_where(
            Boolean::And,
            Predicate::Between(BetweenWhere {
                column: column.into(),
                low,
                high,
                negated,
            }),
        );
        self
    }

    /// Adds `column between low and high`.
    #[must_use]
    pub fn where_between(
        self,
        column: impl Into<Column>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        self.between(column, low, high, false)
    }

    /// Adds `column not between low and high`.
    #[must_use]
    pub fn where_not_between(
        self,
        column: impl Into<Column>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        self.between(column, low, high, true)
    }

    /// Adds `first operator second` comparing two columns.
    #[must_use]
    pub fn where_column(mut self, first: &str, operator: &str, second: &str) -> Self {
        self.push_where(
            Boolean::And,
            Predicate::Column(ColumnWhere {
                first: Column::named(first),
                operator: String::from(operator),
                second: Column::named(second),
            }),
        );
        self
    }

    /// Adds a raw condition with its bindings.
    #[must_use]
    pub fn where_raw(
        mut self,
        sql: impl Into<String>,
        bindings: impl IntoIterator<Item = SqlValue>,
    ) -> Self {
        self.bindings.extend(BindingCategory::Where, bindings);
        self.push_where(Boolean::And, Predicate::Raw(Expression::new(sql)));
        self
    }

    /// Adds a parenthesized group of predicates built by `build`.
    #[must_use]
    pub fn where_nested(mut self, build: impl FnOnce(Self) -> Self) -> Self {
        let nested = build(Self::new());
        if nested.wheres.is_empty() {
            return self;
        }
        self.bindings.extend(
            BindingCategory::Where,
            nested.bindings.get(BindingCategory::Where).iter().cloned(),
        );
        self.push_where(Boolean::And, Predicate::Nested(Box::new(nested)));
        self
    }

    fn exists(mut self, sub: Self, negated: bool) -> Self {
        self.bindings
            .extend(BindingCategory::Where, sub.bindings.flatten());
        self.push_where(
            Boolean::And,
            Predicate::Exists {
                query: Box::new(sub),
                negated,
            },
        );
        self
    }

    /// Adds `exists (select ...)`.
    #[must_use]
    pub fn where_exists(self, sub: Self) -> Self {
        self.exists(sub, false)
    }

    /// Adds `not exists (select ...)`.
    #[must_use]
    pub fn where_not_exists(self, sub: Self) -> Self {
        self.exists(sub, true)
    }

    /// Adds GROUP BY columns.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.groups.extend(cols.iter().map(|c| Column::named(*c)));
        self
    }

    /// Adds `having column operator value`.
    #[must_use]
    pub fn having(mut self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.bind_value(BindingCategory::Having, &value);
        self.havings.push(Having::Basic {
            boolean: Boolean::And,
            column: Column::named(column),
            operator: String::from(operator),
            value,
        });
        self
    }

    /// Adds a raw HAVING condition with its bindings.
    #[must_use]
    pub fn having_raw(
        mut self,
        sql: impl Into<String>,
        bindings: impl IntoIterator<Item = SqlValue>,
    ) -> Self {
        self.bindings.extend(BindingCategory::Having, bindings);
        self.havings.push(Having::Raw {
            boolean: Boolean::And,
            sql: Expression::new(sql),
        });
        self
    }

    /// Orders ascending by a column.
    #[must_use]
    pub fn order_by(mut self, column: &str) -> Self {
        self.orders.push(Order::Column {
            column: Column::named(column),
            direction: Direction::Asc,
        });
        self
    }

    /// Orders descending by a column.
    #[must_use]
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.orders.push(Order::Column {
            column: Column::named(column),
            direction: Direction::Desc,
        });
        self
    }

    /// Orders by a raw expression with its bindings.
    #[must_use]
    pub fn order_by_raw(
        mut self,
        sql: impl Into<String>,
        bindings: impl IntoIterator<Item = SqlValue>,
    ) -> Self {
        self.bindings.extend(BindingCategory::Order, bindings);
        self.orders.push(Order::Raw(Expression::new(sql)));
        self
    }

    /// Limits the number of rows.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Skips the first `n` rows.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Returns the binding partitions.
    #[must_use]
    pub const fn raw_bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Returns the binding partitions for in-place rewrites.
    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Returns every binding in placeholder order.
    #[must_use]
    pub fn bindings(&self) -> Vec<SqlValue> {
        self.bindings.flatten()
    }

    /// Appends values to a partition.
    pub fn add_binding<T: ToSqlValue>(&mut self, category: BindingCategory, values: Vec<T>) {
        self.bindings
            .extend(category, values.into_iter().map(ToSqlValue::to_sql_value));
    }

    /// Replaces a partition.
    pub fn set_bindings(&mut self, category: BindingCategory, values: Vec<SqlValue>) {
        self.bindings.set(category, values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_values_are_bound() {
        let query = Query::table("users")
            .where_basic("age", ">", 18)
            .where_between("score", 1, 10);

        assert_eq!(
            query.bindings(),
            vec![SqlValue::Int(18), SqlValue::Int(1), SqlValue::Int(10)]
        );
    }

    #[test]
    fn test_raw_values_bind_nothing() {
        let query = Query::table("users")
            .where_basic("created_at", "<", Value::raw("CURRENT TIMESTAMP"))
            .where_in("id", vec![Value::raw("(select 1 from sysibm.sysdummy1)")]);

        assert!(query.raw_bindings().is_empty());
    }

    #[test]
    fn test_subquery_bindings_merge_into_where() {
        let sub = Query::table("orders")
            .select(&["user_id"])
            .where_basic("total", ">", 100);
        let query = Query::table("users")
            .where_basic("active", "=", true)
            .where_in_sub("id", sub);

        assert_eq!(
            query.raw_bindings().get(BindingCategory::Where),
            &[SqlValue::Bool(true), SqlValue::Int(100)]
        );
    }

    #[test]
    fn test_deferred_bindings_recorded_up_front() {
        let query = Query::table("users").where_in_deferred("id", |q| {
            q.from("bans").select(&["user_id"]).where_basic("kind", "=", "hard")
        });

        assert_eq!(query.bindings(), vec![SqlValue::Text(String::from("hard"))]);
    }

    #[test]
    fn test_empty_nested_group_is_ignored() {
        let query = Query::table("users").where_nested(|q| q);
        assert!(query.wheres.is_empty());
    }

    #[test]
    fn test_bindings_by_category() {
        let query = Query::table("users")
            .select_raw("coalesce(nick, ?) as nick", vec![SqlValue::Text(String::from("anon"))])
            .where_basic("id", ">", 5)
            .having("total", ">", 2)
            .order_by_raw("case when id = ? then 0 else 1 end", vec![SqlValue::Int(7)]);

        let bindings = query.raw_bindings();
        assert_eq!(bindings.get(BindingCategory::Select).len(), 1);
        assert_eq!(bindings.get(BindingCategory::Where).len(), 1);
        assert_eq!(bindings.get(BindingCategory::Having).len(), 1);
        assert_eq!(bindings.get(BindingCategory::Order), &[SqlValue::Int(7)]);
    }

    #[test]
    fn test_set_and_add_binding() {
        let mut query = Query::table("users").order_by_raw("?", vec![SqlValue::Int(1)]);
        query.add_binding(BindingCategory::Select, vec![2_i64]);
        query.set_bindings(BindingCategory::Order, Vec::new());

        assert_eq!(query.bindings(), vec![SqlValue::Int(2)]);
    }
}
