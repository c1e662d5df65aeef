//! Clause types held by a [`Query`].

use std::fmt;
use std::sync::Arc;

use super::Query;
use crate::value::{Expression, Value};

/// A column reference in a select list, predicate, grouping or ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// An identifier, optionally dotted (`users.id`) or aliased (`id as key`).
    Named(String),
    /// A raw expression used verbatim.
    Raw(Expression),
}

impl Column {
    /// Creates a named column.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a raw column expression.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(Expression::new(sql))
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Self::Named(String::from(name))
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Expression> for Column {
    fn from(expr: Expression) -> Self {
        Self::Raw(expr)
    }
}

/// How a predicate joins the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boolean {
    /// `and`
    #[default]
    And,
    /// `or`
    Or,
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

/// Builds a sub-query on demand.
///
/// The closure receives an empty [`Query`] and fills it in. It is invoked once
/// when the predicate is added (to record bindings) and again at compile
/// time, so it must produce the same query every time.
#[derive(Clone)]
pub struct SubqueryFn(Arc<dyn Fn(Query) -> Query + Send + Sync>);

impl SubqueryFn {
    /// Wraps a sub-query builder.
    pub fn new(build: impl Fn(Query) -> Query + Send + Sync + 'static) -> Self {
        Self(Arc::new(build))
    }

    /// Runs the builder against an empty query.
    #[must_use]
    pub fn build(&self) -> Query {
        (self.0)(Query::new())
    }
}

impl fmt::Debug for SubqueryFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubqueryFn(..)")
    }
}

/// The value source of an `IN` / `NOT IN` predicate.
#[derive(Debug, Clone)]
pub enum InValues {
    /// An explicit list of values.
    List(Vec<Value>),
    /// A sub-select.
    Subquery(Box<Query>),
    /// A sub-select produced lazily by a closure.
    Deferred(SubqueryFn),
}

/// `column operator value`
#[derive(Debug, Clone)]
pub struct BasicWhere {
    /// Left operand.
    pub column: Column,
    /// Comparison operator as written by the caller.
    pub operator: String,
    /// Right operand.
    pub value: Value,
}

/// `column [not] in (...)`
#[derive(Debug, Clone)]
pub struct InWhere {
    /// Left operand.
    pub column: Column,
    /// Membership set.
    pub values: InValues,
}

/// `column [not] between low and high`
#[derive(Debug, Clone)]
pub struct BetweenWhere {
    /// Left operand.
    pub column: Column,
    /// Lower bound.
    pub low: Value,
    /// Upper bound.
    pub high: Value,
    /// Renders `not between` when set.
    pub negated: bool,
}

/// `first operator second`, comparing two columns.
#[derive(Debug, Clone)]
pub struct ColumnWhere {
    /// Left column.
    pub first: Column,
    /// Comparison operator.
    pub operator: String,
    /// Right column.
    pub second: Column,
}

/// A single condition of a WHERE clause.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Comparison against a value.
    Basic(BasicWhere),
    /// Membership test.
    In(InWhere),
    /// Negated membership test.
    NotIn(InWhere),
    /// `column is null`
    Null(Column),
    /// `column is not null`
    NotNull(Column),
    /// Range test.
    Between(BetweenWhere),
    /// Column-to-column comparison.
    Column(ColumnWhere),
    /// Raw SQL condition.
    Raw(Expression),
    /// Parenthesized group built from another query's predicates.
    Nested(Box<Query>),
    /// `[not] exists (sub-select)`
    Exists {
        /// The checked sub-query.
        query: Box<Query>,
        /// Renders `not exists` when set.
        negated: bool,
    },
}

/// A predicate together with the connector that precedes it.
#[derive(Debug, Clone)]
pub struct WhereClause {
    /// Connector to the previous predicate; ignored for the first one.
    pub boolean: Boolean,
    /// The condition.
    pub predicate: Predicate,
}

/// Join flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `inner join`
    Inner,
    /// `left join`
    Left,
    /// `right join`
    Right,
    /// `cross join`
    Cross,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner => write!(f, "inner"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Cross => write!(f, "cross"),
        }
    }
}

/// One `first operator second` condition of a join.
#[derive(Debug, Clone)]
pub struct JoinCondition {
    /// Left column.
    pub first: Column,
    /// Comparison operator.
    pub operator: String,
    /// Right column.
    pub second: Column,
}

/// A joined table.
#[derive(Debug, Clone)]
pub struct Join {
    /// Join flavour.
    pub kind: JoinKind,
    /// Joined table, optionally aliased.
    pub table: String,
    /// `on` conditions, joined with `and`. Empty for cross joins.
    pub on: Vec<JoinCondition>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// `asc`
    #[default]
    Asc,
    /// `desc`
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// A single ORDER BY item.
#[derive(Debug, Clone)]
pub enum Order {
    /// Order by a column.
    Column {
        /// Sorted column.
        column: Column,
        /// Sort direction.
        direction: Direction,
    },
    /// Raw ordering expression; its bindings live in the order partition.
    Raw(Expression),
}

/// A single HAVING condition.
#[derive(Debug, Clone)]
pub enum Having {
    /// `column operator value`
    Basic {
        /// Connector to the previous condition.
        boolean: Boolean,
        /// Left operand.
        column: Column,
        /// Comparison operator.
        operator: String,
        /// Right operand.
        value: Value,
    },
    /// Raw condition.
    Raw {
        /// Connector to the previous condition.
        boolean: Boolean,
        /// SQL text.
        sql: Expression,
    },
}

impl Having {
    /// Connector to the previous condition.
    #[must_use]
    pub const fn boolean(&self) -> Boolean {
        match self {
            Self::Basic { boolean, .. } | Self::Raw { boolean, .. } => *boolean,
        }
    }
}
