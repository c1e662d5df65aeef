//! # oxide-sql-db2
//!
//! DB2-specific grammar for `oxide-sql-core`.
//!
//! # How DB2 differs from other dialects
//!
//! - **Pagination**: older DB2 releases have no `LIMIT`/`OFFSET`. Limits are
//!   written as [`FETCH FIRST n ROWS ONLY`] and offsets are emulated by
//!   numbering rows with [`ROW_NUMBER() OVER`] in a derived table and
//!   filtering on the row number. [`Db2Config::offset_compatibility_mode`]
//!   turns this off for servers that understand the generic clauses.
//! - **Case-sensitive `LIKE`**: DB2 compares strings byte for byte, so
//!   `LIKE` and `NOT LIKE` upper-case both sides. Temporal columns are cast
//!   with `CHAR()` first because `UPPER` rejects timestamps; which columns
//!   count as temporal is decided by a [`CharCastPolicy`].
//! - **Identifier folding**: unquoted identifiers fold to upper case.
//!   Identifiers are double-quoted by default to keep them as written.
//! - **[Savepoints]**: `SAVEPOINT name ON ROLLBACK RETAIN CURSORS` keeps
//!   open cursors alive across a rollback to the savepoint.
//!
//! [`FETCH FIRST n ROWS ONLY`]: https://www.ibm.com/docs/en/db2-for-zos/13?topic=subselect-fetch-clause
//! [`ROW_NUMBER() OVER`]: https://www.ibm.com/docs/en/db2-for-zos/13?topic=expressions-olap-specification
//! [Savepoints]: https://www.ibm.com/docs/en/db2-for-zos/13?topic=statements-savepoint
//!
//! ## Example
//!
//! ```rust
//! use oxide_sql_core::Query;
//! use oxide_sql_db2::Db2Grammar;
//!
//! let grammar = Db2Grammar::new();
//! let query = Query::table("users")
//!     .where_like("name", "jo%")
//!     .offset(10)
//!     .limit(5);
//!
//! let compiled = grammar.to_sql(&query);
//! assert_eq!(
//!     compiled.sql,
//!     "select * from (select \"users\".*, row_number() over (order by 1) as row_num \
//!      from \"users\" where UPPER(\"name\") LIKE UPPER(?)) as temp_table \
//!      where row_num between 11 and 15"
//! );
//! assert_eq!(compiled.bindings.len(), 1);
//! ```

mod cast;
mod config;
mod error;
mod grammar;

pub use cast::{CharCastPolicy, DEFAULT_CHAR_CAST_PATTERN};
pub use config::Db2Config;
pub use error::{Db2Error, Result};
pub use grammar::{CompiledQuery, Db2Grammar};
