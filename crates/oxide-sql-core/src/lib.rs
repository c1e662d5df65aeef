//! # oxide-sql-core
//!
//! Query descriptions and the generic SQL grammar that dialect crates build on.
//!
//! This crate provides:
//! - [`Query`], a structured `SELECT` description whose builder records
//!   parameter bindings per clause
//! - [`Value`] and [`Expression`], keeping bound values apart from raw SQL
//! - [`Grammar`], the compilation trait, with a generic ANSI implementation
//!
//! ## Compiling a query
//!
//! ```rust
//! use oxide_sql_core::{GenericGrammar, Grammar, Query};
//!
//! let mut query = Query::table("users")
//!     .select(&["id", "name"])
//!     .where_basic("active", "=", true)
//!     .limit(10);
//!
//! let sql = GenericGrammar::new().compile_select(&mut query);
//! assert_eq!(sql, r#"select "id", "name" from "users" where "active" = ? limit 10"#);
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Values are always bound, never interpolated:
//!
//! ```rust
//! use oxide_sql_core::{GenericGrammar, Grammar, Query, SqlValue};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let mut query = Query::table("users").where_basic("name", "=", user_input);
//!
//! let sql = GenericGrammar::new().compile_select(&mut query);
//! assert_eq!(sql, r#"select * from "users" where "name" = ?"#);
//! assert_eq!(query.bindings(), vec![SqlValue::Text(user_input.to_string())]);
//! ```

pub mod grammar;
pub mod query;
pub mod value;

pub use grammar::{Component, Components, GenericGrammar, Grammar};
pub use query::{BindingCategory, Bindings, Column, Predicate, Query};
pub use value::{Expression, SqlValue, ToSqlValue, Value};
