//! Tests for existence checks, savepoints, identifier quoting, and binding
//! preparation.

mod common;
use common::*;

use chrono::NaiveDate;
use oxide_sql_core::{GenericGrammar, Grammar, Query, SqlValue};
use oxide_sql_db2::{Db2Config, Db2Error, Db2Grammar};

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|d| d.and_hms_opt(14, 5, 30))
        .unwrap()
}

// =============================================================================
// Exists and savepoints
// =============================================================================

#[test]
fn exists_selects_one_row() {
    let query = Query::table("users").where_basic("id", "=", 1);
    assert_eq!(
        db2().compile_exists(&query),
        "select 1 exists from \"users\" where \"id\" = ? FETCH FIRST 1 ROWS ONLY"
    );
}

#[test]
fn exists_replaces_selected_columns() {
    let query = Query::table("users").select(&["id", "name"]).limit(50);
    assert_eq!(
        db2().compile_exists(&query),
        "select 1 exists from \"users\" FETCH FIRST 1 ROWS ONLY"
    );
}

#[test]
fn exists_does_not_touch_the_query() {
    let query = Query::table("users").select(&["id"]);
    let _ = db2().compile_exists(&query);
    assert_eq!(sql(&query), "select \"id\" from \"users\"");
}

#[test]
fn exists_drops_select_list_bindings() {
    let query = Query::table("users")
        .select_raw("coalesce(nick, ?) as nick", vec![SqlValue::Text(String::from("anon"))])
        .where_basic("id", ">", 5);
    let compiled = db2().exists_to_sql(&query);
    assert_eq!(
        compiled.sql,
        "select 1 exists from \"users\" where \"id\" > ? FETCH FIRST 1 ROWS ONLY"
    );
    assert_eq!(compiled.bindings, ints(&[5]));
    assert_eq!(compiled.sql, db2().compile_exists(&query));
    assert_aligned(&compiled);
}

#[test]
fn exists_with_offset_relocates_order_bindings() {
    let query = Query::table("users")
        .where_basic("active", "=", true)
        .order_by_raw("abs(id - ?)", ints(&[9]))
        .offset(3);
    let compiled = db2().exists_to_sql(&query);
    assert_eq!(
        compiled.sql,
        "select * from (select 1 exists, row_number() over (order by abs(id - ?)) as row_num \
         from \"users\" where \"active\" = ?) as temp_table where row_num between 4 and 4"
    );
    assert_eq!(compiled.bindings, vec![SqlValue::Int(9), SqlValue::Bool(true)]);
    assert_aligned(&compiled);
    assert_eq!(query.bindings(), vec![SqlValue::Bool(true), SqlValue::Int(9)]);
}

#[test]
fn set_date_format_rejects_unrenderable_format() {
    let mut grammar = db2();
    assert!(matches!(
        grammar.set_date_format("%Q"),
        Err(Db2Error::InvalidDateFormat(_))
    ));
    let query = Query::table("events").where_basic("created_at", ">=", timestamp());
    assert_eq!(
        grammar.to_sql(&query).bindings,
        vec![SqlValue::Text(String::from("2024-03-09 14:05:30"))]
    );
}

#[test]
fn exists_differs_from_generic() {
    let query = Query::table("users");
    assert_eq!(
        GenericGrammar::new().compile_exists(&query),
        "select exists(select * from \"users\") as \"exists\""
    );
}

#[test]
fn savepoint_retains_cursors() {
    assert_eq!(
        db2().compile_savepoint("trans2"),
        "SAVEPOINT trans2 ON ROLLBACK RETAIN CURSORS"
    );
    assert_eq!(GenericGrammar::new().compile_savepoint("trans2"), "SAVEPOINT trans2");
}

// =============================================================================
// Identifier quoting
// =============================================================================

#[test]
fn quoting_can_be_disabled() {
    let grammar = db2_with(Db2Config {
        quote_identifiers: false,
        ..Db2Config::default()
    });
    let query = Query::table("users")
        .select(&["users.id", "name as n"])
        .where_like("name", "a%")
        .offset(1);
    assert_eq!(
        grammar.to_sql(&query).sql,
        "select * from (select users.id, name as n, row_number() over (order by 1) \
         as row_num from users where UPPER(name) LIKE UPPER(?)) as temp_table \
         where row_num >= 2"
    );
}

#[test]
fn schema_qualified_tables_are_prefixed_on_the_table_only() {
    let grammar = db2_with(Db2Config {
        table_prefix: String::from("app_"),
        ..Db2Config::default()
    });
    let query = Query::table("sales.orders").select(&["sales.orders.id"]);
    assert_eq!(
        grammar.to_sql(&query).sql,
        "select \"sales\".\"app_orders\".\"id\" from \"sales\".\"app_orders\""
    );
}

#[test]
fn embedded_quotes_are_doubled() {
    let query = Query::table("odd\"table").select(&["we\"ird"]);
    assert_eq!(
        sql(&query),
        "select \"we\"\"ird\" from \"odd\"\"table\""
    );
}

// =============================================================================
// Binding preparation
// =============================================================================

#[test]
fn timestamps_use_default_date_format() {
    let query = Query::table("events").where_basic("created_at", ">=", timestamp());
    assert_eq!(
        compile(&query).bindings,
        vec![SqlValue::Text(String::from("2024-03-09 14:05:30"))]
    );
}

#[test]
fn timestamps_use_configured_date_format() {
    let mut grammar = db2();
    grammar.set_date_format("%Y-%m-%d-%H.%M.%S").unwrap();
    let query = Query::table("events")
        .where_basic("created_at", ">=", timestamp())
        .where_basic("kind", "=", "login");
    assert_eq!(
        grammar.to_sql(&query).bindings,
        vec![
            SqlValue::Text(String::from("2024-03-09-14.05.30")),
            SqlValue::Text(String::from("login")),
        ]
    );
}

#[test]
fn non_timestamp_bindings_pass_through() {
    let bindings = vec![SqlValue::Null, SqlValue::Int(1), SqlValue::Blob(vec![0xAB])];
    assert_eq!(db2().prepare_bindings(bindings.clone()), bindings);
}

// =============================================================================
// Configuration errors
// =============================================================================

#[test]
fn invalid_date_format_is_rejected() {
    let err = Db2Grammar::from_config(Db2Config {
        date_format: Some(String::from("%Q")),
        ..Db2Config::default()
    })
    .unwrap_err();
    assert!(matches!(err, Db2Error::InvalidDateFormat(_)));
}

#[test]
fn invalid_cast_pattern_is_rejected() {
    let err = Db2Grammar::from_config(Db2Config {
        char_cast_pattern: Some(String::from("(_at")),
        ..Db2Config::default()
    })
    .unwrap_err();
    assert!(matches!(err, Db2Error::InvalidCastPattern { ref pattern, .. } if pattern == "(_at"));
    assert!(err.to_string().starts_with("Invalid char cast pattern '(_at'"));
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(
        Db2Config::from_json("{ not json"),
        Err(Db2Error::Config(_))
    ));
}
