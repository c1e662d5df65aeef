#![allow(dead_code)]

use oxide_sql_core::{Query, SqlValue};
use oxide_sql_db2::{CompiledQuery, Db2Config, Db2Grammar};

pub fn db2() -> Db2Grammar {
    Db2Grammar::new()
}

pub fn db2_with(config: Db2Config) -> Db2Grammar {
    Db2Grammar::from_config(config).unwrap_or_else(|e| panic!("Invalid config: {e}"))
}

/// A grammar that emits the generic `limit`/`offset` clauses.
pub fn db2_native_paging() -> Db2Grammar {
    let mut grammar = db2();
    grammar.set_offset_compatibility_mode(false);
    grammar
}

pub fn compile(query: &Query) -> CompiledQuery {
    db2().to_sql(query)
}

pub fn sql(query: &Query) -> String {
    compile(query).sql
}

pub fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

/// Asserts the statement has one binding per placeholder.
pub fn assert_aligned(compiled: &CompiledQuery) {
    assert_eq!(
        placeholders(&compiled.sql),
        compiled.bindings.len(),
        "placeholders and bindings differ for: {}",
        compiled.sql
    );
}

pub fn ints(values: &[i64]) -> Vec<SqlValue> {
    values.iter().copied().map(SqlValue::Int).collect()
}
