//! Tests for the catalog queries

use crate::metadata::*;

#[test]
fn test_listing_query_without_pattern() {
    let sql = listing_query(None);
    assert_eq!(sql, LIST_PROCEDURES_SQL);
    assert!(sql.contains("WHERE s.name = @P1"));
    assert!(!sql.contains("LIKE"));
    assert!(sql.trim_end().ends_with("ORDER BY p.name"));
}

#[test]
fn test_listing_query_with_pattern() {
    let sql = listing_query(Some("mngsp_%"));
    assert_eq!(sql, LIST_PROCEDURES_LIKE_SQL);
    assert!(sql.contains("p.name LIKE @P2"));
    assert!(sql.trim_end().ends_with("ORDER BY p.name"));
}

#[test]
fn test_listing_queries_never_inline_values() {
    for sql in [LIST_PROCEDURES_SQL, LIST_PROCEDURES_LIKE_SQL] {
        assert!(!sql.contains('\''), "query contains a literal: {}", sql);
    }
}

#[test]
fn test_parameter_query_shape() {
    let sql = PROCEDURE_PARAMETERS_SQL;
    assert!(sql.contains("TYPE_NAME(p.user_type_id) AS native_type"));
    assert!(sql.contains("TYPE_NAME(p.system_type_id) AS system_type"));
    assert!(sql.contains("QUOTENAME(@P1)"));
    assert!(sql.contains("QUOTENAME(@P2)"));
    assert!(sql.trim_end().ends_with("ORDER BY p.parameter_id"));
}
