//! Query builder tests

use crate::{QueryBuilder, QueryFilter, QueryOperator, SortOrder, SqlGenerator};
use serde_json::json;

// ========================================
// SQL Generation
// ========================================

#[test]
fn test_sql_generation_empty_conditions() {
    let (where_clause, values) = SqlGenerator::build_where_clause(&[]);
    assert_eq!(where_clause, "");
    assert!(values.is_empty());
}

#[test]
fn test_sql_generation_null_conditions() {
    let (where_clause, values) =
        SqlGenerator::build_where_clause(&[QueryFilter::is_not_null("published_at")]);
    assert_eq!(where_clause, "WHERE published_at IS NOT NULL");
    assert!(values.is_empty());

    // Equality against JSON null is rewritten rather than bound
    let (where_clause, values) =
        SqlGenerator::build_where_clause(&[QueryFilter::eq("published_at", json!(null))]);
    assert_eq!(where_clause, "WHERE published_at IS NULL");
    assert!(values.is_empty());
}

#[test]
fn test_sql_generation_comparison_without_value() {
    let filter = QueryFilter::condition("published_at", QueryOperator::Lte, None);
    let (where_clause, values) = SqlGenerator::build_where_clause(&[filter]);
    assert_eq!(where_clause, "WHERE 1=0");
    assert!(values.is_empty());
}

#[test]
fn test_sql_generation_publish_window() {
    let filters = vec![
        QueryFilter::is_not_null("published_at"),
        QueryFilter::lte("published_at", json!("2024-05-01T12:00:00Z")),
    ];
    let (where_clause, values) = SqlGenerator::build_where_clause(&filters);

    assert_eq!(
        where_clause,
        "WHERE published_at IS NOT NULL AND published_at <= $1"
    );
    assert_eq!(values, vec![json!("2024-05-01T12:00:00Z")]);
}

#[test]
fn test_sql_generation_or_group_numbers_placeholders_in_order() {
    let filters = vec![
        QueryFilter::eq("published", json!(true)),
        QueryFilter::or(vec![
            QueryFilter::is_null("published_at"),
            QueryFilter::gt("published_at", json!("2024-05-01")),
        ]),
    ];

    let (where_clause, values) = SqlGenerator::build_where_clause(&filters);

    assert_eq!(
        where_clause,
        "WHERE published = $1 AND (published_at IS NULL OR published_at > $2)"
    );
    assert_eq!(values, vec![json!(true), json!("2024-05-01")]);
}

#[test]
fn test_sql_generation_empty_or_matches_nothing() {
    let (where_clause, _) = SqlGenerator::build_where_clause(&[QueryFilter::or(vec![])]);
    assert_eq!(where_clause, "WHERE 1=0");
}

// ========================================
// QueryBuilder
// ========================================

#[test]
fn test_query_builder_empty_state() {
    let (where_clause, order_clause, limit_clause, values) = QueryBuilder::new().build();

    assert_eq!(where_clause, "");
    assert_eq!(order_clause, "");
    assert_eq!(limit_clause, "");
    assert!(values.is_empty());
}

#[test]
fn test_query_builder_order_and_limit() {
    let builder = QueryBuilder::new()
        .filter(QueryFilter::is_not_null("published_at"))
        .order_by("published_at", SortOrder::Desc)
        .limit(Some(2));

    let (_, order_clause, limit_clause, _) = builder.build();
    assert_eq!(order_clause, "ORDER BY published_at DESC");
    assert_eq!(limit_clause, "LIMIT 2");
}

#[test]
fn test_query_builder_limit_can_be_cleared() {
    let builder = QueryBuilder::new().limit(Some(5)).limit(None);
    assert_eq!(builder.limit_value(), None);
    assert_eq!(builder.build_limit_clause(), "");

    assert_eq!(QueryBuilder::new().limit(Some(0)).build_limit_clause(), "LIMIT 0");
}

#[test]
fn test_query_builder_is_reusable() {
    let builder = QueryBuilder::new().filter(QueryFilter::eq("published", json!(true)));
    assert_eq!(builder.build(), builder.build());
}

#[test]
fn test_sort_order_sql_conversion() {
    assert_eq!(SortOrder::Asc.to_sql(), "ASC");
    assert_eq!(SortOrder::Desc.to_sql(), "DESC");
}
