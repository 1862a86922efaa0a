//! Filter descriptors
//!
//! A scope's WHERE clause is a conjunction of `QueryFilter`s. Each filter is
//! either one column comparison or a disjunction of nested filters.

use serde_json::Value;

/// Comparison applied to a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,
    Gt,
    Lte,
    IsNull,
    IsNotNull,
}

impl QueryOperator {
    /// SQL spelling of a binary comparison; `None` for the NULL checks
    pub fn comparison_sql(&self) -> Option<&'static str> {
        match self {
            QueryOperator::Eq => Some("="),
            QueryOperator::Gt => Some(">"),
            QueryOperator::Lte => Some("<="),
            QueryOperator::IsNull | QueryOperator::IsNotNull => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub field: String,
    pub operator: QueryOperator,
    /// Right-hand operand, absent for the NULL checks
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Condition(QueryCondition),
    /// Matches when any member matches. Empty never matches.
    AnyOf(Vec<QueryFilter>),
}

impl QueryFilter {
    pub fn condition(field: &str, operator: QueryOperator, value: Option<Value>) -> Self {
        Self::Condition(QueryCondition {
            field: field.to_string(),
            operator,
            value,
        })
    }

    pub fn or(filters: Vec<QueryFilter>) -> Self {
        Self::AnyOf(filters)
    }

    /// `field = value`; a JSON null operand means `field IS NULL`
    pub fn eq(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Eq, Some(value))
    }

    pub fn gt(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Gt, Some(value))
    }

    pub fn lte(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Lte, Some(value))
    }

    pub fn is_null(field: &str) -> Self {
        Self::condition(field, QueryOperator::IsNull, None)
    }

    pub fn is_not_null(field: &str) -> Self {
        Self::condition(field, QueryOperator::IsNotNull, None)
    }
}
