//! SQL clause generation
//!
//! Turns filter descriptors into PostgreSQL clauses with `$n` placeholders.
//! Values are returned separately, in placeholder order, for binding.

use crate::filter::{QueryCondition, QueryFilter, QueryOperator};
use crate::ordering::SortOrder;
use serde_json::Value;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build WHERE clause from conditions, joined with AND
    pub fn build_where_clause(conditions: &[QueryFilter]) -> (String, Vec<Value>) {
        if conditions.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut values = Vec::new();
        let clauses: Vec<String> = conditions
            .iter()
            .map(|filter| Self::filter_sql(filter, &mut values))
            .collect();

        (format!("WHERE {}", clauses.join(" AND ")), values)
    }

    fn filter_sql(filter: &QueryFilter, values: &mut Vec<Value>) -> String {
        match filter {
            QueryFilter::Condition(condition) => Self::condition_sql(condition, values),
            QueryFilter::AnyOf(filters) if filters.is_empty() => "1=0".to_string(),
            QueryFilter::AnyOf(filters) => {
                let members: Vec<String> = filters
                    .iter()
                    .map(|filter| Self::filter_sql(filter, values))
                    .collect();
                format!("({})", members.join(" OR "))
            }
        }
    }

    fn condition_sql(condition: &QueryCondition, values: &mut Vec<Value>) -> String {
        let field = &condition.field;

        let Some(comparison) = condition.operator.comparison_sql() else {
            return match condition.operator {
                QueryOperator::IsNull => format!("{} IS NULL", field),
                _ => format!("{} IS NOT NULL", field),
            };
        };

        match &condition.value {
            Some(Value::Null) | None if condition.operator == QueryOperator::Eq => {
                format!("{} IS NULL", field)
            }
            // ordering against NULL never matches
            Some(Value::Null) | None => "1=0".to_string(),
            Some(value) => {
                values.push(value.clone());
                format!("{} {} ${}", field, comparison, values.len())
            }
        }
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> String {
        if order_by.is_empty() {
            return String::new();
        }

        let order_items: Vec<String> = order_by
            .iter()
            .map(|(field, order)| format!("{} {}", field, order.to_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build LIMIT clause
    pub fn build_limit_clause(limit: Option<u32>) -> String {
        limit
            .map(|limit| format!("LIMIT {}", limit))
            .unwrap_or_default()
    }
}
