//! In-memory record store
//!
//! Evaluates `QueryBuilder` descriptors directly against records held in a
//! `Vec`, with the same NULL and ordering behavior PostgreSQL gives the SQL
//! that `SqlGenerator` produces. Only columns reachable through
//! `ColumnAccess` can be filtered or ordered on.

use std::cmp::Ordering;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use query_builder::{QueryBuilder, QueryCondition, QueryFilter, QueryOperator, SortOrder};

use crate::errors::PublishableError;
use crate::schema::{ColumnAccess, ModelSchema};
use crate::store::RecordStore;
use crate::value::ColumnValue;

pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T> MemoryStore<T>
where
    T: ModelSchema + ColumnAccess + Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a record without a primary key check
    pub fn insert(&self, record: T) {
        self.write().push(record);
    }

    /// Snapshot of every stored record, in insertion order
    pub fn all(&self) -> Vec<T> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Evaluate `query` against the stored records
    pub fn query(&self, query: &QueryBuilder) -> Result<Vec<T>, PublishableError> {
        let records = self.read();

        let mut matched = Vec::new();
        for record in records.iter() {
            if matches_all(record, query.conditions())? {
                matched.push(record.clone());
            }
        }

        if !query.ordering().is_empty() {
            let mut keyed = Vec::with_capacity(matched.len());
            for record in matched {
                let keys = query
                    .ordering()
                    .iter()
                    .map(|(field, _)| read_field::<T>(&record, field))
                    .collect::<Result<Vec<_>, _>>()?;
                keyed.push((keys, record));
            }

            // Stable sort keeps insertion order among equal keys
            keyed.sort_by(|(left, _), (right, _)| {
                query
                    .ordering()
                    .iter()
                    .zip(left.iter().zip(right.iter()))
                    .map(|((_, order), (a, b))| match order {
                        SortOrder::Asc => a.sort_cmp(b),
                        SortOrder::Desc => b.sort_cmp(a),
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
            matched = keyed.into_iter().map(|(_, record)| record).collect();
        }

        if let Some(limit) = query.limit_value() {
            matched.truncate(limit as usize);
        }

        debug_log!(
            "MemoryStore {} matched {} records",
            T::table_name(),
            matched.len()
        );
        Ok(matched)
    }
}

fn read_field<T: ModelSchema + ColumnAccess>(
    record: &T,
    field: &str,
) -> Result<ColumnValue, PublishableError> {
    record.read_column(field).ok_or_else(|| {
        PublishableError::unsupported_query(
            T::table_name(),
            format!("column '{}' is not accessible in memory", field),
        )
    })
}

fn matches_all<T: ModelSchema + ColumnAccess>(
    record: &T,
    filters: &[QueryFilter],
) -> Result<bool, PublishableError> {
    for filter in filters {
        if !matches_filter(record, filter)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches_filter<T: ModelSchema + ColumnAccess>(
    record: &T,
    filter: &QueryFilter,
) -> Result<bool, PublishableError> {
    match filter {
        QueryFilter::Condition(condition) => matches_condition(record, condition),
        QueryFilter::AnyOf(filters) => {
            for filter in filters {
                if matches_filter(record, filter)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn matches_condition<T: ModelSchema + ColumnAccess>(
    record: &T,
    condition: &QueryCondition,
) -> Result<bool, PublishableError> {
    let stored = read_field(record, &condition.field)?;

    let parse = |json: &serde_json::Value| {
        stored.parse_like(json).ok_or_else(|| {
            PublishableError::unsupported_query(
                T::table_name(),
                format!(
                    "value {} cannot be compared with column '{}'",
                    json, condition.field
                ),
            )
        })
    };

    let operand = match (&condition.value, condition.operator) {
        (_, QueryOperator::IsNull) => return Ok(stored.is_null()),
        (_, QueryOperator::IsNotNull) => return Ok(!stored.is_null()),
        (None | Some(serde_json::Value::Null), QueryOperator::Eq) => {
            return Ok(stored.is_null())
        }
        (None | Some(serde_json::Value::Null), _) => return Ok(false),
        (Some(value), _) => parse(value)?,
    };

    let Some(ordering) = stored.compare(&operand) else {
        return Ok(false);
    };

    Ok(match condition.operator {
        QueryOperator::Eq => ordering == Ordering::Equal,
        QueryOperator::Gt => ordering == Ordering::Greater,
        QueryOperator::Lte => ordering != Ordering::Greater,
        QueryOperator::IsNull | QueryOperator::IsNotNull => false,
    })
}

#[async_trait]
impl<T> RecordStore<T> for MemoryStore<T>
where
    T: ModelSchema + ColumnAccess + Clone + Send + Sync,
{
    type Error = PublishableError;

    /// Replace the record with the same primary key, or append it
    async fn save(&self, record: &T) -> Result<(), PublishableError> {
        let key = record.primary_key_value();
        if key.is_null() {
            return Err(PublishableError::MissingPrimaryKey {
                table: T::table_name().to_string(),
            });
        }

        let mut records = self.write();
        match records
            .iter()
            .position(|existing| existing.primary_key_value() == key)
        {
            Some(index) => records[index] = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn find(&self, query: QueryBuilder) -> Result<Vec<T>, PublishableError> {
        self.query(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDef;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: i64,
        published_at: Option<DateTime<Utc>>,
    }

    impl ModelSchema for Entry {
        fn table_name() -> &'static str {
            "entries"
        }

        fn primary_key() -> Option<&'static str> {
            Some("id")
        }

        fn columns() -> Vec<ColumnDef> {
            vec![
                ColumnDef::new("id", "BIGINT", false),
                ColumnDef::new("published_at", "TIMESTAMP WITH TIME ZONE", true),
            ]
        }
    }

    impl ColumnAccess for Entry {
        fn read_column(&self, column: &str) -> Option<ColumnValue> {
            (column == "published_at").then_some(ColumnValue::DateTime(self.published_at))
        }

        fn write_column(&mut self, column: &str, value: ColumnValue) -> bool {
            match (column, value) {
                ("published_at", ColumnValue::DateTime(at)) => {
                    self.published_at = at;
                    true
                }
                _ => false,
            }
        }

        fn primary_key_value(&self) -> serde_json::Value {
            serde_json::json!(self.id)
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn store() -> MemoryStore<Entry> {
        MemoryStore::with_records(vec![
            Entry {
                id: 1,
                published_at: None,
            },
            Entry {
                id: 2,
                published_at: Some(base() - Duration::hours(1)),
            },
            Entry {
                id: 3,
                published_at: Some(base()),
            },
            Entry {
                id: 4,
                published_at: Some(base() + Duration::hours(1)),
            },
        ])
    }

    fn ids(entries: Vec<Entry>) -> Vec<i64> {
        entries.into_iter().map(|entry| entry.id).collect()
    }

    fn param(at: DateTime<Utc>) -> serde_json::Value {
        serde_json::json!(at.to_rfc3339())
    }

    #[test]
    fn test_comparison_skips_nulls() {
        let query = QueryBuilder::new().filter(QueryFilter::lte("published_at", param(base())));
        assert_eq!(ids(store().query(&query).unwrap()), vec![2, 3]);

        let query = QueryBuilder::new().filter(QueryFilter::gt("published_at", param(base())));
        assert_eq!(ids(store().query(&query).unwrap()), vec![4]);
    }

    #[test]
    fn test_null_checks() {
        let query = QueryBuilder::new().filter(QueryFilter::is_null("published_at"));
        assert_eq!(ids(store().query(&query).unwrap()), vec![1]);

        let query = QueryBuilder::new()
            .filter(QueryFilter::eq("published_at", serde_json::Value::Null));
        assert_eq!(ids(store().query(&query).unwrap()), vec![1]);
    }

    #[test]
    fn test_or_group() {
        let query = QueryBuilder::new().filter(QueryFilter::or(vec![
            QueryFilter::is_null("published_at"),
            QueryFilter::gt("published_at", param(base())),
        ]));
        assert_eq!(ids(store().query(&query).unwrap()), vec![1, 4]);

        let query = QueryBuilder::new().filter(QueryFilter::or(vec![]));
        assert!(store().query(&query).unwrap().is_empty());
    }

    #[test]
    fn test_ordering_puts_nulls_last_ascending_first_descending() {
        let query = QueryBuilder::new().order_by("published_at", SortOrder::Asc);
        assert_eq!(ids(store().query(&query).unwrap()), vec![2, 3, 4, 1]);

        let query = QueryBuilder::new().order_by("published_at", SortOrder::Desc);
        assert_eq!(ids(store().query(&query).unwrap()), vec![1, 4, 3, 2]);
    }

    #[test]
    fn test_limit_truncates_after_ordering() {
        let query = QueryBuilder::new()
            .filter(QueryFilter::is_not_null("published_at"))
            .order_by("published_at", SortOrder::Desc)
            .limit(Some(2));
        assert_eq!(ids(store().query(&query).unwrap()), vec![4, 3]);

        let query = QueryBuilder::new().limit(Some(0));
        assert!(store().query(&query).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let query = QueryBuilder::new().filter(QueryFilter::eq("title", serde_json::json!("x")));
        let err = store().query(&query).unwrap_err();
        assert!(matches!(err, PublishableError::UnsupportedQuery { .. }));
    }

    #[tokio::test]
    async fn test_save_upserts_by_primary_key() {
        let store = store();
        let updated = Entry {
            id: 1,
            published_at: Some(base()),
        };
        store.save(&updated).await.unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.all()[0], updated);

        store
            .save(&Entry {
                id: 5,
                published_at: None,
            })
            .await
            .unwrap();
        assert_eq!(store.len(), 5);
    }
}
