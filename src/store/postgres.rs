//! PostgreSQL record store
//!
//! Materializes scopes with sqlx and saves records with a full-row UPDATE.
//! Also provides schema introspection so a publisher can be bound against
//! the live table instead of the model's static column list.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use config::DatabaseConfig;
use query_builder::QueryBuilder;
use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};

use crate::binding::{bind_schema, BindOptions};
use crate::errors::PublishableError;
use crate::publisher::Publisher;
use crate::schema::{ColumnDef, ModelSchema, TableSchema};
use crate::store::RecordStore;

// Shared parameter binding for query and query_as
macro_rules! bind_json_param {
    ($query:expr, $param:expr) => {
        match $param {
            serde_json::Value::String(s) => {
                // Timestamps first, then calendar dates
                if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                    $query.bind(dt.with_timezone(&chrono::Utc))
                } else if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                    $query.bind(date)
                } else if let Ok(uuid) = uuid::Uuid::parse_str(&s) {
                    $query.bind(uuid)
                } else {
                    $query.bind(s)
                }
            }
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                        $query.bind(i as i32)
                    } else {
                        $query.bind(i)
                    }
                } else if let Some(f) = n.as_f64() {
                    $query.bind(f)
                } else {
                    $query.bind(n.to_string())
                }
            }
            serde_json::Value::Bool(b) => $query.bind(b),
            serde_json::Value::Null => $query.bind(Option::<String>::None),
            other => $query.bind(other.to_string()),
        }
    };
}

/// Connection options for `config`, with the session time zone pinned to UTC
///
/// Scope parameters are bound as `timestamptz`. Against a `TIMESTAMP` column
/// PostgreSQL converts through the session time zone, and naive timestamps
/// are read as UTC everywhere else in this crate.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, PublishableError> {
    let options: PgConnectOptions = config.connection_string().parse()?;
    Ok(options.options([("TimeZone", "UTC")]))
}

/// Build a connection pool from configuration
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, PublishableError> {
    let connect_options = connect_options(config)?;

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

    if config.max_lifetime_seconds > 0 {
        pool_options = pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
    }

    Ok(pool_options.connect_with(connect_options).await?)
}

/// Read the column list of `table` in the current schema
///
/// A table with no columns in `information_schema` does not exist and is
/// returned as `TableSchema::unmaterialized`.
pub async fn introspect_table(pool: &PgPool, table: &str) -> Result<TableSchema, PublishableError> {
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT column_name::text, data_type::text, is_nullable::text \
         FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = $1 \
         ORDER BY ordinal_position",
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|e| PublishableError::database_operation(table, "introspect", e))?;

    if rows.is_empty() {
        tracing::debug!("[INTROSPECT] Table {} does not exist", table);
        return Ok(TableSchema::unmaterialized(table));
    }

    let columns = rows
        .iter()
        .map(|(name, data_type, is_nullable)| {
            ColumnDef::new(name, data_type, is_nullable == "YES")
        })
        .collect();

    let primary_key: Option<(String,)> = sqlx::query_as(
        "SELECT kcu.column_name::text \
         FROM information_schema.table_constraints tc \
         JOIN information_schema.key_column_usage kcu \
           ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
         WHERE tc.constraint_type = 'PRIMARY KEY' \
           AND tc.table_schema = current_schema() AND tc.table_name = $1 \
         ORDER BY kcu.ordinal_position \
         LIMIT 1",
    )
    .bind(table)
    .fetch_optional(pool)
    .await
    .map_err(|e| PublishableError::database_operation(table, "introspect", e))?;

    let mut schema = TableSchema::new(table, columns);
    if let Some((primary_key,)) = primary_key {
        schema = schema.with_primary_key(&primary_key);
    }
    Ok(schema)
}

pub struct PgStore<T> {
    pool: PgPool,
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for PgStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _model: PhantomData,
        }
    }
}

impl<T: ModelSchema> PgStore<T> {
    /// Pools not built by `connect` must run with `TimeZone=UTC` for
    /// `TIMESTAMP` publish columns to compare the way `MemoryStore` does.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _model: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Bind against the live table rather than the model's declared columns
    pub async fn bind(
        &self,
        options: &BindOptions,
    ) -> Result<Option<Publisher<T>>, PublishableError> {
        let schema = introspect_table(&self.pool, T::table_name()).await?;
        bind_schema::<T>(&schema, options)
    }

    fn update_sql(record: &T) -> Result<(String, Vec<serde_json::Value>), PublishableError>
    where
        T: Serialize,
    {
        let table = T::table_name();
        let primary_key = T::primary_key().ok_or_else(|| PublishableError::MissingPrimaryKey {
            table: table.to_string(),
        })?;

        let serialized = serde_json::to_value(record).map_err(|e| {
            PublishableError::unsupported_query(table, format!("record is not serializable: {}", e))
        })?;
        let serde_json::Value::Object(mut fields) = serialized else {
            return Err(PublishableError::unsupported_query(
                table,
                "record must serialize to a JSON object",
            ));
        };

        let key = fields
            .remove(primary_key)
            .filter(|key| !key.is_null())
            .ok_or_else(|| PublishableError::MissingPrimaryKey {
                table: table.to_string(),
            })?;

        let mut assignments = Vec::new();
        let mut params = Vec::new();
        for column in T::columns() {
            if column.name == primary_key {
                continue;
            }
            let value = fields.remove(&column.name).unwrap_or(serde_json::Value::Null);
            params.push(value);
            assignments.push(format!(
                "\"{}\" = ${}::{}",
                column.name,
                params.len(),
                column.sql_type
            ));
        }
        params.push(key);

        let sql = format!(
            "UPDATE \"{}\" SET {} WHERE \"{}\" = ${}",
            table,
            assignments.join(", "),
            primary_key,
            params.len()
        );
        Ok((sql, params))
    }
}

#[async_trait]
impl<T> RecordStore<T> for PgStore<T>
where
    T: ModelSchema + for<'r> sqlx::FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin,
{
    type Error = PublishableError;

    async fn save(&self, record: &T) -> Result<(), PublishableError> {
        let table = T::table_name();
        let (sql, params) = Self::update_sql(record)?;
        let key = params
            .last()
            .map(|key| key.to_string())
            .unwrap_or_default();

        tracing::debug!("[SAVE] Table: {}", table);
        tracing::debug!("[SAVE] SQL: {}", sql);

        let mut sqlx_query = sqlx::query(&sql);
        for param in params {
            sqlx_query = bind_json_param!(sqlx_query, param);
        }

        let result = sqlx_query
            .execute(&self.pool)
            .await
            .map_err(|e| PublishableError::database_operation(table, "save", e))?;

        if result.rows_affected() == 0 {
            return Err(PublishableError::NotFound {
                table: table.to_string(),
                key,
            });
        }
        Ok(())
    }

    async fn find(&self, query: QueryBuilder) -> Result<Vec<T>, PublishableError> {
        let table = T::table_name();
        let (where_clause, order_clause, limit_clause, params) = query.build();

        let mut full_sql = format!("SELECT * FROM \"{}\"", table);
        for clause in [&where_clause, &order_clause, &limit_clause] {
            if !clause.is_empty() {
                full_sql.push(' ');
                full_sql.push_str(clause);
            }
        }

        tracing::debug!("[FIND] SQL: {}", full_sql);
        tracing::debug!("[FIND] params count: {}", params.len());

        let mut sqlx_query = sqlx::query_as::<_, T>(&full_sql);
        for param in params {
            sqlx_query = bind_json_param!(sqlx_query, param);
        }

        sqlx_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PublishableError::database_operation(table, "query", e))
    }
}
