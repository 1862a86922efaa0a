//! Configuration-time binding of a publish column
//!
//! `bind` checks a model's schema once and returns a `Publisher` that carries
//! the resulting `PublishBinding`. There is no registry: the binding lives in
//! the value `bind` returns, and binding twice simply yields two independent,
//! equal publishers.

use config::{MissingColumnPolicy, PublishableConfig};
use serde::{Deserialize, Serialize};
use type_mapping::ColumnKind;

use crate::errors::PublishableError;
use crate::moment::Moment;
use crate::publisher::Publisher;
use crate::schema::{ModelSchema, TableSchema};
use crate::value::ColumnValue;

/// Column names tried, in order, when none is configured
pub const DEFAULT_COLUMNS: &[&str] = &["published", "published_at"];

/// Options accepted by `bind`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindOptions {
    pub column: Option<String>,
    pub on_missing: MissingColumnPolicy,
}

impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind this column instead of the default ones
    pub fn on(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    /// Bind nothing, without error, when the column or table is missing
    pub fn skip_missing(mut self) -> Self {
        self.on_missing = MissingColumnPolicy::Skip;
        self
    }

    pub fn from_config(config: &PublishableConfig) -> Self {
        Self {
            column: config.column.clone(),
            on_missing: config.on_missing_column,
        }
    }
}

/// How publish state is stored in the bound column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublishKind {
    /// Boolean on/off flag
    Flag,
    /// Date from which the record is published
    Date,
    /// Instant from which the record is published
    DateTime,
}

impl PublishKind {
    /// `None` for column kinds that cannot carry publish state
    pub fn from_column_kind(kind: &ColumnKind) -> Option<Self> {
        match kind {
            ColumnKind::Boolean => Some(PublishKind::Flag),
            ColumnKind::Date => Some(PublishKind::Date),
            ColumnKind::DateTime => Some(PublishKind::DateTime),
            ColumnKind::Other(_) => None,
        }
    }

    pub fn column_kind(&self) -> ColumnKind {
        match self {
            PublishKind::Flag => ColumnKind::Boolean,
            PublishKind::Date => ColumnKind::Date,
            PublishKind::DateTime => ColumnKind::DateTime,
        }
    }

    pub fn is_temporal(&self) -> bool {
        !matches!(self, PublishKind::Flag)
    }
}

/// Immutable result of a successful bind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishBinding {
    pub table: String,
    pub column: String,
    pub kind: PublishKind,
}

impl PublishBinding {
    /// Is a stored `value` published as of `at`?
    ///
    /// Flags are published when true (NULL counts as false). Temporal values
    /// are published when present and not after `at`; the boundary is
    /// inclusive.
    pub fn is_published_value(&self, value: &ColumnValue, at: Moment) -> bool {
        match self.kind {
            PublishKind::Flag => matches!(value, ColumnValue::Bool(Some(true))),
            PublishKind::Date => value
                .as_moment()
                .is_some_and(|stored| stored.as_date() <= at.as_date()),
            PublishKind::DateTime => value
                .as_moment()
                .is_some_and(|stored| stored.as_datetime() <= at.as_datetime()),
        }
    }

    /// Value `publish` writes for moment `at`
    pub fn published_value(&self, at: Moment) -> ColumnValue {
        match self.kind {
            PublishKind::Flag => ColumnValue::Bool(Some(true)),
            PublishKind::Date => ColumnValue::Date(Some(at.as_date())),
            PublishKind::DateTime => ColumnValue::DateTime(Some(at.as_datetime())),
        }
    }

    /// Value `unpublish` writes
    pub fn unpublished_value(&self) -> ColumnValue {
        match self.kind {
            PublishKind::Flag => ColumnValue::Bool(Some(false)),
            PublishKind::Date => ColumnValue::Date(None),
            PublishKind::DateTime => ColumnValue::DateTime(None),
        }
    }
}

/// Bind the publish column of `T` using its static schema
///
/// Returns `Ok(None)` only when the column or table is missing and
/// `options.on_missing` is `Skip`.
pub fn bind<T: ModelSchema>(
    options: &BindOptions,
) -> Result<Option<Publisher<T>>, PublishableError> {
    bind_schema::<T>(&T::table_schema(), options)
}

/// Bind the publish column of `T` against an explicit schema, e.g. one
/// introspected from the database
pub fn bind_schema<T>(
    schema: &TableSchema,
    options: &BindOptions,
) -> Result<Option<Publisher<T>>, PublishableError> {
    Ok(resolve_binding(schema, options)?.map(Publisher::from_binding))
}

pub(crate) fn resolve_binding(
    schema: &TableSchema,
    options: &BindOptions,
) -> Result<Option<PublishBinding>, PublishableError> {
    if !schema.materialized {
        return missing(
            options,
            PublishableError::configuration(
                &schema.table,
                format!("table '{}' does not exist", schema.table),
            ),
        );
    }

    let column_name = match &options.column {
        Some(column) => column.clone(),
        None => DEFAULT_COLUMNS
            .iter()
            .find(|candidate| schema.has_column(candidate))
            .unwrap_or(&DEFAULT_COLUMNS[0])
            .to_string(),
    };

    let Some(column) = schema.column(&column_name) else {
        return missing(
            options,
            PublishableError::configuration(
                &schema.table,
                format!("no '{}' column available for publish state", column_name),
            ),
        );
    };

    let kind = PublishKind::from_column_kind(&column.kind).ok_or_else(|| {
        PublishableError::configuration(
            &schema.table,
            format!(
                "column '{}' has type {}, expected boolean, date or datetime",
                column.name, column.kind
            ),
        )
    })?;

    // unpublish writes NULL to temporal columns
    if kind.is_temporal() && !column.nullable {
        return Err(PublishableError::configuration(
            &schema.table,
            format!(
                "column '{}' is NOT NULL, a date or datetime publish column must accept NULL",
                column.name
            ),
        ));
    }

    debug_log!(
        "Bound publish column {}.{} as {:?}",
        schema.table,
        column.name,
        kind
    );

    Ok(Some(PublishBinding {
        table: schema.table.clone(),
        column: column.name.clone(),
        kind,
    }))
}

fn missing(
    options: &BindOptions,
    error: PublishableError,
) -> Result<Option<PublishBinding>, PublishableError> {
    match options.on_missing {
        MissingColumnPolicy::Error => Err(error),
        MissingColumnPolicy::Skip => {
            debug_log!("Skipping publish binding: {}", error);
            Ok(None)
        }
    }
}
