//! Typed publish capability for one model type
//!
//! A `Publisher<T>` is what `bind` hands back: predicates and mutators for
//! instances of `T` and scope factories for queries over `T`, all dispatched
//! on the bound column's `PublishKind`. Ordering scopes exist only for
//! temporal columns and are reached through `Publisher::temporal`.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use query_builder::QueryBuilder;

use crate::arg::PublishArg;
use crate::binding::{resolve_binding, BindOptions, PublishBinding, PublishKind};
use crate::errors::PublishableError;
use crate::moment::{Clock, Moment, SystemClock};
use crate::schema::{ColumnAccess, ModelSchema};
use crate::store::RecordStore;

pub struct Publisher<T> {
    binding: PublishBinding,
    clock: Arc<dyn Clock + Send + Sync>,
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            clock: Arc::clone(&self.clock),
            _model: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl<T: ModelSchema> Publisher<T> {
    /// Strict bind: a missing column or table is always an error, whatever
    /// `options.on_missing` says
    pub fn new(options: &BindOptions) -> Result<Self, PublishableError> {
        let schema = T::table_schema();
        resolve_binding(&schema, options)?
            .map(Self::from_binding)
            .ok_or_else(|| {
                PublishableError::configuration(&schema.table, "publish column is missing")
            })
    }
}

impl<T> Publisher<T> {
    pub(crate) fn from_binding(binding: PublishBinding) -> Self {
        Self {
            binding,
            clock: Arc::new(SystemClock),
            _model: PhantomData,
        }
    }

    /// Use `clock` instead of the system clock for every default moment
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn binding(&self) -> &PublishBinding {
        &self.binding
    }

    pub fn kind(&self) -> PublishKind {
        self.binding.kind
    }

    pub fn column(&self) -> &str {
        &self.binding.column
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn current_moment(&self) -> Moment {
        match self.binding.kind {
            PublishKind::Date => Moment::Date(self.clock.today()),
            _ => Moment::DateTime(self.clock.now()),
        }
    }

    pub fn published(&self) -> QueryBuilder {
        self.binding.published_scope(self.current_moment())
    }

    /// Records published as of `at`; flag columns ignore `at`
    pub fn published_at(&self, at: impl Into<Moment>) -> QueryBuilder {
        self.binding.published_scope(at.into())
    }

    pub fn unpublished(&self) -> QueryBuilder {
        self.binding.unpublished_scope(self.current_moment())
    }

    pub fn unpublished_at(&self, at: impl Into<Moment>) -> QueryBuilder {
        self.binding.unpublished_scope(at.into())
    }

    /// Scope selected by a normalized argument
    ///
    /// `Flag(true)` and `Flag(false)` pick the published and unpublished
    /// scopes as of now. `At(moment)` picks the published scope as of that
    /// moment and is rejected for flag columns.
    pub fn scope_for(&self, arg: &PublishArg) -> Result<QueryBuilder, PublishableError> {
        match (arg, self.binding.kind) {
            (PublishArg::Flag(true), _) => Ok(self.published()),
            (PublishArg::Flag(false), _) => Ok(self.unpublished()),
            (PublishArg::At(_), PublishKind::Flag) => Err(PublishableError::unsupported_query(
                &self.binding.table,
                format!(
                    "column '{}' is a boolean flag and cannot be queried at a moment",
                    self.binding.column
                ),
            )),
            (PublishArg::At(moment), _) => Ok(self.published_at(*moment)),
        }
    }

    /// Ordering scopes; `None` for flag columns
    pub fn temporal(&self) -> Option<TemporalScopes<'_, T>> {
        self.binding
            .kind
            .is_temporal()
            .then_some(TemporalScopes { publisher: self })
    }
}

impl<T: ColumnAccess> Publisher<T> {
    pub fn is_published(&self, record: &T) -> bool {
        self.is_published_at(record, self.current_moment())
    }

    /// Flag columns ignore `at`
    pub fn is_published_at(&self, record: &T, at: impl Into<Moment>) -> bool {
        record
            .read_column(&self.binding.column)
            .is_some_and(|value| self.binding.is_published_value(&value, at.into()))
    }

    pub fn is_unpublished(&self, record: &T) -> bool {
        !self.is_published(record)
    }

    pub fn is_unpublished_at(&self, record: &T, at: impl Into<Moment>) -> bool {
        !self.is_published_at(record, at)
    }

    /// Publish as of now. Returns whether the record changed.
    pub fn publish(&self, record: &mut T) -> bool {
        self.publish_at(record, self.current_moment())
    }

    /// Set the column to `at` unless the record is already published as of
    /// `at`. Flag columns are set to true.
    pub fn publish_at(&self, record: &mut T, at: impl Into<Moment>) -> bool {
        let at = at.into();
        if self.is_published_at(record, at) {
            return false;
        }
        trace_log!("Publishing {}.{} at {}", self.binding.table, self.binding.column, at);
        record.write_column(&self.binding.column, self.binding.published_value(at))
    }

    /// Set flag columns to false and temporal columns to NULL. Returns
    /// whether the record changed.
    pub fn unpublish(&self, record: &mut T) -> bool {
        let value = self.binding.unpublished_value();
        if record.read_column(&self.binding.column) == Some(value) {
            return false;
        }
        trace_log!("Unpublishing {}.{}", self.binding.table, self.binding.column);
        record.write_column(&self.binding.column, value)
    }

    /// `publish`, then save the record through `store`
    ///
    /// The record is saved even when `publish` changed nothing. Save errors
    /// are returned unchanged.
    pub async fn publish_and_save<S>(&self, record: &mut T, store: &S) -> Result<bool, S::Error>
    where
        T: Send + Sync,
        S: RecordStore<T>,
    {
        let at = self.current_moment();
        self.publish_at_and_save(record, at, store).await
    }

    pub async fn publish_at_and_save<S>(
        &self,
        record: &mut T,
        at: impl Into<Moment>,
        store: &S,
    ) -> Result<bool, S::Error>
    where
        T: Send + Sync,
        S: RecordStore<T>,
    {
        let changed = self.publish_at(record, at);
        store.save(record).await?;
        Ok(changed)
    }

    pub async fn unpublish_and_save<S>(&self, record: &mut T, store: &S) -> Result<bool, S::Error>
    where
        T: Send + Sync,
        S: RecordStore<T>,
    {
        let changed = self.unpublish(record);
        store.save(record).await?;
        Ok(changed)
    }
}

/// `recent` and `upcoming`, available for date and datetime columns only
#[derive(Debug)]
pub struct TemporalScopes<'a, T> {
    publisher: &'a Publisher<T>,
}

impl<T> Clone for TemporalScopes<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TemporalScopes<'_, T> {}

impl<T> TemporalScopes<'_, T> {
    /// Published records, most recently published first
    pub fn recent(&self, limit: Option<u32>) -> QueryBuilder {
        self.recent_at(self.publisher.current_moment(), limit)
    }

    pub fn recent_at(&self, at: impl Into<Moment>, limit: Option<u32>) -> QueryBuilder {
        self.publisher.binding.recent_scope(at.into(), limit)
    }

    /// Scheduled records, soonest first
    pub fn upcoming(&self, limit: Option<u32>) -> QueryBuilder {
        self.upcoming_at(self.publisher.current_moment(), limit)
    }

    pub fn upcoming_at(&self, at: impl Into<Moment>, limit: Option<u32>) -> QueryBuilder {
        self.publisher.binding.upcoming_scope(at.into(), limit)
    }
}
