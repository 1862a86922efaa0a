//! Query scopes for a bound publish column
//!
//! Scopes are plain `QueryBuilder` values. Building one never touches a
//! store; every call produces a fresh descriptor evaluated when a store
//! materializes it.

use query_builder::{QueryBuilder, QueryFilter, SortOrder};

use crate::binding::{PublishBinding, PublishKind};
use crate::moment::Moment;

impl PublishBinding {
    fn moment_param(&self, at: Moment) -> serde_json::Value {
        match self.kind {
            PublishKind::Date => at.date_param(),
            _ => at.datetime_param(),
        }
    }

    /// Records published as of `at`. Flag columns ignore the moment.
    pub fn published_scope(&self, at: Moment) -> QueryBuilder {
        match self.kind {
            PublishKind::Flag => QueryBuilder::new()
                .filter(QueryFilter::eq(&self.column, serde_json::Value::Bool(true))),
            PublishKind::Date | PublishKind::DateTime => QueryBuilder::new()
                .filter(QueryFilter::is_not_null(&self.column))
                .filter(QueryFilter::lte(&self.column, self.moment_param(at))),
        }
    }

    /// Records not published as of `at`
    ///
    /// For temporal columns this is the complement of `published_scope`:
    /// never scheduled (NULL) or scheduled after `at`.
    pub fn unpublished_scope(&self, at: Moment) -> QueryBuilder {
        match self.kind {
            PublishKind::Flag => QueryBuilder::new()
                .filter(QueryFilter::eq(&self.column, serde_json::Value::Bool(false))),
            PublishKind::Date | PublishKind::DateTime => {
                QueryBuilder::new().filter(QueryFilter::or(vec![
                    QueryFilter::is_null(&self.column),
                    QueryFilter::gt(&self.column, self.moment_param(at)),
                ]))
            }
        }
    }

    /// Scheduled records: a publish moment exists and lies after `at`
    fn scheduled_scope(&self, at: Moment) -> QueryBuilder {
        QueryBuilder::new()
            .filter(QueryFilter::is_not_null(&self.column))
            .filter(QueryFilter::gt(&self.column, self.moment_param(at)))
    }

    /// Published records, most recent first
    pub fn recent_scope(&self, at: Moment, limit: Option<u32>) -> QueryBuilder {
        self.published_scope(at)
            .order_by(&self.column, SortOrder::Desc)
            .limit(limit)
    }

    /// Scheduled records, soonest first
    pub fn upcoming_scope(&self, at: Moment, limit: Option<u32>) -> QueryBuilder {
        self.scheduled_scope(at)
            .order_by(&self.column, SortOrder::Asc)
            .limit(limit)
    }
}
