//! Typed values of publish columns
//!
//! `ColumnValue` is what `ColumnAccess` hands back and forth for the bound
//! column. `ColumnValueType` converts between field types and column values;
//! the derive macro calls it for every publish-capable field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Ordering;

use crate::moment::Moment;

/// Current value of a boolean, date or datetime column. `None` is SQL NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnValue {
    Bool(Option<bool>),
    Date(Option<NaiveDate>),
    DateTime(Option<DateTime<Utc>>),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        match self {
            ColumnValue::Bool(value) => value.is_none(),
            ColumnValue::Date(value) => value.is_none(),
            ColumnValue::DateTime(value) => value.is_none(),
        }
    }

    /// The stored moment of a temporal value
    pub fn as_moment(&self) -> Option<Moment> {
        match self {
            ColumnValue::Bool(_) => None,
            ColumnValue::Date(value) => value.map(Moment::Date),
            ColumnValue::DateTime(value) => value.map(Moment::DateTime),
        }
    }

    /// Parse a JSON value into the same variant as `self`
    ///
    /// Used to compare query parameters against stored values. Dates are
    /// `YYYY-MM-DD`, datetimes RFC 3339; anything else yields `None`.
    pub fn parse_like(&self, json: &serde_json::Value) -> Option<ColumnValue> {
        match (self, json) {
            (_, serde_json::Value::Null) => Some(self.null_like()),
            (ColumnValue::Bool(_), serde_json::Value::Bool(flag)) => {
                Some(ColumnValue::Bool(Some(*flag)))
            }
            (ColumnValue::Date(_), serde_json::Value::String(text)) => {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .map(|date| ColumnValue::Date(Some(date)))
            }
            (ColumnValue::DateTime(_), serde_json::Value::String(text)) => {
                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|at| ColumnValue::DateTime(Some(at.with_timezone(&Utc))))
            }
            _ => None,
        }
    }

    fn null_like(&self) -> ColumnValue {
        match self {
            ColumnValue::Bool(_) => ColumnValue::Bool(None),
            ColumnValue::Date(_) => ColumnValue::Date(None),
            ColumnValue::DateTime(_) => ColumnValue::DateTime(None),
        }
    }

    /// Compare two non-null values of the same variant
    ///
    /// Returns `None` when either side is NULL or the variants differ, which
    /// matches SQL comparison semantics.
    pub fn compare(&self, other: &ColumnValue) -> Option<Ordering> {
        match (self, other) {
            (ColumnValue::Bool(Some(a)), ColumnValue::Bool(Some(b))) => Some(a.cmp(b)),
            (ColumnValue::Date(Some(a)), ColumnValue::Date(Some(b))) => Some(a.cmp(b)),
            (ColumnValue::DateTime(Some(a)), ColumnValue::DateTime(Some(b))) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order for sorting: NULL sorts after every value, as PostgreSQL
    /// does for ascending order
    pub fn sort_cmp(&self, other: &ColumnValue) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.compare(other).unwrap_or(Ordering::Equal),
        }
    }
}

/// Conversion between a model field type and a `ColumnValue`
pub trait ColumnValueType: Sized {
    fn to_column_value(&self) -> ColumnValue;

    /// `None` when the value cannot be stored in this type
    fn from_column_value(value: ColumnValue) -> Option<Self>;
}

impl ColumnValueType for bool {
    fn to_column_value(&self) -> ColumnValue {
        ColumnValue::Bool(Some(*self))
    }

    fn from_column_value(value: ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::Bool(flag) => flag,
            _ => None,
        }
    }
}

impl ColumnValueType for Option<bool> {
    fn to_column_value(&self) -> ColumnValue {
        ColumnValue::Bool(*self)
    }

    fn from_column_value(value: ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::Bool(flag) => Some(flag),
            _ => None,
        }
    }
}

impl ColumnValueType for NaiveDate {
    fn to_column_value(&self) -> ColumnValue {
        ColumnValue::Date(Some(*self))
    }

    fn from_column_value(value: ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::Date(date) => date,
            _ => None,
        }
    }
}

impl ColumnValueType for Option<NaiveDate> {
    fn to_column_value(&self) -> ColumnValue {
        ColumnValue::Date(*self)
    }

    fn from_column_value(value: ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::Date(date) => Some(date),
            _ => None,
        }
    }
}

impl ColumnValueType for DateTime<Utc> {
    fn to_column_value(&self) -> ColumnValue {
        ColumnValue::DateTime(Some(*self))
    }

    fn from_column_value(value: ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::DateTime(at) => at,
            _ => None,
        }
    }
}

impl ColumnValueType for Option<DateTime<Utc>> {
    fn to_column_value(&self) -> ColumnValue {
        ColumnValue::DateTime(*self)
    }

    fn from_column_value(value: ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::DateTime(at) => Some(at),
            _ => None,
        }
    }
}

// Timestamps without time zone are read and written as UTC
impl ColumnValueType for NaiveDateTime {
    fn to_column_value(&self) -> ColumnValue {
        ColumnValue::DateTime(Some(self.and_utc()))
    }

    fn from_column_value(value: ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::DateTime(at) => at.map(|at| at.naive_utc()),
            _ => None,
        }
    }
}

impl ColumnValueType for Option<NaiveDateTime> {
    fn to_column_value(&self) -> ColumnValue {
        ColumnValue::DateTime(self.map(|naive| naive.and_utc()))
    }

    fn from_column_value(value: ColumnValue) -> Option<Self> {
        match value {
            ColumnValue::DateTime(at) => Some(at.map(|at| at.naive_utc())),
            _ => None,
        }
    }
}
