//! Moments and clocks
//!
//! A `Moment` is the point in time a temporal publish column is compared
//! against. Date columns compare calendar dates, datetime columns compare
//! instants; a moment of the other flavour is coerced (UTC date of an
//! instant, midnight UTC of a date).

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl Moment {
    pub fn as_date(&self) -> NaiveDate {
        match self {
            Moment::Date(date) => *date,
            Moment::DateTime(at) => at.date_naive(),
        }
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        match self {
            Moment::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
            Moment::DateTime(at) => *at,
        }
    }

    /// Query parameter for a date column
    pub fn date_param(&self) -> serde_json::Value {
        serde_json::Value::String(self.as_date().format("%Y-%m-%d").to_string())
    }

    /// Query parameter for a datetime column
    pub fn datetime_param(&self) -> serde_json::Value {
        serde_json::Value::String(
            self.as_datetime()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )
    }
}

impl From<NaiveDate> for Moment {
    fn from(date: NaiveDate) -> Self {
        Moment::Date(date)
    }
}

impl From<DateTime<Utc>> for Moment {
    fn from(at: DateTime<Utc>) -> Self {
        Moment::DateTime(at)
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Moment::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Moment::DateTime(at) => {
                f.write_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

/// Wall-clock source. Each publish operation reads it once.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant, for tests and reproducible runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
