//! Normalization of loosely typed publish arguments
//!
//! Callers coming from query strings or JSON bodies pass "true", 1, "on" or a
//! date string where a publish state is expected. Everything is turned into a
//! strict `PublishArg` here, before any scope or predicate sees it.

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::PublishableError;
use crate::moment::Moment;
use type_mapping::ColumnKind;

const TRUTHY: &[&str] = &["true", "1", "yes", "on", "t"];
const FALSY: &[&str] = &["false", "0", "no", "off", "f"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishArg {
    /// Published (true) or unpublished (false) as of now
    Flag(bool),
    /// Published as of the given moment
    At(Moment),
}

impl PublishArg {
    /// Parse a textual argument for a column of `kind`
    ///
    /// Temporal columns accept a moment first and fall back to a flag.
    pub fn parse(input: &str, kind: &ColumnKind) -> Result<Self, PublishableError> {
        let trimmed = input.trim();

        if kind.is_temporal() {
            if let Some(moment) = parse_moment(trimmed, kind) {
                return Ok(PublishArg::At(moment));
            }
        }

        parse_flag(trimmed).map(PublishArg::Flag).ok_or_else(|| {
            let expected = match kind {
                ColumnKind::Date => "a boolean or a YYYY-MM-DD date",
                ColumnKind::DateTime => "a boolean or an RFC 3339 timestamp",
                _ => "a boolean",
            };
            PublishableError::invalid_argument(input, format!("expected {}", expected))
        })
    }

    pub fn from_json(
        value: &serde_json::Value,
        kind: &ColumnKind,
    ) -> Result<Self, PublishableError> {
        match value {
            serde_json::Value::Bool(flag) => Ok(PublishArg::Flag(*flag)),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(1) => Ok(PublishArg::Flag(true)),
                Some(0) => Ok(PublishArg::Flag(false)),
                _ => Err(PublishableError::invalid_argument(
                    &number.to_string(),
                    "only 0 and 1 are accepted as numeric flags",
                )),
            },
            serde_json::Value::String(text) => Self::parse(text, kind),
            other => Err(PublishableError::invalid_argument(
                &other.to_string(),
                "expected a boolean, 0/1 or a string",
            )),
        }
    }
}

impl From<bool> for PublishArg {
    fn from(flag: bool) -> Self {
        PublishArg::Flag(flag)
    }
}

impl From<Moment> for PublishArg {
    fn from(moment: Moment) -> Self {
        PublishArg::At(moment)
    }
}

fn parse_flag(input: &str) -> Option<bool> {
    let lowered = input.to_ascii_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn parse_moment(input: &str, kind: &ColumnKind) -> Option<Moment> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok();
    let instant = DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|at| at.with_timezone(&Utc));

    match kind {
        ColumnKind::Date => date
            .map(Moment::Date)
            .or_else(|| instant.map(|at| Moment::Date(at.date_naive()))),
        ColumnKind::DateTime => instant
            .map(Moment::DateTime)
            .or_else(|| date.map(Moment::Date)),
        _ => None,
    }
}
