//! Date expressions: a bare date, `operator:date`, a `{start, end}` range, or a
//! mapping of operators to dates.
//!
//! ```text
//! "2024-02-08"                              exact day
//! "after:2024-01-01"                        DATE(col) >= 2024-01-01
//! {"start": "2024-01-01", "end": "2024-02-08"}  inclusive range, whole days
//! {"after": "2024-01-01", "before": "2024-02-08"}  two ANDed comparisons
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};

use super::predicate::DateComparison;
use crate::errors::FilterError;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const LAST_MILLISECOND: NaiveTime = match NaiveTime::from_hms_milli_opt(23, 59, 59, 999) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

/// Recognized date operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOperator {
    /// `before` or `until`
    Before,
    /// `after` or `since`
    After,
    /// `on`
    On,
}

impl DateOperator {
    /// Case-insensitive lookup of an operator token
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "before" | "until" => Some(Self::Before),
            "after" | "since" => Some(Self::After),
            "on" => Some(Self::On),
            _ => None,
        }
    }

    #[must_use]
    pub fn comparison(self) -> DateComparison {
        match self {
            Self::Before => DateComparison::Lte,
            Self::After => DateComparison::Gte,
            Self::On => DateComparison::Eq,
        }
    }
}

/// An operator token as written by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorToken {
    Known(DateOperator),
    Unknown(String),
}

impl OperatorToken {
    #[must_use]
    pub fn parse(token: &str) -> Self {
        DateOperator::from_token(token).map_or_else(|| Self::Unknown(token.to_string()), Self::Known)
    }
}

/// Normalized form of a date filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateExpression {
    Exact(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
    Operator(OperatorToken, NaiveDate),
    /// Several operators on the same field, all ANDed
    Operators(Vec<(OperatorToken, NaiveDate)>),
}

impl DateExpression {
    /// Parses a filter value. Shapes that carry no date constraint (null,
    /// numbers, lists) yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidDate`] when date text is unparsable or a
    /// mapping entry is not a string.
    pub fn parse(field: &str, value: &Value) -> Result<Option<Self>, FilterError> {
        match value {
            Value::String(text) => Self::parse_text(field, text).map(Some),
            Value::Object(map) => Self::parse_mapping(field, map),
            _ => Ok(None),
        }
    }

    fn parse_text(field: &str, text: &str) -> Result<Self, FilterError> {
        let Some((token, date_text)) = text.split_once(':') else {
            return parse_date(field, text).map(Self::Exact);
        };

        match OperatorToken::parse(token) {
            OperatorToken::Known(op) => {
                parse_date(field, date_text).map(|date| Self::Operator(OperatorToken::Known(op), date))
            }
            // A time of day also contains colons: "2024-02-08T10:30:00"
            unknown => match parse_date_text(text) {
                Some(date) => Ok(Self::Exact(date)),
                None => parse_date(field, date_text).map(|date| Self::Operator(unknown, date)),
            },
        }
    }

    fn parse_mapping(field: &str, map: &Map<String, Value>) -> Result<Option<Self>, FilterError> {
        if let (Some(start), Some(end)) = (non_null(map.get("start")), non_null(map.get("end"))) {
            return Ok(Some(Self::Range {
                start: parse_date_value(field, start)?,
                end: parse_date_value(field, end)?,
            }));
        }

        let mut terms = Vec::with_capacity(map.len());
        for (token, date) in map {
            if date.is_null() {
                continue;
            }
            terms.push((OperatorToken::parse(token), parse_date_value(field, date)?));
        }

        Ok((!terms.is_empty()).then_some(Self::Operators(terms)))
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn parse_date_value(field: &str, value: &Value) -> Result<NaiveDate, FilterError> {
    match value {
        Value::String(text) => parse_date(field, text),
        other => Err(FilterError::invalid_date(field, other.to_string())),
    }
}

fn parse_date(field: &str, text: &str) -> Result<NaiveDate, FilterError> {
    parse_date_text(text).ok_or_else(|| FilterError::invalid_date(field, text))
}

/// Parses date or date-time text, truncated to the calendar day.
#[must_use]
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|datetime| datetime.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}

#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable millisecond of the day, `23:59:59.999`
#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(LAST_MILLISECOND)
}
