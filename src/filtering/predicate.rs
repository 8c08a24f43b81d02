//! Predicates produced by the filter engine and the query-builder capability
//! they are attached to.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fmt;

/// A table-qualified column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    #[must_use]
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// A bound value in an equality or membership predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "'{s}'"),
        }
    }
}

/// Storage type of a column, used to bind filter values with a matching type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ScalarValue {
    /// Converts the value to `ty`. Query strings only carry text, so numeric
    /// and boolean columns parse it; `None` when the text does not fit.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::float_cmp)]
    pub fn coerce(self, ty: ValueType) -> Option<Self> {
        match (ty, self) {
            (ValueType::Integer, Self::Int(i)) => Some(Self::Int(i)),
            (ValueType::Integer, Self::Text(s)) => s.trim().parse().ok().map(Self::Int),
            (ValueType::Integer, Self::Float(x)) if x.fract() == 0.0 && x.abs() < 9.0e15 => {
                Some(Self::Int(x as i64))
            }
            (ValueType::Float, Self::Int(i)) => Some(Self::Float(i as f64)),
            (ValueType::Float, Self::Float(x)) => Some(Self::Float(x)),
            (ValueType::Float, Self::Text(s)) => {
                s.trim().parse::<f64>().ok().filter(|x| x.is_finite()).map(Self::Float)
            }
            (ValueType::Boolean, Self::Bool(b)) => Some(Self::Bool(b)),
            (ValueType::Boolean, Self::Int(i)) if i == 0 || i == 1 => Some(Self::Bool(i == 1)),
            (ValueType::Boolean, Self::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Some(Self::Bool(true)),
                "0" | "false" => Some(Self::Bool(false)),
                _ => None,
            },
            (ValueType::Text, Self::Text(s)) => Some(Self::Text(s)),
            (ValueType::Text, other) => Some(Self::Text(other.to_string())),
            _ => None,
        }
    }
}

/// Day-level comparison against a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateComparison {
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `=`
    Eq,
}

impl DateComparison {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::Eq => "=",
        }
    }
}

/// A single constraint attached to a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = value`
    Eq { column: ColumnRef, value: ScalarValue },
    /// `column LIKE '%needle%'`, with the needle bound as a parameter
    Like { column: ColumnRef, needle: String },
    /// `column IN (values)`
    In {
        column: ColumnRef,
        values: Vec<ScalarValue>,
    },
    /// `DATE(column) <op> date`
    Date {
        column: ColumnRef,
        comparison: DateComparison,
        date: NaiveDate,
    },
    /// `column BETWEEN start AND end`, inclusive
    Between {
        column: ColumnRef,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl Predicate {
    #[must_use]
    pub fn column(&self) -> &ColumnRef {
        match self {
            Self::Eq { column, .. }
            | Self::Like { column, .. }
            | Self::In { column, .. }
            | Self::Date { column, .. }
            | Self::Between { column, .. } => column,
        }
    }
}

/// Readable SQL-like rendering, used in logs. Not meant to be executed.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq { column, value } => write!(f, "{column} = {value}"),
            Self::Like { column, needle } => write!(f, "{column} LIKE '%{needle}%'"),
            Self::In { column, values } => {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "{column} IN ({})", values.join(", "))
            }
            Self::Date {
                column,
                comparison,
                date,
            } => write!(f, "DATE({column}) {} '{date}'", comparison.as_sql()),
            Self::Between { column, start, end } => {
                write!(f, "{column} BETWEEN '{start}' AND '{end}'")
            }
        }
    }
}

/// Something predicates can be attached to, builder style.
///
/// The engine takes the builder by value and hands it back with the
/// predicates attached, so one builder is never shared between two `apply`
/// calls in flight.
pub trait QueryBuilder: Sized {
    #[must_use]
    fn push_predicate(self, predicate: Predicate) -> Self;
}

/// Records predicates as-is, in the order they were attached.
impl QueryBuilder for Vec<Predicate> {
    fn push_predicate(mut self, predicate: Predicate) -> Self {
        self.push(predicate);
        self
    }
}
