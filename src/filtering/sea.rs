//! Sea-ORM rendering of predicates.
//!
//! Every value is bound as a query parameter; LIKE needles additionally have
//! `%`, `_` and `\` escaped so they match literally.

use sea_orm::{
    ColumnType, Condition, EntityTrait, QueryFilter, Select,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};

use super::predicate::{ColumnRef, DateComparison, Predicate, QueryBuilder, ScalarValue, ValueType};

const LIKE_ESCAPE: char = '\\';

impl From<ScalarValue> for sea_orm::Value {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Bool(b) => b.into(),
            ScalarValue::Int(i) => i.into(),
            ScalarValue::Float(f) => f.into(),
            ScalarValue::Text(s) => s.into(),
        }
    }
}

/// How filter values bind against a column of this type. Temporal, binary
/// and structured columns have no scalar binding.
#[must_use]
pub fn value_type_of(column_type: &ColumnType) -> Option<ValueType> {
    match column_type {
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger
        | ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned => Some(ValueType::Integer),
        ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_) | ColumnType::Money(_) => {
            Some(ValueType::Float)
        }
        ColumnType::Boolean => Some(ValueType::Boolean),
        ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text | ColumnType::Enum { .. } => {
            Some(ValueType::Text)
        }
        _ => None,
    }
}

fn column_expr(column: &ColumnRef) -> Expr {
    Expr::col((Alias::new(&column.table), Alias::new(&column.column)))
}

/// `DATE(table.column)`, comparing at day granularity
fn day_of(column: &ColumnRef) -> Expr {
    Expr::expr(Func::cust(Alias::new("DATE")).arg(column_expr(column)))
}

/// Escapes LIKE wildcards so the needle matches as a plain substring
#[must_use]
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

impl From<&Predicate> for SimpleExpr {
    fn from(predicate: &Predicate) -> Self {
        match predicate {
            Predicate::Eq { column, value } => {
                column_expr(column).eq(sea_orm::Value::from(value.clone()))
            }
            Predicate::Like { column, needle } => column_expr(column).like(
                LikeExpr::new(format!("%{}%", escape_like(needle))).escape(LIKE_ESCAPE),
            ),
            Predicate::In { column, values } => {
                column_expr(column).is_in(values.iter().cloned().map(sea_orm::Value::from))
            }
            Predicate::Date {
                column,
                comparison,
                date,
            } => match comparison {
                DateComparison::Lte => day_of(column).lte(*date),
                DateComparison::Gte => day_of(column).gte(*date),
                DateComparison::Eq => day_of(column).eq(*date),
            },
            Predicate::Between { column, start, end } => {
                column_expr(column).between(*start, *end)
            }
        }
    }
}

impl QueryBuilder for Condition {
    fn push_predicate(self, predicate: Predicate) -> Self {
        self.add(SimpleExpr::from(&predicate))
    }
}

impl<E: EntityTrait> QueryBuilder for Select<E> {
    fn push_predicate(self, predicate: Predicate) -> Self {
        self.filter(SimpleExpr::from(&predicate))
    }
}
