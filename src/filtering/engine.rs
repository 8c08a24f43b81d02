use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use super::date::{DateExpression, OperatorToken, end_of_day, start_of_day};
use super::policy::{AllowListGate, FieldKind, FieldPolicy};
use super::predicate::{ColumnRef, DateComparison, Predicate, QueryBuilder, ScalarValue};
use super::value::{RawFilters, is_blank, is_truthy, to_needle, to_scalar};
use crate::errors::FilterError;

/// Translates raw request filters into predicates according to a
/// [`FieldPolicy`].
///
/// The engine holds no state besides its policy, so one instance can serve
/// any number of requests.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    policy: FieldPolicy,
}

impl FilterEngine {
    #[must_use]
    pub fn new(policy: FieldPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    /// Attaches the predicates for every filter to `query` and hands it back.
    ///
    /// Fields that are not filterable, and values that cannot be used, are
    /// dropped without error. Applying the same filters twice attaches the
    /// predicates twice.
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] when a date filter cannot be parsed, or when
    /// the policy has strict operators and an unknown date operator is used.
    /// Nothing is attached for the failing field.
    pub fn apply<Q: QueryBuilder>(&self, query: Q, filters: &RawFilters) -> Result<Q, FilterError> {
        let mut query = query;
        for (field, value) in filters {
            for predicate in self.predicates_for(field, value)? {
                debug!(%predicate, "Applying filter");
                query = query.push_predicate(predicate);
            }
        }
        Ok(query)
    }

    /// All predicates for a single filter, in the order they would be
    /// attached.
    ///
    /// # Errors
    ///
    /// Same as [`FilterEngine::apply`].
    pub fn predicates_for(&self, field: &str, value: &Value) -> Result<Vec<Predicate>, FilterError> {
        if self.policy.gate() == AllowListGate::Uniform && !self.passes_gate(field, value) {
            debug!(field, "Filter dropped by allow-list");
            return Ok(Vec::new());
        }

        match self.policy.kind_of(field) {
            FieldKind::Bool if !is_blank(value) => {
                return Ok(vec![Predicate::Eq {
                    column: self.column(field),
                    value: ScalarValue::Bool(is_truthy(value)),
                }]);
            }
            FieldKind::Date => return self.date_predicates(field, value),
            _ => {}
        }

        if !self.passes_gate(field, value) {
            debug!(field, "Filter dropped by allow-list");
            return Ok(Vec::new());
        }

        let predicate = match (self.policy.kind_of(field), value) {
            (FieldKind::Like, _) => self.like_predicate(field, value),
            (_, Value::Array(items)) => self.in_predicate(field, items),
            _ => self.eq_predicate(field, value),
        };
        if predicate.is_none() {
            debug!(field, "Filter value has an unusable shape");
        }
        Ok(predicate.into_iter().collect())
    }

    fn passes_gate(&self, field: &str, value: &Value) -> bool {
        self.policy.is_filterable(field) && is_truthy(value)
    }

    fn column(&self, field: &str) -> ColumnRef {
        ColumnRef::new(self.policy.table(), field)
    }

    fn fits_length(&self, text: &str) -> bool {
        text.len() <= self.policy.max_value_length()
    }

    fn like_predicate(&self, field: &str, value: &Value) -> Option<Predicate> {
        let needle = to_needle(value).filter(|needle| self.fits_length(needle))?;
        Some(Predicate::Like {
            column: self.column(field),
            needle,
        })
    }

    fn in_predicate(&self, field: &str, items: &[Value]) -> Option<Predicate> {
        let values: Vec<ScalarValue> = items
            .iter()
            .filter_map(to_scalar)
            .filter(|value| match value {
                ScalarValue::Text(text) => self.fits_length(text),
                _ => true,
            })
            .filter_map(|value| self.bind(field, value))
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(Predicate::In {
            column: self.column(field),
            values,
        })
    }

    fn eq_predicate(&self, field: &str, value: &Value) -> Option<Predicate> {
        let value = to_scalar(value)?;
        if let ScalarValue::Text(text) = &value
            && !self.fits_length(text)
        {
            return None;
        }
        Some(Predicate::Eq {
            column: self.column(field),
            value: self.bind(field, value)?,
        })
    }

    /// Converts a value to the field's declared storage type
    fn bind(&self, field: &str, value: ScalarValue) -> Option<ScalarValue> {
        let Some(ty) = self.policy.value_type(field) else {
            return Some(value);
        };
        let bound = value.clone().coerce(ty);
        if bound.is_none() {
            debug!(field, %value, ?ty, "Filter value does not fit the column type");
        }
        bound
    }

    fn date_predicates(&self, field: &str, value: &Value) -> Result<Vec<Predicate>, FilterError> {
        let Some(expression) = DateExpression::parse(field, value)? else {
            debug!(field, "Date filter carries no date");
            return Ok(Vec::new());
        };

        let column = self.column(field);
        let predicates = match expression {
            DateExpression::Exact(date) => vec![Predicate::Date {
                column,
                comparison: DateComparison::Eq,
                date,
            }],
            DateExpression::Range { start, end } => vec![Predicate::Between {
                column,
                start: start_of_day(start),
                end: end_of_day(end),
            }],
            DateExpression::Operator(token, date) => {
                self.operator_predicate(field, &column, token, date)?
                    .into_iter()
                    .collect()
            }
            DateExpression::Operators(terms) => {
                let mut predicates = Vec::with_capacity(terms.len());
                for (token, date) in terms {
                    predicates.extend(self.operator_predicate(field, &column, token, date)?);
                }
                predicates
            }
        };
        Ok(predicates)
    }

    fn operator_predicate(
        &self,
        field: &str,
        column: &ColumnRef,
        token: OperatorToken,
        date: NaiveDate,
    ) -> Result<Option<Predicate>, FilterError> {
        match token {
            OperatorToken::Known(op) => Ok(Some(Predicate::Date {
                column: column.clone(),
                comparison: op.comparison(),
                date,
            })),
            OperatorToken::Unknown(operator) if self.policy.strict_operators() => {
                Err(FilterError::unknown_operator(field, operator))
            }
            OperatorToken::Unknown(operator) => {
                debug!(field, %operator, "Unknown date operator ignored");
                Ok(None)
            }
        }
    }
}
