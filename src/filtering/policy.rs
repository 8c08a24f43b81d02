//! Per-entity declaration of which attributes may be filtered and with what
//! matching semantics.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use super::predicate::ValueType;

/// String values longer than this are dropped on the LIKE/equality path.
pub const MAX_FIELD_VALUE_LENGTH: usize = 10_000;

/// Matching semantics of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Equality against the truthiness of the value
    Bool,
    /// Date-expression parsing
    Date,
    /// Substring match (`LIKE '%value%'`)
    Like,
    /// Equality, or membership when the value is a list
    Default,
}

/// Where the allow-list and non-empty-value gate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowListGate {
    /// Bool and date fields are dispatched before the gate, so they filter even
    /// when absent from the allow-list.
    #[default]
    SpecialFieldsBypass,
    /// Every field must be allow-listed and carry a truthy value.
    Uniform,
}

/// Immutable filter configuration for one table.
///
/// Category overlap is resolved once at construction: bool, then date, then
/// like; anything else is [`FieldKind::Default`].
///
/// ```rust
/// use coinbook::filtering::{FieldKind, FieldPolicy};
///
/// let policy = FieldPolicy::builder("transactions")
///     .filterable(["type", "amount", "description", "date"])
///     .date_fields(["date"])
///     .like_fields(["description"])
///     .build();
///
/// assert_eq!(policy.kind_of("description"), FieldKind::Like);
/// assert_eq!(policy.kind_of("amount"), FieldKind::Default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PolicyDocument")]
pub struct FieldPolicy {
    table: String,
    filterable: HashSet<String>,
    kinds: HashMap<String, FieldKind>,
    types: HashMap<String, ValueType>,
    gate: AllowListGate,
    strict_operators: bool,
    max_value_length: usize,
}

impl FieldPolicy {
    #[must_use]
    pub fn builder(table: impl Into<String>) -> PolicyBuilder {
        PolicyBuilder::new(table)
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether `field` is on the allow-list
    #[must_use]
    pub fn is_filterable(&self, field: &str) -> bool {
        self.filterable.contains(field)
    }

    #[must_use]
    pub fn kind_of(&self, field: &str) -> FieldKind {
        self.kinds.get(field).copied().unwrap_or(FieldKind::Default)
    }

    /// Fields resolved to `kind`, sorted by name. `Default` lists the
    /// allow-listed fields without a special category.
    #[must_use]
    pub fn fields_of_kind(&self, kind: FieldKind) -> Vec<&str> {
        let mut fields: Vec<&str> = match kind {
            FieldKind::Default => self
                .filterable
                .iter()
                .filter(|field| !self.kinds.contains_key(*field))
                .map(String::as_str)
                .collect(),
            _ => self
                .kinds
                .iter()
                .filter(|(_, k)| **k == kind)
                .map(|(field, _)| field.as_str())
                .collect(),
        };
        fields.sort_unstable();
        fields
    }

    #[must_use]
    pub fn gate(&self) -> AllowListGate {
        self.gate
    }

    /// Reject unknown date operators instead of dropping them
    #[must_use]
    pub fn strict_operators(&self) -> bool {
        self.strict_operators
    }

    #[must_use]
    pub fn max_value_length(&self) -> usize {
        self.max_value_length
    }

    /// Declared storage type of `field`. Untyped fields bind values as given.
    #[must_use]
    pub fn value_type(&self, field: &str) -> Option<ValueType> {
        self.types.get(field).copied()
    }
}

/// Builder for [`FieldPolicy`].
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    table: String,
    filterable: Vec<String>,
    bool_fields: Vec<String>,
    date_fields: Vec<String>,
    like_fields: Vec<String>,
    types: HashMap<String, ValueType>,
    gate: AllowListGate,
    strict_operators: bool,
    max_value_length: usize,
}

impl PolicyBuilder {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filterable: Vec::new(),
            bool_fields: Vec::new(),
            date_fields: Vec::new(),
            like_fields: Vec::new(),
            types: HashMap::new(),
            gate: AllowListGate::default(),
            strict_operators: false,
            max_value_length: MAX_FIELD_VALUE_LENGTH,
        }
    }

    #[must_use]
    pub fn filterable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn bool_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bool_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn date_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn like_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.like_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Storage types used to bind equality and membership values
    #[must_use]
    pub fn value_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = (S, ValueType)>,
        S: Into<String>,
    {
        self.types
            .extend(types.into_iter().map(|(field, ty)| (field.into(), ty)));
        self
    }

    #[must_use]
    pub fn gate(mut self, gate: AllowListGate) -> Self {
        self.gate = gate;
        self
    }

    #[must_use]
    pub fn strict_operators(mut self, strict: bool) -> Self {
        self.strict_operators = strict;
        self
    }

    #[must_use]
    pub fn max_value_length(mut self, max: usize) -> Self {
        self.max_value_length = max;
        self
    }

    #[must_use]
    pub fn build(self) -> FieldPolicy {
        let mut kinds = HashMap::new();
        let categories = [
            (self.bool_fields, FieldKind::Bool),
            (self.date_fields, FieldKind::Date),
            (self.like_fields, FieldKind::Like),
        ];
        for (fields, kind) in categories {
            for field in fields {
                kinds.entry(field).or_insert(kind);
            }
        }

        FieldPolicy {
            table: self.table,
            filterable: self.filterable.into_iter().collect(),
            kinds,
            types: self.types,
            gate: self.gate,
            strict_operators: self.strict_operators,
            max_value_length: self.max_value_length,
        }
    }
}

/// Serialized form of a policy, e.g. loaded from a JSON settings file.
#[derive(Debug, Deserialize)]
struct PolicyDocument {
    table: String,
    #[serde(default)]
    filterable: Vec<String>,
    #[serde(default, rename = "bool")]
    bool_fields: Vec<String>,
    #[serde(default, rename = "date")]
    date_fields: Vec<String>,
    #[serde(default, rename = "like")]
    like_fields: Vec<String>,
    #[serde(default)]
    types: HashMap<String, ValueType>,
    #[serde(default)]
    gate: AllowListGate,
    #[serde(default)]
    strict_operators: bool,
    max_value_length: Option<usize>,
}

impl From<PolicyDocument> for FieldPolicy {
    fn from(doc: PolicyDocument) -> Self {
        PolicyBuilder::new(doc.table)
            .filterable(doc.filterable)
            .bool_fields(doc.bool_fields)
            .date_fields(doc.date_fields)
            .like_fields(doc.like_fields)
            .value_types(doc.types)
            .gate(doc.gate)
            .strict_operators(doc.strict_operators)
            .max_value_length(doc.max_value_length.unwrap_or(MAX_FIELD_VALUE_LENGTH))
            .build()
    }
}
