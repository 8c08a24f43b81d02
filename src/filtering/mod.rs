//! # Query Filtering
//!
//! Translates the decoded query parameters of a listing endpoint into
//! parameterized predicates on a Sea-ORM query, under a per-table
//! [`FieldPolicy`].
//!
//! ## Field categories
//!
//! | Category | Example | Predicate |
//! |---|---|---|
//! | bool | `is_active=1` | `table.is_active = true` |
//! | date | `date=after:2024-01-01` | `DATE(table.date) >= '2024-01-01'` |
//! | like | `description=rent` | `table.description LIKE '%rent%'` |
//! | default, scalar | `type=debt` | `table.type = 'debt'` |
//! | default, list | `type[]=debt&type[]=gifts` | `table.type IN ('debt', 'gifts')` |
//!
//! Fields outside the allow-list and empty values are dropped silently.
//! Unparsable dates are the only hard failure.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let engine = FilterEngine::new(transaction::Entity::field_policy());
//! let filters = parse_query_string("description=rent&date[after]=2024-01-01");
//! let rows = engine
//!     .apply(transaction::Entity::find(), &filters)?
//!     .all(&db)
//!     .await?;
//! ```

pub mod date;
pub mod engine;
pub mod policy;
pub mod predicate;
pub mod query_string;
pub mod sea;
pub mod value;

pub use date::{DateExpression, DateOperator, OperatorToken, parse_date_text};
pub use engine::FilterEngine;
pub use policy::{AllowListGate, FieldKind, FieldPolicy, MAX_FIELD_VALUE_LENGTH, PolicyBuilder};
pub use predicate::{ColumnRef, DateComparison, Predicate, QueryBuilder, ScalarValue, ValueType};
pub use query_string::{decode_filters, parse_filter_json, parse_query_string};
pub use value::{FilterValue, RawFilters};
