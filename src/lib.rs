//! # coinbook
//!
//! Request filtering for the listing endpoints of a personal-finance
//! bookkeeping API. Users record transactions against balances; listing
//! endpoints accept filters such as
//!
//! ```text
//! GET /transactions?description=groceries&date=after:2024-01-01
//! GET /transactions?type[]=debt&type[]=gifts&date[start]=2024-01-01&date[end]=2024-02-08
//! ```
//!
//! which are translated into parameterized Sea-ORM predicates under a
//! per-table [`FieldPolicy`](filtering::FieldPolicy).

pub mod entities;
pub mod errors;
pub mod extract;
pub mod filtering;
pub mod traits;

pub use errors::{ApiError, FilterError};
pub use extract::Filters;
pub use filtering::{FieldPolicy, FilterEngine, RawFilters};
pub use traits::FilterableResource;
