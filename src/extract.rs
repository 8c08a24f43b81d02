//! Axum extractor for request filters.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::filtering::{RawFilters, decode_filters};

/// Filters decoded from the request query string.
///
/// Accepts bracket notation (`type[]=a&date[start]=...`) or a JSON-encoded
/// `filter` parameter. A request without a query yields no filters.
///
/// ```rust,ignore
/// async fn list(Filters(filters): Filters) -> ... {
///     engine.apply(Entity::find(), &filters)?
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters(pub RawFilters);

impl<S> FromRequestParts<S> for Filters
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.uri.query().map(decode_filters).unwrap_or_default()))
    }
}
