//! # Error Handling
//!
//! Two layers of errors live here:
//!
//! - [`FilterError`]: raised by the filter engine when a filter value cannot be
//!   turned into a predicate (an unparsable date, or an unknown date operator
//!   when the policy asks for strict operators).
//! - [`ApiError`]: what listing handlers return. It maps filter errors to
//!   `400 Bad Request` and database errors to a sanitized `500`.
//!
//! Fields that are not filterable are never an error; the engine drops them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coinbook::{ApiError, extract::Filters, traits::FilterableResource};
//!
//! async fn list_transactions(
//!     State(db): State<DatabaseConnection>,
//!     Filters(filters): Filters,
//! ) -> Result<Json<Vec<transaction::Model>>, ApiError> {
//!     let rows = transaction::Entity::list_filtered(&db, user_id, &filters).await?;
//!     Ok(Json(rows))
//! }
//! ```
//!
//! Database errors are logged with `tracing`; install a subscriber in your
//! application to see them.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

/// Failure to translate one filter value into predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Date text could not be parsed into a calendar date
    InvalidDate {
        /// Filter key the value was supplied for
        field: String,
        /// The offending text
        input: String,
    },
    /// A date operator outside `before`, `until`, `after`, `since`, `on`
    /// (only raised when the policy enables strict operators)
    UnknownOperator {
        /// Filter key the value was supplied for
        field: String,
        /// The operator token as received
        operator: String,
    },
}

impl FilterError {
    #[must_use]
    pub fn invalid_date(field: impl Into<String>, input: impl Into<String>) -> Self {
        Self::InvalidDate {
            field: field.into(),
            input: input.into(),
        }
    }

    #[must_use]
    pub fn unknown_operator(field: impl Into<String>, operator: impl Into<String>) -> Self {
        Self::UnknownOperator {
            field: field.into(),
            operator: operator.into(),
        }
    }

    /// The filter key this error concerns
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidDate { field, .. } | Self::UnknownOperator { field, .. } => field,
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDate { field, input } => {
                write!(f, "Invalid date '{input}' for filter '{field}'")
            }
            Self::UnknownOperator { field, operator } => {
                write!(f, "Unknown date operator '{operator}' for filter '{field}'")
            }
        }
    }
}

impl std::error::Error for FilterError {}

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - Invalid input from user
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 500 Internal Server Error - Database error (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// The database error details are logged but NOT sent to the user.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message } | Self::Database { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::BadRequest { message } => {
                tracing::debug!(
                    error = %message,
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Malformed filters are the client's fault: 400 with the filter message.
impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_message() {
        let err = FilterError::invalid_date("date", "not-a-date");
        assert_eq!(err.field(), "date");
        assert_eq!(err.to_string(), "Invalid date 'not-a-date' for filter 'date'");
    }

    #[test]
    fn test_unknown_operator_message() {
        let err = FilterError::unknown_operator("date", "around");
        assert_eq!(
            err.to_string(),
            "Unknown date operator 'around' for filter 'date'"
        );
    }

    #[test]
    fn test_filter_error_becomes_bad_request() {
        let api_err: ApiError = FilterError::invalid_date("date", "soon").into();
        assert_eq!(api_err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(api_err.user_message(), "Invalid date 'soon' for filter 'date'");
    }

    #[test]
    fn test_dberr_is_sanitized() {
        let api_err: ApiError = DbErr::Custom("connection reset by peer".to_string()).into();
        assert_eq!(api_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.user_message(), "A database error occurred");
    }

    #[tokio::test]
    async fn test_bad_request_response_body() {
        let response = ApiError::from(FilterError::invalid_date("date", "soon")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Invalid date 'soon' for filter 'date'"}));
    }

    #[tokio::test]
    async fn test_database_response_hides_details() {
        let response = ApiError::from(DbErr::Custom("password=hunter2".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("hunter2"), "{text}");
        assert!(text.contains("A database error occurred"), "{text}");
    }
}
