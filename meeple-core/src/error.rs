//! Structured validation errors for meeple-core.
//!
//! Uses `thiserror` for better API surface and error composition. The HTTP
//! layer renders every variant as a 400-class response; none of these carry
//! storage detail.

use thiserror::Error;

/// Parameter validation failure.
///
/// Raised before any storage statement executes, so a failed validation
/// never leaves partial side effects behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `sort_by` is not one of the sortable review fields
    #[error("cannot sort reviews by '{value}'")]
    UnknownSortKey { value: String },

    /// `order` is neither `asc` nor `desc`
    #[error("order must be 'asc' or 'desc', got '{value}'")]
    UnknownOrder { value: String },

    /// `limit` or `p` is present but not a positive integer
    #[error("{field} must be a positive integer, got '{value}'")]
    InvalidPagination { field: &'static str, value: String },

    /// A path identifier that should be numeric is not
    #[error("{field} must be a number, got '{value}'")]
    MalformedId { field: &'static str, value: String },

    /// A required request-body field is absent
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    /// Field is empty when it shouldn't be
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A review update must set exactly one of its mutually exclusive fields
    #[error("update must set exactly one of 'inc_votes' or 'review_body'")]
    AmbiguousUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::UnknownSortKey {
            value: "designer; DROP TABLE reviews".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot sort reviews by 'designer; DROP TABLE reviews'"
        );

        let err = ValidationError::InvalidPagination {
            field: "limit",
            value: "".into(),
        };
        assert_eq!(err.to_string(), "limit must be a positive integer, got ''");
    }
}
