//! meeple-core: parameter validation and query normalization
//!
//! Holds the pieces shared between the HTTP layer and the storage layer:
//! the sortable-field whitelist, sort direction, pagination, and search-term
//! parsing. Keeping the whitelist here means the validator and the query
//! composer can never drift apart.

pub mod error;
pub mod query;

pub use error::ValidationError;
pub use query::{Pagination, ReviewQuery, ReviewQueryParams, SearchTerms, SortKey, SortOrder};
