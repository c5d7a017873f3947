//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Parameterized queries only; SQL identifiers come from closed enums
//! - JOINs for aggregate counts (no N+1)
//! - Constraint violations are translated by constraint name

pub mod categories;
pub mod comments;
pub mod reviews;
pub mod users;

pub use categories::{Category, CategoryRepo};
pub use comments::{Comment, CommentRepo};
pub use reviews::{NewReview, Review, ReviewPage, ReviewRepo, ReviewSummary, ReviewUpdate};
pub use users::{User, UserRepo, UserSummary};

/// Database error type.
///
/// `From<sqlx::Error>` performs the storage half of error translation:
/// foreign-key violations become `MissingReference` keyed by the violated
/// constraint, unique violations become `Conflict`, and the SQLSTATE classes
/// raised by malformed values become `Malformed`. Anything else stays `Sqlx`
/// and renders as an internal failure.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("{resource} not exists")]
    NotFound { resource: &'static str, id: String },

    #[error("{reference} not exists")]
    MissingReference { reference: &'static str },

    #[error("{resource} already exists")]
    Conflict { resource: &'static str },

    #[error("Bad request")]
    Malformed,
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        let translated = e.as_database_error().and_then(|db| match db.code().as_deref() {
            Some("23503") => db
                .constraint()
                .and_then(reference_for_constraint)
                .map(|reference| DbError::MissingReference { reference }),
            Some("23505") => db
                .constraint()
                .and_then(resource_for_unique_constraint)
                .map(|resource| DbError::Conflict { resource }),
            Some("22P02" | "23502" | "2201W" | "2201X") => Some(DbError::Malformed),
            _ => None,
        });
        translated.unwrap_or(DbError::Sqlx(e))
    }
}

/// Map a violated foreign-key constraint to the reference reported missing.
fn reference_for_constraint(name: &str) -> Option<&'static str> {
    match name {
        "reviews_category_fkey" => Some("category"),
        "reviews_owner_fkey" | "comments_author_fkey" => Some("username"),
        "comments_review_id_fkey" => Some("review_id"),
        _ => None,
    }
}

/// Map a violated unique constraint to the resource that already exists.
fn resource_for_unique_constraint(name: &str) -> Option<&'static str> {
    match name {
        "categories_pkey" => Some("category"),
        "users_pkey" => Some("username"),
        _ => None,
    }
}
