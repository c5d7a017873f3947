//! Comment repository.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::DbError;

/// Comment record from database
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub comment_id: i32,
    pub author: String,
    pub review_id: i32,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
    pub body: String,
}

const COMMENT_COLUMNS: &str = "comment_id, author, review_id, votes, created_at, body";

fn comment_from_row(row: &PgRow) -> Comment {
    Comment {
        comment_id: row.get("comment_id"),
        author: row.get("author"),
        review_id: row.get("review_id"),
        votes: row.get("votes"),
        created_at: row.get("created_at"),
        body: row.get("body"),
    }
}

fn not_found(comment_id: i32) -> DbError {
    DbError::NotFound {
        resource: "comment_id",
        id: comment_id.to_string(),
    }
}

/// Comment repository
pub struct CommentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List comments for a review, newest first.
    ///
    /// An empty result is ambiguous between "review has no comments" and
    /// "review does not exist"; only then is the parent checked, so the
    /// common path stays a single round trip.
    pub async fn list_for_review(&self, review_id: i32) -> Result<Vec<Comment>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE review_id = $1 ORDER BY created_at DESC"
        ))
        .bind(review_id)
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            let exists: (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM reviews WHERE review_id = $1)")
                    .bind(review_id)
                    .fetch_one(self.pool)
                    .await?;
            if !exists.0 {
                return Err(DbError::NotFound {
                    resource: "review_id",
                    id: review_id.to_string(),
                });
            }
        }

        Ok(rows.iter().map(comment_from_row).collect())
    }

    /// Insert a comment. A missing review or author surfaces as
    /// `MissingReference` through the shared constraint translation.
    pub async fn create(
        &self,
        review_id: i32,
        author: &str,
        body: &str,
    ) -> Result<Comment, DbError> {
        let row = sqlx::query(&format!(
            "INSERT INTO comments (author, review_id, body) \
             VALUES ($1, $2, $3) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(author)
        .bind(review_id)
        .bind(body)
        .fetch_one(self.pool)
        .await?;

        Ok(comment_from_row(&row))
    }

    /// Atomic relative vote change, same contract as review votes.
    pub async fn increment_votes(&self, comment_id: i32, delta: i32) -> Result<Comment, DbError> {
        sqlx::query(&format!(
            "UPDATE comments SET votes = votes + $1 \
             WHERE comment_id = $2 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(delta)
        .bind(comment_id)
        .fetch_optional(self.pool)
        .await?
        .map(|row| comment_from_row(&row))
        .ok_or_else(|| not_found(comment_id))
    }

    /// Delete a comment.
    pub async fn delete(&self, comment_id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(comment_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");
        crate::db::seed::run(&pool).await.expect("seed");
        pool
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn commentless_review_is_empty_not_missing() {
        let pool = seeded_pool().await;
        let repo = CommentRepo::new(&pool);

        // Review 5 is seeded without comments
        let comments = repo.list_for_review(5).await.expect("list");
        assert!(comments.is_empty());

        let err = repo.list_for_review(99999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "review_id", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_author_is_a_missing_reference() {
        let pool = seeded_pool().await;
        let err = CommentRepo::new(&pool)
            .create(1, "nobody", "great game")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingReference { reference: "username" }));
    }
}
