//! Category repository.

use serde::Serialize;
use sqlx::{PgPool, Row};

use super::DbError;

/// Category record from database
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub slug: String,
    pub description: String,
}

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, ordered by slug.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let rows = sqlx::query("SELECT slug, description FROM categories ORDER BY slug")
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Category {
                slug: row.get("slug"),
                description: row.get("description"),
            })
            .collect())
    }

    /// Check a slug against the live category set.
    pub async fn exists(&self, slug: &str) -> Result<bool, DbError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool)
                .await?;
        Ok(exists.0)
    }

    /// Insert a category. A duplicate slug surfaces as `Conflict`.
    pub async fn create(&self, slug: &str, description: &str) -> Result<Category, DbError> {
        let row = sqlx::query(
            "INSERT INTO categories (slug, description) \
             VALUES ($1, $2) RETURNING slug, description",
        )
        .bind(slug)
        .bind(description)
        .fetch_one(self.pool)
        .await?;

        Ok(Category {
            slug: row.get("slug"),
            description: row.get("description"),
        })
    }
}
