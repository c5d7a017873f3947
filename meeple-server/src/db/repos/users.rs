//! User repository.

use serde::Serialize;
use sqlx::{PgPool, Row};

use super::DbError;

/// User record from database
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Listing entry; the collection endpoint exposes usernames only.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub username: String,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All usernames, ordered.
    pub async fn list(&self) -> Result<Vec<UserSummary>, DbError> {
        let rows = sqlx::query("SELECT username FROM users ORDER BY username")
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserSummary {
                username: row.get("username"),
            })
            .collect())
    }

    /// Fetch one user.
    pub async fn get(&self, username: &str) -> Result<User, DbError> {
        sqlx::query("SELECT username, name, avatar_url FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool)
            .await?
            .map(|row| User {
                username: row.get("username"),
                name: row.get("name"),
                avatar_url: row.get("avatar_url"),
            })
            .ok_or_else(|| DbError::NotFound {
                resource: "username",
                id: username.to_owned(),
            })
    }

    /// Insert a user. A duplicate username surfaces as `Conflict`.
    pub async fn create(
        &self,
        username: &str,
        name: &str,
        avatar_url: Option<&str>,
    ) -> Result<User, DbError> {
        let row = sqlx::query(
            "INSERT INTO users (username, name, avatar_url) \
             VALUES ($1, $2, $3) RETURNING username, name, avatar_url",
        )
        .bind(username)
        .bind(name)
        .bind(avatar_url)
        .fetch_one(self.pool)
        .await?;

        Ok(User {
            username: row.get("username"),
            name: row.get("name"),
            avatar_url: row.get("avatar_url"),
        })
    }
}
