//! Database migrations for the review platform tables.
//!
//! Everything is `CREATE ... IF NOT EXISTS`, so running at every startup is
//! safe. Text sort columns carry `COLLATE "C"` so ORDER BY agrees with
//! Rust's byte-wise string comparison. Foreign keys are named explicitly;
//! the error translator keys its messages off those names.

use sqlx::PgPool;

use super::DEFAULT_REVIEW_IMG_URL;

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            slug VARCHAR(255) COLLATE "C" PRIMARY KEY,
            description TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username VARCHAR(255) COLLATE "C" PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            avatar_url VARCHAR(255)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            review_id SERIAL PRIMARY KEY,
            title VARCHAR(255) COLLATE "C" NOT NULL,
            review_body TEXT NOT NULL,
            designer VARCHAR(255),
            review_img_url VARCHAR(255) COLLATE "C" NOT NULL DEFAULT '{DEFAULT_REVIEW_IMG_URL}',
            votes INTEGER NOT NULL DEFAULT 0,
            category VARCHAR(255) COLLATE "C" NOT NULL,
            owner VARCHAR(255) COLLATE "C" NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT reviews_category_fkey FOREIGN KEY (category)
                REFERENCES categories(slug) ON DELETE CASCADE,
            CONSTRAINT reviews_owner_fkey FOREIGN KEY (owner)
                REFERENCES users(username) ON DELETE CASCADE
        )
        "#,
    ))
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            comment_id SERIAL PRIMARY KEY,
            author VARCHAR(255) NOT NULL,
            review_id INT NOT NULL,
            votes INT NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            body TEXT NOT NULL,
            CONSTRAINT comments_review_id_fkey FOREIGN KEY (review_id)
                REFERENCES reviews(review_id) ON DELETE CASCADE,
            CONSTRAINT comments_author_fkey FOREIGN KEY (author)
                REFERENCES users(username) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_category ON reviews(category)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_created ON reviews(created_at DESC)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_comments_review ON comments(review_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_are_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");

        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
