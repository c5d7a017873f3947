//! Development seed data.
//!
//! Wipes the four tables and loads a small board-game data set inside one
//! transaction. Strictly a development and test convenience; never runs
//! unless asked for.

use sqlx::PgPool;

const CATEGORIES: &[(&str, &str)] = &[
    ("dexterity", "Games testing steady hands and good aim"),
    ("euro game", "Resource management and point salads, light on luck"),
    // No seeded reviews reference this one; it exercises the
    // real-but-empty-category path.
    ("push-your-luck", "Press on for bigger rewards or bust"),
    ("social deduction", "Players try to uncover each other's hidden roles"),
];

const USERS: &[(&str, &str, &str)] = &[
    (
        "cubepusher",
        "Iris Chen",
        "https://example.com/avatars/cubepusher.png",
    ),
    (
        "dicepriest",
        "Teo Alvarez",
        "https://example.com/avatars/dicepriest.png",
    ),
    (
        "meeplequeen",
        "Nora Stein",
        "https://example.com/avatars/meeplequeen.png",
    ),
    (
        "tokenhoard",
        "Sam Whittle",
        "https://example.com/avatars/tokenhoard.png",
    ),
];

// (title, body, designer, category, owner, votes, days_ago)
// days_ago staggers created_at so time-ordered listings are deterministic
const REVIEWS: &[(&str, &str, &str, &str, &str, i32, i32)] = &[
    (
        "Harvest Valley",
        "Feed your family, plough your fields, and somehow end up with more \
         fences than sheep. A worker placement classic that punishes greed \
         gently and rewards planning handsomely.",
        "Marta Keller",
        "euro game",
        "meeplequeen",
        5,
        12,
    ),
    (
        "Canal Barons",
        "Route building along eighteenth-century waterways. The fun is in the \
         loans: every turn you are one bad contract away from ruin.",
        "Pieter Vos",
        "euro game",
        "cubepusher",
        12,
        10,
    ),
    (
        "Wobble Keep",
        "Stack the castle, flick the catapult, hope for the best. Our table \
         lost a tower to a sneeze and nobody regretted a thing.",
        "Ana Duarte",
        "dexterity",
        "dicepriest",
        8,
        8,
    ),
    (
        "The Last Envoy",
        "One of you is lying about the treaty. Five rounds of pointed fingers \
         and broken alliances; fun with the right crowd, brutal with family.",
        "Jon Halvorsen",
        "social deduction",
        "tokenhoard",
        3,
        5,
    ),
    (
        "Gran Bazaar",
        "Trade spices, bribe inspectors, corner the silk market. A fun euro \
         engine dressed up as a haggling contest.",
        "Marta Keller",
        "euro game",
        "meeplequeen",
        0,
        3,
    ),
    (
        "Midnight Signal",
        "Werewolves by radio: everyone hears the broadcasts, nobody knows the \
         sender. Deduction with an atmosphere thick enough to cut.",
        "Sofia Marsh",
        "social deduction",
        "dicepriest",
        7,
        1,
    ),
];

// (author, review_id, body, votes)
const COMMENTS: &[(&str, i32, &str, i32)] = &[
    ("dicepriest", 1, "Sold my copy after one game. Regretted it for years.", 4),
    ("tokenhoard", 1, "The sheep economy is broken and I love it.", 1),
    ("meeplequeen", 3, "We play this standing up now. House rule.", 6),
    ("cubepusher", 4, "Never trust anyone who claims the envoy role early.", 2),
    ("tokenhoard", 2, "Took three loans on turn two. Do not recommend. 10/10.", 9),
];

/// Reset all tables and insert the sample data set.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Seeding sample data...");

    let mut tx = pool.begin().await?;

    sqlx::query("TRUNCATE categories, users, reviews, comments RESTART IDENTITY CASCADE")
        .execute(&mut *tx)
        .await?;

    for &(slug, description) in CATEGORIES {
        sqlx::query("INSERT INTO categories (slug, description) VALUES ($1, $2)")
            .bind(slug)
            .bind(description)
            .execute(&mut *tx)
            .await?;
    }

    for &(username, name, avatar_url) in USERS {
        sqlx::query("INSERT INTO users (username, name, avatar_url) VALUES ($1, $2, $3)")
            .bind(username)
            .bind(name)
            .bind(avatar_url)
            .execute(&mut *tx)
            .await?;
    }

    // review_img_url is omitted so the column default gets exercised
    for &(title, body, designer, category, owner, votes, days_ago) in REVIEWS {
        sqlx::query(
            r#"
            INSERT INTO reviews (title, review_body, designer, category, owner, votes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, now() - make_interval(days => $7))
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(designer)
        .bind(category)
        .bind(owner)
        .bind(votes)
        .bind(days_ago)
        .execute(&mut *tx)
        .await?;
    }

    for &(author, review_id, body, votes) in COMMENTS {
        sqlx::query(
            r#"
            INSERT INTO comments (author, review_id, body, votes)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(author)
        .bind(review_id)
        .bind(body)
        .bind(votes)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!("Seed complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn seed_is_rerunnable() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        run(&pool).await.expect("first seed");
        run(&pool).await.expect("second seed");

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, REVIEWS.len() as i64);
    }
}
