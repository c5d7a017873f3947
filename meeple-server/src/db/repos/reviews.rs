//! Review repository.
//!
//! Home of the dynamic review query: predicate fragments built from the
//! validated filter parameters, one paged query with the comment aggregate,
//! and one count query over the same predicates. Identifiers (sort column,
//! direction) come from the closed enums in meeple-core; every literal is a
//! bound parameter.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use meeple_core::{ReviewQuery, SearchTerms};

use super::DbError;
use crate::db::DEFAULT_REVIEW_IMG_URL;

/// Full review record, as returned by single-review operations.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub review_id: i32,
    pub title: String,
    pub review_body: String,
    pub designer: Option<String>,
    pub review_img_url: String,
    pub votes: i32,
    pub category: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
}

/// Review row in the collection listing.
///
/// The listing drops `designer` and only carries `review_body` when a
/// search term asked for it, so the body is optional and omitted from the
/// payload when absent.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub review_id: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_body: Option<String>,
    pub review_img_url: String,
    pub votes: i32,
    pub category: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
}

/// One page of reviews plus the size of the whole filtered population.
///
/// An empty page with a zero count is a valid result, not an error: the
/// filters matched nothing, or the window ran past the end.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewPage {
    pub reviews: Vec<ReviewSummary>,
    pub total_count: i64,
}

/// Fields accepted when posting a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub title: String,
    pub review_body: String,
    pub designer: Option<String>,
    pub review_img_url: Option<String>,
    pub category: String,
    pub owner: String,
}

/// A review update is exactly one of these; the route layer rejects bodies
/// that set both or neither.
#[derive(Debug, Clone)]
pub enum ReviewUpdate {
    /// Relative vote change. Negative deltas are allowed; there is no floor
    /// at zero.
    IncrementVotes(i32),
    /// Replace the body. Only the review's owner may do this.
    ReplaceBody { body: String, username: String },
}

/// WHERE fragments plus their bound values, shared verbatim between the
/// paged query and the count query.
struct Predicates {
    clauses: Vec<String>,
    binds: Vec<String>,
}

impl Predicates {
    fn build(category: Option<&str>, search: Option<&SearchTerms>) -> Self {
        let mut clauses = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(slug) = category {
            binds.push(slug.to_owned());
            clauses.push(format!("r.category = ${}", binds.len()));
        }
        if let Some(terms) = search {
            // Conjunctive: every keyword must appear somewhere in the
            // concatenated title/body/category text.
            for keyword in terms.keywords() {
                binds.push(like_pattern(keyword));
                clauses.push(format!(
                    "(r.title || ' ' || r.review_body || ' ' || r.category) ILIKE ${}",
                    binds.len()
                ));
            }
        }

        Self { clauses, binds }
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

/// Wrap a keyword in `%` wildcards, escaping LIKE metacharacters so the
/// match stays a plain substring test.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

const SUMMARY_COLUMNS: &str =
    "r.review_id, r.title, r.review_img_url, r.votes, r.category, r.owner, r.created_at";

/// The paged query: summary columns, the comment aggregate, the shared
/// predicates, and the validated sort and window. Ordering is single-key;
/// rows with equal sort values keep an unspecified relative order.
fn paged_sql(preds: &Predicates, query: &ReviewQuery, with_body: bool) -> String {
    let body_column = if with_body { ", r.review_body" } else { "" };
    format!(
        "SELECT {SUMMARY_COLUMNS}{body_column}, COUNT(c.comment_id) AS comment_count \
         FROM reviews r \
         LEFT JOIN comments c ON c.review_id = r.review_id\
         {} \
         GROUP BY r.review_id \
         ORDER BY {} {} \
         LIMIT ${} OFFSET ${}",
        preds.where_clause(),
        query.sort_by.sql_expr(),
        query.order.as_sql(),
        preds.binds.len() + 1,
        preds.binds.len() + 2,
    )
}

/// The count query: same predicates, no join, no sort, no window.
fn count_sql(preds: &Predicates) -> String {
    format!(
        "SELECT COUNT(DISTINCT r.review_id) AS total FROM reviews r{}",
        preds.where_clause()
    )
}

fn review_from_row(row: &PgRow) -> Review {
    Review {
        review_id: row.get("review_id"),
        title: row.get("title"),
        review_body: row.get("review_body"),
        designer: row.get("designer"),
        review_img_url: row.get("review_img_url"),
        votes: row.get("votes"),
        category: row.get("category"),
        owner: row.get("owner"),
        created_at: row.get("created_at"),
        comment_count: row.get("comment_count"),
    }
}

fn not_found(review_id: i32) -> DbError {
    DbError::NotFound {
        resource: "review_id",
        id: review_id.to_string(),
    }
}

/// Review repository
pub struct ReviewRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List reviews under the validated filter/sort/pagination parameters.
    ///
    /// Issues two independent round trips sharing the same predicates and
    /// bind values: the paged rows, then the total matching population
    /// ignoring the window.
    pub async fn list(&self, query: &ReviewQuery) -> Result<ReviewPage, DbError> {
        let preds = Predicates::build(query.category.as_deref(), query.search.as_ref());
        let with_body = query.search.is_some();

        let sql = paged_sql(&preds, query, with_body);
        let mut paged = sqlx::query(&sql);
        for value in &preds.binds {
            paged = paged.bind(value);
        }
        let rows = paged
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(self.pool)
            .await?;

        let sql = count_sql(&preds);
        let mut count = sqlx::query(&sql);
        for value in &preds.binds {
            count = count.bind(value);
        }
        let total_count: i64 = count.fetch_one(self.pool).await?.get("total");

        let reviews = rows
            .into_iter()
            .map(|row| ReviewSummary {
                review_id: row.get("review_id"),
                title: row.get("title"),
                review_body: if with_body {
                    Some(row.get("review_body"))
                } else {
                    None
                },
                review_img_url: row.get("review_img_url"),
                votes: row.get("votes"),
                category: row.get("category"),
                owner: row.get("owner"),
                created_at: row.get("created_at"),
                comment_count: row.get("comment_count"),
            })
            .collect();

        Ok(ReviewPage {
            reviews,
            total_count,
        })
    }

    /// Fetch one review with its comment count.
    pub async fn get(&self, review_id: i32) -> Result<Review, DbError> {
        sqlx::query(
            r#"
            SELECT r.review_id, r.title, r.review_body, r.designer, r.review_img_url,
                   r.votes, r.category, r.owner, r.created_at,
                   COUNT(c.comment_id) AS comment_count
            FROM reviews r
            LEFT JOIN comments c ON c.review_id = r.review_id
            WHERE r.review_id = $1
            GROUP BY r.review_id
            "#,
        )
        .bind(review_id)
        .fetch_optional(self.pool)
        .await?
        .map(|row| review_from_row(&row))
        .ok_or_else(|| not_found(review_id))
    }

    /// Insert a review. A missing category or owner surfaces as
    /// `MissingReference` through the shared constraint translation.
    pub async fn create(&self, new: NewReview) -> Result<Review, DbError> {
        let img_url = new
            .review_img_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_REVIEW_IMG_URL);

        // A fresh review cannot have comments yet
        let row = sqlx::query(
            r#"
            INSERT INTO reviews (title, review_body, designer, review_img_url, category, owner)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING review_id, title, review_body, designer, review_img_url,
                      votes, category, owner, created_at, 0::bigint AS comment_count
            "#,
        )
        .bind(&new.title)
        .bind(&new.review_body)
        .bind(new.designer.as_deref())
        .bind(img_url)
        .bind(&new.category)
        .bind(&new.owner)
        .fetch_one(self.pool)
        .await?;

        Ok(review_from_row(&row))
    }

    /// Atomic relative vote change.
    ///
    /// A single UPDATE, so concurrent increments compose without an
    /// application-level read-modify-write.
    pub async fn increment_votes(&self, review_id: i32, delta: i32) -> Result<Review, DbError> {
        sqlx::query(
            r#"
            UPDATE reviews
            SET votes = votes + $1
            WHERE review_id = $2
            RETURNING review_id, title, review_body, designer, review_img_url,
                      votes, category, owner, created_at,
                      (SELECT COUNT(*) FROM comments c
                       WHERE c.review_id = reviews.review_id) AS comment_count
            "#,
        )
        .bind(delta)
        .bind(review_id)
        .fetch_optional(self.pool)
        .await?
        .map(|row| review_from_row(&row))
        .ok_or_else(|| not_found(review_id))
    }

    /// Replace the review body. Ownership is checked in the route layer;
    /// the write itself is last-writer-wins.
    pub async fn replace_body(&self, review_id: i32, body: &str) -> Result<Review, DbError> {
        sqlx::query(
            r#"
            UPDATE reviews
            SET review_body = $1
            WHERE review_id = $2
            RETURNING review_id, title, review_body, designer, review_img_url,
                      votes, category, owner, created_at,
                      (SELECT COUNT(*) FROM comments c
                       WHERE c.review_id = reviews.review_id) AS comment_count
            "#,
        )
        .bind(body)
        .bind(review_id)
        .fetch_optional(self.pool)
        .await?
        .map(|row| review_from_row(&row))
        .ok_or_else(|| not_found(review_id))
    }

    /// Delete a review; its comments cascade at the storage layer.
    pub async fn delete(&self, review_id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(review_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meeple_core::{Pagination, SortKey, SortOrder};

    fn query_with(category: Option<&str>, search: Option<&str>) -> ReviewQuery {
        ReviewQuery {
            sort_by: SortKey::default(),
            order: SortOrder::default(),
            category: category.map(str::to_owned),
            search: search.and_then(SearchTerms::parse),
            page: Pagination::default(),
        }
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("fun"), "%fun%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("under_score"), "%under\\_score%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }

    #[test]
    fn no_filter_means_no_where_clause() {
        let preds = Predicates::build(None, None);
        assert_eq!(preds.where_clause(), "");
        assert!(preds.binds.is_empty());
    }

    #[test]
    fn category_predicate_is_bound_not_interpolated() {
        let preds = Predicates::build(Some("euro game'; DROP TABLE reviews; --"), None);
        assert_eq!(preds.where_clause(), " WHERE r.category = $1");
        assert_eq!(preds.binds, ["euro game'; DROP TABLE reviews; --"]);
    }

    #[test]
    fn keywords_chain_conjunctively_after_category() {
        let terms = SearchTerms::parse("fun farm").unwrap();
        let preds = Predicates::build(Some("euro game"), Some(&terms));

        assert_eq!(
            preds.where_clause(),
            " WHERE r.category = $1 \
             AND (r.title || ' ' || r.review_body || ' ' || r.category) ILIKE $2 \
             AND (r.title || ' ' || r.review_body || ' ' || r.category) ILIKE $3"
        );
        assert_eq!(preds.binds, ["euro game", "%fun%", "%farm%"]);
    }

    #[test]
    fn paged_sql_numbers_window_after_predicates() {
        let query = query_with(Some("euro game"), Some("fun farm"));
        let preds = Predicates::build(query.category.as_deref(), query.search.as_ref());
        let sql = paged_sql(&preds, &query, true);
        assert!(sql.contains("LIMIT $4 OFFSET $5"), "{sql}");
    }

    #[test]
    fn paged_sql_defaults_to_created_at_desc() {
        let query = query_with(None, None);
        let preds = Predicates::build(None, None);
        let sql = paged_sql(&preds, &query, false);
        assert!(sql.contains("ORDER BY r.created_at DESC"), "{sql}");
        assert!(sql.contains("LIMIT $1 OFFSET $2"), "{sql}");
    }

    #[test]
    fn paged_sql_projects_body_only_for_searches() {
        let query = query_with(None, None);
        let preds = Predicates::build(None, None);
        assert!(!paged_sql(&preds, &query, false).contains("review_body"));

        let query = query_with(None, Some("fun"));
        let preds = Predicates::build(None, query.search.as_ref());
        let sql = paged_sql(&preds, &query, true);
        assert!(sql.contains(", r.review_body,"), "{sql}");
    }

    #[test]
    fn every_sort_key_produces_a_valid_order_clause() {
        let preds = Predicates::build(None, None);
        for sort_by in SortKey::ALL {
            let query = ReviewQuery {
                sort_by,
                order: SortOrder::Asc,
                category: None,
                search: None,
                page: Pagination::default(),
            };
            let sql = paged_sql(&preds, &query, false);
            assert!(
                sql.contains(&format!("ORDER BY {} ASC", sort_by.sql_expr())),
                "{sql}"
            );
        }
    }

    #[test]
    fn count_sql_shares_predicates_and_ignores_window() {
        let terms = SearchTerms::parse("fun").unwrap();
        let preds = Predicates::build(Some("euro game"), Some(&terms));
        let sql = count_sql(&preds);

        assert!(sql.contains("COUNT(DISTINCT r.review_id)"), "{sql}");
        assert!(sql.contains("WHERE r.category = $1"), "{sql}");
        assert!(!sql.contains("ORDER BY"), "{sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p meeple-server -- --ignored --test-threads=1

    async fn seeded_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");
        crate::db::seed::run(&pool).await.expect("seed");
        pool
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn total_count_ignores_the_window() {
        let pool = seeded_pool().await;
        let repo = ReviewRepo::new(&pool);

        let all = repo.list(&query_with(None, None)).await.expect("list");
        let mut query = query_with(None, None);
        query.page = Pagination { limit: 2, p: 1 };
        let page = repo.list(&query).await.expect("page");

        assert_eq!(page.reviews.len(), 2);
        assert_eq!(page.total_count, all.total_count);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn window_past_the_end_is_empty_not_an_error() {
        let pool = seeded_pool().await;
        let repo = ReviewRepo::new(&pool);

        let mut query = query_with(None, None);
        query.page = Pagination { limit: 10, p: 99 };
        let page = repo.list(&query).await.expect("list");

        assert!(page.reviews.is_empty());
        assert!(page.total_count > 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn vote_increments_compose() {
        let pool = seeded_pool().await;
        let repo = ReviewRepo::new(&pool);

        let base = repo.get(1).await.expect("get").votes;
        repo.increment_votes(1, 3).await.expect("inc");
        let after = repo.increment_votes(1, -10).await.expect("dec");

        assert_eq!(after.votes, base - 7);
    }
}
