//! Review collection query parameters.
//!
//! Normalizes the raw `?sort_by=&order=&category=&search=&limit=&p=` query
//! string into a validated [`ReviewQuery`]. The sort key and direction are the
//! only request values ever embedded into SQL text, so both are closed enums
//! here; everything else stays a bound parameter downstream.

use serde::Deserialize;

use crate::error::ValidationError;

/// Page size used when `limit` is absent.
const DEFAULT_LIMIT: i64 = 10;

/// Fields the review collection can be sorted by.
///
/// This is the whitelist the validator checks against and the only source of
/// ORDER BY identifiers for the query composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Owner,
    Title,
    ReviewId,
    Category,
    ReviewImgUrl,
    CreatedAt,
    Votes,
    CommentCount,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Owner,
        SortKey::Title,
        SortKey::ReviewId,
        SortKey::Category,
        SortKey::ReviewImgUrl,
        SortKey::CreatedAt,
        SortKey::Votes,
        SortKey::CommentCount,
    ];

    /// Parse a query-string token, rejecting anything outside the whitelist.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "owner" => Ok(Self::Owner),
            "title" => Ok(Self::Title),
            "review_id" => Ok(Self::ReviewId),
            "category" => Ok(Self::Category),
            "review_img_url" => Ok(Self::ReviewImgUrl),
            "created_at" => Ok(Self::CreatedAt),
            "votes" => Ok(Self::Votes),
            "comment_count" => Ok(Self::CommentCount),
            other => Err(ValidationError::UnknownSortKey {
                value: other.to_owned(),
            }),
        }
    }

    /// The query-string token for this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Title => "title",
            Self::ReviewId => "review_id",
            Self::Category => "category",
            Self::ReviewImgUrl => "review_img_url",
            Self::CreatedAt => "created_at",
            Self::Votes => "votes",
            Self::CommentCount => "comment_count",
        }
    }

    /// ORDER BY expression for this key.
    ///
    /// `comment_count` is the aggregate's output alias; every other key is a
    /// column of the reviews table.
    pub fn sql_expr(&self) -> &'static str {
        match self {
            Self::CommentCount => "comment_count",
            Self::Owner => "r.owner",
            Self::Title => "r.title",
            Self::ReviewId => "r.review_id",
            Self::Category => "r.category",
            Self::ReviewImgUrl => "r.review_img_url",
            Self::CreatedAt => "r.created_at",
            Self::Votes => "r.votes",
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::CreatedAt
    }
}

/// Sort direction, parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(ValidationError::UnknownOrder {
                value: raw.to_owned(),
            })
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Desc
    }
}

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page size (LIMIT)
    pub limit: i64,
    /// Page number, 1-indexed
    pub p: i64,
}

impl Pagination {
    /// Parse `limit` and `p` from their raw query-string forms.
    ///
    /// Absent values fall back to the defaults (10 and 1); present values must
    /// parse as positive integers. An empty string is present-but-invalid, not
    /// absent.
    pub fn from_params(
        limit: Option<&str>,
        p: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            limit: parse_positive("limit", limit, DEFAULT_LIMIT)?,
            p: parse_positive("p", p, 1)?,
        })
    }

    /// SQL OFFSET for this window.
    pub fn offset(&self) -> i64 {
        (self.p - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            p: 1,
        }
    }
}

fn parse_positive(
    field: &'static str,
    raw: Option<&str>,
    default: i64,
) -> Result<i64, ValidationError> {
    match raw {
        None => Ok(default),
        Some(s) => match s.parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ValidationError::InvalidPagination {
                field,
                value: s.to_owned(),
            }),
        },
    }
}

/// Whitespace-separated search keywords.
///
/// Every keyword must independently match the searched text (conjunctive
/// semantics); the storage layer turns each one into its own predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms(Vec<String>);

impl SearchTerms {
    /// Split a raw search string into keywords. Returns `None` when the
    /// string holds no keywords at all, which means no search predicate.
    pub fn parse(raw: &str) -> Option<Self> {
        let keywords: Vec<String> = raw.split_whitespace().map(str::to_owned).collect();
        if keywords.is_empty() {
            None
        } else {
            Some(Self(keywords))
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.0
    }
}

/// Raw query-string parameters for `GET /api/reviews`, as received.
///
/// Everything is an optional string so that validation (not deserialization)
/// decides what is malformed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewQueryParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
    pub p: Option<String>,
}

/// Normalized, validated review-collection query.
///
/// `category` is syntactically accepted here; its existence check happens
/// against the live category table in the storage layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewQuery {
    pub sort_by: SortKey,
    pub order: SortOrder,
    pub category: Option<String>,
    pub search: Option<SearchTerms>,
    pub page: Pagination,
}

impl ReviewQuery {
    /// Validate raw parameters, failing fast on the first bad one.
    pub fn from_params(params: ReviewQueryParams) -> Result<Self, ValidationError> {
        let sort_by = match params.sort_by.as_deref() {
            None => SortKey::default(),
            Some(raw) => SortKey::parse(raw)?,
        };
        let order = match params.order.as_deref() {
            None => SortOrder::default(),
            Some(raw) => SortOrder::parse(raw)?,
        };
        let page = Pagination::from_params(params.limit.as_deref(), params.p.as_deref())?;

        // An empty category or search narrows nothing; treat as absent.
        let category = params.category.filter(|c| !c.is_empty());
        let search = params.search.as_deref().and_then(SearchTerms::parse);

        Ok(Self {
            sort_by,
            order,
            category,
            search,
            page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ReviewQueryParams {
        let mut p = ReviewQueryParams::default();
        for (key, value) in pairs {
            let slot = match *key {
                "sort_by" => &mut p.sort_by,
                "order" => &mut p.order,
                "category" => &mut p.category,
                "search" => &mut p.search,
                "limit" => &mut p.limit,
                "p" => &mut p.p,
                other => panic!("unknown param {other}"),
            };
            *slot = Some((*value).to_owned());
        }
        p
    }

    #[test]
    fn every_whitelisted_key_parses() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()).unwrap(), key);
        }
    }

    #[test]
    fn rejects_unknown_sort_keys() {
        for raw in [
            "designer",
            "body",
            "votes;--",
            "created_at; DROP TABLE reviews;",
            "review_id, votes",
            "CREATED_AT",
        ] {
            let err = SortKey::parse(raw).unwrap_err();
            assert!(matches!(err, ValidationError::UnknownSortKey { .. }), "{raw}");
        }
    }

    #[test]
    fn order_is_case_insensitive() {
        assert_eq!(SortOrder::parse("asc").unwrap(), SortOrder::Asc);
        assert_eq!(SortOrder::parse("ASC").unwrap(), SortOrder::Asc);
        assert_eq!(SortOrder::parse("Desc").unwrap(), SortOrder::Desc);
    }

    #[test]
    fn rejects_unknown_order() {
        for raw in ["ascending", "up", "desc; SELECT 1", ""] {
            assert!(SortOrder::parse(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn pagination_defaults() {
        let page = Pagination::from_params(None, None).unwrap();
        assert_eq!(page.limit, 10);
        assert_eq!(page.p, 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn pagination_offset() {
        let page = Pagination::from_params(Some("5"), Some("3")).unwrap();
        assert_eq!(page.offset(), 10);
    }

    #[test]
    fn empty_string_pagination_is_invalid_not_absent() {
        let err = Pagination::from_params(Some(""), None).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidPagination { field: "limit", .. }
        ));

        let err = Pagination::from_params(None, Some("")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidPagination { field: "p", .. }
        ));
    }

    #[test]
    fn rejects_non_positive_and_non_numeric_pagination() {
        for raw in ["0", "-1", "ten", "3.5", "1; DELETE FROM reviews"] {
            assert!(Pagination::from_params(Some(raw), None).is_err(), "{raw}");
            assert!(Pagination::from_params(None, Some(raw)).is_err(), "{raw}");
        }
    }

    #[test]
    fn search_splits_on_whitespace() {
        let terms = SearchTerms::parse("  fun  worker placement ").unwrap();
        assert_eq!(terms.keywords(), ["fun", "worker", "placement"]);
    }

    #[test]
    fn blank_search_is_no_search() {
        assert!(SearchTerms::parse("").is_none());
        assert!(SearchTerms::parse("   ").is_none());
    }

    #[test]
    fn from_params_defaults() {
        let query = ReviewQuery::from_params(ReviewQueryParams::default()).unwrap();
        assert_eq!(query.sort_by, SortKey::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.category, None);
        assert_eq!(query.search, None);
        assert_eq!(query.page, Pagination::default());
    }

    #[test]
    fn from_params_full() {
        let query = ReviewQuery::from_params(params(&[
            ("sort_by", "votes"),
            ("order", "asc"),
            ("category", "euro game"),
            ("search", "fun farm"),
            ("limit", "5"),
            ("p", "2"),
        ]))
        .unwrap();
        assert_eq!(query.sort_by, SortKey::Votes);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.category.as_deref(), Some("euro game"));
        assert_eq!(query.search.unwrap().keywords(), ["fun", "farm"]);
        assert_eq!(query.page.limit, 5);
        assert_eq!(query.page.offset(), 5);
    }

    #[test]
    fn from_params_fails_fast_on_bad_sort() {
        let err =
            ReviewQuery::from_params(params(&[("sort_by", "owner'; --"), ("limit", "x")]))
                .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownSortKey { .. }));
    }

    #[test]
    fn empty_category_and_search_are_absent() {
        let query =
            ReviewQuery::from_params(params(&[("category", ""), ("search", "  ")])).unwrap();
        assert_eq!(query.category, None);
        assert_eq!(query.search, None);
    }
}
