//! Endpoint catalog route.
//!
//! `GET /api` describes the whole surface so clients can discover it
//! without external docs.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api - catalog of every endpoint
async fn list_endpoints() -> Json<Value> {
    Json(json!({
        "GET /api": {
            "description": "this catalog"
        },
        "GET /api/healthz": {
            "description": "liveness probe with a storage round trip"
        },
        "GET /api/categories": {
            "description": "all categories",
            "exampleResponse": {
                "categories": [{ "slug": "euro game", "description": "..." }]
            }
        },
        "POST /api/categories": {
            "description": "create a category",
            "exampleRequest": { "slug": "roll-and-write", "description": "..." }
        },
        "GET /api/reviews": {
            "description": "reviews with filtering, sorting, search, and pagination",
            "queries": ["sort_by", "order", "category", "search", "limit", "p"],
            "exampleResponse": {
                "reviews": [{
                    "review_id": 2,
                    "title": "Canal Barons",
                    "review_img_url": "...",
                    "votes": 12,
                    "category": "euro game",
                    "owner": "cubepusher",
                    "created_at": "2024-03-01T10:00:00Z",
                    "comment_count": 1
                }],
                "total_count": 6
            }
        },
        "POST /api/reviews": {
            "description": "create a review",
            "exampleRequest": {
                "title": "Gran Bazaar",
                "review_body": "...",
                "designer": "Marta Keller",
                "category": "euro game",
                "owner": "meeplequeen"
            }
        },
        "GET /api/reviews/:review_id": {
            "description": "one review, including its comment count"
        },
        "PATCH /api/reviews/:review_id": {
            "description": "either a vote increment or an owner-restricted body replacement",
            "exampleRequest": { "inc_votes": 1 }
        },
        "DELETE /api/reviews/:review_id": {
            "description": "delete a review and its comments"
        },
        "GET /api/reviews/:review_id/comments": {
            "description": "comments on a review, newest first"
        },
        "POST /api/reviews/:review_id/comments": {
            "description": "comment on a review",
            "exampleRequest": { "username": "dicepriest", "body": "..." }
        },
        "PATCH /api/comments/:comment_id": {
            "description": "vote on a comment",
            "exampleRequest": { "inc_votes": -1 }
        },
        "DELETE /api/comments/:comment_id": {
            "description": "delete a comment"
        },
        "GET /api/users": {
            "description": "all usernames"
        },
        "GET /api/users/:username": {
            "description": "one user"
        },
        "POST /api/users": {
            "description": "create a user",
            "exampleRequest": { "username": "newplayer", "name": "New Player" }
        }
    }))
}

/// Catalog route
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_endpoints))
}
