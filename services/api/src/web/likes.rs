//! services/api/src/web/likes.rs

use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

use crate::error::{HttpError, HttpResult};
use crate::web::state::AppState;
use crate::web::tokens::AuthUser;

#[derive(Deserialize, ToSchema)]
pub struct LikeRequest {
    /// The blog's id.
    #[serde(rename = "_id")]
    pub blog_id: String,
    /// Whether the caller liked the blog before this click.
    #[serde(rename = "islikedByUser", default)]
    pub liked_by_user: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct IsLikedRequest {
    #[serde(rename = "_id")]
    pub blog_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct IsLikedResponse {
    pub result: bool,
}

/// POST /like-blog - Toggle the caller's like
#[utoipa::path(
    post,
    path = "/like-blog",
    request_body = LikeRequest,
    responses(
        (status = 200, description = "The like state and count after the toggle", body = LikeResponse),
        (status = 404, description = "Blog not found")
    ),
    security(("bearer" = []))
)]
pub async fn like_blog_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(req): Json<LikeRequest>,
) -> HttpResult<impl IntoResponse> {
    if req.blog_id.trim().is_empty() {
        return Err(HttpError::bad_request("A blog id is required"));
    }
    let outcome = state
        .db
        .set_like(req.blog_id.trim(), caller.id, !req.liked_by_user)
        .await?;
    debug!(
        "{} now {} {}",
        caller.id,
        if outcome.liked { "likes" } else { "does not like" },
        req.blog_id
    );
    Ok(Json(LikeResponse {
        liked: outcome.liked,
        likes_count: outcome.likes_count,
    }))
}

/// POST /isliked-by-user - Whether the caller likes a blog
#[utoipa::path(
    post,
    path = "/isliked-by-user",
    request_body = IsLikedRequest,
    responses((status = 200, description = "The caller's like state", body = IsLikedResponse)),
    security(("bearer" = []))
)]
pub async fn is_liked_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(req): Json<IsLikedRequest>,
) -> HttpResult<impl IntoResponse> {
    let result = state.db.is_liked(req.blog_id.trim(), caller.id).await?;
    Ok(Json(IsLikedResponse { result }))
}
