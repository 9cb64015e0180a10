//! services/api/src/web/users.rs
//!
//! Profile endpoints and the admin user listing.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use blog_core::validation::check_profile;
use blog_core::{
    page_count, PortError, ProfileUpdate, SocialLinks, User, UserPagination, UserQuery,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::error::{HttpError, HttpResult};
use crate::web::blogs::UsernameQuery;
use crate::web::state::AppState;
use crate::web::tokens::AuthUser;

pub const USER_PAGE_LIMIT: i64 = 5;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AllUsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub social_links: SocialLinks,
}

#[derive(Deserialize, ToSchema)]
pub struct ProfileImageRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileImageResponse {
    pub profile_img: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserPageResponse {
    #[schema(value_type = Vec<Object>)]
    pub users: Vec<User>,
    #[schema(value_type = Object)]
    pub pagination: UserPagination,
}

pub(crate) async fn user_or_404(state: &AppState, username: &str) -> HttpResult<User> {
    state
        .db
        .get_user_by_username(username.trim())
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => HttpError::not_found("User not found"),
            other => other.into(),
        })
}

/// GET /get-profile - A user's public profile
#[utoipa::path(
    get,
    path = "/get-profile",
    params(UsernameQuery),
    responses(
        (status = 200, description = "The user, without credentials"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UsernameQuery>,
) -> HttpResult<impl IntoResponse> {
    Ok(Json(user_or_404(&state, &params.username).await?))
}

/// GET /get-all-users - One page of users (admin)
#[utoipa::path(
    get,
    path = "/get-all-users",
    params(AllUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = UserPageResponse),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer" = []))
)]
pub async fn all_users_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AllUsersQuery>,
) -> HttpResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.filter(|l| *l > 0).unwrap_or(USER_PAGE_LIMIT);
    let query = UserQuery {
        search: params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        page,
        limit,
    };

    let (users, total) = state.db.list_users(&query).await?;
    Ok(Json(UserPageResponse {
        users,
        pagination: UserPagination {
            total_users: total,
            total_pages: page_count(total, limit),
            current_page: page,
            limit,
        },
    }))
}

/// POST /update-profile - Change the caller's username, bio and links
#[utoipa::path(
    post,
    path = "/update-profile",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "The updated user"),
        (status = 400, description = "Username too short or bio too long"),
        (status = 409, description = "Username already taken")
    ),
    security(("bearer" = []))
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(req): Json<ProfileUpdateRequest>,
) -> HttpResult<impl IntoResponse> {
    let update = ProfileUpdate {
        username: req.username.trim().to_string(),
        bio: req.bio.trim().to_string(),
        social_links: req.social_links,
    };
    check_profile(&update)?;

    let current = state.db.get_user_by_id(caller.id).await?;
    if current.personal_info.username != update.username
        && state.db.username_exists(&update.username).await?
    {
        return Err(HttpError::Conflict("Username is already taken".to_string()));
    }

    let user = state.db.update_profile(caller.id, &update).await?;
    info!("Updated profile of {}", user.personal_info.username);
    Ok(Json(user))
}

/// POST /update-profile-img - Point the caller's avatar at an uploaded image
#[utoipa::path(
    post,
    path = "/update-profile-img",
    request_body = ProfileImageRequest,
    responses(
        (status = 200, description = "Avatar changed", body = ProfileImageResponse),
        (status = 400, description = "No image URL")
    ),
    security(("bearer" = []))
)]
pub async fn update_profile_img_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(req): Json<ProfileImageRequest>,
) -> HttpResult<impl IntoResponse> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(HttpError::bad_request("An image URL is required"));
    }
    state.db.update_profile_img(caller.id, url).await?;
    Ok(Json(ProfileImageResponse {
        profile_img: url.to_string(),
    }))
}
