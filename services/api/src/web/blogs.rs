//! services/api/src/web/blogs.rs
//!
//! Blog endpoints: writing, reading and listing.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Extension, Json,
};
use blog_core::validation::check_blog;
use blog_core::{
    page_count, Blog, BlogInput, BlogOrder, BlogPagination, BlogQuery, Content, StoredBlog,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use unicode_normalization::UnicodeNormalization;
use utoipa::{IntoParams, ToSchema};

use crate::error::{HttpError, HttpResult};
use crate::web::auth::random_suffix;
use crate::web::middleware::optional_user;
use crate::web::state::AppState;
use crate::web::tokens::AuthUser;

pub const HOME_LIST_LIMIT: i64 = 5;
pub const ADMIN_PAGE_LIMIT: i64 = 10;

//=========================================================================================
// Slugs
//=========================================================================================

/// Turns a title into a URL-safe id: lowercase ASCII letters and digits
/// separated by single dashes, with Vietnamese diacritics folded away.
pub fn slugify(title: &str) -> String {
    let folded: String = title
        .trim()
        .to_lowercase()
        .replace('đ', "d")
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();

    let mut slug = String::with_capacity(folded.len());
    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// A slug for `title` no other blog uses yet.
async fn unique_blog_id(state: &AppState, title: &str) -> HttpResult<String> {
    let base = slugify(title);
    let mut candidate = if base.is_empty() {
        format!("blog-{}", random_suffix(8))
    } else {
        base.clone()
    };
    while state.db.blog_id_exists(&candidate).await? {
        candidate = retry_blog_id(&base);
    }
    Ok(candidate)
}

/// The next candidate after a collision. Untitled blogs keep their `blog` prefix.
fn retry_blog_id(base: &str) -> String {
    let prefix = if base.is_empty() { "blog" } else { base };
    format!("{}-{}", prefix, random_suffix(5))
}

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct BlogRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub des: String,
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub content: Content,
    #[serde(default)]
    pub draft: bool,
}

impl BlogRequest {
    /// Trims the text fields and lower-cases the tags.
    fn into_input(self) -> BlogInput {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        BlogInput {
            title: self.title.trim().to_string(),
            des: self.des.trim().to_string(),
            banner: self.banner,
            tags,
            content: self.content,
            draft: self.draft,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct GetBlogRequest {
    pub blog_id: String,
    #[serde(default)]
    pub draft: bool,
    /// `edit` fetches the blog without counting a read.
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct SearchBlogsRequest {
    #[serde(default)]
    pub tag: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AllBlogsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Serialize, ToSchema)]
pub struct BlogsResponse {
    #[schema(value_type = Vec<Object>)]
    pub blogs: Vec<Blog>,
}

#[derive(Serialize, ToSchema)]
pub struct BlogPageResponse {
    #[schema(value_type = Vec<Object>)]
    pub blogs: Vec<Blog>,
    #[schema(value_type = Object)]
    pub pagination: BlogPagination,
}

#[derive(Serialize, ToSchema)]
pub struct BlogResponse {
    #[schema(value_type = Object)]
    pub blog: Blog,
}

#[derive(Serialize, ToSchema)]
pub struct CreatedResponse {
    /// The blog's id after the write.
    pub id: String,
}

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// List views never need the blog body.
fn summaries(blogs: Vec<Blog>) -> Vec<Blog> {
    blogs
        .into_iter()
        .map(|blog| Blog {
            content: Content::default(),
            ..blog
        })
        .collect()
}

async fn list(state: &AppState, query: BlogQuery) -> HttpResult<Json<BlogsResponse>> {
    let (blogs, _) = state.db.list_blogs(&query).await?;
    Ok(Json(BlogsResponse {
        blogs: summaries(blogs),
    }))
}

async fn blog_or_404(state: &AppState, blog_id: &str) -> HttpResult<StoredBlog> {
    state.db.get_blog(blog_id).await.map_err(|e| match e {
        blog_core::PortError::NotFound(_) => HttpError::not_found("Blog not found"),
        other => other.into(),
    })
}

fn ensure_manager(caller: &AuthUser, stored: &StoredBlog) -> HttpResult<()> {
    if caller.can_manage(stored.author_id) {
        Ok(())
    } else {
        Err(HttpError::forbidden("You are not the author of this blog"))
    }
}

//=========================================================================================
// Writing
//=========================================================================================

/// POST /create-blog - Create a blog or a draft
#[utoipa::path(
    post,
    path = "/create-blog",
    request_body = BlogRequest,
    responses(
        (status = 200, description = "Blog created", body = CreatedResponse),
        (status = 400, description = "The blog is incomplete"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer" = []))
)]
pub async fn create_blog_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(req): Json<BlogRequest>,
) -> HttpResult<impl IntoResponse> {
    let input = req.into_input();
    check_blog(&input, input.draft)?;

    let blog_id = unique_blog_id(&state, &input.title).await?;
    let blog = state.db.create_blog(caller.id, &blog_id, &input).await?;
    info!("Created blog {} (draft: {})", blog.blog_id, blog.draft);

    Ok(Json(CreatedResponse { id: blog.blog_id }))
}

/// PUT /update-blog/{id} - Replace the editable fields of a blog
#[utoipa::path(
    put,
    path = "/update-blog/{id}",
    params(("id" = String, Path, description = "The blog's current id")),
    request_body = BlogRequest,
    responses(
        (status = 200, description = "Blog updated; `id` may have changed with the title", body = CreatedResponse),
        (status = 400, description = "The blog is incomplete"),
        (status = 403, description = "Neither the author nor an admin"),
        (status = 404, description = "Blog not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_blog_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(blog_id): Path<String>,
    Json(req): Json<BlogRequest>,
) -> HttpResult<impl IntoResponse> {
    let stored = blog_or_404(&state, &blog_id).await?;
    ensure_manager(&caller, &stored)?;

    let input = req.into_input();
    check_blog(&input, input.draft)?;

    let new_blog_id = if slugify(&input.title) == slugify(&stored.blog.title) {
        blog_id.clone()
    } else {
        unique_blog_id(&state, &input.title).await?
    };
    let blog = state.db.update_blog(&blog_id, &new_blog_id, &input).await?;

    Ok(Json(CreatedResponse { id: blog.blog_id }))
}

/// DELETE /delete-blog/{blog_id} - Delete a blog
#[utoipa::path(
    delete,
    path = "/delete-blog/{blog_id}",
    params(("blog_id" = String, Path, description = "The blog's id")),
    responses(
        (status = 200, description = "Blog deleted", body = StatusResponse),
        (status = 403, description = "Neither the author nor an admin"),
        (status = 404, description = "Blog not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_blog_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(blog_id): Path<String>,
) -> HttpResult<impl IntoResponse> {
    let stored = blog_or_404(&state, &blog_id).await?;
    ensure_manager(&caller, &stored)?;

    state.db.delete_blog(&blog_id).await?;
    info!("Deleted blog {}", blog_id);
    Ok(Json(StatusResponse {
        status: "done".to_string(),
    }))
}

//=========================================================================================
// Reading
//=========================================================================================

/// POST /get-blog - Fetch one blog, counting the read
#[utoipa::path(
    post,
    path = "/get-blog",
    request_body = GetBlogRequest,
    responses(
        (status = 200, description = "The blog", body = BlogResponse),
        (status = 403, description = "Drafts are only readable by their author"),
        (status = 404, description = "Blog not found")
    )
)]
pub async fn get_blog_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<GetBlogRequest>,
) -> HttpResult<impl IntoResponse> {
    let stored = blog_or_404(&state, &req.blog_id).await?;

    if stored.blog.draft {
        let allowed = req.draft
            && optional_user(&state, &headers).is_some_and(|caller| caller.can_manage(stored.author_id));
        if !allowed {
            return Err(HttpError::forbidden("You can not access draft blogs"));
        }
    }

    let count_read = req.mode.as_deref() != Some("edit");
    let blog = if count_read {
        state.db.read_blog(&req.blog_id, true).await?.blog
    } else {
        stored.blog
    };
    Ok(Json(BlogResponse { blog }))
}

/// POST /search-blogs - Latest published blogs with a tag
#[utoipa::path(
    post,
    path = "/search-blogs",
    request_body = SearchBlogsRequest,
    responses((status = 200, description = "Matching blogs", body = BlogsResponse))
)]
pub async fn search_blogs_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchBlogsRequest>,
) -> HttpResult<impl IntoResponse> {
    let tag = req.tag.trim().to_lowercase();
    if tag.is_empty() {
        return Err(HttpError::bad_request("A tag is required"));
    }
    list(
        &state,
        BlogQuery {
            tag: Some(tag),
            page: 1,
            limit: HOME_LIST_LIMIT,
            ..BlogQuery::default()
        },
    )
    .await
}

/// GET /latest-blogs - Every published blog, newest first
#[utoipa::path(
    get,
    path = "/latest-blogs",
    responses((status = 200, description = "Published blogs", body = BlogsResponse))
)]
pub async fn latest_blogs_handler(
    State(state): State<Arc<AppState>>,
) -> HttpResult<impl IntoResponse> {
    list(
        &state,
        BlogQuery {
            page: 1,
            ..BlogQuery::default()
        },
    )
    .await
}

/// GET /trending-blogs - The most read published blogs
#[utoipa::path(
    get,
    path = "/trending-blogs",
    responses((status = 200, description = "Trending blogs", body = BlogsResponse))
)]
pub async fn trending_blogs_handler(
    State(state): State<Arc<AppState>>,
) -> HttpResult<impl IntoResponse> {
    list(
        &state,
        BlogQuery {
            order: BlogOrder::Trending,
            page: 1,
            limit: HOME_LIST_LIMIT,
            ..BlogQuery::default()
        },
    )
    .await
}

/// GET /get-all-blogs - One page of every blog, drafts included (admin)
#[utoipa::path(
    get,
    path = "/get-all-blogs",
    params(AllBlogsQuery),
    responses(
        (status = 200, description = "One page of blogs", body = BlogPageResponse),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer" = []))
)]
pub async fn all_blogs_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AllBlogsQuery>,
) -> HttpResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.filter(|l| *l > 0).unwrap_or(ADMIN_PAGE_LIMIT);
    let query = BlogQuery {
        tag: params
            .tag
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty()),
        search: params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        include_drafts: true,
        page,
        limit,
        ..BlogQuery::default()
    };

    let (blogs, total) = state.db.list_blogs(&query).await?;
    Ok(Json(BlogPageResponse {
        blogs: summaries(blogs),
        pagination: BlogPagination {
            total_blogs: total,
            total_pages: page_count(total, limit),
            current_page: page,
            limit,
        },
    }))
}

/// GET /get-by-username - A user's published blogs
#[utoipa::path(
    get,
    path = "/get-by-username",
    params(UsernameQuery),
    responses(
        (status = 200, description = "Published blogs of the user", body = BlogsResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn by_username_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UsernameQuery>,
) -> HttpResult<impl IntoResponse> {
    let user = crate::web::users::user_or_404(&state, &params.username).await?;
    list(
        &state,
        BlogQuery {
            author_id: Some(user.id),
            page: 1,
            ..BlogQuery::default()
        },
    )
    .await
}

/// GET /get-drafts-by-username - The caller's own drafts
#[utoipa::path(
    get,
    path = "/get-drafts-by-username",
    params(UsernameQuery),
    responses(
        (status = 200, description = "Drafts of the user", body = BlogsResponse),
        (status = 403, description = "Drafts are only visible to their author"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn drafts_by_username_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(params): Query<UsernameQuery>,
) -> HttpResult<impl IntoResponse> {
    let user = crate::web::users::user_or_404(&state, &params.username).await?;
    if !caller.can_manage(user.id) {
        return Err(HttpError::forbidden("You can only see your own drafts"));
    }
    list(
        &state,
        BlogQuery {
            author_id: Some(user.id),
            draft: true,
            page: 1,
            ..BlogQuery::default()
        },
    )
    .await
}
