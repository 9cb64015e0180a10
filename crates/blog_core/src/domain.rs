//! crates/blog_core/src/domain.rs
//!
//! Defines the core data structures shared by the client and the API service.
//! Field names follow the JSON the REST API has always spoken, so the same
//! records are used on both sides of the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::Content;

//=========================================================================================
// Users
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_img: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub youtube: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub website: String,
}

impl SocialLinks {
    /// Non-empty links as `(platform, url)` pairs, in display order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("youtube", self.youtube.as_str()),
            ("instagram", self.instagram.as_str()),
            ("facebook", self.facebook.as_str()),
            ("twitter", self.twitter.as_str()),
            ("github", self.github.as_str()),
            ("website", self.website.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub total_posts: i64,
    #[serde(default)]
    pub total_reads: i64,
}

/// A user as exposed by the API. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub account_info: AccountInfo,
    #[serde(default)]
    pub google_auth: bool,
    #[serde(default)]
    pub role: Role,
    #[serde(rename = "joinedAt")]
    pub joined_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: Option<String>,
    pub google_auth: bool,
}

/// Everything needed to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub email: String,
    pub username: String,
    pub hashed_password: Option<String>,
    pub profile_img: String,
    pub google_auth: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub social_links: SocialLinks,
}

/// What the auth endpoints hand back after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(default)]
    pub profile_img: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// The identity a third-party sign-in provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
    pub name: String,
    pub picture: String,
}

//=========================================================================================
// Blogs
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorInfo {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_img: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub personal_info: AuthorInfo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub total_likes: i64,
    #[serde(default)]
    pub total_comments: i64,
    #[serde(default)]
    pub total_reads: i64,
    #[serde(default)]
    pub total_parent_comments: i64,
}

/// A blog as the client sees it. Drafts share the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    #[serde(default)]
    pub blog_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub des: String,
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub activity: Activity,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub draft: bool,
}

/// The editable part of a blog, as submitted to create/update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub des: String,
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub draft: bool,
}

/// The blog currently being authored in the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub des: String,
    #[serde(default)]
    pub author: Author,
    #[serde(default = "draft_default")]
    pub draft: bool,
}

fn draft_default() -> bool {
    true
}

impl Default for BlogDraft {
    fn default() -> Self {
        Self {
            blog_id: None,
            title: String::new(),
            banner: String::new(),
            content: Content::default(),
            tags: Vec::new(),
            des: String::new(),
            author: Author::default(),
            draft: true,
        }
    }
}

impl BlogDraft {
    /// Seeds the editor from an existing blog.
    pub fn from_blog(blog: Blog) -> Self {
        Self {
            blog_id: Some(blog.blog_id).filter(|id| !id.is_empty()),
            title: blog.title,
            banner: blog.banner,
            content: blog.content,
            tags: blog.tags,
            des: blog.des,
            author: blog.author,
            draft: blog.draft,
        }
    }

    pub fn to_input(&self, draft: bool) -> BlogInput {
        BlogInput {
            title: self.title.clone(),
            des: self.des.clone(),
            banner: self.banner.clone(),
            tags: self.tags.clone(),
            content: self.content.clone(),
            draft,
        }
    }
}

/// A stored blog together with the keys the API needs for ownership checks.
#[derive(Debug, Clone)]
pub struct StoredBlog {
    pub id: Uuid,
    pub author_id: Uuid,
    pub blog: Blog,
}

/// Ordering used by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogOrder {
    #[default]
    Latest,
    Trending,
}

/// Filter for listing blogs. `page` is 1-based; a `limit` of zero or less
/// returns every match.
#[derive(Debug, Clone, Default)]
pub struct BlogQuery {
    pub tag: Option<String>,
    pub search: Option<String>,
    pub author_id: Option<Uuid>,
    pub draft: bool,
    pub include_drafts: bool,
    pub order: BlogOrder,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub liked: bool,
    pub likes_count: i64,
}

//=========================================================================================
// Pagination
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPagination {
    pub total_blogs: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPagination {
    pub total_users: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
}

/// Number of pages needed for `total` items, never less than one.
pub fn page_count(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 1;
    }
    ((total + limit - 1) / limit).max(1)
}

//=========================================================================================
// Uploads
//=========================================================================================

/// A signed, single-use permission to upload one image to the CDN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTicket {
    pub timestamp: i64,
    pub signature: String,
    pub public_id: String,
    pub api_key: String,
    pub cloud_name: String,
    pub folder: String,
    #[serde(default = "default_signature_algorithm")]
    pub signature_algorithm: String,
}

fn default_signature_algorithm() -> String {
    "sha256".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blog_tolerates_sparse_payloads() {
        let blog: Blog = serde_json::from_value(json!({
            "blog_id": "hello-world",
            "title": "Hello world"
        }))
        .unwrap();

        assert_eq!(blog.blog_id, "hello-world");
        assert!(blog.content.is_empty());
        assert_eq!(blog.activity.total_likes, 0);
        assert!(blog.published_at.is_none());
    }

    #[test]
    fn draft_defaults_to_unpublished() {
        let draft: BlogDraft = serde_json::from_value(json!({ "title": "x" })).unwrap();
        assert!(draft.draft);
        assert!(BlogDraft::default().draft);
    }

    #[test]
    fn draft_from_blog_drops_empty_id() {
        let draft = BlogDraft::from_blog(Blog::default());
        assert_eq!(draft.blog_id, None);
    }

    #[test]
    fn auth_response_uses_camel_case_token() {
        let auth: AuthResponse = serde_json::from_value(json!({
            "accessToken": "tok",
            "profile_img": "a.png",
            "username": "sam"
        }))
        .unwrap();
        assert_eq!(auth.access_token, "tok");
        assert_eq!(auth.role, Role::User);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 1);
    }

    #[test]
    fn pagination_uses_camel_case_keys() {
        let value = serde_json::to_value(BlogPagination {
            total_blogs: 12,
            total_pages: 2,
            current_page: 1,
            limit: 10,
        })
        .unwrap();
        assert_eq!(value["totalBlogs"], 12);
        assert_eq!(value["currentPage"], 1);
    }
}
