//! crates/blog_core/src/ports.rs
//!
//! Defines the service contracts (traits) the API service depends on.
//! These traits form the boundary of the hexagonal architecture, so the handlers
//! stay independent of the concrete database, mail transport, identity provider
//! and image CDN.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Blog, BlogInput, BlogQuery, LikeOutcome, NewUser, ProfileUpdate, StoredBlog, UploadTicket,
    User, UserCredentials, UserQuery, VerifiedIdentity,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: NewUser) -> PortResult<User>;

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_username(&self, username: &str) -> PortResult<User>;

    async fn username_exists(&self, username: &str) -> PortResult<bool>;

    /// Returns one page of users and the total number of matches.
    async fn list_users(&self, query: &UserQuery) -> PortResult<(Vec<User>, i64)>;

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> PortResult<User>;

    async fn update_profile_img(&self, user_id: Uuid, url: &str) -> PortResult<()>;

    // --- Password reset ---
    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Swaps the password of the user holding an unexpired `token` and clears
    /// the token. `NotFound` when the token is unknown or expired.
    async fn redeem_reset_token(
        &self,
        token: &str,
        hashed_password: &str,
        now: DateTime<Utc>,
    ) -> PortResult<()>;

    // --- Blogs ---
    async fn blog_id_exists(&self, blog_id: &str) -> PortResult<bool>;

    /// Inserts the blog and, when it is published, bumps the author's post count.
    async fn create_blog(
        &self,
        author_id: Uuid,
        blog_id: &str,
        input: &BlogInput,
    ) -> PortResult<Blog>;

    async fn get_blog(&self, blog_id: &str) -> PortResult<StoredBlog>;

    /// Fetches a blog and, when `count_read` is set, increments the blog's and
    /// its author's read counters in the same operation.
    async fn read_blog(&self, blog_id: &str, count_read: bool) -> PortResult<StoredBlog>;

    async fn update_blog(
        &self,
        blog_id: &str,
        new_blog_id: &str,
        input: &BlogInput,
    ) -> PortResult<Blog>;

    async fn delete_blog(&self, blog_id: &str) -> PortResult<()>;

    /// Returns one page of blogs and the total number of matches.
    async fn list_blogs(&self, query: &BlogQuery) -> PortResult<(Vec<Blog>, i64)>;

    // --- Likes ---
    /// Sets whether `user_id` likes the blog and returns the resulting count.
    async fn set_like(&self, blog_id: &str, user_id: Uuid, like: bool) -> PortResult<LikeOutcome>;

    async fn is_liked(&self, blog_id: &str, user_id: Uuid) -> PortResult<bool>;
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Exchanges a provider id token for the identity it asserts.
    async fn verify_id_token(&self, id_token: &str) -> PortResult<VerifiedIdentity>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> PortResult<()>;
}

pub trait UploadSigner: Send + Sync {
    /// Issues a signed ticket for uploading one image into `folder`.
    fn sign_upload(&self, folder: &str, now: DateTime<Utc>) -> PortResult<UploadTicket>;
}
