//! crates/blog_client/src/services/mod.rs
//!
//! Typed wrappers over the REST endpoints. Each service validates its input
//! with the shared `blog_core` rules before touching the network.

pub mod auth;
pub mod blog;
pub mod upload;
pub mod user;

pub use auth::{AuthService, LoginForm, RegisterForm};
pub use blog::{AdminBlogFilter, BlogPage, BlogService};
pub use upload::{ImageFile, UploadService};
pub use user::{UserPage, UserService};

/// Builds `path?k=v&...`, skipping empty values.
pub(crate) fn with_query(path: &str, pairs: &[(&str, Option<String>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{}?{}", path, serializer.finish())
    } else {
        path.to_string()
    }
}
