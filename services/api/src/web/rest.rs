//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI document.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::{auth, blogs, likes, uploads, users};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::google_auth_handler,
        auth::forgot_password_handler,
        auth::reset_password_handler,
        auth::refresh_token_handler,
        auth::logout_handler,
        users::get_profile_handler,
        users::all_users_handler,
        users::update_profile_handler,
        users::update_profile_img_handler,
        blogs::create_blog_handler,
        blogs::update_blog_handler,
        blogs::delete_blog_handler,
        blogs::get_blog_handler,
        blogs::search_blogs_handler,
        blogs::latest_blogs_handler,
        blogs::trending_blogs_handler,
        blogs::all_blogs_handler,
        blogs::by_username_handler,
        blogs::drafts_by_username_handler,
        likes::like_blog_handler,
        likes::is_liked_handler,
        uploads::upload_url_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::GoogleAuthRequest,
            auth::ForgotPasswordRequest,
            auth::ResetPasswordRequest,
            auth::SessionResponse,
            auth::AccessTokenResponse,
            auth::MessageResponse,
            users::ProfileUpdateRequest,
            users::ProfileImageRequest,
            users::ProfileImageResponse,
            users::UserPageResponse,
            blogs::BlogRequest,
            blogs::GetBlogRequest,
            blogs::SearchBlogsRequest,
            blogs::BlogsResponse,
            blogs::BlogPageResponse,
            blogs::BlogResponse,
            blogs::CreatedResponse,
            blogs::StatusResponse,
            likes::LikeRequest,
            likes::IsLikedRequest,
            likes::LikeResponse,
            likes::IsLikedResponse,
            uploads::UploadUrlResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Blog API", description = "Accounts, blogs, likes and image uploads for the blogging platform.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme the protected paths refer to.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/register", "/get-blog", "/update-blog/{id}", "/get-upload-url"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
