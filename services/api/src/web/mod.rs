//! services/api/src/web/mod.rs
//!
//! HTTP surface of the service. `router` wires every endpoint to its access
//! level; the binary adds CORS, body limits and the Swagger UI around it.

pub mod auth;
pub mod blogs;
pub mod likes;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod tokens;
pub mod uploads;
pub mod users;

#[cfg(test)]
mod router_tests;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use middleware::{require_admin, require_auth};
pub use state::AppState;

/// Builds the API router over `app_state`.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .route("/google-auth", post(auth::google_auth_handler))
        .route("/forgot-password", post(auth::forgot_password_handler))
        .route("/reset-password", post(auth::reset_password_handler))
        .route("/refresh-token", post(auth::refresh_token_handler))
        .route("/logout", delete(auth::logout_handler))
        .route("/get-profile", get(users::get_profile_handler))
        .route("/get-blog", post(blogs::get_blog_handler))
        .route("/search-blogs", post(blogs::search_blogs_handler))
        .route("/latest-blogs", get(blogs::latest_blogs_handler))
        .route("/trending-blogs", get(blogs::trending_blogs_handler))
        .route("/get-by-username", get(blogs::by_username_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/create-blog", post(blogs::create_blog_handler))
        .route("/update-blog/{id}", put(blogs::update_blog_handler))
        .route("/delete-blog/{blog_id}", delete(blogs::delete_blog_handler))
        .route(
            "/get-drafts-by-username",
            get(blogs::drafts_by_username_handler),
        )
        .route("/like-blog", post(likes::like_blog_handler))
        .route("/isliked-by-user", post(likes::is_liked_handler))
        .route("/update-profile", post(users::update_profile_handler))
        .route("/update-profile-img", post(users::update_profile_img_handler))
        .route("/get-upload-url", get(uploads::upload_url_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Admin routes (auth + admin role required)
    let admin_routes = Router::new()
        .route("/get-all-blogs", get(blogs::all_blogs_handler))
        .route("/get-all-users", get(users::all_users_handler))
        .layer(axum_middleware::from_fn(require_admin))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
