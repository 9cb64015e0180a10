//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::HttpError;
use crate::web::state::AppState;
use crate::web::tokens::AuthUser;

/// The token of an `Authorization: Bearer <token>` header, if present.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The caller behind a valid bearer token, for public routes that behave
/// differently for signed-in users.
pub fn optional_user(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    bearer_token(headers).and_then(|token| state.tokens.verify_access(token).ok())
}

/// Middleware that validates the bearer access token.
///
/// If valid, inserts the `AuthUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    // 1. Extract the bearer token
    let token = bearer_token(req.headers())
        .ok_or_else(|| HttpError::Unauthorized("No access token".to_string()))?;

    // 2. Verify it and recover the caller
    let user = state.tokens.verify_access(token).map_err(|e| {
        debug!("Rejected access token: {}", e);
        HttpError::Unauthorized("Access token is invalid or expired".to_string())
    })?;

    // 3. Insert the caller into request extensions
    req.extensions_mut().insert(user);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

/// Middleware layered inside `require_auth` that only lets admins through.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, HttpError> {
    let is_admin = req
        .extensions()
        .get::<AuthUser>()
        .is_some_and(AuthUser::is_admin);
    if !is_admin {
        return Err(HttpError::forbidden("Admin access required"));
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_needs_the_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }
}
