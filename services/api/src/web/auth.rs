//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: sign-up, login, Google sign-in, password reset,
//! access token refresh and logout.
//!
//! A successful sign-in answers with a short-lived access token in the body
//! and a long-lived refresh token in an httpOnly cookie.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use blog_core::validation::{check_credentials, is_strong_password};
use blog_core::{NewUser, PortError, Role, User, ValidationError};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{HttpError, HttpResult};
use crate::web::state::AppState;
use crate::web::tokens::{AuthUser, TokenError};

pub const REFRESH_COOKIE: &str = "refreshToken";
const RESET_TOKEN_TTL_MINUTES: i64 = 60;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct GoogleAuthRequest {
    #[serde(default)]
    pub id_token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(rename = "newPassword", default)]
    pub new_password: String,
}

/// What a successful sign-in returns.
#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub profile_img: String,
    pub username: String,
    pub email: String,
    #[schema(value_type = String, example = "user")]
    pub role: Role,
}

#[derive(Serialize, ToSchema)]
pub struct AccessTokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

fn hash_password(password: &str) -> HttpResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            HttpError::Internal("Failed to hash password".to_string())
        })
}

fn password_matches(password: &str, stored_hash: &str) -> HttpResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        HttpError::Internal("Authentication error".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// A short random suffix made of lowercase hex digits.
pub(crate) fn random_suffix(len: usize) -> String {
    Uuid::new_v4().simple().to_string()[..len].to_string()
}

/// The email's local part, suffixed with five random characters when
/// somebody already uses it.
async fn generate_username(state: &AppState, email: &str) -> HttpResult<String> {
    let base = email.split('@').next().unwrap_or_default().to_string();
    if state.db.username_exists(&base).await? {
        return Ok(format!("{}{}", base, random_suffix(5)));
    }
    Ok(base)
}

fn refresh_cookie(state: &AppState, value: &str, max_age: i64) -> String {
    let secure = if state.config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        REFRESH_COOKIE, value, max_age, secure
    )
}

fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| {
            let c = c.trim();
            c.strip_prefix(name).and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|value| !value.is_empty())
}

/// Issues both tokens for `user` and builds the sign-in response.
fn start_session(state: &AppState, user: &User) -> HttpResult<impl IntoResponse> {
    let caller = AuthUser {
        id: user.id,
        role: user.role,
    };
    let now = Utc::now();
    let sign_error = |e: TokenError| {
        error!("Failed to sign token: {}", e);
        HttpError::Internal("Failed to create session".to_string())
    };
    let access_token = state.tokens.issue_access(caller, now).map_err(sign_error)?;
    let refresh_token = state.tokens.issue_refresh(caller, now).map_err(sign_error)?;
    let cookie = refresh_cookie(state, &refresh_token, state.tokens.refresh_ttl_secs());

    let response = SessionResponse {
        access_token,
        profile_img: user.personal_info.profile_img.clone(),
        username: user.personal_info.username.clone(),
        email: user.personal_info.email.clone(),
        role: user.role,
    };
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /register - Create a new account with email and password
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created and signed in", body = SessionResponse),
        (status = 400, description = "Invalid form or email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> HttpResult<impl IntoResponse> {
    let fullname = req.fullname.trim().to_string();
    let email = req.email.trim().to_lowercase();
    check_credentials(&email, &req.password, Some(&fullname))?;

    match state.db.get_credentials_by_email(&email).await {
        Ok(_) => return Err(HttpError::bad_request("Email already exists")),
        Err(PortError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let user = state
        .db
        .create_user(NewUser {
            fullname,
            username: generate_username(&state, &email).await?,
            email,
            hashed_password: Some(hash_password(&req.password)?),
            profile_img: String::new(),
            google_auth: false,
        })
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => HttpError::bad_request("Email already exists"),
            other => other.into(),
        })?;

    info!("Registered {}", user.personal_info.username);
    start_session(&state, &user)
}

/// POST /login - Sign in with email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> HttpResult<impl IntoResponse> {
    let email = req.email.trim().to_lowercase();
    check_credentials(&email, &req.password, None)?;

    let invalid = || HttpError::bad_request("Invalid email or password");
    let credentials = match state.db.get_credentials_by_email(&email).await {
        Ok(credentials) => credentials,
        Err(PortError::NotFound(_)) => return Err(invalid()),
        Err(e) => return Err(e.into()),
    };

    let Some(stored_hash) = credentials.hashed_password.as_deref() else {
        return Err(HttpError::bad_request(
            "This account uses Google sign-in. Continue with Google instead",
        ));
    };
    if !password_matches(&req.password, stored_hash)? {
        return Err(invalid());
    }

    let user = state.db.get_user_by_id(credentials.user_id).await?;
    start_session(&state, &user)
}

/// POST /google-auth - Sign in (or sign up) with a Google id token
#[utoipa::path(
    post,
    path = "/google-auth",
    request_body = GoogleAuthRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Missing token or email registered with a password"),
        (status = 401, description = "Token rejected by Google")
    )
)]
pub async fn google_auth_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GoogleAuthRequest>,
) -> HttpResult<impl IntoResponse> {
    if req.id_token.trim().is_empty() {
        return Err(HttpError::bad_request("ID token is required"));
    }

    let identity = state
        .identity
        .verify_id_token(req.id_token.trim())
        .await
        .map_err(|e| {
            warn!("Google id token rejected: {}", e);
            HttpError::Unauthorized("Google authentication failed".to_string())
        })?;
    let email = identity.email.trim().to_lowercase();

    match state.db.get_credentials_by_email(&email).await {
        Ok(credentials) if !credentials.google_auth => {
            return Err(HttpError::bad_request(
                "This email is already registered with a password",
            ))
        }
        Ok(credentials) => {
            let user = state.db.get_user_by_id(credentials.user_id).await?;
            return start_session(&state, &user);
        }
        Err(PortError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let user = state
        .db
        .create_user(NewUser {
            fullname: identity.name,
            username: generate_username(&state, &email).await?,
            email,
            hashed_password: None,
            profile_img: identity.picture,
            google_auth: true,
        })
        .await?;
    info!("Registered {} through Google", user.personal_info.username);
    start_session(&state, &user)
}

/// POST /forgot-password - Mail a password reset link
#[utoipa::path(
    post,
    path = "/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset mail sent", body = MessageResponse),
        (status = 400, description = "Email missing"),
        (status = 404, description = "Email not found")
    )
)]
pub async fn forgot_password_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> HttpResult<impl IntoResponse> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail.into());
    }

    let credentials = match state.db.get_credentials_by_email(&email).await {
        Ok(credentials) => credentials,
        Err(PortError::NotFound(_)) => return Err(HttpError::not_found("Email not found")),
        Err(e) => return Err(e.into()),
    };
    let user = state.db.get_user_by_id(credentials.user_id).await?;

    let token = Uuid::new_v4().simple().to_string();
    let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    state.db.set_reset_token(user.id, &token, expires_at).await?;

    let reset_link = format!(
        "{}#/reset-password?token={}",
        state.config.app_domain, token
    );
    let body = format!(
        "<p>Hi {},</p>\
         <p>You requested to reset your password. Click the link below to set a new password:</p>\
         <a href=\"{link}\">{link}</a>\
         <p>If you did not request this, please ignore this email.</p>",
        user.personal_info.fullname,
        link = reset_link
    );
    state
        .mailer
        .send(&email, "Password Reset Request", &body)
        .await
        .map_err(|e| {
            error!("Failed to send reset mail: {}", e);
            HttpError::Internal("Email sending failed".to_string())
        })?;

    Ok(MessageResponse::new("Reset password email sent."))
}

/// POST /reset-password - Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid or expired token, or weak password")
    )
)]
pub async fn reset_password_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> HttpResult<impl IntoResponse> {
    let token = req.token.trim();
    let new_password = req.new_password.trim();
    if token.is_empty() || new_password.is_empty() {
        return Err(HttpError::bad_request("Token and new password are required."));
    }
    if !is_strong_password(new_password) {
        return Err(ValidationError::WeakPassword.into());
    }

    let hashed = hash_password(new_password)?;
    match state.db.redeem_reset_token(token, &hashed, Utc::now()).await {
        Ok(()) => Ok(MessageResponse::new("Password has been reset successfully.")),
        Err(PortError::NotFound(_)) => Err(HttpError::bad_request("Invalid or expired token.")),
        Err(e) => Err(e.into()),
    }
}

/// POST /refresh-token - Mint a new access token from the refresh cookie
#[utoipa::path(
    post,
    path = "/refresh-token",
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Missing, invalid or expired refresh token")
    )
)]
pub async fn refresh_token_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> HttpResult<impl IntoResponse> {
    let unauthorized = |message: &str| HttpError::Unauthorized(message.to_string());

    let token = read_cookie(&headers, REFRESH_COOKIE)
        .ok_or_else(|| unauthorized("No refresh token"))?;
    let claimed = state
        .tokens
        .verify_refresh(token)
        .map_err(|_| unauthorized("Refresh token is invalid or expired"))?;

    // The role is read again so a promotion or demotion takes effect.
    let user = match state.db.get_user_by_id(claimed.id).await {
        Ok(user) => user,
        Err(PortError::NotFound(_)) => return Err(unauthorized("User no longer exists")),
        Err(e) => return Err(e.into()),
    };
    let access_token = state
        .tokens
        .issue_access(
            AuthUser {
                id: user.id,
                role: user.role,
            },
            Utc::now(),
        )
        .map_err(|e| HttpError::Internal(e.to_string()))?;

    Ok(Json(AccessTokenResponse { access_token }))
}

/// DELETE /logout - Clear the refresh cookie
#[utoipa::path(
    delete,
    path = "/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse)
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cookie = refresh_cookie(&state, "", 0);
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        MessageResponse::new("Logged out successfully"),
    )
}
