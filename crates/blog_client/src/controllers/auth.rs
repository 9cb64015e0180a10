//! crates/blog_client/src/controllers/auth.rs

use blog_core::AuthResponse;
use tracing::{info, warn};

use crate::bindings::UiEvent;
use crate::controllers::{Deps, Outcome, View};
use crate::error::ClientResult;
use crate::services::{LoginForm, RegisterForm};
use crate::views;
use crate::views::auth::{self as auth_view, AuthMode};

fn render_form(deps: &Deps, mode: AuthMode) -> View {
    if deps.context.user().is_signed_in() {
        deps.host.navigate("/");
        return View::inert(views::placeholder("You are already signed in"));
    }
    View::new(auth_view::auth_form(mode), auth_view::auth_bindings(mode))
}

pub fn render_login(deps: &Deps) -> View {
    render_form(deps, AuthMode::Login)
}

pub fn render_register(deps: &Deps) -> View {
    render_form(deps, AuthMode::Register)
}

pub fn render_forgot_password() -> View {
    View::new(
        auth_view::forgot_password_form(),
        auth_view::forgot_password_bindings(),
    )
}

pub fn render_reset_password(token: &str) -> View {
    View::new(
        auth_view::reset_password_form(token),
        auth_view::reset_password_bindings(token),
    )
}

/// Stores the signed-in user and leaves the auth page.
fn signed_in(deps: &Deps, auth: &AuthResponse, message: &str) -> ClientResult<Outcome> {
    deps.context.set_user(auth)?;
    info!("Signed in as {}", auth.username);
    deps.host.success(message);
    deps.host.navigate("/");
    Ok(Outcome::Done)
}

pub async fn submit_login(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let form = LoginForm {
        email: event.value("email"),
        password: event.value("password"),
    };
    match deps.auth.login(&form).await {
        Ok(auth) => signed_in(deps, &auth, "Login successful!"),
        Err(e) => {
            deps.report(&e, "Login failed");
            Ok(Outcome::Done)
        }
    }
}

pub async fn submit_register(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let form = RegisterForm {
        fullname: event.value("fullname"),
        email: event.value("email"),
        password: event.value("password"),
    };
    match deps.auth.register(&form).await {
        Ok(auth) => signed_in(deps, &auth, "Registration successful!"),
        Err(e) => {
            deps.report(&e, "Registration failed");
            Ok(Outcome::Done)
        }
    }
}

/// The host runs the provider popup and passes the resulting id token.
pub async fn google_sign_in(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let id_token = event.value("id_token");
    if id_token.is_empty() {
        deps.host.error("Google sign-in was cancelled");
        return Ok(Outcome::Done);
    }
    match deps.auth.login_with_google(&id_token).await {
        Ok(auth) => signed_in(deps, &auth, "Login successful!"),
        Err(e) => {
            deps.report(&e, "Trouble signing in through Google");
            Ok(Outcome::Done)
        }
    }
}

pub async fn submit_forgot_password(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let email = event.value("email");
    deps.host.loading("Sending reset link...");
    let result = deps.auth.forgot_password(&email).await;
    deps.host.dismiss_loading();

    match result {
        Ok(_) => deps
            .host
            .success("Reset password link sent. Check your email."),
        Err(e) => deps.report(&e, "Could not send the reset link"),
    }
    Ok(Outcome::Done)
}

pub async fn submit_reset_password(
    deps: &Deps,
    event: &UiEvent,
    token: &str,
) -> ClientResult<Outcome> {
    let new_password = event.value("new-password");
    let confirm = event.value("confirm-password");
    match deps
        .auth
        .reset_password(token, &new_password, &confirm)
        .await
    {
        Ok(_) => {
            deps.host.success("Password has been reset successfully!");
            deps.host.navigate("/login");
        }
        Err(e) => deps.report(&e, "Could not reset the password"),
    }
    Ok(Outcome::Done)
}

/// Signs out locally even when the server call fails.
pub async fn logout(deps: &Deps) -> ClientResult<Outcome> {
    if let Err(e) = deps.auth.logout().await {
        warn!("Logout request failed: {}", e);
    }
    deps.context.clear_user();
    deps.host.success("Logout successful!");
    deps.host.navigate("/login");
    Ok(Outcome::Done)
}
