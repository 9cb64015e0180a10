//! services/api/src/web/router_tests.rs
//!
//! Drives the full router over the in-memory store.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use blog_core::ports::{DatabaseService, IdentityVerifier, PortError, PortResult};
use blog_core::{Role, VerifiedIdentity};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::adapters::{CloudinarySigner, LogMailer, MemoryDb};
use crate::config::Config;
use crate::web::{router, state::AppState, tokens::TokenService};

struct StubIdentity;

#[async_trait]
impl IdentityVerifier for StubIdentity {
    async fn verify_id_token(&self, id_token: &str) -> PortResult<VerifiedIdentity> {
        match id_token {
            "good-token" => Ok(VerifiedIdentity {
                email: "Gabi@Example.com".to_string(),
                name: "Gabi Google".to_string(),
                picture: "https://img/gabi.png".to_string(),
            }),
            _ => Err(PortError::Unauthorized),
        }
    }
}

struct Harness {
    app: Router,
    db: Arc<MemoryDb>,
    mailer: Arc<LogMailer>,
}

fn harness() -> Harness {
    let config = Arc::new(Config::for_tests());
    let db = Arc::new(MemoryDb::new());
    let mailer = Arc::new(LogMailer::new());
    let state = Arc::new(AppState {
        db: db.clone(),
        config: config.clone(),
        tokens: Arc::new(TokenService::new(&config)),
        identity: Arc::new(StubIdentity),
        mailer: mailer.clone(),
        uploads: Arc::new(CloudinarySigner::new(config.cloudinary.clone())),
    });
    Harness {
        app: router(state),
        db,
        mailer,
    }
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl Harness {
    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Reply {
            status,
            headers,
            body,
        }
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Reply {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> Reply {
        self.call(Method::GET, uri, token, None).await
    }

    /// Registers `name@example.com` and returns its access token.
    async fn register(&self, name: &str) -> String {
        let reply = self
            .post(
                "/register",
                None,
                json!({
                    "fullname": format!("{} Writer", name),
                    "email": format!("{}@example.com", name),
                    "password": "Secret123"
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.body["accessToken"].as_str().unwrap().to_string()
    }

    async fn login(&self, email: &str, password: &str) -> Reply {
        self.post("/login", None, json!({ "email": email, "password": password }))
            .await
    }

    async fn create_blog(&self, token: &str, title: &str, draft: bool) -> String {
        let reply = self
            .post(
                "/create-blog",
                Some(token),
                json!({
                    "title": title,
                    "des": "A short description",
                    "banner": "https://cdn/banner.png",
                    "tags": ["Rust", "rust", " Web "],
                    "content": { "blocks": [{ "type": "paragraph", "data": { "text": "Hello" } }] },
                    "draft": draft
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.body["id"].as_str().unwrap().to_string()
    }
}

//=========================================================================================
// Authentication
//=========================================================================================

#[tokio::test]
async fn register_returns_a_session_and_refresh_cookie() {
    let h = harness();
    let reply = h
        .post(
            "/register",
            None,
            json!({ "fullname": "Sam Writer", "email": "Sam@Example.com", "password": "Secret123" }),
        )
        .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["username"], "sam");
    assert_eq!(reply.body["email"], "sam@example.com");
    assert_eq!(reply.body["role"], "user");
    assert!(reply.body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));

    let cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("refreshToken="));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn duplicate_email_and_taken_username() {
    let h = harness();
    h.register("sam").await;

    let again = h
        .post(
            "/register",
            None,
            json!({ "fullname": "Sam Again", "email": "sam@example.com", "password": "Secret123" }),
        )
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.body["error"], "Email already exists");

    // Same local part on another domain gets a suffixed username.
    let other = h
        .post(
            "/register",
            None,
            json!({ "fullname": "Sam Other", "email": "sam@other.org", "password": "Secret123" }),
        )
        .await;
    assert_eq!(other.status, StatusCode::OK);
    let username = other.body["username"].as_str().unwrap();
    assert!(username.starts_with("sam") && username.len() == 8, "{}", username);
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let h = harness();
    let reply = h
        .post(
            "/register",
            None,
            json!({ "fullname": "Sam Writer", "email": "sam@example.com", "password": "secret" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_checks_the_password() {
    let h = harness();
    h.register("sam").await;

    let wrong = h.login("sam@example.com", "Wrong1234").await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.body["error"], "Invalid email or password");

    let unknown = h.login("nobody@example.com", "Secret123").await;
    assert_eq!(unknown.body["error"], "Invalid email or password");

    let right = h.login("SAM@example.com", "Secret123").await;
    assert_eq!(right.status, StatusCode::OK);
    assert_eq!(right.body["username"], "sam");
}

#[tokio::test]
async fn google_sign_in_creates_a_passwordless_account() {
    let h = harness();
    let reply = h
        .post("/google-auth", None, json!({ "id_token": "good-token" }))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["username"], "gabi");
    assert_eq!(reply.body["profile_img"], "https://img/gabi.png");

    // Signing in again reuses the account.
    let again = h
        .post("/google-auth", None, json!({ "id_token": "good-token" }))
        .await;
    assert_eq!(again.body["username"], "gabi");

    let password_login = h.login("gabi@example.com", "Secret123").await;
    assert_eq!(password_login.status, StatusCode::BAD_REQUEST);

    let rejected = h
        .post("/google-auth", None, json!({ "id_token": "forged" }))
        .await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn google_sign_in_refuses_password_accounts() {
    let h = harness();
    h.post(
        "/register",
        None,
        json!({ "fullname": "Gabi Writer", "email": "gabi@example.com", "password": "Secret123" }),
    )
    .await;

    let reply = h
        .post("/google-auth", None, json!({ "id_token": "good-token" }))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["error"],
        "This email is already registered with a password"
    );
}

#[tokio::test]
async fn refresh_token_cookie_mints_an_access_token() {
    let h = harness();
    let reply = h
        .post(
            "/register",
            None,
            json!({ "fullname": "Sam Writer", "email": "sam@example.com", "password": "Secret123" }),
        )
        .await;
    let set_cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/refresh-token")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let refreshed = h.send(request).await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let token = refreshed.body["accessToken"].as_str().unwrap();

    // The new token opens protected routes.
    let drafts = h.get("/get-drafts-by-username?username=sam", Some(token)).await;
    assert_eq!(drafts.status, StatusCode::OK);

    let missing = h.call(Method::POST, "/refresh-token", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let h = harness();
    let reply = h.call(Method::DELETE, "/logout", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("refreshToken=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn password_reset_round_trip() {
    let h = harness();
    h.register("sam").await;

    let unknown = h
        .post("/forgot-password", None, json!({ "email": "nobody@example.com" }))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let sent = h
        .post("/forgot-password", None, json!({ "email": "sam@example.com" }))
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    assert_eq!(sent.body["message"], "Reset password email sent.");

    let mails = h.mailer.sent();
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].to, "sam@example.com");
    let token = mails[0]
        .html_body
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap()
        .to_string();

    let reset = h
        .post(
            "/reset-password",
            None,
            json!({ "token": token, "newPassword": "Changed123" }),
        )
        .await;
    assert_eq!(reset.status, StatusCode::OK, "{}", reset.body);

    assert_eq!(h.login("sam@example.com", "Secret123").await.status, StatusCode::BAD_REQUEST);
    assert_eq!(h.login("sam@example.com", "Changed123").await.status, StatusCode::OK);

    let reused = h
        .post(
            "/reset-password",
            None,
            json!({ "token": token, "newPassword": "Another123" }),
        )
        .await;
    assert_eq!(reused.status, StatusCode::BAD_REQUEST);
    assert_eq!(reused.body["error"], "Invalid or expired token.");
}

//=========================================================================================
// Access Control
//=========================================================================================

#[tokio::test]
async fn protected_routes_need_a_token() {
    let h = harness();
    let reply = h
        .post("/create-blog", None, json!({ "title": "Nope" }))
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let forged = h.get("/get-upload-url", Some("not-a-jwt")).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_need_the_admin_role() {
    let h = harness();
    let token = h.register("sam").await;

    let refused = h.get("/get-all-users", Some(&token)).await;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    assert_eq!(refused.body["error"], "Admin access required");

    let sam = h.db.get_user_by_username("sam").await.unwrap();
    h.db.set_role(sam.id, Role::Admin).await.unwrap();
    let admin = h.login("sam@example.com", "Secret123").await;
    assert_eq!(admin.body["role"], "admin");
    let admin_token = admin.body["accessToken"].as_str().unwrap();

    h.register("kim").await;
    let users = h.get("/get-all-users?page=1", Some(admin_token)).await;
    assert_eq!(users.status, StatusCode::OK);
    assert_eq!(users.body["pagination"]["totalUsers"], 2);
    assert_eq!(users.body["users"].as_array().unwrap().len(), 2);
}

//=========================================================================================
// Blogs
//=========================================================================================

#[tokio::test]
async fn published_blog_lifecycle() {
    let h = harness();
    let token = h.register("sam").await;
    let id = h.create_blog(&token, "My First Post", false).await;
    assert_eq!(id, "my-first-post");

    let read = h
        .post("/get-blog", None, json!({ "blog_id": id, "draft": false }))
        .await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["blog"]["activity"]["total_reads"], 1);
    assert_eq!(read.body["blog"]["tags"], json!(["rust", "web"]));
    assert_eq!(read.body["blog"]["author"]["personal_info"]["username"], "sam");

    // Fetching for the editor does not count as a read.
    let edit = h
        .post(
            "/get-blog",
            None,
            json!({ "blog_id": id, "draft": false, "mode": "edit" }),
        )
        .await;
    assert_eq!(edit.body["blog"]["activity"]["total_reads"], 1);

    let latest = h.get("/latest-blogs", None).await;
    let blogs = latest.body["blogs"].as_array().unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0]["blog_id"], "my-first-post");

    let profile = h.get("/get-profile?username=sam", None).await;
    assert_eq!(profile.body["account_info"]["total_posts"], 1);
    assert_eq!(profile.body["account_info"]["total_reads"], 1);

    let deleted = h
        .call(Method::DELETE, &format!("/delete-blog/{}", id), Some(&token), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    let gone = h
        .post("/get-blog", None, json!({ "blog_id": id, "draft": false }))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn same_title_gets_a_distinct_id() {
    let h = harness();
    let token = h.register("sam").await;
    let first = h.create_blog(&token, "Hello", false).await;
    let second = h.create_blog(&token, "Hello", false).await;

    assert_eq!(first, "hello");
    assert_ne!(first, second);
    assert!(second.starts_with("hello-"));
}

#[tokio::test]
async fn drafts_are_private_to_their_author() {
    let h = harness();
    let sam = h.register("sam").await;
    let kim = h.register("kim").await;
    let id = h.create_blog(&sam, "Work in progress", true).await;

    let anonymous = h
        .post("/get-blog", None, json!({ "blog_id": id, "draft": true }))
        .await;
    assert_eq!(anonymous.status, StatusCode::FORBIDDEN);

    let stranger = h
        .post("/get-blog", Some(&kim), json!({ "blog_id": id, "draft": true }))
        .await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let author = h
        .post("/get-blog", Some(&sam), json!({ "blog_id": id, "draft": true }))
        .await;
    assert_eq!(author.status, StatusCode::OK);

    let drafts = h.get("/get-drafts-by-username?username=sam", Some(&kim)).await;
    assert_eq!(drafts.status, StatusCode::FORBIDDEN);

    let own = h.get("/get-drafts-by-username?username=sam", Some(&sam)).await;
    assert_eq!(own.body["blogs"].as_array().unwrap().len(), 1);

    // Drafts never show up in public listings.
    let latest = h.get("/latest-blogs", None).await;
    assert!(latest.body["blogs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn only_the_author_may_edit() {
    let h = harness();
    let sam = h.register("sam").await;
    let kim = h.register("kim").await;
    let id = h.create_blog(&sam, "Original", false).await;

    let body = json!({
        "title": "Renamed",
        "des": "A short description",
        "banner": "https://cdn/banner.png",
        "tags": ["rust"],
        "content": [{ "type": "paragraph", "data": { "text": "Changed" } }],
        "draft": false
    });
    let refused = h
        .call(Method::PUT, &format!("/update-blog/{}", id), Some(&kim), Some(body.clone()))
        .await;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);

    let updated = h
        .call(Method::PUT, &format!("/update-blog/{}", id), Some(&sam), Some(body))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["id"], "renamed");
}

#[tokio::test]
async fn likes_toggle() {
    let h = harness();
    let sam = h.register("sam").await;
    let kim = h.register("kim").await;
    let id = h.create_blog(&sam, "Likeable", false).await;

    let liked = h
        .post("/like-blog", Some(&kim), json!({ "_id": id, "islikedByUser": false }))
        .await;
    assert_eq!(liked.status, StatusCode::OK);
    assert_eq!(liked.body["likes_count"], 1);

    let check = h
        .post("/isliked-by-user", Some(&kim), json!({ "_id": id }))
        .await;
    assert_eq!(check.body["result"], true);

    let unliked = h
        .post("/like-blog", Some(&kim), json!({ "_id": id, "islikedByUser": true }))
        .await;
    assert_eq!(unliked.body["likes_count"], 0);

    let check = h
        .post("/isliked-by-user", Some(&kim), json!({ "_id": id }))
        .await;
    assert_eq!(check.body["result"], false);
}

#[tokio::test]
async fn search_by_tag_and_trending() {
    let h = harness();
    let sam = h.register("sam").await;
    let quiet = h.create_blog(&sam, "Quiet", false).await;
    let popular = h.create_blog(&sam, "Popular", false).await;
    for _ in 0..3 {
        h.post("/get-blog", None, json!({ "blog_id": popular, "draft": false }))
            .await;
    }

    let tagged = h.post("/search-blogs", None, json!({ "tag": "RUST" })).await;
    assert_eq!(tagged.body["blogs"].as_array().unwrap().len(), 2);

    let trending = h.get("/trending-blogs", None).await;
    let ids: Vec<&str> = trending.body["blogs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["blog_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![popular.as_str(), quiet.as_str()]);
}

//=========================================================================================
// Profile & Uploads
//=========================================================================================

#[tokio::test]
async fn profile_update_keeps_usernames_unique() {
    let h = harness();
    let sam = h.register("sam").await;
    h.register("kim").await;

    let taken = h
        .post("/update-profile", Some(&sam), json!({ "username": "kim", "bio": "" }))
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let updated = h
        .post(
            "/update-profile",
            Some(&sam),
            json!({
                "username": "samuel",
                "bio": "Writes about Rust",
                "social_links": { "github": "https://github.com/samuel" }
            }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.body["personal_info"]["username"], "samuel");
    assert_eq!(updated.body["social_links"]["github"], "https://github.com/samuel");

    let image = h
        .post("/update-profile-img", Some(&sam), json!({ "url": "https://cdn/me.png" }))
        .await;
    assert_eq!(image.status, StatusCode::OK);
    let profile = h.get("/get-profile?username=samuel", None).await;
    assert_eq!(profile.body["personal_info"]["profile_img"], "https://cdn/me.png");
}

#[tokio::test]
async fn upload_url_is_signed() {
    let h = harness();
    let token = h.register("sam").await;
    let reply = h.get("/get-upload-url", Some(&token)).await;

    assert_eq!(reply.status, StatusCode::OK);
    let ticket = &reply.body["uploadData"];
    assert_eq!(ticket["cloud_name"], "demo");
    assert_eq!(ticket["folder"], "blog_images");
    assert_eq!(ticket["signature"].as_str().unwrap().len(), 64);
}
