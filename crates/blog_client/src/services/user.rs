//! crates/blog_client/src/services/user.rs

use std::sync::Arc;

use blog_core::validation::check_profile;
use blog_core::{ProfileUpdate, User, UserPagination};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::services::with_query;

pub const USER_PAGE_SIZE: i64 = 5;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub pagination: UserPagination,
}

#[derive(Clone)]
pub struct UserService {
    api: Arc<ApiClient>,
}

impl UserService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn profile(&self, username: &str) -> ClientResult<User> {
        let path = with_query("/get-profile", &[("username", Some(username.to_string()))]);
        self.api.get(&path).await
    }

    pub async fn all(&self, page: i64, search: Option<String>) -> ClientResult<UserPage> {
        let path = with_query(
            "/get-all-users",
            &[
                ("page", Some(page.max(1).to_string())),
                ("limit", Some(USER_PAGE_SIZE.to_string())),
                ("search", search),
            ],
        );
        self.api.get(&path).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        check_profile(update)?;
        self.api.post("/update-profile", update).await
    }

    pub async fn update_profile_img(&self, url: &str) -> ClientResult<()> {
        let _: Value = self
            .api
            .post("/update-profile-img", &json!({ "url": url }))
            .await?;
        Ok(())
    }
}
