//! crates/blog_client/src/services/auth.rs

use std::sync::Arc;

use blog_core::validation::{check_credentials, check_password_reset};
use blog_core::{AuthResponse, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterForm {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn login(&self, form: &LoginForm) -> ClientResult<AuthResponse> {
        check_credentials(&form.email, &form.password, None)?;
        self.api.post("/login", form).await
    }

    pub async fn register(&self, form: &RegisterForm) -> ClientResult<AuthResponse> {
        check_credentials(&form.email, &form.password, Some(&form.fullname))?;
        self.api.post("/register", form).await
    }

    pub async fn login_with_google(&self, id_token: &str) -> ClientResult<AuthResponse> {
        self.api
            .post("/google-auth", &json!({ "id_token": id_token }))
            .await
    }

    /// Returns the server's confirmation message.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<String> {
        if email.is_empty() {
            return Err(ValidationError::MissingEmail.into());
        }
        let response: MessageResponse = self
            .api
            .post("/forgot-password", &json!({ "email": email }))
            .await?;
        Ok(response.message)
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ClientResult<String> {
        check_password_reset(new_password, confirm_password)?;
        let response: MessageResponse = self
            .api
            .post(
                "/reset-password",
                &json!({ "token": token, "newPassword": new_password }),
            )
            .await?;
        Ok(response.message)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        let _: Value = self.api.delete("/logout").await?;
        Ok(())
    }
}
