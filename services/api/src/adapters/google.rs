//! services/api/src/adapters/google.rs
//!
//! Verifies Google id tokens through Google's `tokeninfo` endpoint.

use async_trait::async_trait;
use blog_core::ports::{IdentityVerifier, PortError, PortResult};
use blog_core::VerifiedIdentity;
use serde::Deserialize;
use tracing::debug;

pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Deserialize)]
struct TokenInfo {
    #[serde(default)]
    aud: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    picture: String,
}

pub struct GoogleIdentityVerifier {
    http: reqwest::Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl GoogleIdentityVerifier {
    pub fn new(client_id: Option<String>) -> Self {
        Self::with_endpoint(GOOGLE_TOKENINFO_URL, client_id)
    }

    pub fn with_endpoint(tokeninfo_url: &str, client_id: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokeninfo_url: tokeninfo_url.to_string(),
            client_id,
        }
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify_id_token(&self, id_token: &str) -> PortResult<VerifiedIdentity> {
        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            debug!("tokeninfo answered {}", response.status());
            return Err(PortError::Unauthorized);
        }
        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if let Some(client_id) = &self.client_id {
            if &info.aud != client_id {
                debug!("id token was issued for another client: {}", info.aud);
                return Err(PortError::Unauthorized);
            }
        }
        if info.email.is_empty() || info.email_verified.as_deref() == Some("false") {
            return Err(PortError::Unauthorized);
        }

        Ok(VerifiedIdentity {
            email: info.email,
            name: info.name,
            picture: info.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verifier(server: &MockServer, client_id: Option<&str>) -> GoogleIdentityVerifier {
        GoogleIdentityVerifier::with_endpoint(
            &format!("{}/tokeninfo", server.uri()),
            client_id.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn valid_token_yields_the_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .and(query_param("id_token", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "aud": "client-1",
                "email": "sam@example.com",
                "email_verified": "true",
                "name": "Sam",
                "picture": "https://img/sam.png"
            })))
            .mount(&server)
            .await;

        let identity = verifier(&server, Some("client-1"))
            .verify_id_token("tok")
            .await
            .unwrap();
        assert_eq!(identity.email, "sam@example.com");
        assert_eq!(identity.picture, "https://img/sam.png");
    }

    #[tokio::test]
    async fn token_for_another_client_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "aud": "someone-else",
                "email": "sam@example.com"
            })))
            .mount(&server)
            .await;

        let result = verifier(&server, Some("client-1"))
            .verify_id_token("tok")
            .await;
        assert!(matches!(result, Err(PortError::Unauthorized)));
    }

    #[tokio::test]
    async fn rejected_token_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_token"
            })))
            .mount(&server)
            .await;

        let result = verifier(&server, None).verify_id_token("bad").await;
        assert!(matches!(result, Err(PortError::Unauthorized)));
    }
}
