//! crates/blog_client/src/api.rs
//!
//! Thin HTTP wrapper around the REST API.
//!
//! Every request carries the current access token. A 401 triggers exactly one
//! silent refresh through the refresh cookie, after which the original
//! request is replayed once. If the refresh itself fails the user is signed
//! out and sent to the login route.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::host::Host;

pub const REFRESH_PATH: &str = "/refresh-token";

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    context: AppContext,
    host: Arc<dyn Host>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        context: AppContext,
        host: Arc<dyn Host>,
    ) -> ClientResult<Self> {
        // The cookie store carries the httpOnly refresh cookie between calls.
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            config: config.clone(),
            context,
            host,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(encode(body)?)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, Some(encode(body)?)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::DELETE, path, None).await
    }

    /// Mints a new access token from the refresh cookie and stores it.
    pub async fn refresh(&self) -> ClientResult<String> {
        let response = self
            .http
            .post(self.config.endpoint(REFRESH_PATH))
            .send()
            .await?;
        let refreshed: RefreshResponse = decode(response).await?;
        self.context
            .set_access_token(Some(refreshed.access_token.clone()))?;
        Ok(refreshed.access_token)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        let response = self.execute(method.clone(), path, body.as_ref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED || path == REFRESH_PATH {
            return decode(response).await;
        }

        debug!("{} {} was rejected, refreshing the access token", method, path);
        if let Err(e) = self.refresh().await {
            warn!("Token refresh failed, signing out: {}", e);
            self.context.clear_user();
            self.host.navigate("/login");
            return Err(ClientError::SessionExpired);
        }

        // The replay is final: a second 401 is returned to the caller as is.
        let replay = self.execute(method, path, body.as_ref()).await?;
        decode(replay).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Response> {
        let mut request = self.http.request(method, self.config.endpoint(path));
        if let Some(token) = self.context.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ClientResult<Value> {
    serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        return serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()));
    }

    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &text),
    })
}

/// Error bodies are `{"error": "..."}` or `{"message": "..."}`.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::session::SessionStore;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, token: Option<&str>) -> (ApiClient, AppContext, Arc<MemoryHost>) {
        let context = AppContext::load(SessionStore::in_memory());
        context.set_access_token(token.map(str::to_string)).unwrap();
        let host = Arc::new(MemoryHost::new());
        let api = ApiClient::new(&ClientConfig::new(server.uri()), context.clone(), host.clone())
            .unwrap();
        (api, context, host)
    }

    #[tokio::test]
    async fn bearer_token_is_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest-blogs"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blogs": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let (api, _, _) = client(&server, Some("abc"));
        let body: Value = api.get("/latest-blogs").await.unwrap();
        assert_eq!(body, json!({ "blogs": [] }));
    }

    #[tokio::test]
    async fn unauthorized_call_refreshes_once_and_replays() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get-drafts-by-username"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/get-drafts-by-username"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blogs": [] })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
            .expect(1)
            .mount(&server)
            .await;

        let (api, context, _) = client(&server, Some("old"));
        let body: Value = api.get("/get-drafts-by-username").await.unwrap();

        assert_eq!(body["blogs"], json!([]));
        assert_eq!(context.access_token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn rejected_replay_does_not_refresh_again() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/like-blog"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
            .expect(1)
            .mount(&server)
            .await;

        let (api, _, host) = client(&server, Some("old"));
        let result: ClientResult<Value> = api.post("/like-blog", &json!({ "_id": "b" })).await;

        assert_eq!(result.unwrap_err().status(), Some(401));
        assert!(host.navigations().is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_signs_out_and_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get-all-blogs"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "No refresh token" })))
            .expect(1)
            .mount(&server)
            .await;

        let (api, context, host) = client(&server, Some("old"));
        let result: ClientResult<Value> = api.get("/get-all-blogs").await;

        assert!(matches!(result, Err(ClientError::SessionExpired)));
        assert!(context.user().is_empty());
        assert_eq!(host.navigations(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn error_bodies_become_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "message": "Invalid email or password" })),
            )
            .mount(&server)
            .await;

        let (api, _, _) = client(&server, None);
        let err = api
            .post::<Value, _>("/login", &json!({}))
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_message_falls_back_to_reason_phrase() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, "<html>"), "Not Found");
        assert_eq!(
            error_message(StatusCode::FORBIDDEN, r#"{"error":"Admins only"}"#),
            "Admins only"
        );
    }
}
