//! crates/blog_client/src/services/upload.rs
//!
//! Image uploads go straight from the client to the CDN. The API only hands
//! out a signed ticket; the file itself never passes through it.

use std::sync::Arc;

use blog_core::UploadTicket;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};

/// An image picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Deserialize)]
struct TicketResponse {
    #[serde(rename = "uploadData")]
    upload_data: UploadTicket,
}

#[derive(Deserialize)]
struct CdnResponse {
    secure_url: String,
}

#[derive(Clone)]
pub struct UploadService {
    api: Arc<ApiClient>,
}

impl UploadService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn ticket(&self) -> ClientResult<UploadTicket> {
        let response: TicketResponse = self.api.get("/get-upload-url").await?;
        Ok(response.upload_data)
    }

    /// Uploads `image` and returns its public URL.
    pub async fn upload(&self, image: ImageFile) -> ClientResult<String> {
        if !image.mime.starts_with("image/") {
            return Err(ClientError::Upload(format!(
                "'{}' is not an image",
                image.file_name
            )));
        }

        let ticket = self.ticket().await?;
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime)
            .map_err(|e| ClientError::Upload(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("api_key", ticket.api_key)
            .text("timestamp", ticket.timestamp.to_string())
            .text("public_id", ticket.public_id)
            .text("signature", ticket.signature)
            .text("folder", ticket.folder)
            .text("signature_algorithm", ticket.signature_algorithm);

        let url = format!(
            "{}/{}/image/upload",
            self.api.config().upload_base,
            ticket.cloud_name
        );
        debug!("Uploading image to {}", url);
        let response = self.api.http().post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Upload(format!("{}: {}", status, body)));
        }

        let uploaded: CdnResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(uploaded.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::context::AppContext;
    use crate::host::MemoryHost;
    use crate::session::SessionStore;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> UploadService {
        let config = ClientConfig::new(server.uri()).with_upload_base(server.uri());
        let api = ApiClient::new(
            &config,
            AppContext::load(SessionStore::in_memory()),
            Arc::new(MemoryHost::new()),
        )
        .unwrap();
        UploadService::new(Arc::new(api))
    }

    #[tokio::test]
    async fn upload_uses_the_signed_ticket() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get-upload-url"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uploadData": {
                    "timestamp": 1700000000,
                    "signature": "sig",
                    "public_id": "abc-1700000000",
                    "api_key": "key",
                    "cloud_name": "demo",
                    "folder": "blog_images"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/demo/image/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "secure_url": "https://cdn/demo/abc.png" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = service(&server)
            .upload(ImageFile {
                file_name: "banner.png".into(),
                mime: "image/png".into(),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            })
            .await
            .unwrap();

        assert_eq!(url, "https://cdn/demo/abc.png");
    }

    #[tokio::test]
    async fn non_images_are_rejected_locally() {
        let server = MockServer::start().await;
        let result = service(&server)
            .upload(ImageFile {
                file_name: "notes.txt".into(),
                mime: "text/plain".into(),
                bytes: b"hi".to_vec(),
            })
            .await;

        assert!(matches!(result, Err(ClientError::Upload(_))));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }
}
