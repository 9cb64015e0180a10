//! services/api/src/adapters/cloudinary.rs
//!
//! Signs direct-upload tickets for the Cloudinary image CDN.
//!
//! The signature is the SHA-256 of the signed parameters, sorted by name and
//! joined as `k=v&k=v`, followed by the API secret.

use blog_core::ports::{PortError, PortResult, UploadSigner};
use blog_core::UploadTicket;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::CloudinaryConfig;

pub struct CloudinarySigner {
    config: CloudinaryConfig,
}

impl CloudinarySigner {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self { config }
    }
}

/// Signs `params` the way the CDN verifies them.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl UploadSigner for CloudinarySigner {
    fn sign_upload(&self, folder: &str, now: DateTime<Utc>) -> PortResult<UploadTicket> {
        if self.config.api_secret.is_empty() || self.config.api_key.is_empty() {
            return Err(PortError::Unexpected(
                "Cloudinary credentials are not configured".to_string(),
            ));
        }

        let timestamp = now.timestamp();
        let public_id = format!("{}-{}", Uuid::new_v4().simple(), timestamp);
        let signature = sign_params(
            &[
                ("timestamp", timestamp.to_string()),
                ("public_id", public_id.clone()),
                ("folder", folder.to_string()),
            ],
            &self.config.api_secret,
        );

        Ok(UploadTicket {
            timestamp,
            signature,
            public_id,
            api_key: self.config.api_key.clone(),
            cloud_name: self.config.cloud_name.clone(),
            folder: folder.to_string(),
            signature_algorithm: "sha256".to_string(),
        })
    }
}
