//! crates/blog_client/src/error.rs
//!
//! Defines the error type shared by the client's services and controllers.

use blog_core::ValidationError;

use crate::session::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The access token was rejected and could not be refreshed.
    #[error("Your session has expired, please sign in again")]
    SessionExpired,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Image upload failed: {0}")]
    Upload(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The text to put in a toast: server messages and validation rules are
    /// shown verbatim, everything else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(rule) => rule.to_string(),
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            ClientError::SessionExpired => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
