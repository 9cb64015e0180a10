//! services/api/src/web/uploads.rs
//!
//! Hands out signed tickets for direct image uploads to the CDN. The image
//! bytes never pass through this service.

use axum::{extract::State, response::IntoResponse, Json};
use blog_core::UploadTicket;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::error::{HttpError, HttpResult};
use crate::web::state::AppState;

pub const IMAGE_FOLDER: &str = "blog_images";

#[derive(Serialize, ToSchema)]
pub struct UploadUrlResponse {
    #[serde(rename = "uploadData")]
    #[schema(value_type = Object)]
    pub upload_data: UploadTicket,
}

/// GET /get-upload-url - A signed, single-image upload ticket
#[utoipa::path(
    get,
    path = "/get-upload-url",
    responses(
        (status = 200, description = "Upload parameters and signature", body = UploadUrlResponse),
        (status = 500, description = "Failed to generate upload URL")
    ),
    security(("bearer" = []))
)]
pub async fn upload_url_handler(
    State(state): State<Arc<AppState>>,
) -> HttpResult<impl IntoResponse> {
    let upload_data = state
        .uploads
        .sign_upload(IMAGE_FOLDER, Utc::now())
        .map_err(|e| {
            error!("Error generating upload signature: {}", e);
            HttpError::Internal("Failed to generate upload URL".to_string())
        })?;
    Ok(Json(UploadUrlResponse { upload_data }))
}
