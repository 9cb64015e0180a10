//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use blog_core::ports::{DatabaseService, IdentityVerifier, Mailer, UploadSigner};

use crate::config::Config;
use crate::web::tokens::TokenService;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub mailer: Arc<dyn Mailer>,
    pub uploads: Arc<dyn UploadSigner>,
}
