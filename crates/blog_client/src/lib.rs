//! crates/blog_client/src/lib.rs
//!
//! Core of the blogging single-page client: hash routing, the session-backed
//! application context, the REST client with its one-shot token refresh, and
//! the page views. The page itself is reached through the `Host` trait.

pub mod api;
pub mod app;
pub mod bindings;
pub mod config;
pub mod context;
pub mod controllers;
pub mod error;
pub mod host;
pub mod layout;
pub mod router;
pub mod services;
pub mod session;
pub mod views;

pub use app::App;
pub use bindings::{Action, Binding, EventKind, UiEvent};
pub use config::{ClientConfig, ConfigError, EditorInit};
pub use context::{AppContext, BlogField, UserContext};
pub use error::{ClientError, ClientResult};
pub use host::{Host, MemoryHost, Notification, Toast, ToastLevel};
pub use layout::Layout;
pub use router::{resolve, Location, Page};
pub use session::{MemoryBackend, SessionBackend, SessionStore, StorageError};
