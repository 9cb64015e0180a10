//! crates/blog_client/src/views/mod.rs
//!
//! Pure render functions. Each page module returns `maud` markup and, next to
//! it, the binding table for the element ids that markup introduces.

pub mod admin;
pub mod auth;
pub mod blocks;
pub mod blog;
pub mod components;
pub mod editor;
pub mod errors;
pub mod home;
pub mod profile;
pub mod toast;

pub use blocks::{render_block, render_content};
pub use components::time_ago;
pub use errors::{not_found, placeholder, server_error};
