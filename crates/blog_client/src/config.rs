//! crates/blog_client/src/config.rs
//!
//! Client configuration, read from the environment at startup.
//!
//! The host page (or the `render_route` binary) builds one `ClientConfig` and
//! hands it to `App::new`. Tests build it directly with `ClientConfig::new`.

use tracing::Level;
use url::Url;

const DEFAULT_SERVER_DOMAIN: &str = "http://localhost:3000";
const DEFAULT_UPLOAD_BASE: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_APP_URL: &str = "http://localhost:5173";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// How the editor route prepares the rich-text editor on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorInit {
    /// Editor state is rebuilt from the draft context on every mount.
    #[default]
    Idempotent,
    /// The first visit to the editor in a session asks the host for one full
    /// reload, tracked by the `editorReloaded` session flag.
    ForceReloadOnce,
}

impl EditorInit {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "idempotent" => Some(EditorInit::Idempotent),
            "reload-once" | "reload_once" => Some(EditorInit::ForceReloadOnce),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub server_domain: String,
    /// Base URL of the image CDN upload endpoint.
    pub upload_base: String,
    /// Public address of the page itself, used for share links.
    pub app_url: String,
    pub editor_init: EditorInit,
    pub log_level: Level,
}

impl ClientConfig {
    pub fn new(server_domain: impl Into<String>) -> Self {
        let server_domain: String = server_domain.into();
        Self {
            server_domain: server_domain.trim_end_matches('/').to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
            editor_init: EditorInit::default(),
            log_level: Level::INFO,
        }
    }

    pub fn with_editor_init(mut self, editor_init: EditorInit) -> Self {
        self.editor_init = editor_init;
        self
    }

    pub fn with_upload_base(mut self, upload_base: impl Into<String>) -> Self {
        let upload_base: String = upload_base.into();
        self.upload_base = upload_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_app_url(mut self, app_url: impl Into<String>) -> Self {
        let app_url: String = app_url.into();
        self.app_url = app_url.trim_end_matches('/').to_string();
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// A `.env` file is honoured outside of tests.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let server_domain = std::env::var("SERVER_DOMAIN")
            .unwrap_or_else(|_| DEFAULT_SERVER_DOMAIN.to_string());
        Url::parse(&server_domain).map_err(|e| {
            ConfigError::InvalidValue("SERVER_DOMAIN".to_string(), e.to_string())
        })?;

        let upload_base =
            std::env::var("UPLOAD_BASE").unwrap_or_else(|_| DEFAULT_UPLOAD_BASE.to_string());
        Url::parse(&upload_base)
            .map_err(|e| ConfigError::InvalidValue("UPLOAD_BASE".to_string(), e.to_string()))?;

        let app_url = std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string());
        Url::parse(&app_url)
            .map_err(|e| ConfigError::InvalidValue("APP_URL".to_string(), e.to_string()))?;

        let editor_init = match std::env::var("EDITOR_INIT") {
            Ok(raw) => EditorInit::parse(&raw).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "EDITOR_INIT".to_string(),
                    format!("'{}' is neither 'idempotent' nor 'reload-once'", raw),
                )
            })?,
            Err(_) => EditorInit::default(),
        };

        let log_level_str = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "LOG_LEVEL".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self::new(server_domain)
            .with_upload_base(upload_base)
            .with_app_url(app_url)
            .with_editor_init(editor_init)
            .with_log_level(log_level))
    }

    fn with_log_level(mut self, log_level: Level) -> Self {
        self.log_level = log_level;
        self
    }

    /// Absolute URL of an API path such as `/login`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_domain, path)
    }

    /// Absolute URL of a client route such as `/blog/hello`.
    pub fn page_url(&self, route: &str) -> String {
        format!("{}/#{}", self.app_url, route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let config = ClientConfig::new("http://api.local/");
        assert_eq!(config.endpoint("/login"), "http://api.local/login");

        let config = config.with_app_url("https://blog.local/");
        assert_eq!(config.page_url("/blog/x"), "https://blog.local/#/blog/x");
    }

    #[test]
    fn editor_init_parses_both_spellings() {
        assert_eq!(EditorInit::parse("reload-once"), Some(EditorInit::ForceReloadOnce));
        assert_eq!(EditorInit::parse(" Idempotent "), Some(EditorInit::Idempotent));
        assert_eq!(EditorInit::parse("sometimes"), None);
    }
}
