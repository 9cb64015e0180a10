//! services/api/src/adapters/mailer.rs
//!
//! Mail transports behind the `Mailer` port: SMTP for real deployments and a
//! logging transport for development and tests.

use async_trait::async_trait;
use blog_core::ports::{Mailer, PortError, PortResult};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Mutex;
use tracing::info;

use crate::config::SmtpConfig;

//=========================================================================================
// SMTP
//=========================================================================================

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> PortResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: config.username.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> PortResult<()> {
        let invalid = |e: lettre::address::AddressError| PortError::Unexpected(e.to_string());
        let message = Message::builder()
            .from(self.from.parse().map_err(invalid)?)
            .to(to.parse().map_err(invalid)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        info!("Sent '{}' to {}", subject, to);
        Ok(())
    }
}

//=========================================================================================
// Logging
//=========================================================================================

/// A mail that was "sent" through the logging transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Logs every mail instead of delivering it, and keeps it for inspection.
#[derive(Default)]
pub struct LogMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> PortResult<()> {
        info!("Mail to {} ({}):\n{}", to, subject, html_body);
        self.sent
            .lock()
            .map_err(|_| PortError::Unexpected("mail log is poisoned".to_string()))?
            .push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
            });
        Ok(())
    }
}
