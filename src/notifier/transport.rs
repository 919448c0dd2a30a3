//! # Mail Transport
//!
//! Seam between the notification workers and whatever actually moves mail. The
//! roster core only needs "deliver this envelope or tell me why not"; wire-level
//! SMTP lives behind this trait.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Fully addressed mail ready for a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    /// Login for the mail server, present only when both halves are configured
    pub credentials: Option<Credentials>,
}

/// SMTP login handed to the transport
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Password stays out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Delivery failure reported by a transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Mail server unreachable: {0}")]
    Unreachable(String),
    #[error("Recipient rejected: {0}")]
    RecipientRejected(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Transport error: {0}")]
    Other(String),
}

#[async_trait]
pub trait MailTransport: Send + Sync + std::fmt::Debug {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), TransportError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Transport that writes each envelope to the log instead of a mail server
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), TransportError> {
        info!(
            from = %envelope.from,
            to = %envelope.to,
            subject = %envelope.subject,
            server = %format!("{}:{}", envelope.host, envelope.port),
            use_tls = envelope.use_tls,
            authenticated = envelope.credentials.is_some(),
            "📨 Mail delivered to log transport"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// In-memory outbox; can be switched to fail every delivery
#[derive(Debug, Default, Clone)]
pub struct InMemoryTransport {
    outbox: Arc<Mutex<Vec<Envelope>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that rejects every envelope as unreachable
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.set_failing(true);
        transport
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Copy of everything delivered so far
    pub fn delivered(&self) -> Vec<Envelope> {
        self.outbox.lock().clone()
    }

    pub fn delivered_to(&self, recipient: &str) -> Vec<Envelope> {
        self.outbox
            .lock()
            .iter()
            .filter(|e| e.to == recipient)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.outbox.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.outbox.lock().is_empty()
    }
}

#[async_trait]
impl MailTransport for InMemoryTransport {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Unreachable(format!(
                "{}:{}",
                envelope.host, envelope.port
            )));
        }
        self.outbox.lock().push(envelope.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(to: &str) -> Envelope {
        Envelope {
            from: "Office <office@x.edu>".to_string(),
            to: to.to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
            host: "smtp.x.edu".to_string(),
            port: 587,
            use_tls: true,
            credentials: None,
        }
    }

    #[tokio::test]
    async fn test_in_memory_outbox() {
        let transport = InMemoryTransport::new();
        transport.deliver(&envelope("a@x.edu")).await.unwrap();
        transport.deliver(&envelope("b@x.edu")).await.unwrap();

        assert_eq!(transport.len(), 2);
        assert_eq!(transport.delivered_to("b@x.edu").len(), 1);
    }

    #[tokio::test]
    async fn test_failing_transport() {
        let transport = InMemoryTransport::failing();
        let err = transport.deliver(&envelope("a@x.edu")).await.unwrap_err();
        let expected = TransportError::Unreachable("smtp.x.edu:587".to_string());
        assert_eq!(err, expected);
        assert!(transport.is_empty());

        transport.set_failing(false);
        assert!(transport.deliver(&envelope("a@x.edu")).await.is_ok());
    }

    #[tokio::test]
    async fn test_log_transport_accepts_everything() {
        assert!(LogTransport.deliver(&envelope("a@x.edu")).await.is_ok());
        assert_eq!(LogTransport.name(), "log");
    }

    #[tokio::test]
    async fn test_credentials_reach_the_transport_but_not_the_logs() {
        let transport = InMemoryTransport::new();
        let envelope = Envelope {
            credentials: Some(Credentials::new("mailer", "hunter2")),
            ..envelope("a@x.edu")
        };
        transport.deliver(&envelope).await.unwrap();

        let sent = transport.delivered();
        let credentials = sent[0].credentials.as_ref().unwrap();
        assert_eq!(credentials.username, "mailer");
        assert_eq!(credentials.password, "hunter2");

        let rendered = format!("{envelope:?}");
        assert!(rendered.contains("mailer"));
        assert!(!rendered.contains("hunter2"));

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
