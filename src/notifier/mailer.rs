//! Turns notification messages into envelopes and hands them to the transport.
//!
//! Every failure stops here. Callers only learn the [`DeliveryOutcome`].
//!
//! ```rust
//! use activity_roster::config::EmailSettings;
//! use activity_roster::notifier::{DeliveryOutcome, InMemoryTransport, Mailer, NotificationMessage};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let outbox = InMemoryTransport::new();
//! let mailer = Mailer::new(EmailSettings::default(), Arc::new(outbox.clone()));
//!
//! // No host or sender configured
//! let message = NotificationMessage::new("new@mergington.edu", "Hello", "Body");
//! assert_eq!(mailer.send(&message).await, DeliveryOutcome::Skipped);
//! assert!(outbox.is_empty());
//! # });
//! ```

use std::sync::Arc;
use tracing::{debug, error};

use super::message::NotificationMessage;
use super::transport::{Credentials, Envelope, MailTransport};
use crate::config::EmailSettings;
use crate::logging::log_notification_operation;

/// Result of a single delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Mail settings incomplete; nothing was attempted
    Skipped,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Mailer {
    settings: EmailSettings,
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    pub fn new(settings: EmailSettings, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    pub fn settings(&self) -> &EmailSettings {
        &self.settings
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    /// Attempt delivery once, never retrying and never returning an error
    pub async fn send(&self, message: &NotificationMessage) -> DeliveryOutcome {
        let notification_id = message.id.to_string();

        let Some(envelope) = self.envelope_for(message) else {
            debug!(
                notification_id = %notification_id,
                recipient = %message.recipient,
                "Email settings not configured; skipping email send"
            );
            log_notification_operation(
                "deliver",
                &notification_id,
                &message.recipient,
                "skipped",
                Some("email settings not configured"),
            );
            return DeliveryOutcome::Skipped;
        };

        match self.transport.deliver(&envelope).await {
            Ok(()) => {
                log_notification_operation(
                    "deliver",
                    &notification_id,
                    &message.recipient,
                    "delivered",
                    Some(self.transport.name()),
                );
                DeliveryOutcome::Delivered
            }
            Err(e) => {
                error!(
                    notification_id = %notification_id,
                    recipient = %message.recipient,
                    transport = self.transport.name(),
                    error = %e,
                    "Failed to send email"
                );
                DeliveryOutcome::Failed
            }
        }
    }

    fn envelope_for(&self, message: &NotificationMessage) -> Option<Envelope> {
        if !self.settings.is_configured() {
            return None;
        }

        Some(Envelope {
            from: self.settings.sender(),
            to: message.recipient.clone(),
            subject: message.subject.clone(),
            body: message.body.clone(),
            host: self.settings.host.clone().unwrap_or_default(),
            port: self.settings.port,
            use_tls: self.settings.use_tls,
            credentials: self.credentials(),
        })
    }

    fn credentials(&self) -> Option<Credentials> {
        if !self.settings.has_credentials() {
            return None;
        }
        let username = self.settings.username.as_deref()?;
        let password = self.settings.password.as_deref()?;
        Some(Credentials::new(username, password))
    }
}
