//! # Notifier
//!
//! Best-effort delivery of confirmation messages after roster changes.
//!
//! ```text
//! Notifier (trait) ── NotificationHandle ──► bounded queue ──► worker pool
//!                                                              └── Mailer ──► MailTransport
//! ```
//!
//! Callers hand a message over and move on; nothing about delivery flows back into
//! the request that triggered it.

pub mod dispatcher;
pub mod mailer;
pub mod message;
pub mod transport;

pub use dispatcher::{
    DispatcherRuntime, NotificationDispatcher, NotificationHandle, NotificationStats,
    ShutdownResult,
};
pub use mailer::{DeliveryOutcome, Mailer};
pub use message::NotificationMessage;
pub use transport::{
    Credentials, Envelope, InMemoryTransport, LogTransport, MailTransport, TransportError,
};

/// Fire-and-forget notification sink
pub trait Notifier: Send + Sync {
    /// Hand `message` off for background delivery without blocking
    ///
    /// Returns `false` when the message was dropped. Delivery failures after
    /// hand-off are never reported back.
    fn notify(&self, message: NotificationMessage) -> bool;
}
