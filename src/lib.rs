#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Activity Roster
//!
//! Roster core for school extracurricular activities: students sign up and withdraw,
//! capacity limits hold under concurrent requests, and every committed change is
//! followed by a best-effort confirmation email.
//!
//! ## Architecture
//!
//! ```text
//! caller ─► RegistrationService ─► ActivityRegistry   (validate + mutate, per-activity lock)
//!                 │
//!                 └──────────────► Notifier           (bounded queue, worker pool, fire-and-forget)
//! ```
//!
//! ## Module Organization
//!
//! - [`models`] - Activity record
//! - [`registry`] - Concurrent in-memory activity registry and seed data
//! - [`services`] - Signup/unregister orchestration
//! - [`notifier`] - Notification queue, mailer and transports
//! - [`config`] - Layered configuration
//! - [`error`] - Roster outcome and construction errors
//! - [`logging`] - Structured logging setup
//! - [`web`] - Axum boundary adapter
//!
//! ## Quick Start
//!
//! ```rust
//! use activity_roster::config::EmailSettings;
//! use activity_roster::notifier::{InMemoryTransport, Mailer, NotificationDispatcher};
//! use activity_roster::registry::ActivityRegistry;
//! use activity_roster::services::RegistrationService;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mailer = Arc::new(Mailer::new(EmailSettings::default(), Arc::new(InMemoryTransport::new())));
//! let (dispatcher, notifications) = NotificationDispatcher::new(mailer, Default::default());
//! let runtime = dispatcher.start();
//!
//! let registry = Arc::new(ActivityRegistry::seeded()?);
//! let service = RegistrationService::new(registry, Arc::new(notifications));
//!
//! let outcome = service.signup("Chess Club", "new@mergington.edu")?;
//! assert_eq!(outcome.message, "Signed up new@mergington.edu for Chess Club");
//!
//! runtime.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod notifier;
pub mod registry;
pub mod services;
pub mod web;

pub use config::{ConfigManager, EmailSettings, NotifierConfig, RosterConfig, WebConfig};
pub use error::{RosterError, RosterResult, SeedError};
pub use models::Activity;
pub use notifier::{NotificationHandle, NotificationMessage, Notifier};
pub use registry::{ActivityRegistry, RegistryStats, RosterChange};
pub use services::{RegistrationOutcome, RegistrationService};
