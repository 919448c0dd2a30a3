//! Shared helpers for the integration tests.

#![allow(dead_code)]

pub mod strategies;

use parking_lot::Mutex;
use std::sync::Arc;

use activity_roster::config::{EmailSettings, NotifierConfig};
use activity_roster::notifier::{
    DispatcherRuntime, InMemoryTransport, Mailer, NotificationDispatcher, NotificationHandle,
    NotificationMessage, Notifier,
};
use activity_roster::registry::ActivityRegistry;
use activity_roster::services::RegistrationService;
use activity_roster::Activity;

/// Notifier that keeps every message in memory
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: NotificationMessage) -> bool {
        self.sent.lock().push(message);
        true
    }
}

pub fn configured_settings() -> EmailSettings {
    EmailSettings {
        host: Some("smtp.mergington.edu".to_string()),
        from_email: Some("activities@mergington.edu".to_string()),
        ..EmailSettings::default()
    }
}

/// Registry with a single activity of the given capacity and roster
pub fn single_activity_registry(name: &str, max: usize, members: &[&str]) -> ActivityRegistry {
    let activity = Activity::new("Test activity", "Mondays, 3:00 PM", max)
        .with_participants(members.iter().copied());
    ActivityRegistry::from_activities(vec![(name.to_string(), activity)])
        .expect("valid test activity")
}

/// Full stack: seeded registry, running dispatcher, in-memory outbox
pub struct TestStack {
    pub registry: Arc<ActivityRegistry>,
    pub service: Arc<RegistrationService>,
    pub notifications: NotificationHandle,
    pub runtime: DispatcherRuntime,
    pub transport: InMemoryTransport,
}

impl TestStack {
    pub fn start() -> Self {
        Self::start_with(
            ActivityRegistry::seeded().expect("seed data is valid"),
            configured_settings(),
            NotifierConfig::default(),
        )
    }

    pub fn start_with(
        registry: ActivityRegistry,
        settings: EmailSettings,
        notifier: NotifierConfig,
    ) -> Self {
        let transport = InMemoryTransport::new();
        let mailer = Arc::new(Mailer::new(settings, Arc::new(transport.clone())));
        let (dispatcher, notifications) = NotificationDispatcher::new(mailer, notifier);
        let runtime = dispatcher.start();

        let registry = Arc::new(registry);
        let service = Arc::new(RegistrationService::new(
            Arc::clone(&registry),
            Arc::new(notifications.clone()),
        ));

        Self {
            registry,
            service,
            notifications,
            runtime,
            transport,
        }
    }
}
