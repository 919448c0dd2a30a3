//! # Registration Service
//!
//! Orchestrates signup and unregister: mutate the registry, then queue the matching
//! confirmation. The caller's result is decided by the registry alone; whether the
//! notification makes it out never changes it.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::RosterResult;
use crate::models::Activity;
use crate::notifier::{NotificationMessage, Notifier};
use crate::registry::{ActivityRegistry, RosterChange};

/// Successful signup or unregister
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationOutcome {
    /// Human-readable confirmation echoing the email and activity
    pub message: String,
    pub activity_name: String,
    pub email: String,
    pub participant_count: usize,
    /// Whether the confirmation was accepted by the notification queue
    pub notification_queued: bool,
}

pub struct RegistrationService {
    registry: Arc<ActivityRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for RegistrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationService")
            .field("activities", &self.registry.len())
            .finish()
    }
}

impl RegistrationService {
    pub fn new(registry: Arc<ActivityRegistry>, notifier: Arc<dyn Notifier>) -> Self {
        Self { registry, notifier }
    }

    pub fn registry(&self) -> &Arc<ActivityRegistry> {
        &self.registry
    }

    /// Snapshot of every activity for display, in seed order
    pub fn list_activities(&self) -> IndexMap<String, Activity> {
        self.registry.list_all()
    }

    pub fn get_activity(&self, activity_name: &str) -> RosterResult<Activity> {
        self.registry.get(activity_name)
    }

    /// Sign a student up and queue the registration confirmation
    #[instrument(skip(self))]
    pub fn signup(&self, activity_name: &str, email: &str) -> RosterResult<RegistrationOutcome> {
        let change = self.registry.enroll(activity_name, email)?;
        let notification = NotificationMessage::registration_confirmation(
            &change.activity_name,
            &change.activity,
            &change.email,
        );
        let message = format!("Signed up {} for {}", change.email, change.activity_name);

        Ok(self.complete(change, notification, message))
    }

    /// Remove a student and queue the cancellation confirmation
    #[instrument(skip(self))]
    pub fn unregister(
        &self,
        activity_name: &str,
        email: &str,
    ) -> RosterResult<RegistrationOutcome> {
        let change = self.registry.withdraw(activity_name, email)?;
        let notification = NotificationMessage::cancellation_confirmation(
            &change.activity_name,
            &change.activity,
            &change.email,
        );
        let message = format!(
            "Unregistered {} from {}",
            change.email, change.activity_name
        );

        Ok(self.complete(change, notification, message))
    }

    fn complete(
        &self,
        change: RosterChange,
        notification: NotificationMessage,
        message: String,
    ) -> RegistrationOutcome {
        let notification_id = notification.id;
        let notification_queued = self.notifier.notify(notification);

        if notification_queued {
            debug!(notification_id = %notification_id, "Confirmation queued");
        } else {
            warn!(
                notification_id = %notification_id,
                activity = %change.activity_name,
                email = %change.email,
                "Confirmation not queued; roster change stands"
            );
        }

        RegistrationOutcome {
            message,
            participant_count: change.activity.participants.len(),
            activity_name: change.activity_name,
            email: change.email,
            notification_queued,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<NotificationMessage>>,
        reject: bool,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: NotificationMessage) -> bool {
            if self.reject {
                return false;
            }
            self.sent.lock().push(message);
            true
        }
    }

    fn service_with(notifier: Arc<RecordingNotifier>) -> RegistrationService {
        let registry = Arc::new(ActivityRegistry::seeded().unwrap());
        RegistrationService::new(registry, notifier)
    }

    #[test]
    fn test_signup_queues_registration_confirmation() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service_with(Arc::clone(&notifier));

        let outcome = service.signup("Chess Club", "new@mergington.edu").unwrap();
        assert_eq!(
            outcome.message,
            "Signed up new@mergington.edu for Chess Club"
        );
        assert_eq!(outcome.participant_count, 3);
        assert!(outcome.notification_queued);

        let sent = notifier.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "new@mergington.edu");
        assert!(sent[0].subject.contains("Chess Club"));
        assert!(sent[0].body.contains("Fridays, 3:30 PM - 5:00 PM"));
    }

    #[test]
    fn test_unregister_queues_cancellation() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service_with(Arc::clone(&notifier));

        let outcome = service
            .unregister("Chess Club", "michael@mergington.edu")
            .unwrap();
        assert_eq!(
            outcome.message,
            "Unregistered michael@mergington.edu from Chess Club"
        );
        assert_eq!(outcome.participant_count, 1);

        let sent = notifier.sent.lock();
        assert_eq!(
            sent[0].subject,
            "Activity Registration Cancelled - Chess Club"
        );
    }

    #[test]
    fn test_failures_send_nothing() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service_with(Arc::clone(&notifier));

        assert!(matches!(
            service.signup("Nonexistent Club", "a@b.edu"),
            Err(RosterError::NotFound { .. })
        ));
        assert!(matches!(
            service.signup("Chess Club", "michael@mergington.edu"),
            Err(RosterError::AlreadyEnrolled { .. })
        ));
        assert!(matches!(
            service.unregister("Chess Club", "stranger@mergington.edu"),
            Err(RosterError::NotEnrolled { .. })
        ));
        assert!(notifier.sent.lock().is_empty());
    }

    #[test]
    fn test_dropped_notification_keeps_mutation() {
        let notifier = Arc::new(RecordingNotifier {
            reject: true,
            ..RecordingNotifier::default()
        });
        let service = service_with(notifier);

        let outcome = service.signup("Art Club", "new@mergington.edu").unwrap();
        assert!(!outcome.notification_queued);
        let art = service.get_activity("Art Club").unwrap();
        assert!(art.is_enrolled("new@mergington.edu"));
    }
}
