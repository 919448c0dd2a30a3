//! Notification messages and the confirmation templates sent after roster changes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Activity;

/// A single message for one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    pub id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl NotificationMessage {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    /// Confirmation sent after a successful signup
    pub fn registration_confirmation(
        activity_name: &str,
        activity: &Activity,
        student: &str,
    ) -> Self {
        let body = format!(
            "Registration Confirmation\n\
             ---------------------------\n\
             Student: {student}\n\
             Activity: {activity_name}\n\
             Schedule: {schedule}\n\
             Location: {location}\n\n\
             You are successfully registered. If you need to cancel, use the unregister option on the site.",
            schedule = activity.schedule,
            location = activity.location_or_default(),
        );

        Self::new(
            student,
            format!("Successfully Registered for {activity_name}"),
            body,
        )
    }

    /// Confirmation sent after a successful unregister
    pub fn cancellation_confirmation(
        activity_name: &str,
        activity: &Activity,
        student: &str,
    ) -> Self {
        let body = format!(
            "Cancellation Confirmation\n\
             ---------------------------\n\
             Student: {student}\n\
             Activity: {activity_name}\n\
             Schedule: {schedule}\n\n\
             Your registration has been cancelled. You can re-register anytime if spots are available.",
            schedule = activity.schedule,
        );

        Self::new(
            student,
            format!("Activity Registration Cancelled - {activity_name}"),
            body,
        )
    }
}
