//! Error types for the roster core.
//!
//! Roster outcomes are expected business results, not faults. They travel back to the
//! boundary as `Result` values and are mapped to transport status codes there.

use thiserror::Error;

/// Rejected roster mutation or lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Activity not found: {activity}")]
    NotFound { activity: String },
    #[error("Student {email} is already signed up for {activity}")]
    AlreadyEnrolled { activity: String, email: String },
    #[error("Student {email} is not signed up for {activity}")]
    NotEnrolled { activity: String, email: String },
    #[error("Activity {activity} is full ({max_participants} participants)")]
    CapacityExceeded {
        activity: String,
        max_participants: usize,
    },
}

impl RosterError {
    pub fn not_found(activity: impl Into<String>) -> Self {
        Self::NotFound {
            activity: activity.into(),
        }
    }

    /// Stable machine-readable code, used in logs and error payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyEnrolled { .. } => "ALREADY_ENROLLED",
            Self::NotEnrolled { .. } => "NOT_ENROLLED",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
        }
    }

    /// Short student-facing message without identifying details
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Activity not found",
            Self::AlreadyEnrolled { .. } => "Student is already signed up",
            Self::NotEnrolled { .. } => "Student is not signed up for this activity",
            Self::CapacityExceeded { .. } => "Activity is full",
        }
    }

    /// Name of the activity the request targeted
    pub fn activity(&self) -> &str {
        match self {
            Self::NotFound { activity }
            | Self::AlreadyEnrolled { activity, .. }
            | Self::NotEnrolled { activity, .. }
            | Self::CapacityExceeded { activity, .. } => activity,
        }
    }
}

pub type RosterResult<T> = std::result::Result<T, RosterError>;

/// Invalid seed data handed to the registry at construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("Activity name must not be empty")]
    EmptyName,
    #[error("Duplicate activity name: {0}")]
    DuplicateActivity(String),
    #[error("Activity {activity} must allow at least one participant")]
    ZeroCapacity { activity: String },
    #[error("Activity {activity} lists {email} more than once")]
    DuplicateParticipant { activity: String, email: String },
    #[error("Activity {activity} starts with {participants} participants but allows only {max_participants}")]
    OverCapacity {
        activity: String,
        participants: usize,
        max_participants: usize,
    },
}
