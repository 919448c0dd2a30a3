//! # Registry Infrastructure
//!
//! In-memory activity registry and its startup seed data.
//!
//! ```text
//! Registry
//! ├── ActivityRegistry   (per-activity atomic enroll/withdraw)
//! └── seed               (startup activity set)
//! ```

pub mod activity_registry;
pub mod seed;

// Re-export main types for easy access
pub use activity_registry::{ActivityRegistry, RegistryStats, RosterChange};
pub use seed::mergington_activities;
