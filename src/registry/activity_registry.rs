//! # Activity Registry
//!
//! Authoritative in-memory store of all activities and their rosters.
//!
//! ## Concurrency
//!
//! Activities live in a sharded [`DashMap`]. Every mutation runs entirely under the
//! entry's write guard, so the membership check, the capacity check and the roster
//! update for one activity form a single critical section. Mutations on activities
//! in different shards proceed in parallel.
//!
//! ```text
//! enroll(name, email)
//!   └── get_mut(name)            (write guard on the entry's shard)
//!         ├── already enrolled?  -> AlreadyEnrolled
//!         ├── roster full?       -> CapacityExceeded
//!         └── push(email)        -> RosterChange (post-mutation snapshot)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use activity_roster::registry::ActivityRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ActivityRegistry::seeded()?;
//! let change = registry.enroll("Chess Club", "new@mergington.edu")?;
//! assert_eq!(change.activity.participants.len(), 3);
//! # Ok(())
//! # }
//! ```

use dashmap::DashMap;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::error::{RosterError, RosterResult, SeedError};
use crate::logging::log_roster_operation;
use crate::models::Activity;

use super::seed::mergington_activities;

/// Committed roster mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterChange {
    pub activity_name: String,
    pub email: String,
    /// Activity as it stands right after the mutation
    pub activity: Activity,
}

/// Registry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub total_activities: usize,
    pub total_participants: usize,
    pub full_activities: usize,
    pub open_seats: usize,
}

/// Concurrent registry of activities keyed by case-sensitive name
#[derive(Debug, Default)]
pub struct ActivityRegistry {
    activities: DashMap<String, Activity>,
    /// Seed order, fixed at construction
    order: Vec<String>,
}

impl ActivityRegistry {
    /// Build a registry from seed data, validating every record
    pub fn from_activities<I>(activities: I) -> Result<Self, SeedError>
    where
        I: IntoIterator<Item = (String, Activity)>,
    {
        let map = DashMap::new();
        let mut order = Vec::new();
        for (name, activity) in activities {
            validate_seed(&name, &activity)?;
            if map.contains_key(&name) {
                return Err(SeedError::DuplicateActivity(name));
            }
            order.push(name.clone());
            map.insert(name, activity);
        }

        debug!(activity_count = map.len(), "Activity registry initialized");
        Ok(Self {
            activities: map,
            order,
        })
    }

    /// Registry holding the school's startup activities
    pub fn seeded() -> Result<Self, SeedError> {
        Self::from_activities(mergington_activities())
    }

    /// Read-only lookup returning a snapshot of the activity
    pub fn get(&self, name: &str) -> RosterResult<Activity> {
        self.activities
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RosterError::not_found(name))
    }

    /// Snapshot of every activity in seed order
    pub fn list_all(&self) -> IndexMap<String, Activity> {
        self.order
            .iter()
            .filter_map(|name| {
                self.activities
                    .get(name)
                    .map(|entry| (name.clone(), entry.value().clone()))
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.activities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Add `email` to the roster of `name`
    ///
    /// A duplicate signup is reported before capacity, so an existing member of a
    /// full activity gets `AlreadyEnrolled`.
    pub fn enroll(&self, name: &str, email: &str) -> RosterResult<RosterChange> {
        let result = {
            let mut entry = self
                .activities
                .get_mut(name)
                .ok_or_else(|| RosterError::not_found(name))?;
            let activity = entry.value_mut();

            if activity.is_enrolled(email) {
                Err(RosterError::AlreadyEnrolled {
                    activity: name.to_string(),
                    email: email.to_string(),
                })
            } else if activity.is_full() {
                Err(RosterError::CapacityExceeded {
                    activity: name.to_string(),
                    max_participants: activity.max_participants,
                })
            } else {
                activity.participants.push(email.to_string());
                Ok(activity.clone())
            }
        };

        record_outcome("enroll", name, email, result)
    }

    /// Remove `email` from the roster of `name`, keeping the order of the others
    pub fn withdraw(&self, name: &str, email: &str) -> RosterResult<RosterChange> {
        let result = {
            let mut entry = self
                .activities
                .get_mut(name)
                .ok_or_else(|| RosterError::not_found(name))?;
            let activity = entry.value_mut();

            match activity.participants.iter().position(|p| p == email) {
                Some(index) => {
                    activity.participants.remove(index);
                    Ok(activity.clone())
                }
                None => Err(RosterError::NotEnrolled {
                    activity: name.to_string(),
                    email: email.to_string(),
                }),
            }
        };

        record_outcome("withdraw", name, email, result)
    }

    pub fn stats(&self) -> RegistryStats {
        self.activities
            .iter()
            .fold(RegistryStats::default(), |mut stats, entry| {
                let activity = entry.value();
                stats.total_activities += 1;
                stats.total_participants += activity.participants.len();
                stats.open_seats += activity.open_seats();
                if activity.is_full() {
                    stats.full_activities += 1;
                }
                stats
            })
    }
}

fn record_outcome(
    operation: &str,
    name: &str,
    email: &str,
    result: RosterResult<Activity>,
) -> RosterResult<RosterChange> {
    match result {
        Ok(activity) => {
            let details = format!(
                "{}/{} participants",
                activity.participants.len(),
                activity.max_participants
            );
            log_roster_operation(operation, name, email, "committed", Some(&details));
            Ok(RosterChange {
                activity_name: name.to_string(),
                email: email.to_string(),
                activity,
            })
        }
        Err(e) => {
            debug!(
                operation = %operation,
                activity = %name,
                email = %email,
                code = e.code(),
                "Roster mutation rejected"
            );
            Err(e)
        }
    }
}

fn validate_seed(name: &str, activity: &Activity) -> Result<(), SeedError> {
    if name.trim().is_empty() {
        return Err(SeedError::EmptyName);
    }
    if activity.max_participants == 0 {
        return Err(SeedError::ZeroCapacity {
            activity: name.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for email in &activity.participants {
        if !seen.insert(email.as_str()) {
            return Err(SeedError::DuplicateParticipant {
                activity: name.to_string(),
                email: email.clone(),
            });
        }
    }

    if activity.participants.len() > activity.max_participants {
        return Err(SeedError::OverCapacity {
            activity: name.to_string(),
            participants: activity.participants.len(),
            max_participants: activity.max_participants,
        });
    }

    Ok(())
}
