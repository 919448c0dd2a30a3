//! # Web API Application State
//!
//! Shared state handed to every handler: the registration service and a handle to
//! the notification queue for health reporting.

use std::sync::Arc;

use crate::notifier::NotificationHandle;
use crate::services::RegistrationService;

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<RegistrationService>,
    pub notifications: NotificationHandle,
}

impl AppState {
    pub fn new(service: Arc<RegistrationService>, notifications: NotificationHandle) -> Self {
        Self {
            service,
            notifications,
        }
    }
}
