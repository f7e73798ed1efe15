//! Notification events and their consumer.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Event published after a state change. Serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NotificationEvent {
    ContactAdded {
        contact_id: i32,
        full_name: String,
        phone_number: String,
    },
    UserRegistered {
        name: String,
        email: String,
    },
}

impl NotificationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ContactAdded { .. } => "contactAdded",
            Self::UserRegistered { .. } => "userRegistered",
        }
    }
}

/// Consumer for the notifications queue: logs receipt only.
pub async fn notification_job_handler(event: NotificationEvent) -> Result<(), AppError> {
    match &event {
        NotificationEvent::ContactAdded {
            contact_id,
            full_name,
            ..
        } => {
            tracing::info!(kind = event.kind(), contact_id, %full_name, "Notification received");
        }
        NotificationEvent::UserRegistered { email, .. } => {
            tracing::info!(kind = event.kind(), %email, "Notification received");
        }
    }
    Ok(())
}
