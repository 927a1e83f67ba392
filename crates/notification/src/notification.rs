use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(EnumString, Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderType {
    #[strum(serialize = "24h")]
    #[serde(rename = "24h")]
    Day,
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    Hour,
}

#[derive(EnumString, Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminEventKind {
    NewEvent,
    NewRegistration,
    EventCancelled,
}

/// Payload of a queued notification job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    EmailVerification {
        user_id: String,
    },
    EventRegistrationConfirmation {
        event_id: String,
        user_id: String,
    },
    EventReminder {
        event_id: String,
        user_id: String,
        reminder: ReminderType,
    },
    AdminEventNotification {
        event_id: String,
        variant: AdminEventKind,
        user_id: Option<String>,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::EmailVerification { .. } => "email_verification",
            Notification::EventRegistrationConfirmation { .. } => {
                "event_registration_confirmation"
            }
            Notification::EventReminder { .. } => "event_reminder",
            Notification::AdminEventNotification { .. } => "admin_event_notification",
        }
    }

    pub fn event_id(&self) -> Option<&str> {
        match self {
            Notification::EmailVerification { .. } => None,
            Notification::EventRegistrationConfirmation { event_id, .. }
            | Notification::EventReminder { event_id, .. }
            | Notification::AdminEventNotification { event_id, .. } => Some(event_id),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Notification::EmailVerification { user_id }
            | Notification::EventRegistrationConfirmation { user_id, .. }
            | Notification::EventReminder { user_id, .. } => Some(user_id),
            Notification::AdminEventNotification { user_id, .. } => user_id.as_deref(),
        }
    }

    /// Identity of a reminder, used by the optional sweep guard.
    pub fn dedup_key(&self) -> Option<String> {
        match self {
            Notification::EventReminder {
                event_id,
                user_id,
                reminder,
            } => Some(format!("reminder:{event_id}:{user_id}:{reminder}")),
            _ => None,
        }
    }
}
