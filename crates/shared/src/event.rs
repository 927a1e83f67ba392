use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
pub enum EventStatus {
    Draft,
    #[default]
    Published,
    Completed,
    Cancelled,
    Banned,
}

impl EventStatus {
    /// Events that still hold their attendees' attention: reminders only go
    /// out for these.
    pub fn is_active(&self) -> bool {
        matches!(self, EventStatus::Published | EventStatus::Completed)
    }

    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Draft, EventStatus::Published)
                | (EventStatus::Published, EventStatus::Completed)
                | (EventStatus::Published, EventStatus::Cancelled)
        )
    }
}

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
pub enum RegistrationStatus {
    #[default]
    Registered,
    Cancelled,
}
