use colloquium_notification::AdminEventKind;
use colloquium_shared::{
    Actor,
    event::{EventStatus, Visibility},
    now,
};
use serde::Deserialize;
use ulid::Ulid;
use validator::{Validate, ValidationError};

use crate::repository::{self, Event};

#[derive(Validate, Deserialize)]
#[validate(schema(function = "validate_dates"))]
pub struct CreateInput {
    #[validate(length(min = 3, max = 150))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[validate(length(max = 255))]
    pub poster_path: Option<String>,
    pub start_date: i64,
    pub end_date: Option<i64>,
    #[serde(default)]
    pub visibility: Visibility,
    #[validate(range(min = 1))]
    pub capacity: Option<i64>,
}

fn validate_dates(input: &CreateInput) -> Result<(), ValidationError> {
    match input.end_date {
        Some(end) if end < input.start_date => Err(ValidationError::new("end_before_start")),
        _ => Ok(()),
    }
}

impl super::Command {
    /// Creates a published event hosted by the actor.
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateInput,
    ) -> colloquium_shared::Result<Event> {
        actor.ensure_can_write()?;
        input.validate()?;

        let now = now();
        let event = Event {
            id: Ulid::new().to_string(),
            host_id: actor.user_id.to_owned(),
            title: input.title.trim().to_owned(),
            description: input.description,
            location: input.location.trim().to_owned(),
            poster_path: input.poster_path,
            start_date: input.start_date,
            end_date: input.end_date,
            status: EventStatus::Published,
            visibility: input.visibility,
            capacity: input.capacity,
            banned_at: None,
            banned_by: None,
            ban_reason: None,
            moderated_at: None,
            moderated_by: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        repository::create(&self.write_db, &event).await?;

        tracing::info!(event_id = %event.id, host_id = %event.host_id, "event created");

        if let Err(err) = self
            .dispatcher
            .admin_event(&event.id, AdminEventKind::NewEvent, None)
            .await
        {
            tracing::error!(event_id = %event.id, err = %err, "failed to enqueue new event notification");
        }

        Ok(event)
    }
}
