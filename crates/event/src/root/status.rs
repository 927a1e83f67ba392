use colloquium_notification::AdminEventKind;
use colloquium_shared::{Actor, Error, event::EventStatus, now};

use crate::repository::{self, Event};

impl super::Command {
    pub async fn complete(
        &self,
        actor: &Actor,
        id: impl Into<String>,
    ) -> colloquium_shared::Result<Event> {
        self.transition(actor, id, EventStatus::Completed).await
    }

    /// Cancels a published event and lets the admins know.
    pub async fn cancel(
        &self,
        actor: &Actor,
        id: impl Into<String>,
    ) -> colloquium_shared::Result<Event> {
        let event = self.transition(actor, id, EventStatus::Cancelled).await?;

        if let Err(err) = self
            .dispatcher
            .admin_event(&event.id, AdminEventKind::EventCancelled, None)
            .await
        {
            tracing::error!(event_id = %event.id, err = %err, "failed to enqueue event cancelled notification");
        }

        Ok(event)
    }

    async fn transition(
        &self,
        actor: &Actor,
        id: impl Into<String>,
        next: EventStatus,
    ) -> colloquium_shared::Result<Event> {
        let mut event = self.load_hosted(actor, id).await?;

        if event.status == EventStatus::Banned {
            return Err(Error::EventBanned);
        }

        if !event.status.can_transition_to(next) {
            colloquium_shared::user!("Event is {} and cannot become {next}", event.status);
        }

        let now = now();
        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id: event.id.to_owned(),
                status: Some(next),
                now,
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(event_id = %event.id, from = %event.status, to = %next, "event status changed");

        event.status = next;
        event.updated_at = now;

        Ok(event)
    }
}
