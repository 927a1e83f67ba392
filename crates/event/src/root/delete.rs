use colloquium_shared::{Actor, now};

use crate::repository;

impl super::Command {
    /// Hides the event from everyone. Registrations stay in place so an admin
    /// can still inspect or force-delete it.
    pub async fn delete(&self, actor: &Actor, id: impl Into<String>) -> colloquium_shared::Result<()> {
        let event = self.load_hosted(actor, id).await?;

        let now = now();
        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id: event.id.to_owned(),
                deleted_at: Some(now),
                now,
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(event_id = %event.id, "event deleted by host");

        Ok(())
    }
}
