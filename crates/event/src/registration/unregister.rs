use colloquium_shared::{Error, event::RegistrationStatus};

use super::repository;

impl super::Command {
    pub async fn unregister(
        &self,
        event_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> colloquium_shared::Result<()> {
        let event_id = event_id.into();
        let user_id = user_id.into();

        let deleted = repository::delete(
            &self.write_db,
            &event_id,
            &user_id,
            Some(RegistrationStatus::Registered),
        )
        .await?;

        if !deleted {
            return Err(Error::NotRegistered);
        }

        tracing::info!(event_id = %event_id, user_id = %user_id, "user unregistered from event");

        Ok(())
    }
}
