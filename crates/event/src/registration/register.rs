use colloquium_notification::AdminEventKind;
use colloquium_shared::{
    Error,
    event::{EventStatus, RegistrationStatus},
    now,
};
use ulid::Ulid;

use super::repository::{self, Registration};

impl super::Command {
    /// Registers `user_id` for `event_id`.
    ///
    /// Checks run in this order: the event exists, the user is not its host,
    /// it is published, the user is not registered yet, a seat is left.
    pub async fn register(
        &self,
        event_id: impl Into<String>,
        user_id: impl Into<String>,
        notes: Option<String>,
    ) -> colloquium_shared::Result<Registration> {
        let event_id = event_id.into();
        let user_id = user_id.into();

        let mut tx = self.write_db.begin().await?;

        let Some(event) = crate::find_event(&mut *tx, &event_id)
            .await?
            .filter(|event| !event.is_deleted())
        else {
            colloquium_shared::not_found!("event");
        };

        if event.host_id == user_id {
            return Err(Error::SelfRegistration);
        }

        if event.status != EventStatus::Published {
            return Err(Error::EventNotActive);
        }

        match repository::find(&mut *tx, &event_id, &user_id).await? {
            Some(existing) if existing.status == RegistrationStatus::Registered => {
                return Err(Error::DuplicateRegistration);
            }
            Some(_) => {
                repository::delete(&mut *tx, &event_id, &user_id, None).await?;
            }
            None => {}
        }

        if let Some(capacity) = event.capacity
            && repository::count_registered(&mut *tx, &event_id).await? >= capacity
        {
            return Err(Error::EventFull);
        }

        let registration = Registration {
            id: Ulid::new().to_string(),
            event_id: event_id.to_owned(),
            user_id: user_id.to_owned(),
            status: RegistrationStatus::Registered,
            notes,
            registered_at: now(),
        };

        if let Err(err) = repository::create(&mut *tx, &registration).await {
            if let Error::Persistence(sqlx_err) = &err
                && sqlx_err
                    .as_database_error()
                    .is_some_and(|err| err.is_unique_violation())
            {
                return Err(Error::DuplicateRegistration);
            }

            return Err(err);
        }

        tx.commit().await?;

        tracing::info!(
            event_id = %event_id,
            user_id = %user_id,
            registration_id = %registration.id,
            "user registered for event"
        );

        if let Err(err) = self
            .dispatcher
            .registration_confirmation(&event_id, &user_id)
            .await
        {
            tracing::error!(
                event_id = %event_id,
                user_id = %user_id,
                err = %err,
                "failed to enqueue registration confirmation"
            );
        }

        if let Err(err) = self
            .dispatcher
            .admin_event(&event_id, AdminEventKind::NewRegistration, Some(user_id.to_owned()))
            .await
        {
            tracing::error!(
                event_id = %event_id,
                user_id = %user_id,
                err = %err,
                "failed to enqueue new registration notification"
            );
        }

        Ok(registration)
    }
}
