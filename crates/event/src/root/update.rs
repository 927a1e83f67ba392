use colloquium_shared::{
    Actor, Error,
    event::{EventStatus, Visibility},
    now,
};
use serde::Deserialize;
use validator::Validate;

use crate::repository::{self, Event};

#[derive(Validate, Deserialize, Default)]
pub struct UpdateInput {
    #[validate(length(min = 3, max = 150))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 255))]
    pub poster_path: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub visibility: Option<Visibility>,
    #[validate(range(min = 1))]
    pub capacity: Option<i64>,
}

impl super::Command {
    pub async fn update(
        &self,
        actor: &Actor,
        id: impl Into<String>,
        input: UpdateInput,
    ) -> colloquium_shared::Result<Event> {
        input.validate()?;

        let event = self.load_hosted(actor, id).await?;

        if event.status == EventStatus::Banned {
            return Err(Error::EventBanned);
        }

        let start_date = input.start_date.unwrap_or(event.start_date);
        if let Some(end) = input.end_date.or(event.end_date)
            && end < start_date
        {
            colloquium_shared::user!("End date must be after the start date");
        }

        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id: event.id.to_owned(),
                title: input.title.map(|title| title.trim().to_owned()),
                description: input.description,
                location: input.location.map(|location| location.trim().to_owned()),
                poster_path: input.poster_path,
                start_date: input.start_date,
                end_date: input.end_date,
                visibility: input.visibility,
                capacity: input.capacity,
                now: now(),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(event_id = %event.id, "event updated");

        let Some(event) = repository::find_event(&self.write_db, &event.id).await? else {
            colloquium_shared::not_found!("event");
        };

        Ok(event)
    }
}
