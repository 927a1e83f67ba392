use std::ops::Deref;

use colloquium_notification::Dispatcher;
use colloquium_shared::Actor;

use crate::repository::{self, Event};

mod create;
mod delete;
mod status;
mod update;

pub use create::CreateInput;
pub use update::UpdateInput;

#[derive(Clone)]
pub struct Command {
    state: colloquium_shared::State,
    dispatcher: Dispatcher,
    pub registration: crate::registration::Command,
}

impl Deref for Command {
    type Target = colloquium_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: colloquium_shared::State, dispatcher: Dispatcher) -> Self {
        Self {
            registration: crate::registration::Command::new(state.clone(), dispatcher.clone()),
            state,
            dispatcher,
        }
    }

    /// Visible events only: soft-deleted ones read as missing.
    pub async fn find(&self, id: impl Into<String>) -> colloquium_shared::Result<Option<Event>> {
        Ok(repository::find_event(&self.read_db, id)
            .await?
            .filter(|event| !event.is_deleted()))
    }

    /// Loads an event the actor is about to change as its host.
    async fn load_hosted(
        &self,
        actor: &Actor,
        id: impl Into<String>,
    ) -> colloquium_shared::Result<Event> {
        actor.ensure_can_write()?;

        let Some(event) = repository::find_event(&self.write_db, id)
            .await?
            .filter(|event| !event.is_deleted())
        else {
            colloquium_shared::not_found!("event");
        };

        if event.host_id != actor.user_id {
            return Err(colloquium_shared::Error::Forbidden);
        }

        Ok(event)
    }
}
