use std::ops::Deref;

use colloquium_notification::Dispatcher;
use colloquium_shared::Actor;

use crate::repository::{self, FindType, User};

mod login;
mod made_admin;
mod register;
mod suspend;
mod verify;

pub use login::LoginInput;
pub use register::RegisterInput;

#[derive(Clone)]
pub struct Command {
    state: colloquium_shared::State,
    dispatcher: Dispatcher,
}

impl Deref for Command {
    type Target = colloquium_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: colloquium_shared::State, dispatcher: Dispatcher) -> Self {
        Self { state, dispatcher }
    }

    pub async fn find(&self, id: impl Into<String>) -> colloquium_shared::Result<Option<User>> {
        repository::find_user(&self.read_db, id).await
    }

    pub async fn find_by_email(
        &self,
        email: impl Into<String>,
    ) -> colloquium_shared::Result<Option<User>> {
        Ok(
            repository::find(&self.read_db, FindType::Email(email.into()))
                .await?
                .map(User::from),
        )
    }

    pub async fn admins(&self) -> colloquium_shared::Result<Vec<User>> {
        Ok(repository::admins(&self.read_db)
            .await?
            .into_iter()
            .map(User::from)
            .collect())
    }

    /// Resolves the caller behind an authenticated user id. Reads the write
    /// pool so a ban is seen by the very next request.
    pub async fn actor(&self, id: impl Into<String>) -> colloquium_shared::Result<Option<Actor>> {
        let Some(user) = repository::find(&self.write_db, FindType::Id(id.into())).await? else {
            return Ok(None);
        };

        Ok(Some(Actor::new(
            user.id,
            user.role.0 == colloquium_shared::user::Role::Admin,
            user.is_banned,
        )))
    }
}
