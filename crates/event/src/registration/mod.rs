//! Attendance of users to events.
//!
//! Capacity and uniqueness are checked and written in one transaction on the
//! write pool. The unique index on `(event_id, user_id)` backs the duplicate
//! check when two requests race.

use std::ops::Deref;

use colloquium_notification::Dispatcher;

mod query;
mod register;
mod repository;
mod unregister;

pub use query::Attendee;
pub use repository::Registration;

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
}
