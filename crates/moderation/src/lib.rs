//! Admin moderation.
//!
//! Every operation checks the admin policy first, then mutates its target and
//! appends one [`AdminLog`] row in the same transaction.

use std::ops::Deref;

mod audit;
mod event;
mod forum;
mod stats;
mod user;

pub use audit::{AdminLog, LogFilter};
pub use stats::Stats;

#[derive(Clone)]
pub struct Command(pub colloquium_shared::State);

impl Deref for Command {
    type Target = colloquium_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
