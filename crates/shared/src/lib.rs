mod actor;
mod command;
pub mod connection;
mod date;
pub mod event;
pub mod moderation;
pub mod user;

pub use actor::*;
pub use command::*;
pub use date::*;

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

impl State {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}
