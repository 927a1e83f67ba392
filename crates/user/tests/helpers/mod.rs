use std::{path::PathBuf, str::FromStr};

use colloquium_notification::{Dispatcher, Queue};
use colloquium_user::RegisterInput;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use sqlx_migrator::{Migrate, Plan};

pub struct TestState {
    pub state: colloquium_shared::State,
    pub queue: Queue,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);
    let write_db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts.clone())
        .await?;
    let mut conn = write_db.acquire().await?;
    colloquium_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let read_db = SqlitePool::connect_with(opts).await?;

    Ok(TestState {
        queue: Queue::new(write_db.clone()),
        state: colloquium_shared::State { read_db, write_db },
    })
}

pub fn command(state: &TestState) -> colloquium_user::Command {
    colloquium_user::Command::new(
        state.state.clone(),
        Dispatcher::new(state.queue.clone(), state.state.read_db.clone()),
    )
}

#[allow(dead_code)]
pub async fn create_user(
    cmd: &colloquium_user::Command,
    name: impl Into<String>,
) -> anyhow::Result<String> {
    let name = name.into();
    let id = cmd
        .register(RegisterInput {
            email: format!("{name}@colloquium.localhost"),
            password: "my_password".to_owned(),
            name,
            institution: None,
        })
        .await?;

    Ok(id)
}
