use std::{path::PathBuf, str::FromStr};

use colloquium_event::CreateInput;
use colloquium_notification::{Dispatcher, Queue};
use colloquium_shared::{Actor, HOUR, event::Visibility, now};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use sqlx_migrator::{Migrate, Plan};
use ulid::Ulid;

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

pub fn command(state: &TestState) -> colloquium_event::Command {
    colloquium_event::Command::new(
        state.state.clone(),
        Dispatcher::new(state.queue.clone(), state.state.read_db.clone()),
    )
}

#[allow(dead_code)]
pub async fn create_user(state: &TestState, name: &str, role: &str) -> anyhow::Result<String> {
    let id = Ulid::new().to_string();
    sqlx::query(
        r#"INSERT INTO "user" ("id", "email", "name", "password", "role", "is_banned", "account_status", "created_at")
        VALUES (?, ?, ?, 'hash', ?, 0, 'Active', 0)"#,
    )
    .bind(&id)
    .bind(format!("{name}@colloquium.localhost"))
    .bind(name)
    .bind(role)
    .execute(&state.state.write_db)
    .await?;

    Ok(id)
}

#[allow(dead_code)]
pub async fn create_users(state: &TestState, count: usize) -> anyhow::Result<Vec<String>> {
    let mut ids = vec![];
    for i in 0..count {
        ids.push(create_user(state, &format!("user{i}"), "User").await?);
    }

    Ok(ids)
}

#[allow(dead_code)]
pub fn event_input(capacity: Option<i64>) -> CreateInput {
    CreateInput {
        title: "Rust Colloquium".to_owned(),
        description: Some("Ownership for the rest of us".to_owned()),
        location: "Room 42".to_owned(),
        poster_path: None,
        start_date: now() + 48 * HOUR,
        end_date: Some(now() + 50 * HOUR),
        visibility: Visibility::Public,
        capacity,
    }
}

#[allow(dead_code)]
pub async fn create_event(
    state: &TestState,
    capacity: Option<i64>,
) -> anyhow::Result<(String, String)> {
    let host = create_user(state, &format!("host-{}", Ulid::new()), "User").await?;
    let event = command(state)
        .create(&Actor::user(&host), event_input(capacity))
        .await?;

    Ok((host, event.id))
}

#[allow(dead_code)]
pub async fn set_status(state: &TestState, event_id: &str, status: &str) -> anyhow::Result<()> {
    sqlx::query(r#"UPDATE "event" SET "status" = ? WHERE "id" = ?"#)
        .bind(status)
        .bind(event_id)
        .execute(&state.state.write_db)
        .await?;

    Ok(())
}
