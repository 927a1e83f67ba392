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
    pub events: colloquium_event::Command,
    pub moderation: colloquium_moderation::Command,
    pub admin: Actor,
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
    let state = colloquium_shared::State { read_db, write_db };
    let dispatcher = Dispatcher::new(Queue::new(state.write_db.clone()), state.read_db.clone());

    let mut test_state = TestState {
        events: colloquium_event::Command::new(state.clone(), dispatcher),
        moderation: colloquium_moderation::Command(state.clone()),
        state,
        admin: Actor::admin(""),
    };

    let admin = create_user(&test_state, "admin", "Admin").await?;
    test_state.admin = Actor::admin(admin);

    Ok(test_state)
}

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
pub async fn create_event(state: &TestState) -> anyhow::Result<String> {
    let host = create_user(state, &format!("host-{}", Ulid::new()), "User").await?;
    let event = state
        .events
        .create(
            &Actor::user(&host),
            CreateInput {
                title: "Rust Colloquium".to_owned(),
                description: None,
                location: "Room 42".to_owned(),
                poster_path: None,
                start_date: now() + 48 * HOUR,
                end_date: None,
                visibility: Visibility::Public,
                capacity: None,
            },
        )
        .await?;

    Ok(event.id)
}

#[allow(dead_code)]
pub async fn create_post(state: &TestState, event_id: &str, author_id: &str) -> anyhow::Result<String> {
    let id = Ulid::new().to_string();
    sqlx::query(
        r#"INSERT INTO "forum_post" ("id", "event_id", "author_id", "body", "created_at")
        VALUES (?, ?, ?, 'Looking forward to it', 0)"#,
    )
    .bind(&id)
    .bind(event_id)
    .bind(author_id)
    .execute(&state.state.write_db)
    .await?;

    Ok(id)
}

#[allow(dead_code)]
pub async fn count(state: &TestState, table: &str, event_id: &str) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(&format!(
        r#"SELECT COUNT(*) FROM "{table}" WHERE "event_id" = ?"#
    ))
    .bind(event_id)
    .fetch_one(&state.state.read_db)
    .await?;

    Ok(count)
}
