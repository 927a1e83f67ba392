use std::{path::PathBuf, str::FromStr};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use sqlx_migrator::{Migrate, Plan};
use ulid::Ulid;

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<colloquium_shared::State> {
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

    Ok(colloquium_shared::State { read_db, write_db })
}

pub async fn create_event(state: &colloquium_shared::State, status: &str) -> anyhow::Result<String> {
    let id = Ulid::new().to_string();
    sqlx::query(
        r#"INSERT INTO "event" ("id", "host_id", "title", "location", "start_date", "status", "visibility", "created_at", "updated_at")
        VALUES (?, 'host', 'Rust meetup', 'Room 1', 2000000000, ?, 'Public', 0, 0)"#,
    )
    .bind(&id)
    .bind(status)
    .execute(&state.write_db)
    .await?;

    Ok(id)
}
