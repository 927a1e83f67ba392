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

pub async fn create_user(state: &colloquium_shared::State, name: &str) -> anyhow::Result<String> {
    let id = Ulid::new().to_string();
    sqlx::query(
        r#"INSERT INTO "user" ("id", "email", "name", "password", "role", "is_banned", "account_status", "created_at")
        VALUES (?, ?, ?, 'hash', 'User', 0, 'Active', 0)"#,
    )
    .bind(&id)
    .bind(format!("{name}@colloquium.localhost"))
    .bind(name)
    .execute(&state.write_db)
    .await?;

    Ok(id)
}
