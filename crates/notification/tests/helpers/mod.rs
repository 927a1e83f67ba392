use std::{path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use colloquium_notification::{
    Dispatcher, LocalStorage, Mail, Mailer, MemoryMailer, Queue, RetryPolicy, Worker,
    WorkerConfig,
};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;
use ulid::Ulid;

pub struct TestState {
    pub pool: SqlitePool,
    pub queue: Queue,
    pub dispatcher: Dispatcher,
    pub mailer: MemoryMailer,
    pub files: PathBuf,
}

pub async fn setup_test_state(dir: &TempDir) -> anyhow::Result<TestState> {
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    colloquium_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    let files = dir.child("files");
    std::fs::create_dir_all(&files)?;

    let queue = Queue::new(pool.clone());

    Ok(TestState {
        dispatcher: Dispatcher::new(queue.clone(), pool.clone()),
        queue,
        pool,
        mailer: MemoryMailer::new(),
        files,
    })
}

#[allow(dead_code)]
pub fn worker_with(state: &TestState, mailer: Arc<dyn Mailer>, config: WorkerConfig) -> Worker {
    Worker::new(
        state.queue.clone(),
        state.pool.clone(),
        mailer,
        Arc::new(LocalStorage::new(&state.files, "http://localhost/files")),
        config,
    )
}

#[allow(dead_code)]
pub fn worker(state: &TestState) -> Worker {
    worker_with(
        state,
        Arc::new(state.mailer.clone()),
        WorkerConfig {
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::ZERO,
                max_delay: Duration::ZERO,
            },
            ..Default::default()
        },
    )
}

#[allow(dead_code)]
pub async fn create_user(
    state: &TestState,
    name: &str,
    role: &str,
) -> anyhow::Result<String> {
    let id = Ulid::new().to_string();
    sqlx::query(
        r#"INSERT INTO "user" ("id", "email", "name", "password", "role", "is_banned", "account_status", "verification_token", "created_at")
        VALUES (?, ?, ?, 'hash', ?, 0, 'Pending', ?, 0)"#,
    )
    .bind(&id)
    .bind(format!("{name}@colloquium.localhost"))
    .bind(name)
    .bind(role)
    .bind(Ulid::new().to_string())
    .execute(&state.pool)
    .await?;

    Ok(id)
}

#[allow(dead_code)]
pub async fn create_event(
    state: &TestState,
    host_id: &str,
    start_date: i64,
    status: &str,
    poster_path: Option<&str>,
) -> anyhow::Result<String> {
    let id = Ulid::new().to_string();
    sqlx::query(
        r#"INSERT INTO "event" ("id", "host_id", "title", "location", "poster_path", "start_date", "status", "visibility", "created_at", "updated_at")
        VALUES (?, ?, 'Rust Colloquium', 'Room 42', ?, ?, ?, 'Public', 0, 0)"#,
    )
    .bind(&id)
    .bind(host_id)
    .bind(poster_path)
    .bind(start_date)
    .bind(status)
    .execute(&state.pool)
    .await?;

    Ok(id)
}

#[allow(dead_code)]
pub async fn set_event_status(state: &TestState, id: &str, status: &str) -> anyhow::Result<()> {
    sqlx::query(r#"UPDATE "event" SET "status" = ? WHERE "id" = ?"#)
        .bind(status)
        .bind(id)
        .execute(&state.pool)
        .await?;

    Ok(())
}

#[allow(dead_code)]
pub async fn register(state: &TestState, event_id: &str, user_id: &str) -> anyhow::Result<()> {
    sqlx::query(
        r#"INSERT INTO "registration" ("id", "event_id", "user_id", "status", "registered_at")
        VALUES (?, ?, ?, 'Registered', 0)"#,
    )
    .bind(Ulid::new().to_string())
    .bind(event_id)
    .bind(user_id)
    .execute(&state.pool)
    .await?;

    Ok(())
}

#[allow(dead_code)]
pub async fn unregister(state: &TestState, event_id: &str, user_id: &str) -> anyhow::Result<()> {
    sqlx::query(r#"DELETE FROM "registration" WHERE "event_id" = ? AND "user_id" = ?"#)
        .bind(event_id)
        .bind(user_id)
        .execute(&state.pool)
        .await?;

    Ok(())
}

/// Transport that always refuses the mail.
#[allow(dead_code)]
pub struct FailingMailer;

#[async_trait::async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: Mail) -> anyhow::Result<()> {
        anyhow::bail!("smtp unavailable")
    }
}

/// Transport that never answers in time.
#[allow(dead_code)]
pub struct SlowMailer;

#[async_trait::async_trait]
impl Mailer for SlowMailer {
    async fn send(&self, _mail: Mail) -> anyhow::Result<()> {
        tokio::time::sleep(Duration::from_secs(5)).await;

        Ok(())
    }
}
