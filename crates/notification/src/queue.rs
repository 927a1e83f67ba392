//! Persistent notification queue backed by the `notification_job` table.
//!
//! Delivery is at-least-once: a job is claimed by flipping it to `Running`,
//! and a worker that dies mid-job leaves it to [`Queue::recover_stale`].

use std::time::Duration;

use colloquium_db::table::NotificationJob;
use colloquium_shared::now;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use ulid::Ulid;

use crate::Notification;

#[derive(
    EnumString, VariantArray, Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Serialize,
)]
pub enum JobStatus {
    Enqueued,
    Running,
    Succeeded,
    Retrying,
    Failed,
}

#[derive(Clone, Debug, FromRow, Serialize)]
pub struct Job {
    pub id: String,
    pub kind: String,
    pub payload: String,
    pub dedup_key: Option<String>,
    #[serde(serialize_with = "serialize_status")]
    pub status: sqlx::types::Text<JobStatus>,
    pub attempt_count: i64,
    pub last_error: Option<String>,
    pub enqueued_at: i64,
    pub run_at: i64,
    pub started_at: Option<i64>,
    pub finished_at: Option<i64>,
}

fn serialize_status<S: serde::Serializer>(
    status: &sqlx::types::Text<JobStatus>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    status.0.serialize(serializer)
}

impl Job {
    pub fn notification(&self) -> serde_json::Result<Notification> {
        serde_json::from_str(&self.payload)
    }
}

/// Exponential backoff between attempts, capped at `max_delay`.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(60 * 60),
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt, given how many attempts already ran.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = Ord::min(attempt.saturating_sub(1), 16);
        let delay = self.base_delay.saturating_mul(2u32.saturating_pow(exponent));

        Ord::min(delay, self.max_delay)
    }
}

const READY: [JobStatus; 2] = [JobStatus::Enqueued, JobStatus::Retrying];

fn columns() -> [NotificationJob; 11] {
    [
        NotificationJob::Id,
        NotificationJob::Kind,
        NotificationJob::Payload,
        NotificationJob::DedupKey,
        NotificationJob::Status,
        NotificationJob::AttemptCount,
        NotificationJob::LastError,
        NotificationJob::EnqueuedAt,
        NotificationJob::RunAt,
        NotificationJob::StartedAt,
        NotificationJob::FinishedAt,
    ]
}

#[derive(Clone)]
pub struct Queue {
    pool: SqlitePool,
}

impl Queue {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Appends a job that becomes ready at `run_at` (unix seconds).
    pub async fn enqueue(
        &self,
        notification: &Notification,
        run_at: i64,
    ) -> colloquium_shared::Result<String> {
        let id = Ulid::new().to_string();
        let payload = serde_json::to_string(notification).map_err(anyhow::Error::from)?;

        let statement = Query::insert()
            .into_table(NotificationJob::Table)
            .columns([
                NotificationJob::Id,
                NotificationJob::Kind,
                NotificationJob::Payload,
                NotificationJob::DedupKey,
                NotificationJob::Status,
                NotificationJob::AttemptCount,
                NotificationJob::EnqueuedAt,
                NotificationJob::RunAt,
            ])
            .values_panic([
                id.to_owned().into(),
                notification.kind().into(),
                payload.into(),
                notification.dedup_key().into(),
                JobStatus::Enqueued.to_string().into(),
                0.into(),
                now().into(),
                run_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        tracing::debug!(
            job_id = %id,
            kind = notification.kind(),
            run_at,
            "notification job enqueued"
        );

        Ok(id)
    }

    /// True when a job with this dedup key is waiting, running or already sent.
    pub async fn has_live(&self, dedup_key: &str) -> colloquium_shared::Result<bool> {
        let statement = Query::select()
            .column(NotificationJob::Id)
            .from(NotificationJob::Table)
            .and_where(Expr::col(NotificationJob::DedupKey).eq(dedup_key))
            .and_where(Expr::col(NotificationJob::Status).ne(JobStatus::Failed.as_ref()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_with(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Atomically takes the oldest ready job and marks it `Running`.
    ///
    /// The pick and the status flip are one statement, so two workers can
    /// never claim the same row.
    pub async fn claim(&self, at: i64) -> colloquium_shared::Result<Option<Job>> {
        let ready = Query::select()
            .column(NotificationJob::Id)
            .from(NotificationJob::Table)
            .and_where(
                Expr::col(NotificationJob::Status).is_in(READY.iter().map(|s| s.to_string())),
            )
            .and_where(Expr::col(NotificationJob::RunAt).lte(at))
            .order_by(NotificationJob::RunAt, Order::Asc)
            .order_by(NotificationJob::EnqueuedAt, Order::Asc)
            .limit(1)
            .to_owned();

        let statement = Query::update()
            .table(NotificationJob::Table)
            .value(NotificationJob::Status, JobStatus::Running.to_string())
            .value(NotificationJob::StartedAt, at)
            .value(
                NotificationJob::AttemptCount,
                Expr::col(NotificationJob::AttemptCount).add(1),
            )
            .and_where(Expr::col(NotificationJob::Id).in_subquery(ready))
            .and_where(
                Expr::col(NotificationJob::Status).is_in(READY.iter().map(|s| s.to_string())),
            )
            .returning(Query::returning().columns(columns()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let job = sqlx::query_as_with::<_, Job, _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(job) = &job {
            tracing::debug!(
                job_id = %job.id,
                kind = %job.kind,
                attempt = job.attempt_count,
                "notification job claimed"
            );
        }

        Ok(job)
    }

    pub async fn succeed(&self, id: &str) -> colloquium_shared::Result<()> {
        let statement = Query::update()
            .table(NotificationJob::Table)
            .value(NotificationJob::Status, JobStatus::Succeeded.to_string())
            .value(NotificationJob::FinishedAt, now())
            .and_where(Expr::col(NotificationJob::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }

    /// Records a failed attempt. The job goes back to `Retrying` with backoff
    /// until `max_attempts` is reached, then becomes `Failed` for good.
    pub async fn fail(
        &self,
        job: &Job,
        error: &str,
        policy: &RetryPolicy,
        at: i64,
    ) -> colloquium_shared::Result<JobStatus> {
        let attempts = u32::try_from(job.attempt_count).unwrap_or(u32::MAX);

        if attempts >= policy.max_attempts {
            self.fail_permanently(&job.id, error).await?;
            return Ok(JobStatus::Failed);
        }

        let delay = i64::try_from(policy.delay_for_attempt(attempts).as_secs()).unwrap_or(i64::MAX);

        let statement = Query::update()
            .table(NotificationJob::Table)
            .value(NotificationJob::Status, JobStatus::Retrying.to_string())
            .value(NotificationJob::LastError, error)
            .value(NotificationJob::RunAt, at.saturating_add(delay))
            .and_where(Expr::col(NotificationJob::Id).eq(job.id.to_owned()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(JobStatus::Retrying)
    }

    pub async fn fail_permanently(&self, id: &str, error: &str) -> colloquium_shared::Result<()> {
        let statement = Query::update()
            .table(NotificationJob::Table)
            .value(NotificationJob::Status, JobStatus::Failed.to_string())
            .value(NotificationJob::LastError, error)
            .value(NotificationJob::FinishedAt, now())
            .and_where(Expr::col(NotificationJob::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }

    /// Puts back jobs left `Running` since before `started_before`, e.g. by a
    /// worker that crashed or was killed during execution.
    pub async fn recover_stale(&self, started_before: i64) -> colloquium_shared::Result<u64> {
        let statement = Query::update()
            .table(NotificationJob::Table)
            .value(NotificationJob::Status, JobStatus::Retrying.to_string())
            .value(
                NotificationJob::LastError,
                "worker stopped while the job was running",
            )
            .value(NotificationJob::RunAt, now())
            .and_where(Expr::col(NotificationJob::Status).eq(JobStatus::Running.as_ref()))
            .and_where(Expr::col(NotificationJob::StartedAt).lt(started_before))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    pub async fn find(&self, id: &str) -> colloquium_shared::Result<Option<Job>> {
        let statement = Query::select()
            .columns(columns())
            .from(NotificationJob::Table)
            .and_where(Expr::col(NotificationJob::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Job, _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list(
        &self,
        status: Option<JobStatus>,
        limit: u64,
    ) -> colloquium_shared::Result<Vec<Job>> {
        let mut statement = Query::select()
            .columns(columns())
            .from(NotificationJob::Table)
            .order_by(NotificationJob::EnqueuedAt, Order::Asc)
            .order_by(NotificationJob::Id, Order::Asc)
            .limit(limit)
            .to_owned();

        if let Some(status) = status {
            statement.and_where(Expr::col(NotificationJob::Status).eq(status.as_ref()));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Job, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Jobs that exhausted their retries, newest first, for operators.
    pub async fn failed(&self, limit: u64) -> colloquium_shared::Result<Vec<Job>> {
        let statement = Query::select()
            .columns(columns())
            .from(NotificationJob::Table)
            .and_where(Expr::col(NotificationJob::Status).eq(JobStatus::Failed.as_ref()))
            .order_by(NotificationJob::FinishedAt, Order::Desc)
            .limit(limit)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Job, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn count(&self, status: JobStatus) -> colloquium_shared::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM "notification_job" WHERE "status" = ?"#,
        )
        .bind(status.as_ref())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
