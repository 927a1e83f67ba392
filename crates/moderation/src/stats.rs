use std::collections::BTreeMap;

use colloquium_shared::{Actor, event::EventStatus};
use serde::Serialize;
use strum::VariantArray;

#[derive(Clone, Debug, Default, Serialize)]
pub struct Stats {
    pub users: i64,
    pub banned_users: i64,
    pub admins: i64,
    pub events: BTreeMap<String, i64>,
    pub registrations: i64,
    pub forum_posts: i64,
    pub accepted_connections: i64,
    pub pending_jobs: i64,
    pub failed_jobs: i64,
}

impl super::Command {
    pub async fn stats(&self, actor: &Actor) -> colloquium_shared::Result<Stats> {
        actor.ensure_admin()?;

        let (users, banned_users, admins) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"SELECT COUNT(*), COALESCE(SUM("is_banned"), 0), COALESCE(SUM("role" = 'Admin'), 0) FROM "user""#,
        )
        .fetch_one(&self.read_db)
        .await?;

        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"SELECT "status", COUNT(*) FROM "event" WHERE "deleted_at" IS NULL GROUP BY "status""#,
        )
        .fetch_all(&self.read_db)
        .await?;

        let mut events = EventStatus::VARIANTS
            .iter()
            .map(|status| (status.to_string(), 0))
            .collect::<BTreeMap<_, _>>();
        events.extend(rows);

        let registrations = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM "registration" WHERE "status" = 'Registered'"#,
        )
        .fetch_one(&self.read_db)
        .await?;

        let forum_posts = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "forum_post""#)
            .fetch_one(&self.read_db)
            .await?;

        let accepted_connections = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM "connection" WHERE "status" = 'Accepted'"#,
        )
        .fetch_one(&self.read_db)
        .await?;

        let (pending_jobs, failed_jobs) = sqlx::query_as::<_, (i64, i64)>(
            r#"SELECT COALESCE(SUM("status" IN ('Enqueued', 'Retrying', 'Running')), 0), COALESCE(SUM("status" = 'Failed'), 0) FROM "notification_job""#,
        )
        .fetch_one(&self.read_db)
        .await?;

        Ok(Stats {
            users,
            banned_users,
            admins,
            events,
            registrations,
            forum_posts,
            accepted_connections,
            pending_jobs,
            failed_jobs,
        })
    }
}
