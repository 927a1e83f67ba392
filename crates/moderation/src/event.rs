use colloquium_db::table::{Event as EventTable, ForumPost, Registration};
use colloquium_event::Event;
use colloquium_shared::{
    Actor, Error,
    event::EventStatus,
    moderation::{AdminAction, TargetType},
    now,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::audit;

impl super::Command {
    pub async fn ban_event(
        &self,
        actor: &Actor,
        event_id: impl Into<String>,
        reason: Option<String>,
    ) -> colloquium_shared::Result<Event> {
        actor.ensure_admin()?;

        let mut tx = self.write_db.begin().await?;

        let Some(mut event) = colloquium_event::find_event(&mut *tx, event_id).await? else {
            colloquium_shared::not_found!("event");
        };

        if event.status == EventStatus::Banned {
            return Err(Error::AlreadyBanned);
        }

        let now = now();
        let statement = Query::update()
            .table(EventTable::Table)
            .value(EventTable::Status, EventStatus::Banned.as_ref())
            .value(EventTable::BanReason, reason.to_owned())
            .value(EventTable::BannedAt, now)
            .value(EventTable::BannedBy, actor.user_id.to_owned())
            .value(EventTable::ModeratedAt, now)
            .value(EventTable::ModeratedBy, actor.user_id.to_owned())
            .value(EventTable::UpdatedAt, now)
            .and_where(Expr::col(EventTable::Id).eq(event.id.to_owned()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        audit::append(
            &mut *tx,
            actor,
            AdminAction::EventBan,
            TargetType::Event,
            &event.id,
            reason.to_owned(),
        )
        .await?;

        tx.commit().await?;

        event.status = EventStatus::Banned;
        event.ban_reason = reason;
        event.banned_at = Some(now);
        event.banned_by = Some(actor.user_id.to_owned());
        event.moderated_at = Some(now);
        event.moderated_by = Some(actor.user_id.to_owned());
        event.updated_at = now;

        Ok(event)
    }

    /// Lifts a ban. The event goes back to `Published`.
    pub async fn unban_event(
        &self,
        actor: &Actor,
        event_id: impl Into<String>,
    ) -> colloquium_shared::Result<Event> {
        actor.ensure_admin()?;

        let mut tx = self.write_db.begin().await?;

        let Some(mut event) = colloquium_event::find_event(&mut *tx, event_id).await? else {
            colloquium_shared::not_found!("event");
        };

        if event.status != EventStatus::Banned {
            return Err(Error::NotBanned);
        }

        let now = now();
        let statement = Query::update()
            .table(EventTable::Table)
            .value(EventTable::Status, EventStatus::Published.as_ref())
            .value(EventTable::BanReason, Option::<String>::None)
            .value(EventTable::BannedAt, Option::<i64>::None)
            .value(EventTable::BannedBy, Option::<String>::None)
            .value(EventTable::ModeratedAt, now)
            .value(EventTable::ModeratedBy, actor.user_id.to_owned())
            .value(EventTable::UpdatedAt, now)
            .and_where(Expr::col(EventTable::Id).eq(event.id.to_owned()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        audit::append(
            &mut *tx,
            actor,
            AdminAction::EventUnban,
            TargetType::Event,
            &event.id,
            None,
        )
        .await?;

        tx.commit().await?;

        event.status = EventStatus::Published;
        event.ban_reason = None;
        event.banned_at = None;
        event.banned_by = None;
        event.moderated_at = Some(now);
        event.moderated_by = Some(actor.user_id.to_owned());
        event.updated_at = now;

        Ok(event)
    }

    /// Removes the event with its registrations and forum posts for good.
    pub async fn force_delete_event(
        &self,
        actor: &Actor,
        event_id: impl Into<String>,
        reason: Option<String>,
    ) -> colloquium_shared::Result<()> {
        actor.ensure_admin()?;

        let mut tx = self.write_db.begin().await?;

        let Some(event) = colloquium_event::find_event(&mut *tx, event_id).await? else {
            colloquium_shared::not_found!("event");
        };

        let statement = Query::delete()
            .from_table(Registration::Table)
            .and_where(Expr::col(Registration::EventId).eq(event.id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let registrations = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let statement = Query::delete()
            .from_table(ForumPost::Table)
            .and_where(Expr::col(ForumPost::EventId).eq(event.id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let posts = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let statement = Query::delete()
            .from_table(EventTable::Table)
            .and_where(Expr::col(EventTable::Id).eq(event.id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        audit::append(
            &mut *tx,
            actor,
            AdminAction::EventDelete,
            TargetType::Event,
            &event.id,
            reason,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            event_id = %event.id,
            registrations = registrations.rows_affected(),
            posts = posts.rows_affected(),
            "event force deleted"
        );

        Ok(())
    }
}
