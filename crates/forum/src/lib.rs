use std::ops::Deref;

use colloquium_db::table::ForumPost as ForumPostTable;
use colloquium_shared::{Actor, Error, event::EventStatus, now};
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use ulid::Ulid;
use validator::Validate;

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct ForumPost {
    pub id: String,
    pub event_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: i64,
}

#[derive(Validate, Deserialize)]
pub struct PostInput {
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

#[derive(Clone)]
pub struct Command(pub colloquium_shared::State);

impl Deref for Command {
    type Target = colloquium_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub async fn post(
        &self,
        actor: &Actor,
        event_id: impl Into<String>,
        input: PostInput,
    ) -> colloquium_shared::Result<ForumPost> {
        actor.ensure_can_write()?;
        input.validate()?;

        let event_id = event_id.into();
        let Some(event) = colloquium_event::find_event(&self.read_db, &event_id).await? else {
            colloquium_shared::not_found!("event");
        };

        if event.is_deleted() {
            colloquium_shared::not_found!("event");
        }

        if event.status == EventStatus::Banned {
            return Err(Error::EventBanned);
        }

        let post = ForumPost {
            id: Ulid::new().to_string(),
            event_id,
            author_id: actor.user_id.to_owned(),
            body: input.body.trim().to_owned(),
            created_at: now(),
        };

        if post.body.is_empty() {
            colloquium_shared::user!("Post body cannot be blank");
        }

        let statement = Query::insert()
            .into_table(ForumPostTable::Table)
            .columns([
                ForumPostTable::Id,
                ForumPostTable::EventId,
                ForumPostTable::AuthorId,
                ForumPostTable::Body,
                ForumPostTable::CreatedAt,
            ])
            .values_panic([
                post.id.to_owned().into(),
                post.event_id.to_owned().into(),
                post.author_id.to_owned().into(),
                post.body.to_owned().into(),
                post.created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        tracing::info!(post_id = %post.id, event_id = %post.event_id, "forum post created");

        Ok(post)
    }

    /// Posts of an event, oldest first.
    pub async fn list(
        &self,
        event_id: impl Into<String>,
    ) -> colloquium_shared::Result<Vec<ForumPost>> {
        let event_id: String = event_id.into();
        let statement = Query::select()
            .columns([
                ForumPostTable::Id,
                ForumPostTable::EventId,
                ForumPostTable::AuthorId,
                ForumPostTable::Body,
                ForumPostTable::CreatedAt,
            ])
            .from(ForumPostTable::Table)
            .and_where(Expr::col(ForumPostTable::EventId).eq(event_id))
            .order_by(ForumPostTable::CreatedAt, Order::Asc)
            .order_by(ForumPostTable::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ForumPost, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    /// Authors remove their own posts. Admin removal goes through moderation
    /// so that it is logged.
    pub async fn delete(
        &self,
        actor: &Actor,
        id: impl Into<String>,
    ) -> colloquium_shared::Result<()> {
        actor.ensure_can_write()?;

        let id = id.into();
        let statement = Query::select()
            .column(ForumPostTable::AuthorId)
            .from(ForumPostTable::Table)
            .and_where(Expr::col(ForumPostTable::Id).eq(id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let Some(author_id) = sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_optional(&self.write_db)
            .await?
        else {
            colloquium_shared::not_found!("post");
        };

        if author_id != actor.user_id {
            return Err(Error::Forbidden);
        }

        let statement = Query::delete()
            .from_table(ForumPostTable::Table)
            .and_where(Expr::col(ForumPostTable::Id).eq(id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        tracing::info!(post_id = %id, "forum post deleted by author");

        Ok(())
    }
}
