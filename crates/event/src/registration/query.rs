use colloquium_db::table::{Registration as RegistrationTable, User};
use colloquium_shared::event::RegistrationStatus;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

use super::repository::{self, Registration};

#[derive(Clone, Debug, FromRow, Serialize)]
pub struct Attendee {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub institution: Option<String>,
    pub notes: Option<String>,
    pub registered_at: i64,
}

impl super::Command {
    pub async fn find(
        &self,
        event_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> colloquium_shared::Result<Option<Registration>> {
        repository::find(&self.read_db, &event_id.into(), &user_id.into()).await
    }

    pub async fn count_registered(
        &self,
        event_id: impl Into<String>,
    ) -> colloquium_shared::Result<i64> {
        repository::count_registered(&self.read_db, &event_id.into()).await
    }

    /// Registered users, first come first listed.
    pub async fn list_attendees(
        &self,
        event_id: impl Into<String>,
    ) -> colloquium_shared::Result<Vec<Attendee>> {
        let event_id: String = event_id.into();
        let statement = Query::select()
            .column((RegistrationTable::Table, RegistrationTable::UserId))
            .columns([
                (User::Table, User::Name),
                (User::Table, User::Email),
                (User::Table, User::Institution),
            ])
            .columns([
                (RegistrationTable::Table, RegistrationTable::Notes),
                (RegistrationTable::Table, RegistrationTable::RegisteredAt),
            ])
            .from(RegistrationTable::Table)
            .inner_join(
                User::Table,
                Expr::col((User::Table, User::Id))
                    .equals((RegistrationTable::Table, RegistrationTable::UserId)),
            )
            .and_where(
                Expr::col((RegistrationTable::Table, RegistrationTable::EventId))
                    .eq(event_id),
            )
            .and_where(
                Expr::col((RegistrationTable::Table, RegistrationTable::Status))
                    .eq(RegistrationStatus::Registered.as_ref()),
            )
            .order_by(
                (RegistrationTable::Table, RegistrationTable::RegisteredAt),
                Order::Asc,
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Attendee, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }
}
